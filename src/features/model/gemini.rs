//! # Feature: Gemini Client
//!
//! `generateContent` over REST. Image analysis sends the photo inline as
//! base64 next to the prompt; chat replays the session history on every call.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Request timeout via MODEL_TIMEOUT_SECS, surface block reasons
//! - 1.0.0: Initial release with analyze and chat

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::{ImageInput, ModelChat, PlantModel};
use crate::core::Config;
use crate::features::conversation::ChatMessage;
use crate::features::identification::prompt::SYSTEM_INSTRUCTION;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl Content {
    fn text(role: &str, text: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: Some(text.to_string()),
                inline_data: None,
            }],
        }
    }

    fn from_message(message: &ChatMessage) -> Self {
        Self::text(message.role.as_str(), &message.text)
    }
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
            config.model_timeout_secs,
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, contents: Vec<Content>, request_id: Uuid) -> Result<String> {
        let start = Instant::now();
        let request = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(SYSTEM_INSTRUCTION.to_string()),
                    inline_data: None,
                }],
            },
            contents,
        };

        debug!(
            "[{request_id}] Sending {} content block(s) to {}",
            request.contents.len(),
            self.model
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!("The model did not answer in time")
                } else if e.is_connect() {
                    anyhow!("Could not reach the model service")
                } else {
                    anyhow!("Model request failed: {e}")
                }
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|json| {
                    json.get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| format!("HTTP {status}"));
            error!("[{request_id}] Gemini API error ({status}): {message}");
            return Err(anyhow!("Model service error: {message}"));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| anyhow!("Unexpected response from model service: {e}"))?;
        let text = reply_text(&parsed)?;

        info!(
            "[{request_id}] Model reply received | {:?} | {} chars",
            start.elapsed(),
            text.len()
        );
        Ok(text)
    }
}

/// Concatenate the text parts of the first candidate
fn reply_text(response: &GenerateResponse) -> Result<String> {
    let candidate = match response.candidates.first() {
        Some(c) => c,
        None => {
            let reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(anyhow!("The model returned no answer ({reason})"));
        }
    };

    let text: String = candidate
        .content
        .as_ref()
        .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate
            .finish_reason
            .clone()
            .unwrap_or_else(|| "empty reply".to_string());
        return Err(anyhow!("The model returned no answer ({reason})"));
    }

    Ok(text.trim().to_string())
}

#[async_trait]
impl PlantModel for GeminiClient {
    async fn analyze(&self, image: &ImageInput, prompt: &str) -> Result<String> {
        let request_id = Uuid::new_v4();
        info!(
            "[{request_id}] Analyzing {} image ({} bytes)",
            image.mime_type,
            image.size()
        );

        let contents = vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.encode(),
                    }),
                },
                Part {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                },
            ],
        }];

        self.generate(contents, request_id).await
    }

    async fn send_message(&self, chat: &ModelChat, text: &str) -> Result<String> {
        let request_id = Uuid::new_v4();
        debug!(
            "[{request_id}] Chat {} | {} prior turn(s)",
            chat.id(),
            chat.history().len()
        );

        let mut contents: Vec<Content> = chat.history().iter().map(Content::from_message).collect();
        contents.push(Content::text("user", text));

        self.generate(contents, request_id).await
    }
}
