//! # Feature: Whisper Voice Input
//!
//! Transcribes a recorded question with the Whisper API and feeds the result
//! through a transcript stream. Formats Whisper can't read are converted to
//! mp3 with ffmpeg first.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.2.0: Capture runs as a cancellable stream
//! - 1.1.0: Added ffmpeg conversion for broader format support
//! - 1.0.0: Initial release with Whisper API integration

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::process::Command;
use uuid::Uuid;

use super::{SpeechCapture, TranscriptEvent, TranscriptStream};
use crate::core::file_utils::path_extension;
use crate::core::Config;

/// Formats Whisper reads directly
const WHISPER_NATIVE_FORMATS: &[&str] = &["mp3", "mp4", "m4a", "wav", "webm", "mpeg", "mpga"];

/// Everything we accept; the rest go through ffmpeg
const SUPPORTED_FORMATS: &[&str] = &[
    "mp3", "mp4", "m4a", "wav", "webm", "mpeg", "mpga", "flac", "ogg", "aac", "wma", "mov", "opus",
];

pub fn is_supported_audio(path: &Path) -> bool {
    SUPPORTED_FORMATS.contains(&path_extension(path).as_str())
}

fn needs_conversion(path: &Path) -> bool {
    !WHISPER_NATIVE_FORMATS.contains(&path_extension(path).as_str())
}

#[derive(Clone)]
pub struct WhisperTranscriber {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WhisperTranscriber {
    pub fn new(api_key: String, base_url: String, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `None` when no OpenAI key is configured, which hides voice input
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        match &config.openai_api_key {
            Some(key) => Ok(Some(Self::new(
                key.clone(),
                config.openai_base_url.clone(),
                config.model_timeout_secs,
            )?)),
            None => Ok(None),
        }
    }

    pub async fn transcribe_file(&self, path: &Path) -> Result<String> {
        info!("Transcribing audio file: {}", path.display());

        if !is_supported_audio(path) {
            return Err(anyhow!(
                "Unsupported audio format: .{}",
                path_extension(path)
            ));
        }
        if fs::metadata(path).await.is_err() {
            return Err(anyhow!("Audio file not found: {}", path.display()));
        }

        if needs_conversion(path) {
            let converted = convert_to_mp3(path).await?;
            let result = self.upload(&converted).await;
            if let Err(e) = fs::remove_file(&converted).await {
                warn!("Failed to cleanup converted file {}: {e}", converted.display());
            }
            result
        } else {
            self.upload(path).await
        }
    }

    async fn upload(&self, path: &Path) -> Result<String> {
        let start = Instant::now();
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("Could not read audio {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("model", "whisper-1");

        let response = self
            .http
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!("Transcription did not finish in time")
                } else {
                    anyhow!("Transcription request failed: {e}")
                }
            })?;

        let status = response.status();
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Unexpected transcription response ({status}): {e}"))?;

        if let Some(text) = json.get("text").and_then(|t| t.as_str()) {
            info!(
                "Transcription successful in {:?}, length: {} characters",
                start.elapsed(),
                text.len()
            );
            Ok(text.trim().to_string())
        } else if let Some(error) = json.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            error!("OpenAI API error ({status}): {message}");
            Err(anyhow!("Transcription failed: {message}"))
        } else {
            error!("Unexpected response format: {json}");
            Err(anyhow!("Unexpected transcription response ({status})"))
        }
    }
}

/// Convert an audio/video file to a temporary mp3
async fn convert_to_mp3(input: &Path) -> Result<PathBuf> {
    let output_path = std::env::temp_dir().join(format!("greenthumb-{}.mp3", Uuid::new_v4()));
    info!("Converting {} to mp3 via ffmpeg", input.display());
    let start = Instant::now();

    let output = Command::new("ffmpeg")
        .arg("-i")
        .arg(input)
        .args(["-vn", "-acodec", "libmp3lame", "-q:a", "2", "-y"])
        .arg(&output_path)
        .output()
        .await
        .map_err(|e| {
            error!("Could not run ffmpeg: {e}");
            anyhow!("FFmpeg is required for this format but not installed. Install with: apt install ffmpeg")
        })?;

    if output.status.success() {
        info!("FFmpeg conversion completed in {:?}", start.elapsed());
        Ok(output_path)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("FFmpeg conversion failed: {stderr}");
        Err(anyhow!("FFmpeg conversion failed"))
    }
}

/// One recorded file, delivered as a transcript stream
pub struct WhisperCapture {
    transcriber: WhisperTranscriber,
    audio_path: PathBuf,
}

impl WhisperCapture {
    pub fn new(transcriber: WhisperTranscriber, audio_path: impl Into<PathBuf>) -> Self {
        Self {
            transcriber,
            audio_path: audio_path.into(),
        }
    }
}

#[async_trait]
impl SpeechCapture for WhisperCapture {
    async fn start(&self) -> Result<TranscriptStream> {
        let (sender, stream) = TranscriptStream::channel(8);
        let transcriber = self.transcriber.clone();
        let path = self.audio_path.clone();

        tokio::spawn(async move {
            let mut stop = sender.stop_signal();
            let outcome = tokio::select! {
                _ = stop.stopped() => None,
                result = transcriber.transcribe_file(&path) => Some(result),
            };

            match outcome {
                Some(Ok(text)) => {
                    sender.send(TranscriptEvent::Final(text)).await;
                }
                Some(Err(e)) => {
                    sender.send(TranscriptEvent::Error(e.to_string())).await;
                }
                None => debug!("Voice capture stopped before transcription finished"),
            }
            sender.send(TranscriptEvent::End).await;
        });

        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/v1/audio/transcriptions";

    fn transcriber(server: &MockServer) -> WhisperTranscriber {
        WhisperTranscriber::new("sk-test".to_string(), server.uri(), 5).unwrap()
    }

    async fn recording(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"RIFF....WAVE").await.unwrap();
        path
    }

    #[test]
    fn test_format_detection() {
        assert!(is_supported_audio(Path::new("question.WAV")));
        assert!(is_supported_audio(Path::new("question.ogg")));
        assert!(!is_supported_audio(Path::new("question.txt")));
        assert!(!needs_conversion(Path::new("question.m4a")));
        assert!(needs_conversion(Path::new("question.flac")));
    }

    #[tokio::test]
    async fn test_transcribe_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "text": " Does it need sun? " })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = recording(&dir, "question.wav").await;
        let text = transcriber(&server).transcribe_file(&file).await.unwrap();
        assert_eq!(text, "Does it need sun?");
    }

    #[tokio::test]
    async fn test_api_error_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "message": "Incorrect API key provided" }
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = recording(&dir, "question.wav").await;
        let err = transcriber(&server).transcribe_file(&file).await.unwrap_err();
        assert_eq!(err.to_string(), "Transcription failed: Incorrect API key provided");
    }

    #[tokio::test]
    async fn test_rejects_before_upload() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        let notes = recording(&dir, "notes.txt").await;
        let err = transcriber(&server).transcribe_file(&notes).await.unwrap_err();
        assert!(err.to_string().contains("Unsupported audio format"));

        let missing = dir.path().join("missing.mp3");
        let err = transcriber(&server).transcribe_file(&missing).await.unwrap_err();
        assert!(err.to_string().contains("Audio file not found"));

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_capture_emits_final_then_end() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "Is it toxic to cats?" })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = recording(&dir, "question.mp3").await;
        let capture = WhisperCapture::new(transcriber(&server), file);

        let mut stream = capture.start().await.unwrap();
        assert_eq!(
            stream.next().await,
            Some(TranscriptEvent::Final("Is it toxic to cats?".to_string()))
        );
        assert_eq!(stream.next().await, Some(TranscriptEvent::End));
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_capture_error_event() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let capture = WhisperCapture::new(transcriber(&server), dir.path().join("gone.wav"));

        let err = capture.start().await.unwrap().collect_text().await.unwrap_err();
        assert!(err.to_string().starts_with("Voice input failed: Audio file not found"));
    }

    #[tokio::test]
    async fn test_stop_ends_capture_without_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "text": "too late" }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = recording(&dir, "question.wav").await;
        let capture = WhisperCapture::new(transcriber(&server), file);

        let stream = capture.start().await.unwrap();
        let handle = stream.handle();
        handle.stop();
        handle.stop();

        assert_eq!(stream.collect_text().await.unwrap(), "");
    }
}
