//! # Model Feature
//!
//! The boundary to the generative model: one-shot image analysis and
//! multi-turn chat sessions. `GeminiClient` is the production backend.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Sessions can be created with seed history
//! - 1.0.0: Initial release with Gemini generateContent backend

pub mod gemini;
pub mod image;

pub use gemini::GeminiClient;
pub use image::ImageInput;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::features::conversation::ChatMessage;

/// Handle to one ongoing model conversation.
///
/// The model sees `history` on every message; it only grows when an
/// exchange succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChat {
    id: Uuid,
    history: Vec<ChatMessage>,
}

impl ModelChat {
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    pub fn seeded(history: Vec<ChatMessage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            history,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Append a completed user/model exchange
    pub fn record_exchange(&mut self, user_text: &str, reply: &str) {
        self.history.push(ChatMessage::user(user_text));
        self.history.push(ChatMessage::model(reply));
    }
}

impl Default for ModelChat {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
pub trait PlantModel: Send + Sync {
    /// Send a photo together with `prompt` and return the reply text
    async fn analyze(&self, image: &ImageInput, prompt: &str) -> Result<String>;

    /// Open a conversation whose history starts with `seed`
    async fn create_session(&self, seed: Vec<ChatMessage>) -> Result<ModelChat> {
        Ok(ModelChat::seeded(seed))
    }

    /// Send `text` within `chat` and return the reply. Does not modify the
    /// handle; the caller records the exchange once it has succeeded.
    async fn send_message(&self, chat: &ModelChat, text: &str) -> Result<String>;
}

#[cfg(test)]
pub mod testing {
    //! Scripted model for exercising sessions and flows without a network

    use super::*;
    use anyhow::anyhow;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Analyze { mime_type: String, prompt: String },
        CreateSession { seed_len: usize },
        Send { chat_id: Uuid, history_len: usize, text: String },
    }

    /// Replies are consumed in order across analyze and send calls.
    /// An `Err` entry makes that call fail with the given message.
    #[derive(Default)]
    pub struct ScriptedModel {
        replies: Mutex<VecDeque<std::result::Result<String, String>>>,
        calls: Mutex<Vec<Call>>,
        fail_sessions: Mutex<bool>,
    }

    impl ScriptedModel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, text: &str) -> Self {
            self.replies.lock().unwrap().push_back(Ok(text.to_string()));
            self
        }

        pub fn fail(self, message: &str) -> Self {
            self.replies.lock().unwrap().push_back(Err(message.to_string()));
            self
        }

        pub fn fail_session_creation(self) -> Self {
            *self.fail_sessions.lock().unwrap() = true;
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn next_reply(&self) -> Result<String> {
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(message)) => Err(anyhow!(message)),
                None => Err(anyhow!("no scripted reply left")),
            }
        }
    }

    #[async_trait]
    impl PlantModel for ScriptedModel {
        async fn analyze(&self, image: &ImageInput, prompt: &str) -> Result<String> {
            self.calls.lock().unwrap().push(Call::Analyze {
                mime_type: image.mime_type.clone(),
                prompt: prompt.to_string(),
            });
            self.next_reply()
        }

        async fn create_session(&self, seed: Vec<ChatMessage>) -> Result<ModelChat> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::CreateSession { seed_len: seed.len() });
            if *self.fail_sessions.lock().unwrap() {
                return Err(anyhow!("session service unavailable"));
            }
            Ok(ModelChat::seeded(seed))
        }

        async fn send_message(&self, chat: &ModelChat, text: &str) -> Result<String> {
            self.calls.lock().unwrap().push(Call::Send {
                chat_id: chat.id(),
                history_len: chat.history().len(),
                text: text.to_string(),
            });
            self.next_reply()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_exchange_appends_pair() {
        let mut chat = ModelChat::seeded(vec![ChatMessage::model("It's a fern.")]);
        chat.record_exchange("How often?", "Twice a week.");

        assert_eq!(
            chat.history(),
            &[
                ChatMessage::model("It's a fern."),
                ChatMessage::user("How often?"),
                ChatMessage::model("Twice a week."),
            ]
        );
    }

    #[test]
    fn test_each_chat_gets_its_own_id() {
        assert_ne!(ModelChat::new().id(), ModelChat::new().id());
    }
}
