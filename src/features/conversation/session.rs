//! # Feature: Conversation Session
//!
//! Holds the visible chat turns and the model session handle. Sending is
//! optimistic: the user turn shows up immediately and is taken back out if
//! the model call fails, leaving the handle in place for a retry.
//!
//! `send` takes `&mut self`, so two sends on one session cannot overlap.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: restart() seeds the new handle with the identification exchange
//! - 1.0.0: Initial release with optimistic send and rollback

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::message::ChatMessage;
use crate::core::InputError;
use crate::features::model::{ModelChat, PlantModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Active,
}

pub struct ConversationSession {
    model: Arc<dyn PlantModel>,
    chat: Option<ModelChat>,
    messages: Vec<ChatMessage>,
}

impl ConversationSession {
    pub fn new(model: Arc<dyn PlantModel>) -> Self {
        Self {
            model,
            chat: None,
            messages: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.chat.is_some() {
            SessionState::Active
        } else {
            SessionState::Uninitialized
        }
    }

    pub fn handle(&self) -> Option<&ModelChat> {
        self.chat.as_ref()
    }

    /// Visible turns, in display order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Create the session handle if there isn't one yet
    pub async fn start(&mut self) -> Result<&ModelChat> {
        if self.chat.is_none() {
            let chat = self.model.create_session(Vec::new()).await?;
            info!("Started conversation session {}", chat.id());
            self.chat = Some(chat);
        }
        self.chat
            .as_ref()
            .ok_or_else(|| anyhow!("conversation session missing after start"))
    }

    /// Replace the handle and the visible turns in one step.
    ///
    /// The new handle is created first; if that fails nothing changes.
    pub async fn restart(&mut self, seed: Vec<ChatMessage>, visible: Vec<ChatMessage>) -> Result<()> {
        let chat = self.model.create_session(seed).await?;
        if let Some(old) = &self.chat {
            debug!("Discarding conversation session {}", old.id());
        }
        info!(
            "Started conversation session {} with {} seeded turn(s)",
            chat.id(),
            chat.history().len()
        );

        self.chat = Some(chat);
        self.messages = visible;
        Ok(())
    }

    /// Drop the handle and all turns
    pub fn reset(&mut self) {
        self.chat = None;
        self.messages.clear();
    }

    /// Send `text` and return the model's reply.
    ///
    /// On failure the visible turns are exactly what they were before the call.
    pub async fn send(&mut self, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(InputError::EmptyMessage.into());
        }

        let request_id = Uuid::new_v4();
        let start = Instant::now();
        self.start().await?;

        let rollback_len = self.messages.len();
        self.messages.push(ChatMessage::user(text));

        let chat = self
            .chat
            .as_ref()
            .ok_or_else(|| anyhow!("conversation session missing after start"))?;
        debug!(
            "[{request_id}] Sending message in session {} | {} chars",
            chat.id(),
            text.len()
        );

        let result = self.model.send_message(chat, text).await;
        match result {
            Ok(reply) => {
                if let Some(chat) = self.chat.as_mut() {
                    chat.record_exchange(text, &reply);
                }
                self.messages.push(ChatMessage::model(reply.clone()));
                info!(
                    "[{request_id}] Reply received | Processing time: {:?}",
                    start.elapsed()
                );
                Ok(reply)
            }
            Err(e) => {
                warn!("[{request_id}] Send failed, rolling back user turn: {e}");
                self.messages.truncate(rollback_len);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::as_input_error;
    use crate::features::model::testing::{Call, ScriptedModel};

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let model = Arc::new(ScriptedModel::new());
        let mut session = ConversationSession::new(model.clone());
        assert_eq!(session.state(), SessionState::Uninitialized);

        let first = session.start().await.unwrap().id();
        let second = session.start().await.unwrap().id();
        assert_eq!(first, second);
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(model.calls(), vec![Call::CreateSession { seed_len: 0 }]);
    }

    #[tokio::test]
    async fn test_send_appends_both_turns() {
        let model = Arc::new(ScriptedModel::new().reply("Once a week."));
        let mut session = ConversationSession::new(model.clone());

        let reply = session.send("  How often should I water it?  ").await.unwrap();
        assert_eq!(reply, "Once a week.");
        assert_eq!(
            session.messages(),
            &[
                ChatMessage::user("How often should I water it?"),
                ChatMessage::model("Once a week."),
            ]
        );
        // Exchange is now part of the model-side history
        assert_eq!(session.handle().unwrap().history().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_send_rolls_back() {
        let model = Arc::new(
            ScriptedModel::new()
                .reply("Bright, indirect light.")
                .fail("network unreachable")
                .reply("Yes, mist it."),
        );
        let mut session = ConversationSession::new(model.clone());
        session.send("Light?").await.unwrap();
        let before = session.messages().to_vec();
        let handle_before = session.handle().unwrap().clone();

        let err = session.send("Humidity?").await.unwrap_err();
        assert_eq!(err.to_string(), "network unreachable");
        assert_eq!(session.messages(), before.as_slice());
        assert_eq!(session.handle(), Some(&handle_before));

        // Same handle is reused on retry
        session.send("Humidity?").await.unwrap();
        assert_eq!(session.messages().len(), 4);
        assert_eq!(session.handle().unwrap().id(), handle_before.id());
    }

    #[tokio::test]
    async fn test_empty_message_rejected_before_model_call() {
        let model = Arc::new(ScriptedModel::new());
        let mut session = ConversationSession::new(model.clone());

        let err = session.send("   ").await.unwrap_err();
        assert_eq!(as_input_error(&err), Some(&InputError::EmptyMessage));
        assert!(model.calls().is_empty());
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_restart_replaces_handle_and_turns() {
        let model = Arc::new(ScriptedModel::new().reply("Sure."));
        let mut session = ConversationSession::new(model.clone());
        session.send("hi").await.unwrap();
        let old_id = session.handle().unwrap().id();

        session
            .restart(
                vec![ChatMessage::user("identify"), ChatMessage::model("A cactus.")],
                vec![ChatMessage::model("A cactus.")],
            )
            .await
            .unwrap();

        assert_ne!(session.handle().unwrap().id(), old_id);
        assert_eq!(session.handle().unwrap().history().len(), 2);
        assert_eq!(session.messages(), &[ChatMessage::model("A cactus.")]);
    }

    #[tokio::test]
    async fn test_restart_failure_keeps_previous_state() {
        let model = Arc::new(ScriptedModel::new().fail_session_creation());
        let mut session = ConversationSession::new(model);

        let result = session
            .restart(Vec::new(), vec![ChatMessage::model("A cactus.")])
            .await;
        assert!(result.is_err());
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_reset() {
        let model = Arc::new(ScriptedModel::new().reply("ok"));
        let mut session = ConversationSession::new(model);
        session.send("hi").await.unwrap();

        session.reset();
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(session.messages().is_empty());
    }
}
