//! # Feature: Identification Flow
//!
//! Photo in, plant name and care text out. A successful run replaces the
//! conversation with a fresh session seeded by the identification exchange;
//! a failed run leaves the conversation exactly as it was.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::extract::extract_plant_name;
use super::prompt::IDENTIFY_PROMPT;
use crate::features::conversation::{ChatMessage, ConversationSession};
use crate::features::model::{ImageInput, PlantModel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    /// Raw model reply, shown as the first conversation turn
    pub first_reply: String,
    /// Common name pulled from the reply; `None` disables reminders and sharing
    pub plant_name: Option<String>,
}

pub struct IdentificationFlow {
    model: Arc<dyn PlantModel>,
}

impl IdentificationFlow {
    pub fn new(model: Arc<dyn PlantModel>) -> Self {
        Self { model }
    }

    pub async fn identify(
        &self,
        image: &ImageInput,
        session: &mut ConversationSession,
    ) -> Result<Identification> {
        let request_id = Uuid::new_v4();
        let start = Instant::now();
        info!(
            "[{request_id}] Identifying plant from {} photo",
            image.mime_type
        );

        let reply = self.model.analyze(image, IDENTIFY_PROMPT).await?;

        let plant_name = extract_plant_name(&reply);
        match &plant_name {
            Some(name) => info!("[{request_id}] Identified plant: {name}"),
            None => warn!("[{request_id}] No plant name found in reply"),
        }

        session
            .restart(
                vec![ChatMessage::user(IDENTIFY_PROMPT), ChatMessage::model(reply.clone())],
                vec![ChatMessage::model(reply.clone())],
            )
            .await?;

        info!(
            "[{request_id}] Identification complete | Processing time: {:?}",
            start.elapsed()
        );

        Ok(Identification {
            first_reply: reply,
            plant_name,
        })
    }
}
