//! # Plant Assistant
//!
//! The one object a front-end holds. It owns the reminder store and alerts,
//! the conversation, the identification flow and the optional share and
//! voice capabilities, plus the current photo and identification result.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Voice questions and sharing of care guides
//! - 1.0.0: Identification, follow-up chat and watering reminders

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::{Config, InputError};
use crate::features::conversation::{ChatMessage, ConversationSession};
use crate::features::identification::{Identification, IdentificationFlow};
use crate::features::model::{GeminiClient, ImageInput, PlantModel};
use crate::features::reminders::{
    parse_interval, Alert, DerivedReminder, ReminderCheck, ReminderScheduler, ReminderStore,
};
use crate::features::share::{FileShare, SharePayload, ShareTarget};
use crate::features::speech::{SpeechCapture, WhisperCapture, WhisperTranscriber};
use crate::storage::SqliteStore;

pub struct PlantAssistant {
    flow: IdentificationFlow,
    session: ConversationSession,
    store: ReminderStore,
    scheduler: ReminderScheduler,
    share: Option<Arc<dyn ShareTarget>>,
    voice: Option<WhisperTranscriber>,
    selected_image: Option<ImageInput>,
    identification: Option<Identification>,
}

impl PlantAssistant {
    pub fn new(model: Arc<dyn PlantModel>, store: ReminderStore, alert: Arc<dyn Alert>) -> Self {
        Self {
            flow: IdentificationFlow::new(model.clone()),
            session: ConversationSession::new(model),
            store,
            scheduler: ReminderScheduler::new(alert),
            share: None,
            voice: None,
            selected_image: None,
            identification: None,
        }
    }

    pub fn with_share(mut self, target: Arc<dyn ShareTarget>) -> Self {
        self.share = Some(target);
        self
    }

    pub fn with_voice(mut self, transcriber: WhisperTranscriber) -> Self {
        self.voice = Some(transcriber);
        self
    }

    /// Production wiring: Gemini, SQLite, and whichever optional
    /// capabilities the configuration enables
    pub fn from_config(config: &Config, alert: Arc<dyn Alert>) -> Result<Self> {
        let model: Arc<dyn PlantModel> = Arc::new(GeminiClient::from_config(config)?);
        let storage = Arc::new(SqliteStore::open(&config.database_path)?);
        let mut assistant = Self::new(model, ReminderStore::with_system_clock(storage), alert);

        match &config.share_dir {
            Some(dir) => {
                info!("Sharing enabled, writing to {}", dir.display());
                assistant = assistant.with_share(Arc::new(FileShare::new(dir.clone())));
            }
            None => info!("SHARE_DIR not set, sharing disabled"),
        }
        match WhisperTranscriber::from_config(config)? {
            Some(transcriber) => assistant = assistant.with_voice(transcriber),
            None => info!("OPENAI_API_KEY not set, voice input disabled"),
        }

        Ok(assistant)
    }

    /// Open the conversation and run the load-time reminder check
    pub async fn startup(&mut self) -> Result<ReminderCheck> {
        let check = self.refresh_reminders();
        self.session.start().await?;
        Ok(check)
    }

    // ------------------------------------------------------------------
    // Photo and identification
    // ------------------------------------------------------------------

    pub fn select_image(&mut self, image: ImageInput) {
        info!(
            "Selected {} photo ({} bytes)",
            image.mime_type,
            image.size()
        );
        self.selected_image = Some(image);
    }

    /// Load a photo from disk; the previous selection survives a failure
    pub async fn select_image_file(&mut self, path: &Path) -> Result<()> {
        let image = ImageInput::from_path(path).await?;
        self.select_image(image);
        Ok(())
    }

    pub fn has_image(&self) -> bool {
        self.selected_image.is_some()
    }

    /// Identify the selected photo and start a conversation about it.
    ///
    /// On failure the photo stays selected so the user can retry.
    pub async fn identify(&mut self) -> Result<Identification> {
        let image = self
            .selected_image
            .as_ref()
            .ok_or(InputError::MissingImage)?;

        let result = self.flow.identify(image, &mut self.session).await?;
        self.identification = Some(result.clone());
        Ok(result)
    }

    pub fn identification(&self) -> Option<&Identification> {
        self.identification.as_ref()
    }

    pub fn plant_name(&self) -> Option<&str> {
        self.identification
            .as_ref()
            .and_then(|i| i.plant_name.as_deref())
    }

    // ------------------------------------------------------------------
    // Conversation
    // ------------------------------------------------------------------

    pub async fn send(&mut self, text: &str) -> Result<String> {
        self.session.send(text).await
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.session.messages()
    }

    /// Start over with a new plant: photo, result and conversation are cleared
    pub fn reset(&mut self) {
        self.session.reset();
        self.selected_image = None;
        self.identification = None;
        info!("Assistant reset");
    }

    // ------------------------------------------------------------------
    // Reminders
    // ------------------------------------------------------------------

    pub fn now(&self) -> DateTime<Utc> {
        self.store.now()
    }

    /// Current reminder list without raising alerts, for redraws after a
    /// save or delete
    pub fn reminders(&self) -> Vec<DerivedReminder> {
        self.store.load()
    }

    /// Load reminders, alerting for any that are due
    pub fn refresh_reminders(&self) -> ReminderCheck {
        self.scheduler.check(&self.store)
    }

    /// Remind about the identified plant every `interval` days.
    ///
    /// `interval` is free-form input; anything below one day becomes one.
    pub fn save_reminder(&self, interval: &str) -> Result<Vec<DerivedReminder>> {
        let name = self.plant_name().ok_or(InputError::NoPlantIdentified)?;
        let days = parse_interval(interval);
        self.store.save(name, i64::from(days.get()))
    }

    pub fn delete_reminder(&self, plant_name: &str) -> Result<()> {
        self.store.delete(plant_name)
    }

    pub fn reminder_for_current_plant(&self) -> Option<DerivedReminder> {
        self.plant_name().and_then(|name| self.store.get(name))
    }

    // ------------------------------------------------------------------
    // Share
    // ------------------------------------------------------------------

    /// Sharing needs both a share target and an identified plant
    pub fn can_share(&self) -> bool {
        self.share.is_some() && self.plant_name().is_some()
    }

    pub fn share(&self) -> Result<String> {
        let target = self.share.as_ref().ok_or(InputError::ShareUnavailable)?;
        let identification = self
            .identification
            .as_ref()
            .ok_or(InputError::NoPlantIdentified)?;
        let name = identification
            .plant_name
            .as_deref()
            .ok_or(InputError::NoPlantIdentified)?;

        target.share(&SharePayload::for_plant(name, &identification.first_reply))
    }

    // ------------------------------------------------------------------
    // Voice
    // ------------------------------------------------------------------

    pub fn has_voice(&self) -> bool {
        self.voice.is_some()
    }

    /// A capture for one recorded question
    pub fn voice_capture(&self, audio_path: impl Into<PathBuf>) -> Result<WhisperCapture> {
        let transcriber = self.voice.clone().ok_or(InputError::SpeechUnavailable)?;
        Ok(WhisperCapture::new(transcriber, audio_path))
    }

    /// Run a capture to completion and return the committed text
    pub async fn transcribe(&self, capture: &dyn SpeechCapture) -> Result<String> {
        let text = capture.start().await?.collect_text().await?;
        if text.is_empty() {
            warn!("Voice capture ended without any text");
        }
        Ok(text)
    }
}
