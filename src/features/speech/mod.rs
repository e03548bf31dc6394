//! # Speech Feature
//!
//! Voice input as a cancellable stream of transcript events. Captures push
//! interim and final text, then an `End`; the consumer decides what to
//! commit. `CaptureHandle::stop` may be called any number of times.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0
//! - **Toggleable**: true

pub mod whisper;

pub use whisper::{WhisperCapture, WhisperTranscriber};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// Best guess so far; replaced by the next interim or final
    Interim(String),
    /// Settled text for one utterance
    Final(String),
    Error(String),
    End,
}

#[async_trait]
pub trait SpeechCapture: Send + Sync {
    async fn start(&self) -> Result<TranscriptStream>;
}

/// Stops a running capture. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CaptureHandle {
    stop_tx: Arc<watch::Sender<bool>>,
}

impl CaptureHandle {
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }
}

/// Producer side, held by the capture task
pub struct TranscriptSender {
    events: mpsc::Sender<TranscriptEvent>,
    stop_rx: watch::Receiver<bool>,
}

impl TranscriptSender {
    /// Returns false once the consumer has gone away
    pub async fn send(&self, event: TranscriptEvent) -> bool {
        self.events.send(event).await.is_ok()
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop_rx.borrow()
    }

    /// A future-friendly view of the stop flag
    pub fn stop_signal(&self) -> StopSignal {
        StopSignal {
            rx: self.stop_rx.clone(),
        }
    }
}

pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// Resolves once stop has been requested or every handle is gone
    pub async fn stopped(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Consumer side of a capture
pub struct TranscriptStream {
    events: mpsc::Receiver<TranscriptEvent>,
    handle: CaptureHandle,
    finished: bool,
}

impl TranscriptStream {
    pub fn channel(buffer: usize) -> (TranscriptSender, TranscriptStream) {
        let (events_tx, events_rx) = mpsc::channel(buffer);
        let (stop_tx, stop_rx) = watch::channel(false);

        let sender = TranscriptSender {
            events: events_tx,
            stop_rx,
        };
        let stream = TranscriptStream {
            events: events_rx,
            handle: CaptureHandle {
                stop_tx: Arc::new(stop_tx),
            },
            finished: false,
        };
        (sender, stream)
    }

    pub fn handle(&self) -> CaptureHandle {
        self.handle.clone()
    }

    /// Next event in order. Yields `End` exactly once, then `None`.
    pub async fn next(&mut self) -> Option<TranscriptEvent> {
        if self.finished {
            return None;
        }

        match self.events.recv().await {
            Some(TranscriptEvent::End) | None => {
                self.finished = true;
                Some(TranscriptEvent::End)
            }
            Some(event) => Some(event),
        }
    }

    /// Drain the stream and return the committed text.
    ///
    /// An `Error` event fails the whole capture.
    pub async fn collect_text(mut self) -> Result<String> {
        let mut transcript = Transcript::default();
        while let Some(event) = self.next().await {
            if let TranscriptEvent::Error(message) = &event {
                return Err(anyhow!("Voice input failed: {message}"));
            }
            transcript.apply(&event);
        }
        Ok(transcript.committed().to_string())
    }
}

/// Running view of a capture: settled text plus the latest interim guess
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    committed: String,
    interim: String,
}

impl Transcript {
    pub fn apply(&mut self, event: &TranscriptEvent) {
        match event {
            TranscriptEvent::Interim(text) => self.interim = text.clone(),
            TranscriptEvent::Final(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    if !self.committed.is_empty() {
                        self.committed.push(' ');
                    }
                    self.committed.push_str(text);
                }
                self.interim.clear();
            }
            // An unfinished guess is dropped when capture ends
            TranscriptEvent::Error(_) | TranscriptEvent::End => self.interim.clear(),
        }
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// What to show while capture is running
    pub fn display(&self) -> String {
        match (self.committed.is_empty(), self.interim.trim().is_empty()) {
            (_, true) => self.committed.clone(),
            (true, false) => self.interim.trim().to_string(),
            (false, false) => format!("{} {}", self.committed, self.interim.trim()),
        }
    }
}
