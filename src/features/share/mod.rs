//! # Share Feature
//!
//! Hands an identified plant's care guide to whatever share target the host
//! offers. With no target configured the share action is simply not offered.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0
//! - **Toggleable**: true

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use std::fs;
use std::path::PathBuf;

use crate::core::file_utils::slugify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
}

impl SharePayload {
    pub fn for_plant(plant_name: &str, care_text: &str) -> Self {
        Self {
            title: format!("Care guide: {plant_name}"),
            text: care_text.trim().to_string(),
        }
    }
}

pub trait ShareTarget: Send + Sync {
    /// Deliver the payload and describe where it went
    fn share(&self, payload: &SharePayload) -> Result<String>;
}

/// Writes each shared guide as a markdown file in a directory
pub struct FileShare {
    dir: PathBuf,
}

impl FileShare {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ShareTarget for FileShare {
    fn share(&self, payload: &SharePayload) -> Result<String> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Could not create share directory {}", self.dir.display()))?;

        let slug = slugify(payload.title.trim_start_matches("Care guide:"));
        let file_name = format!("{slug}-{}.md", Utc::now().format("%Y%m%d-%H%M%S"));
        let path = self.dir.join(file_name);

        let body = format!("# {}\n\n{}\n", payload.title, payload.text);
        fs::write(&path, body)
            .with_context(|| format!("Could not write {}", path.display()))?;

        info!("Shared \"{}\" to {}", payload.title, path.display());
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_for_plant() {
        let payload = SharePayload::for_plant("Monstera", "  **نور:** غیرمستقیم\n");
        assert_eq!(payload.title, "Care guide: Monstera");
        assert_eq!(payload.text, "**نور:** غیرمستقیم");
    }

    #[test]
    fn test_file_share_writes_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let target = FileShare::new(dir.path().join("shared"));

        let location = target
            .share(&SharePayload::for_plant("Snake Plant", "Water every 2 weeks."))
            .unwrap();

        let path = PathBuf::from(&location);
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("snake_plant-"));
        assert!(file_name.ends_with(".md"));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# Care guide: Snake Plant\n\nWater every 2 weeks.\n");
    }

    #[test]
    fn test_file_share_unwritable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let target = FileShare::new(blocker.join("shared"));
        let err = target
            .share(&SharePayload::for_plant("Fern", "Mist daily."))
            .unwrap_err();
        assert!(err.to_string().contains("Could not create share directory"));
    }
}
