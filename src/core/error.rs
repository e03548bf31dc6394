//! Input validation errors
//!
//! Everything here is rejected at the boundary, before any model call or
//! storage write happens. Callers receive these wrapped in `anyhow::Error`
//! and can tell them apart with `downcast_ref::<InputError>()`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please choose a plant photo first.")]
    MissingImage,

    #[error("Type a message before sending.")]
    EmptyMessage,

    #[error("Unsupported image type '{0}'. Use jpg, png, webp, gif or heic.")]
    UnsupportedImage(String),

    #[error("Image is too large ({size}, limit {limit}).")]
    ImageTooLarge { size: String, limit: String },

    #[error("A plant name is required.")]
    MissingPlantName,

    #[error("No plant has been identified yet.")]
    NoPlantIdentified,

    #[error("Sharing is not available on this system.")]
    ShareUnavailable,

    #[error("Voice input is not configured.")]
    SpeechUnavailable,
}

/// Returns the `InputError` behind an `anyhow::Error`, if that is what it is
pub fn as_input_error(err: &anyhow::Error) -> Option<&InputError> {
    err.downcast_ref::<InputError>()
}

/// One line suitable for showing to the user.
///
/// Validation problems read as plain guidance; anything else is a failure
/// the user may retry.
pub fn user_message(err: &anyhow::Error) -> String {
    match as_input_error(err) {
        Some(input) => input.to_string(),
        None => format!("⚠️ {err}"),
    }
}
