//! File utility functions for photos, audio and shared notes
//!
//! Helpers for mapping file extensions to MIME types, naming files we write,
//! and describing file sizes to the user.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Added slugify for share file names
//! - 1.0.0: Initial creation with image MIME detection and size formatting

use std::path::Path;

// ============================================================================
// Constants
// ============================================================================

/// Upper bound for a photo sent inline to the model (20 MB request limit)
pub const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

// ============================================================================
// MIME / extension mapping
// ============================================================================

/// Map an image file extension to the MIME type the model accepts.
///
/// Returns `None` for anything that isn't a supported photo format.
pub fn image_mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Lowercased extension of a path, or an empty string when there is none
pub fn path_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

// ============================================================================
// Filenames
// ============================================================================

/// Sanitize a string for use as a filename.
///
/// Keeps only alphanumeric characters, spaces, hyphens, underscores, and dots.
/// Replaces spaces with underscores and lowercases. Truncates to 50 characters.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_' || *c == '.')
        .take(50)
        .collect::<String>()
        .trim()
        .replace(' ', "_")
        .to_lowercase()
}

/// Turn a plant name into a short file-safe slug, falling back to `plant`
pub fn slugify(name: &str) -> String {
    let slug = sanitize_filename(name).replace('.', "_");
    if slug.is_empty() {
        "plant".to_string()
    } else {
        slug
    }
}

// ============================================================================
// File size utilities
// ============================================================================

/// Format a byte count as a human-readable string (e.g., "1.5 MB", "340 KB").
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- image_mime_for_extension ----

    #[test]
    fn test_image_mime_for_extension() {
        assert_eq!(image_mime_for_extension("png"), Some("image/png"));
        assert_eq!(image_mime_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(image_mime_for_extension("jpeg"), Some("image/jpeg"));
        assert_eq!(image_mime_for_extension("heic"), Some("image/heic"));
        assert_eq!(image_mime_for_extension("bmp"), None);
        assert_eq!(image_mime_for_extension(""), None);
    }

    #[test]
    fn test_path_extension() {
        assert_eq!(path_extension(Path::new("/tmp/Fern.JPG")), "jpg");
        assert_eq!(path_extension(Path::new("/tmp/noext")), "");
    }

    // ---- sanitize_filename / slugify ----

    #[test]
    fn test_sanitize_filename_basic() {
        assert_eq!(sanitize_filename("My Report"), "my_report");
    }

    #[test]
    fn test_sanitize_filename_special_chars() {
        assert_eq!(sanitize_filename("file<>:\"/\\|?*.txt"), "file.txt");
    }

    #[test]
    fn test_sanitize_filename_truncates() {
        let long_name = "a".repeat(100);
        assert!(sanitize_filename(&long_name).len() <= 50);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Monstera deliciosa"), "monstera_deliciosa");
        assert_eq!(slugify("Ficus l.y."), "ficus_l_y_");
        assert_eq!(slugify("///"), "plant");
        // Non-latin names survive since they are alphanumeric
        assert_eq!(slugify("بنفشه آفریقایی"), "بنفشه_آفریقایی");
    }

    // ---- format_file_size ----

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(MAX_IMAGE_BYTES), "20.0 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
