//! Best-effort plant name extraction from the structured identification reply

use log::debug;
use regex::Regex;

use super::prompt::PLANT_NAME_LABEL;

/// Pull the common name out of a line like `**نام گیاه:** Monstera / Monstera deliciosa`.
///
/// The value runs up to the first `/` or line break. Returns `None` when the
/// field is missing or empty; callers carry on without a name.
pub fn extract_plant_name(reply: &str) -> Option<String> {
    // Tolerates the colon inside or outside the bold markers
    let pattern = format!(r"(?m)^\s*\*\*\s*{PLANT_NAME_LABEL}\s*:?\s*\*\*\s*:?\s*([^/\n]+)");
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            debug!("Plant name pattern failed to compile: {e}");
            return None;
        }
    };

    let name = re
        .captures(reply)?
        .get(1)?
        .as_str()
        .trim()
        .trim_matches('*')
        .trim()
        .to_string();

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_name_before_slash() {
        let reply = "**نام گیاه:** Monstera / Monstera deliciosa\n\n**نور:** نور غیرمستقیم";
        assert_eq!(extract_plant_name(reply), Some("Monstera".to_string()));
    }

    #[test]
    fn test_extracts_name_up_to_newline() {
        let reply = "**نام گیاه:** سانسوریا\n**آبیاری:** هر دو هفته";
        assert_eq!(extract_plant_name(reply), Some("سانسوریا".to_string()));
    }

    #[test]
    fn test_colon_outside_bold() {
        let reply = "**نام گیاه**: Pothos / Epipremnum aureum";
        assert_eq!(extract_plant_name(reply), Some("Pothos".to_string()));
    }

    #[test]
    fn test_leading_whitespace_line() {
        let reply = "\n  **نام گیاه:**   Fern  \n";
        assert_eq!(extract_plant_name(reply), Some("Fern".to_string()));
    }

    #[test]
    fn test_missing_field() {
        assert_eq!(extract_plant_name("This does not look like a plant."), None);
        assert_eq!(extract_plant_name("**نور:** زیاد"), None);
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(extract_plant_name("**نام گیاه:** / Ficus"), None);
    }

    #[test]
    fn test_label_must_start_a_line() {
        let reply = "Some text **نام گیاه:** Fern";
        assert_eq!(extract_plant_name(reply), None);
    }
}
