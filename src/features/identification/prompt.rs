//! Prompts embedded at compile time from prompt/*.md

/// Structured request sent alongside the photo. The reply's first line is
/// expected to be the bolded plant-name field.
pub const IDENTIFY_PROMPT: &str = include_str!("../../../prompt/identify.md");

/// System instruction attached to every model request
pub const SYSTEM_INSTRUCTION: &str = include_str!("../../../prompt/system.md");

/// Label of the plant-name field in the structured reply
pub const PLANT_NAME_LABEL: &str = "نام گیاه";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identify_prompt_asks_for_name_field() {
        assert!(IDENTIFY_PROMPT.contains(&format!("**{PLANT_NAME_LABEL}:**")));
    }

    #[test]
    fn test_system_instruction_not_empty() {
        assert!(!SYSTEM_INSTRUCTION.trim().is_empty());
    }
}
