//! crates/notes_core/src/validation.rs
//!
//! Pure input-validation rules for note input. No side effects; same input
//! always produces the same output.

use crate::domain::{ValidationErrors, ValidationResult};

/// The fixed, localized message for a missing title.
pub const TITLE_REQUIRED_MESSAGE: &str = "タイトルを入力してください";

/// Validates note input. The title is invalid when it is empty after
/// trimming leading/trailing whitespace (including tabs and newlines).
/// The content is currently unconstrained; any string, including the empty
/// string, is valid.
pub fn validate_note_input(title: &str, _content: &str) -> ValidationResult {
    let mut errors = ValidationErrors::default();

    if title.trim().is_empty() {
        errors.title = Some(TITLE_REQUIRED_MESSAGE.to_string());
    }

    if errors.title.is_some() || errors.content.is_some() {
        return ValidationResult::Invalid(errors);
    }

    ValidationResult::Valid
}
