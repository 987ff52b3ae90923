//! crates/notes_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A persisted note.
///
/// `id` and `created_at` are assigned at creation time and never change for
/// the lifetime of the entity; only `title`, `content` and `updated_at` are
/// mutable. `updated_at >= created_at` holds at all times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a note. Not an entity until persisted.
#[derive(Debug, Clone)]
pub struct CreateNoteInput {
    pub title: String,
    pub content: String,
}

/// Input for updating an existing note. `id` must reference a persisted note.
#[derive(Debug, Clone)]
pub struct UpdateNoteInput {
    pub id: Uuid,
    pub title: String,
    pub content: String,
}

/// The resolved identity of the current request's caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Tokens returned by the one-time-code exchange with the auth backend.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

/// Per-field validation messages. A `None` field carries no error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Outcome of input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// The uniform outcome of every mutating operation. Repository, service and
/// orchestration layers all reduce to this type; callers must handle both
/// branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Success { note_id: Uuid },
    Failure { error: String },
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success { .. })
    }
}
