//! crates/notes_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like databases
//! or auth providers.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CreateNoteInput, Note, Principal, SessionTokens, UpdateNoteInput};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The persistence port for notes. Two backend adapters implement this with
/// identical semantics; the service layer only ever sees this trait.
#[async_trait]
pub trait NotesRepository: Send + Sync {
    /// Returns all notes ordered by `created_at` descending (most recent
    /// first). When two notes collide at the backend's timestamp resolution
    /// their relative order is backend-dependent and not guaranteed.
    async fn get_all_notes(&self) -> PortResult<Vec<Note>>;

    /// Returns the note, or `Ok(None)` when the id is unknown. Absence is a
    /// soft result here, never an error.
    async fn get_note_by_id(&self, id: Uuid) -> PortResult<Option<Note>>;

    /// Generates a fresh v4 UUID, stamps `created_at = updated_at = now`,
    /// persists and returns the full note.
    async fn create_note(&self, input: CreateNoteInput) -> PortResult<Note>;

    /// Rewrites title/content and refreshes `updated_at`; `created_at` is
    /// preserved. Fails with `PortError::NotFound` when the id does not exist.
    async fn update_note(&self, input: UpdateNoteInput) -> PortResult<Note>;

    /// Idempotent: deleting an absent id succeeds silently, so retried
    /// delete requests never surface as errors to the caller.
    async fn delete_note(&self, id: Uuid) -> PortResult<()>;
}

/// The session/credential port. The wire protocol behind it (OAuth-style
/// authorization code flow) is the adapter's concern.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolves the principal carried by an access token. A token the
    /// backend rejects resolves to `Ok(None)`; only transport-level
    /// failures surface as errors.
    async fn resolve_principal(&self, access_token: &str) -> PortResult<Option<Principal>>;

    /// Builds the third-party sign-in redirect URL, with the callback set
    /// to `{origin}/auth/callback`.
    async fn sign_in_url(&self, origin: &str) -> PortResult<String>;

    /// Exchanges a one-time authorization code for session tokens.
    async fn exchange_code(&self, code: &str) -> PortResult<SessionTokens>;

    /// Terminates the session behind the given access token.
    async fn sign_out(&self, access_token: &str) -> PortResult<()>;
}
