//! crates/notes_core/src/service.rs
//!
//! The note service layer: validates input, delegates to an injected
//! repository, and maps every storage failure to a fixed, user-safe message.
//! The repository is always passed in, never constructed here, so the test
//! suite can substitute an in-memory fake without any I/O.

use tracing::error;
use uuid::Uuid;

use crate::domain::{ActionResult, CreateNoteInput, UpdateNoteInput, ValidationResult};
use crate::ports::NotesRepository;
use crate::validation::validate_note_input;

/// The message used when validation fails without a field-level message.
/// Should not occur with the current rules; kept as a safety net.
const GENERIC_VALIDATION_MESSAGE: &str = "バリデーションエラーが発生しました";

/// The three mutating operations. Each maps to exactly one fixed,
/// user-visible failure message; the mapping is centralized here so the
/// operations cannot drift apart.
#[derive(Debug, Clone, Copy)]
enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    fn generic_error(self) -> &'static str {
        match self {
            MutationKind::Create => {
                "データの保存中にエラーが発生しました。しばらくしてから再度お試しください。"
            }
            MutationKind::Update => {
                "データの更新中にエラーが発生しました。しばらくしてから再度お試しください。"
            }
            MutationKind::Delete => {
                "データの削除中にエラーが発生しました。しばらくしてから再度お試しください。"
            }
        }
    }

    fn operation(self) -> &'static str {
        match self {
            MutationKind::Create => "create_note",
            MutationKind::Update => "update_note",
            MutationKind::Delete => "delete_note",
        }
    }
}

fn validation_failure(result: ValidationResult) -> ActionResult {
    let error = match result {
        ValidationResult::Valid => GENERIC_VALIDATION_MESSAGE.to_string(),
        ValidationResult::Invalid(errors) => errors
            .title
            .unwrap_or_else(|| GENERIC_VALIDATION_MESSAGE.to_string()),
    };
    ActionResult::Failure { error }
}

/// Creates a note. Validation runs first and short-circuits before any I/O;
/// on success the title is persisted trimmed, the content verbatim. Storage
/// errors are logged with context and swallowed into the fixed saving
/// message, never leaked to the caller.
pub async fn create_note(repo: &dyn NotesRepository, title: &str, content: &str) -> ActionResult {
    let validation = validate_note_input(title, content);
    if !validation.is_valid() {
        return validation_failure(validation);
    }

    let input = CreateNoteInput {
        title: title.trim().to_string(),
        content: content.to_string(),
    };
    match repo.create_note(input).await {
        Ok(note) => ActionResult::Success { note_id: note.id },
        Err(e) => backend_failure(MutationKind::Create, &e.to_string(), None, Some(title)),
    }
}

/// Updates a note. Same validation-first contract as [`create_note`]; on
/// success the given id is returned unchanged. All storage errors, including
/// NotFound, map to the fixed updating message.
pub async fn update_note(
    repo: &dyn NotesRepository,
    id: Uuid,
    title: &str,
    content: &str,
) -> ActionResult {
    let validation = validate_note_input(title, content);
    if !validation.is_valid() {
        return validation_failure(validation);
    }

    let input = UpdateNoteInput {
        id,
        title: title.trim().to_string(),
        content: content.to_string(),
    };
    match repo.update_note(input).await {
        Ok(_) => ActionResult::Success { note_id: id },
        Err(e) => backend_failure(MutationKind::Update, &e.to_string(), Some(id), Some(title)),
    }
}

/// Deletes a note. No validation applies; id presence is enforced upstream.
pub async fn delete_note(repo: &dyn NotesRepository, id: Uuid) -> ActionResult {
    match repo.delete_note(id).await {
        Ok(()) => ActionResult::Success { note_id: id },
        Err(e) => backend_failure(MutationKind::Delete, &e.to_string(), Some(id), None),
    }
}

/// The swallow-and-log boundary: emits a structured record for the operator
/// and hands the caller nothing but the fixed generic message.
fn backend_failure(
    kind: MutationKind,
    message: &str,
    id: Option<Uuid>,
    title: Option<&str>,
) -> ActionResult {
    error!(
        operation = kind.operation(),
        error = message,
        note_id = ?id,
        title = ?title,
        "repository operation failed"
    );
    ActionResult::Failure {
        error: kind.generic_error().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionResult, Note};
    use crate::ports::{PortError, PortResult};
    use crate::testing::InMemoryNotesRepository;
    use crate::validation::TITLE_REQUIRED_MESSAGE;
    use async_trait::async_trait;

    const CREATE_ERROR: &str =
        "データの保存中にエラーが発生しました。しばらくしてから再度お試しください。";
    const UPDATE_ERROR: &str =
        "データの更新中にエラーが発生しました。しばらくしてから再度お試しください。";
    const DELETE_ERROR: &str =
        "データの削除中にエラーが発生しました。しばらくしてから再度お試しください。";

    /// A repository whose every operation rejects with a recognizable
    /// backend error, for asserting that raw error text never escapes.
    struct RejectingRepository;

    const RAW_BACKEND_ERROR: &str = "connection refused: backend internals leaked";

    #[async_trait]
    impl NotesRepository for RejectingRepository {
        async fn get_all_notes(&self) -> PortResult<Vec<Note>> {
            Err(PortError::Unexpected(RAW_BACKEND_ERROR.to_string()))
        }
        async fn get_note_by_id(&self, _id: Uuid) -> PortResult<Option<Note>> {
            Err(PortError::Unexpected(RAW_BACKEND_ERROR.to_string()))
        }
        async fn create_note(&self, _input: CreateNoteInput) -> PortResult<Note> {
            Err(PortError::Unexpected(RAW_BACKEND_ERROR.to_string()))
        }
        async fn update_note(&self, _input: UpdateNoteInput) -> PortResult<Note> {
            Err(PortError::Unexpected(RAW_BACKEND_ERROR.to_string()))
        }
        async fn delete_note(&self, _id: Uuid) -> PortResult<()> {
            Err(PortError::Unexpected(RAW_BACKEND_ERROR.to_string()))
        }
    }

    fn failure_message(result: ActionResult) -> String {
        match result {
            ActionResult::Failure { error } => error,
            ActionResult::Success { .. } => panic!("expected a failure"),
        }
    }

    #[tokio::test]
    async fn create_rejects_blank_title_without_touching_repository() {
        let repo = InMemoryNotesRepository::new();
        let result = create_note(&repo, " ", "x").await;
        assert_eq!(failure_message(result), TITLE_REQUIRED_MESSAGE);
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn create_trims_title_and_keeps_content_verbatim() {
        let repo = InMemoryNotesRepository::new();
        let result = create_note(&repo, "  Note A  ", "  body  ").await;
        let note_id = match result {
            ActionResult::Success { note_id } => note_id,
            ActionResult::Failure { error } => panic!("unexpected failure: {error}"),
        };
        let note = repo.get_note_by_id(note_id).await.unwrap().unwrap();
        assert_eq!(note.title, "Note A");
        assert_eq!(note.content, "  body  ");
    }

    #[tokio::test]
    async fn create_accepts_empty_content() {
        let repo = InMemoryNotesRepository::new();
        let result = create_note(&repo, "Note A", "").await;
        let note_id = match result {
            ActionResult::Success { note_id } => note_id,
            ActionResult::Failure { error } => panic!("unexpected failure: {error}"),
        };
        let note = repo.get_note_by_id(note_id).await.unwrap().unwrap();
        assert_eq!(note.title, "Note A");
        assert_eq!(note.content, "");
    }

    #[tokio::test]
    async fn update_rejects_blank_title_without_touching_repository() {
        let repo = InMemoryNotesRepository::new();
        let result = update_note(&repo, Uuid::new_v4(), "\t\n", "x").await;
        assert_eq!(failure_message(result), TITLE_REQUIRED_MESSAGE);
    }

    #[tokio::test]
    async fn update_of_missing_id_maps_to_generic_message() {
        let repo = InMemoryNotesRepository::new();
        let result = update_note(&repo, Uuid::new_v4(), "valid title", "x").await;
        assert_eq!(failure_message(result), UPDATE_ERROR);
    }

    #[tokio::test]
    async fn update_returns_the_given_id_on_success() {
        let repo = InMemoryNotesRepository::new();
        let created = match create_note(&repo, "before", "x").await {
            ActionResult::Success { note_id } => note_id,
            ActionResult::Failure { error } => panic!("unexpected failure: {error}"),
        };
        let result = update_note(&repo, created, "after", "y").await;
        assert_eq!(result, ActionResult::Success { note_id: created });
    }

    #[tokio::test]
    async fn delete_succeeds_without_validation() {
        let repo = InMemoryNotesRepository::new();
        let result = delete_note(&repo, Uuid::new_v4()).await;
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn backend_errors_never_leak_raw_text() {
        let repo = RejectingRepository;

        let create = failure_message(create_note(&repo, "t", "c").await);
        let update = failure_message(update_note(&repo, Uuid::new_v4(), "t", "c").await);
        let delete = failure_message(delete_note(&repo, Uuid::new_v4()).await);

        assert_eq!(create, CREATE_ERROR);
        assert_eq!(update, UPDATE_ERROR);
        assert_eq!(delete, DELETE_ERROR);
        for message in [&create, &update, &delete] {
            assert!(!message.contains("connection refused"));
            assert!(!message.contains(RAW_BACKEND_ERROR));
        }
    }
}
