//! crates/notes_core/src/testing.rs
//!
//! An in-memory implementation of the notes repository port. It performs no
//! I/O and exists so the service layer and the web layer can be exercised
//! against the real port contract in tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{CreateNoteInput, Note, UpdateNoteInput};
use crate::ports::{NotesRepository, PortError, PortResult};

/// In-memory notes store satisfying [`NotesRepository`].
#[derive(Default)]
pub struct InMemoryNotesRepository {
    // Insertion order is preserved; get_all_notes sorts stably on top of it.
    notes: Mutex<Vec<Note>>,
}

impl InMemoryNotesRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the store with fully-formed notes, timestamps included.
    pub fn seed(&self, notes: impl IntoIterator<Item = Note>) {
        self.notes.lock().unwrap().extend(notes);
    }

    pub fn reset(&self) {
        self.notes.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.notes.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NotesRepository for InMemoryNotesRepository {
    async fn get_all_notes(&self) -> PortResult<Vec<Note>> {
        let mut notes = self.notes.lock().unwrap().clone();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn get_note_by_id(&self, id: Uuid) -> PortResult<Option<Note>> {
        let notes = self.notes.lock().unwrap();
        Ok(notes.iter().find(|n| n.id == id).cloned())
    }

    async fn create_note(&self, input: CreateNoteInput) -> PortResult<Note> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            created_at: now,
            updated_at: now,
        };
        self.notes.lock().unwrap().push(note.clone());
        Ok(note)
    }

    async fn update_note(&self, input: UpdateNoteInput) -> PortResult<Note> {
        let mut notes = self.notes.lock().unwrap();
        let note = notes
            .iter_mut()
            .find(|n| n.id == input.id)
            .ok_or_else(|| PortError::NotFound(format!("Note {} not found", input.id)))?;
        note.title = input.title;
        note.content = input.content;
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    async fn delete_note(&self, id: Uuid) -> PortResult<()> {
        self.notes.lock().unwrap().retain(|n| n.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    fn note_at(title: &str, created_at: DateTime<Utc>) -> Note {
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: String::new(),
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repo = InMemoryNotesRepository::new();
        let created = repo
            .create_note(CreateNoteInput {
                title: "Note A".to_string(),
                content: "body".to_string(),
            })
            .await
            .unwrap();

        let fetched = repo.get_note_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Note A");
        assert_eq!(fetched.content, "body");
        assert_eq!(fetched.created_at, fetched.updated_at);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_by_unknown_id_is_none_not_an_error() {
        let repo = InMemoryNotesRepository::new();
        assert_eq!(repo.get_note_by_id(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn lists_most_recent_first() {
        let repo = InMemoryNotesRepository::new();
        let base = Utc::now();
        repo.seed([
            note_at("t1", base),
            note_at("t2", base + Duration::seconds(1)),
            note_at("t3", base + Duration::seconds(2)),
        ]);

        let titles: Vec<_> = repo
            .get_all_notes()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, ["t3", "t2", "t1"]);
    }

    #[tokio::test]
    async fn update_preserves_identity_and_refreshes_updated_at() {
        let repo = InMemoryNotesRepository::new();
        let created = repo
            .create_note(CreateNoteInput {
                title: "before".to_string(),
                content: "old".to_string(),
            })
            .await
            .unwrap();

        let updated = repo
            .update_note(UpdateNoteInput {
                id: created.id,
                title: "after".to_string(),
                content: "new".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.title, "after");
        assert_eq!(updated.content, "new");
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let repo = InMemoryNotesRepository::new();
        let err = repo
            .update_note(UpdateNoteInput {
                id: Uuid::new_v4(),
                title: "t".to_string(),
                content: "c".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = InMemoryNotesRepository::new();
        let created = repo
            .create_note(CreateNoteInput {
                title: "t".to_string(),
                content: String::new(),
            })
            .await
            .unwrap();

        repo.delete_note(created.id).await.unwrap();
        // A second delete of the same id, and a delete of an id that never
        // existed, both complete without error.
        repo.delete_note(created.id).await.unwrap();
        repo.delete_note(Uuid::new_v4()).await.unwrap();
        assert!(repo.is_empty());
    }
}
