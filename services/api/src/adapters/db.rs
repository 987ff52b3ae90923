//! services/api/src/adapters/db.rs
//!
//! The Postgres adapter: the concrete implementation of the `NotesRepository`
//! port against a hosted Postgres service, using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notes_core::domain::{CreateNoteInput, Note, UpdateNoteInput};
use notes_core::ports::{NotesRepository, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `NotesRepository` port.
#[derive(Clone)]
pub struct PgNotesRepository {
    pool: PgPool,
}

impl PgNotesRepository {
    /// Creates a new `PgNotesRepository`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

/// The storage-native row shape (snake_case timestamps). The mapping to the
/// domain entity is total and lossless: every valid stored row maps to a
/// `Note`, and the round trip recovers the identical entity.
#[derive(FromRow)]
struct NoteRecord {
    id: Uuid,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NoteRecord {
    fn to_domain(self) -> Note {
        Note {
            id: self.id,
            title: self.title,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

//=========================================================================================
// `NotesRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl NotesRepository for PgNotesRepository {
    async fn get_all_notes(&self) -> PortResult<Vec<Note>> {
        let records = sqlx::query_as::<_, NoteRecord>(
            "SELECT id, title, content, created_at, updated_at FROM notes ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_note_by_id(&self, id: Uuid) -> PortResult<Option<Note>> {
        let record = sqlx::query_as::<_, NoteRecord>(
            "SELECT id, title, content, created_at, updated_at FROM notes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record.map(|r| r.to_domain()))
    }

    async fn create_note(&self, input: CreateNoteInput) -> PortResult<Note> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO notes (id, title, content, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.content)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(Note {
            id,
            title: input.title,
            content: input.content,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_note(&self, input: UpdateNoteInput) -> PortResult<Note> {
        let now = Utc::now();

        let record = sqlx::query_as::<_, NoteRecord>(
            "UPDATE notes SET title = $1, content = $2, updated_at = $3 WHERE id = $4 \
             RETURNING id, title, content, created_at, updated_at",
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(now)
        .bind(input.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Note {} not found", input.id))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;

        Ok(record.to_domain())
    }

    async fn delete_note(&self, id: Uuid) -> PortResult<()> {
        // Deleting an absent id is a no-op on the backend, which is exactly
        // the idempotent contract of the port.
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}
