//! services/api/src/adapters/d1.rs
//!
//! The D1 adapter: implements the `NotesRepository` port against a
//! Cloudflare D1-style SQL-over-HTTP store. Each call is one `POST` of
//! `{"sql", "params"}` to the query endpoint; the store executes the single
//! statement atomically and returns its rows as JSON.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notes_core::domain::{CreateNoteInput, Note, UpdateNoteInput};
use notes_core::ports::{NotesRepository, PortError, PortResult};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A notes repository backed by a D1-style SQL-over-HTTP query endpoint.
#[derive(Clone)]
pub struct D1NotesRepository {
    client: reqwest::Client,
    endpoint: String,
    api_token: String,
}

impl D1NotesRepository {
    /// Creates a new `D1NotesRepository` talking to the given query endpoint.
    pub fn new(client: reqwest::Client, endpoint: String, api_token: String) -> Self {
        Self {
            client,
            endpoint,
            api_token,
        }
    }

    /// Sends one SQL statement with bound parameters and returns the rows.
    async fn query(&self, sql: &str, params: Vec<Value>) -> PortResult<Vec<D1NoteRecord>> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&json!({ "sql": sql, "params": params }))
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortError::Unexpected(format!(
                "D1 query failed with status {}",
                status
            )));
        }

        let body: D1Response = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !body.success {
            let detail = body
                .errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "unknown D1 error".to_string());
            return Err(PortError::Unexpected(detail));
        }

        Ok(body
            .result
            .into_iter()
            .flat_map(|set| set.results)
            .collect())
    }

    /// Like [`Self::query`] but for statements whose rows are irrelevant.
    async fn execute(&self, sql: &str, params: Vec<Value>) -> PortResult<()> {
        self.query(sql, params).await.map(|_| ())
    }
}

//=========================================================================================
// Wire Shapes
//=========================================================================================

#[derive(Deserialize)]
struct D1Response {
    success: bool,
    #[serde(default)]
    result: Vec<D1ResultSet>,
    #[serde(default)]
    errors: Vec<D1Error>,
}

#[derive(Deserialize)]
struct D1ResultSet {
    #[serde(default)]
    results: Vec<D1NoteRecord>,
}

#[derive(Deserialize)]
struct D1Error {
    message: String,
}

/// The storage-native row shape. D1 stores timestamps as ISO-8601 text; the
/// mapping parses them back, so every valid stored row maps to a `Note` and
/// the round trip is lossless.
#[derive(Deserialize)]
struct D1NoteRecord {
    id: String,
    title: String,
    content: String,
    created_at: String,
    updated_at: String,
}

impl D1NoteRecord {
    fn to_domain(self) -> PortResult<Note> {
        Ok(Note {
            id: Uuid::parse_str(&self.id)
                .map_err(|e| PortError::Unexpected(format!("invalid note id: {e}")))?,
            title: self.title,
            content: self.content,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

fn parse_timestamp(field: &str, value: &str) -> PortResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PortError::Unexpected(format!("invalid {field} timestamp: {e}")))
}

//=========================================================================================
// `NotesRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl NotesRepository for D1NotesRepository {
    async fn get_all_notes(&self) -> PortResult<Vec<Note>> {
        let records = self
            .query(
                "SELECT id, title, content, created_at, updated_at FROM notes ORDER BY created_at DESC",
                vec![],
            )
            .await?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn get_note_by_id(&self, id: Uuid) -> PortResult<Option<Note>> {
        let records = self
            .query(
                "SELECT id, title, content, created_at, updated_at FROM notes WHERE id = ?",
                vec![json!(id.to_string())],
            )
            .await?;
        records
            .into_iter()
            .next()
            .map(|r| r.to_domain())
            .transpose()
    }

    async fn create_note(&self, input: CreateNoteInput) -> PortResult<Note> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        self.execute(
            "INSERT INTO notes (id, title, content, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            vec![
                json!(id.to_string()),
                json!(input.title),
                json!(input.content),
                json!(now.to_rfc3339()),
                json!(now.to_rfc3339()),
            ],
        )
        .await?;

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

        self.execute(
            "UPDATE notes SET title = ?, content = ?, updated_at = ? WHERE id = ?",
            vec![
                json!(input.title),
                json!(input.content),
                json!(now.to_rfc3339()),
                json!(input.id.to_string()),
            ],
        )
        .await?;

        // The UPDATE is silent about a missing row, so re-read to
        // distinguish NotFound from success.
        match self.get_note_by_id(input.id).await? {
            Some(note) => Ok(note),
            None => Err(PortError::NotFound(format!("Note {} not found", input.id))),
        }
    }

    async fn delete_note(&self, id: Uuid) -> PortResult<()> {
        // A DELETE of an absent id affects zero rows and succeeds, matching
        // the port's idempotency contract.
        self.execute(
            "DELETE FROM notes WHERE id = ?",
            vec![json!(id.to_string())],
        )
        .await
    }
}
