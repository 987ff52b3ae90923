//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use notes_core::ports::{AuthService, NotesRepository};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers. Holds only immutable collaborators; there is no cross-request
/// mutable state here (in particular no identity cache, which is strictly
/// per-request).
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn NotesRepository>,
    pub auth: Arc<dyn AuthService>,
    pub config: Arc<Config>,
}
