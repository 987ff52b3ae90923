pub mod auth;
pub mod middleware;
pub mod notes;
pub mod state;

// Re-export the pieces the binary needs to build the router.
pub use middleware::{session_gate, CurrentUser};
pub use notes::{
    create_note_handler, delete_note_handler, get_note_handler, list_notes_handler,
    update_note_handler,
};
