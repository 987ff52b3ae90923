pub mod domain;
pub mod ports;
pub mod service;
pub mod testing;
pub mod validation;

pub use domain::{
    ActionResult, CreateNoteInput, Note, Principal, SessionTokens, UpdateNoteInput,
    ValidationErrors, ValidationResult,
};
pub use ports::{AuthService, NotesRepository, PortError, PortResult};
pub use validation::validate_note_input;
