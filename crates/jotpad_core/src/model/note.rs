//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record shared by store, session and presenter.
//! - Own the blank-field validation applied before every persistence write.
//!
//! # Invariants
//! - `uuid` is assigned at creation and never changes.
//! - `created_at` is set once; `modified_at` moves on every committed edit.
//! - Validation checks the trimmed text; the stored text is kept as typed.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = Uuid;

/// Default upper bound for the note body, in characters.
///
/// Enforced at input time by the edit session, not at commit time.
pub const DEFAULT_BODY_CHAR_LIMIT: usize = 240;

/// Validation failure for note fields.
///
/// Title is checked before body, so a note with both fields blank reports
/// `BlankTitle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Title is empty after trimming whitespace.
    BlankTitle,
    /// Body is empty after trimming whitespace.
    BlankBody,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "note title is blank"),
            Self::BlankBody => write!(f, "note body is blank"),
        }
    }
}

impl Error for NoteValidationError {}

/// Canonical persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable ID assigned at creation.
    pub uuid: NoteId,
    /// Note title, non-blank after trimming.
    pub title: String,
    /// Note body, non-blank after trimming and bounded at input time.
    pub body: String,
    /// Creation timestamp in epoch milliseconds. Immutable.
    pub created_at: i64,
    /// Last-commit timestamp in epoch milliseconds.
    pub modified_at: i64,
}

impl Note {
    /// Checks the blank-field invariant for this record.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_note_fields(&self.title, &self.body)
    }
}

/// Validates candidate title/body text before persistence.
///
/// Title is checked first; both checks compare the trimmed value only.
pub fn validate_note_fields(title: &str, body: &str) -> Result<(), NoteValidationError> {
    if title.trim().is_empty() {
        return Err(NoteValidationError::BlankTitle);
    }
    if body.trim().is_empty() {
        return Err(NoteValidationError::BlankBody);
    }
    Ok(())
}
