//! Note list screen presenter.
//!
//! # Responsibility
//! - Produce the rendered note list fresh from the store on every query
//!   (pull model, no observer graph).
//! - Dispatch user intents (new note, open for edit, delete, buffer edits,
//!   cancel, commit) to the edit session and service.
//!
//! # Invariants
//! - The screen owns exactly one `EditSession`, so a second editor can never
//!   open while one is active.
//! - `delete` goes straight to the store; confirmation UI is a rendering
//!   layer concern.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteRepository, RepoResult};
use crate::service::note_service::NoteService;
use crate::session::{EditSession, SessionError};
use chrono::{DateTime, Utc};

/// One rendered row of the note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListItem {
    /// Stable note ID, used to address edit/delete intents.
    pub id: NoteId,
    pub title: String,
    pub body: String,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
    /// Last-commit timestamp in epoch milliseconds.
    pub modified_at: i64,
    /// Long-form creation date, e.g. `July 15, 2020`.
    pub created_label: String,
    /// Long-form modification date.
    pub modified_label: String,
}

impl From<Note> for NoteListItem {
    fn from(note: Note) -> Self {
        Self {
            id: note.uuid,
            created_label: date_label(note.created_at),
            modified_label: date_label(note.modified_at),
            title: note.title,
            body: note.body,
            created_at: note.created_at,
            modified_at: note.modified_at,
        }
    }
}

/// Formats an epoch-ms timestamp as a long-form date in UTC.
pub fn date_label(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms).map_or_else(
        || "unknown".to_string(),
        |at| at.format("%B %-d, %Y").to_string(),
    )
}

/// The single note screen: sorted list plus one modal editor.
///
/// Owns the service and the session; the rendering layer reads `notes()` and
/// `session()` on each render tick and forwards intents through the methods
/// below.
pub struct NotesScreen<R: NoteRepository> {
    service: NoteService<R>,
    session: EditSession,
}

impl<R: NoteRepository> NotesScreen<R> {
    /// Creates a screen over the given repository with the default body limit.
    pub fn new(repo: R) -> Self {
        Self {
            service: NoteService::new(repo),
            session: EditSession::new(),
        }
    }

    /// Creates a screen with a custom body character limit.
    pub fn with_body_limit(repo: R, body_limit: usize) -> Self {
        Self {
            service: NoteService::new(repo),
            session: EditSession::with_body_limit(body_limit),
        }
    }

    /// Reads the sorted note list, fresh from the store.
    pub fn notes(&self) -> RepoResult<Vec<NoteListItem>> {
        let notes = self.service.list_notes()?;
        Ok(notes.into_iter().map(NoteListItem::from).collect())
    }

    /// Current editor state and working buffers, for rendering.
    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// "New note" intent.
    pub fn begin_create(&mut self) -> Result<(), SessionError> {
        self.session.begin_create()
    }

    /// "Open for edit" intent: seeds the editor from the current record.
    ///
    /// Reads the note fresh so an id from a stale render of a since-deleted
    /// note surfaces `NoteGone` instead of opening an editor over nothing.
    pub fn begin_edit(&mut self, id: NoteId) -> Result<(), SessionError> {
        let note = self
            .service
            .get_note(id)
            .map_err(SessionError::Repo)?
            .ok_or(SessionError::NoteGone(id))?;
        self.session.begin_edit(&note)
    }

    /// "Delete" intent: removes the record unconditionally and immediately.
    pub fn delete(&self, id: NoteId) -> RepoResult<()> {
        self.service.delete_note(id)
    }

    /// Replaces the working title.
    pub fn set_title(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.session.set_title(text)
    }

    /// Replaces the working body, subject to the character limit.
    pub fn set_body(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.session.set_body(text)
    }

    /// Discards the open editor, if any.
    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    /// Commits the open editor through the service.
    pub fn commit(&mut self) -> Result<Note, SessionError> {
        self.session.commit(&self.service)
    }
}
