//! Modal edit session state machine.
//!
//! # Responsibility
//! - Track whether the user is composing a new note or editing an existing
//!   one, and hold the uncommitted working buffers.
//! - Enforce the body character limit at input time.
//! - Commit working buffers through the note service.
//!
//! # Invariants
//! - At most one editor is open per session; `begin_*` from a non-idle state
//!   is rejected without touching existing state.
//! - `working_body` never exceeds the configured character limit.
//! - `cancel` never writes to the store.
//! - Validation failures keep the session open with buffers intact; a
//!   vanished edit target abandons the session back to `Idle`.

use crate::model::note::{Note, NoteId, NoteValidationError, DEFAULT_BODY_CHAR_LIMIT};
use crate::repo::note_repo::{NoteRepository, RepoError};
use crate::service::note_service::NoteService;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Current editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// No editor shown.
    Idle,
    /// Composing a new note; buffers started empty.
    Creating,
    /// Editing an existing note; buffers seeded from it.
    Editing(NoteId),
}

/// Session-level error taxonomy.
#[derive(Debug)]
pub enum SessionError {
    /// `begin_create`/`begin_edit` while an editor is already open.
    EditorBusy,
    /// Buffer update or commit without an open editor.
    NoEditorOpen,
    /// Body update rejected because it would exceed the character limit.
    BodyLimitExceeded { limit: usize },
    /// Blank title/body at commit time. Session stays open.
    Validation(NoteValidationError),
    /// Edit target vanished between read and commit. Session abandoned.
    NoteGone(NoteId),
    /// Storage failure; the operation did not take effect.
    Repo(RepoError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EditorBusy => write!(f, "an editor is already open"),
            Self::NoEditorOpen => write!(f, "no editor is open"),
            Self::BodyLimitExceeded { limit } => {
                write!(f, "body would exceed the {limit} character limit")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoteGone(id) => write!(f, "note being edited no longer exists: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

/// Transient editor state for the note screen.
///
/// Exists only while the user is composing; discarded on cancel and cleared
/// on successful commit. Never persisted.
pub struct EditSession {
    mode: EditMode,
    title: String,
    body: String,
    body_limit: usize,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    /// Creates an idle session with the default body character limit.
    pub fn new() -> Self {
        Self::with_body_limit(DEFAULT_BODY_CHAR_LIMIT)
    }

    /// Creates an idle session with a custom body character limit.
    pub fn with_body_limit(body_limit: usize) -> Self {
        Self {
            mode: EditMode::Idle,
            title: String::new(),
            body: String::new(),
            body_limit,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn working_title(&self) -> &str {
        &self.title
    }

    pub fn working_body(&self) -> &str {
        &self.body
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    /// Characters still available in the body buffer.
    pub fn remaining_chars(&self) -> usize {
        self.body_limit.saturating_sub(self.body.chars().count())
    }

    /// Opens the editor for a new note with empty buffers.
    ///
    /// Valid only from `Idle`.
    pub fn begin_create(&mut self) -> Result<(), SessionError> {
        if self.mode != EditMode::Idle {
            warn!("event=session_begin module=session status=rejected reason=editor_busy");
            return Err(SessionError::EditorBusy);
        }

        self.title.clear();
        self.body.clear();
        self.mode = EditMode::Creating;
        Ok(())
    }

    /// Opens the editor for an existing note, seeding buffers from it.
    ///
    /// Valid only from `Idle`.
    pub fn begin_edit(&mut self, note: &Note) -> Result<(), SessionError> {
        if self.mode != EditMode::Idle {
            warn!("event=session_begin module=session status=rejected reason=editor_busy");
            return Err(SessionError::EditorBusy);
        }

        self.title = note.title.clone();
        self.body = note.body.clone();
        self.mode = EditMode::Editing(note.uuid);
        Ok(())
    }

    /// Replaces the working title. Title length is unbounded.
    pub fn set_title(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        if self.mode == EditMode::Idle {
            return Err(SessionError::NoEditorOpen);
        }

        self.title = text.into();
        Ok(())
    }

    /// Replaces the working body.
    ///
    /// Updates that would exceed the character limit are rejected whole; the
    /// buffer is left unchanged, never truncated.
    pub fn set_body(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        if self.mode == EditMode::Idle {
            return Err(SessionError::NoEditorOpen);
        }

        let text = text.into();
        if text.chars().count() > self.body_limit {
            return Err(SessionError::BodyLimitExceeded {
                limit: self.body_limit,
            });
        }

        self.body = text;
        Ok(())
    }

    /// Discards the working buffers and returns to `Idle`.
    ///
    /// Never touches the store. No-op when no editor is open.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Validates and persists the working buffers through the service.
    ///
    /// - From `Creating`: delegates to `create_note`.
    /// - From `Editing(id)`: delegates to `update_note`.
    ///
    /// Validation failures keep the mode and buffers so the user can correct
    /// the input. A vanished edit target resets the session to `Idle`. Other
    /// storage failures leave the session open; the store is unchanged.
    pub fn commit<R: NoteRepository>(
        &mut self,
        service: &NoteService<R>,
    ) -> Result<Note, SessionError> {
        match self.mode {
            EditMode::Idle => Err(SessionError::NoEditorOpen),
            EditMode::Creating => match service.create_note(&self.title, &self.body) {
                Ok(note) => {
                    info!(
                        "event=session_commit module=session status=ok op=create note_id={}",
                        note.uuid
                    );
                    self.reset();
                    Ok(note)
                }
                Err(err) => Err(self.map_commit_error(err)),
            },
            EditMode::Editing(id) => match service.update_note(id, &self.title, &self.body) {
                Ok(note) => {
                    info!(
                        "event=session_commit module=session status=ok op=update note_id={}",
                        note.uuid
                    );
                    self.reset();
                    Ok(note)
                }
                Err(err) => Err(self.map_commit_error(err)),
            },
        }
    }

    fn map_commit_error(&mut self, err: RepoError) -> SessionError {
        match err {
            RepoError::Validation(validation) => SessionError::Validation(validation),
            RepoError::NotFound(id) => {
                // The target was deleted out from under the editor; the
                // session has nothing left to write to.
                warn!(
                    "event=session_commit module=session status=abandoned reason=note_gone note_id={id}"
                );
                self.reset();
                SessionError::NoteGone(id)
            }
            other => SessionError::Repo(other),
        }
    }

    fn reset(&mut self) {
        self.title.clear();
        self.body.clear();
        self.mode = EditMode::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::{EditMode, EditSession, SessionError};

    #[test]
    fn remaining_chars_counts_down_and_saturates() {
        let mut session = EditSession::with_body_limit(5);
        session.begin_create().unwrap();
        assert_eq!(session.remaining_chars(), 5);

        session.set_body("abc").unwrap();
        assert_eq!(session.remaining_chars(), 2);

        session.set_body("abcde").unwrap();
        assert_eq!(session.remaining_chars(), 0);
    }

    #[test]
    fn body_limit_counts_characters_not_bytes() {
        let mut session = EditSession::with_body_limit(3);
        session.begin_create().unwrap();

        session.set_body("äöü").unwrap();
        assert_eq!(session.working_body(), "äöü");

        let err = session.set_body("äöüx").unwrap_err();
        assert!(matches!(err, SessionError::BodyLimitExceeded { limit: 3 }));
        assert_eq!(session.working_body(), "äöü");
    }

    #[test]
    fn cancel_is_idempotent_from_idle() {
        let mut session = EditSession::new();
        session.cancel();
        assert_eq!(session.mode(), EditMode::Idle);
        assert!(session.working_title().is_empty());
    }

    #[test]
    fn buffer_updates_require_an_open_editor() {
        let mut session = EditSession::new();
        assert!(matches!(
            session.set_title("title"),
            Err(SessionError::NoEditorOpen)
        ));
        assert!(matches!(
            session.set_body("body"),
            Err(SessionError::NoEditorOpen)
        ));
    }
}
