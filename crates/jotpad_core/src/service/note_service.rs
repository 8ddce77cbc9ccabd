//! Note use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for session and presenter callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteRepository, RepoResult};

/// Use-case service wrapper for note CRUD operations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new note through repository persistence.
    pub fn create_note(&self, title: &str, body: &str) -> RepoResult<Note> {
        self.repo.create_note(title, body)
    }

    /// Replaces title/body of an existing note.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update_note(&self, id: NoteId, title: &str, body: &str) -> RepoResult<Note> {
        self.repo.update_note(id, title, body)
    }

    /// Gets one note by ID.
    pub fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.repo.get_note(id)
    }

    /// Lists all notes, most recently modified first.
    pub fn list_notes(&self) -> RepoResult<Vec<Note>> {
        self.repo.list_notes()
    }

    /// Deletes a note by ID.
    pub fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        self.repo.delete_note(id)
    }
}
