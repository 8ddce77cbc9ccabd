//! Domain model for the note screen.
//!
//! # Responsibility
//! - Define the canonical `Note` record and its validation rules.
//! - Keep business invariants independent from storage and presentation.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - A note that passed validation never has a blank title or body.

pub mod note;
