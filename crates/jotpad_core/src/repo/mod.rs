//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record-store contract used by session and presenter.
//! - Isolate SQLite query details from use-case orchestration.
//!
//! # Invariants
//! - Repository writes enforce blank-field validation before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod note_repo;
