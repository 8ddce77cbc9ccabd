//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the durable create/update/get/list/delete API over `notes`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate title/body before any SQL mutation.
//! - Every successful mutation is committed before the call returns.
//! - Read paths reject invalid persisted state instead of masking it.
//! - List order is `modified_at DESC`, ties broken by most recently touched.

use crate::db::DbError;
use crate::model::note::{validate_note_fields, Note, NoteId, NoteValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    body,
    created_at,
    modified_at
FROM notes";

const REQUIRED_COLUMNS: &[&str] = &[
    "uuid",
    "title",
    "body",
    "created_at",
    "modified_at",
    "touched",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; \
                 open the database through db::open_db"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the note record store.
pub trait NoteRepository {
    /// Validates and persists a new note; `created_at == modified_at`.
    fn create_note(&self, title: &str, body: &str) -> RepoResult<Note>;
    /// Validates and persists replacement title/body for an existing note.
    fn update_note(&self, id: NoteId, title: &str, body: &str) -> RepoResult<Note>;
    /// Gets one note by ID.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists all notes, most recently modified first.
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
    /// Removes a note unconditionally and immediately.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Rejects connections that did not go through `db::open_db`, so schema
    /// mismatches surface here rather than inside later SQL.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, title: &str, body: &str) -> RepoResult<Note> {
        validate_note_fields(title, body)?;

        let now = now_epoch_ms();
        let uuid = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO notes (uuid, title, body, created_at, modified_at, touched)
             VALUES (?1, ?2, ?3, ?4, ?4, (SELECT IFNULL(MAX(touched), 0) + 1 FROM notes));",
            params![uuid.to_string(), title, body, now],
        )?;

        Ok(Note {
            uuid,
            title: title.to_string(),
            body: body.to_string(),
            created_at: now,
            modified_at: now,
        })
    }

    fn update_note(&self, id: NoteId, title: &str, body: &str) -> RepoResult<Note> {
        validate_note_fields(title, body)?;

        let now = now_epoch_ms();
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?2,
                body = ?3,
                modified_at = ?4,
                touched = (SELECT IFNULL(MAX(touched), 0) + 1 FROM notes)
             WHERE uuid = ?1;",
            params![id.to_string(), title, body, now],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.get_note(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("updated note {id} missing on read-back"))
        })
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} ORDER BY modified_at DESC, touched DESC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = crate::db::migrations::latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'notes'
        );",
        [],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('notes');")?;
    let mut rows = stmt.query([])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>(0)?);
    }
    for column in REQUIRED_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    let note = Note {
        uuid,
        title: row.get("title")?,
        body: row.get("body")?,
        created_at: row.get("created_at")?,
        modified_at: row.get("modified_at")?,
    };
    note.validate()?;
    Ok(note)
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
