use jotpad_core::db::migrations::latest_version;
use jotpad_core::db::open_db_in_memory;
use jotpad_core::{
    NoteRepository, NoteService, NoteValidationError, RepoError, SqliteNoteRepository,
};
use rusqlite::Connection;
use std::thread::sleep;
use std::time::Duration;
use uuid::Uuid;

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let note = repo.create_note("Groceries", "milk, eggs").unwrap();
    assert_eq!(note.created_at, note.modified_at);

    let loaded = repo.get_note(note.uuid).unwrap().unwrap();
    assert_eq!(loaded, note);
}

#[test]
fn blank_title_is_rejected_and_nothing_is_persisted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let err = repo.create_note("", "body").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(NoteValidationError::BlankTitle)
    ));
    assert!(repo.list_notes().unwrap().is_empty());
}

#[test]
fn blank_body_is_rejected_and_nothing_is_persisted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let err = repo.create_note("My Note", "   ").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(NoteValidationError::BlankBody)
    ));
    assert!(repo.list_notes().unwrap().is_empty());
}

#[test]
fn title_is_checked_before_body() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let err = repo.create_note(" ", "").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(NoteValidationError::BlankTitle)
    ));
}

#[test]
fn stored_text_is_kept_as_typed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let note = repo.create_note("  My Note ", " hello ").unwrap();
    let loaded = repo.get_note(note.uuid).unwrap().unwrap();
    assert_eq!(loaded.title, "  My Note ");
    assert_eq!(loaded.body, " hello ");
}

#[test]
fn update_moves_modified_and_preserves_created_and_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let note = repo.create_note("Draft", "first version").unwrap();
    sleep(Duration::from_millis(2));

    let updated = repo
        .update_note(note.uuid, "Draft", "second version")
        .unwrap();
    assert_eq!(updated.uuid, note.uuid);
    assert_eq!(updated.created_at, note.created_at);
    assert!(updated.modified_at > note.modified_at);
    assert_eq!(updated.body, "second version");
}

#[test]
fn update_validates_before_touching_the_store() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let note = repo.create_note("Draft", "content").unwrap();

    let err = repo.update_note(note.uuid, "Draft", " \n").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(NoteValidationError::BlankBody)
    ));

    let loaded = repo.get_note(note.uuid).unwrap().unwrap();
    assert_eq!(loaded, note);
}

#[test]
fn update_missing_note_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let id = Uuid::new_v4();
    let err = repo.update_note(id, "Title", "Body").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(gone) if gone == id));
}

#[test]
fn delete_removes_the_record_and_later_references_fail() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let note = repo.create_note("Doomed", "soon gone").unwrap();
    repo.delete_note(note.uuid).unwrap();

    assert!(repo.get_note(note.uuid).unwrap().is_none());
    assert!(repo.list_notes().unwrap().is_empty());

    let update_err = repo
        .update_note(note.uuid, "Doomed", "resurrected?")
        .unwrap_err();
    assert!(matches!(update_err, RepoError::NotFound(id) if id == note.uuid));

    let delete_err = repo.delete_note(note.uuid).unwrap_err();
    assert!(matches!(delete_err, RepoError::NotFound(id) if id == note.uuid));
}

#[test]
fn list_is_sorted_by_modified_descending() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let first = repo.create_note("first", "a").unwrap();
    let second = repo.create_note("second", "b").unwrap();
    let third = repo.create_note("third", "c").unwrap();

    force_modified_at(&conn, first.uuid, 3_000);
    force_modified_at(&conn, second.uuid, 1_000);
    force_modified_at(&conn, third.uuid, 2_000);

    let titles: Vec<_> = repo
        .list_notes()
        .unwrap()
        .into_iter()
        .map(|note| note.title)
        .collect();
    assert_eq!(titles, ["first", "third", "second"]);
}

#[test]
fn list_breaks_modified_ties_by_most_recently_touched() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let older = repo.create_note("older", "a").unwrap();
    let newer = repo.create_note("newer", "b").unwrap();

    force_modified_at(&conn, older.uuid, 1_000);
    force_modified_at(&conn, newer.uuid, 1_000);

    let titles: Vec<_> = repo
        .list_notes()
        .unwrap()
        .into_iter()
        .map(|note| note.title)
        .collect();
    assert_eq!(titles, ["newer", "older"]);

    // Updating the older note makes it the most recently touched one.
    repo.update_note(older.uuid, "older", "a2").unwrap();
    force_modified_at(&conn, older.uuid, 1_000);

    let titles: Vec<_> = repo
        .list_notes()
        .unwrap()
        .into_iter()
        .map(|note| note.title)
        .collect();
    assert_eq!(titles, ["older", "newer"]);
}

#[test]
fn list_reflects_latest_committed_state_on_every_call() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    assert!(repo.list_notes().unwrap().is_empty());

    let note = repo.create_note("One", "body").unwrap();
    assert_eq!(repo.list_notes().unwrap().len(), 1);

    repo.delete_note(note.uuid).unwrap();
    assert!(repo.list_notes().unwrap().is_empty());
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let service = NoteService::new(repo);

    let note = service.create_note("From service", "body").unwrap();
    let fetched = service.get_note(note.uuid).unwrap().unwrap();
    assert_eq!(fetched.title, "From service");

    service.delete_note(note.uuid).unwrap();
    assert!(service.list_notes().unwrap().is_empty());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteNoteRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_notes_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteNoteRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("notes"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_notes_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE notes (
            uuid TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            modified_at INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteNoteRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "notes",
            column: "touched"
        })
    ));
}

fn force_modified_at(conn: &Connection, id: Uuid, modified_at: i64) {
    conn.execute(
        "UPDATE notes SET modified_at = ?1 WHERE uuid = ?2;",
        rusqlite::params![modified_at, id.to_string()],
    )
    .unwrap();
}
