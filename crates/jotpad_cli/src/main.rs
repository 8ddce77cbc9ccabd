//! Command-line front end for the note screen.
//!
//! # Responsibility
//! - Stand in for the rendering collaborator: read the list and session
//!   state, forward user intents to the core.
//! - Keep every mutation on the presenter/session path; never reach into the
//!   store directly.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use jotpad_core::db::open_db;
use jotpad_core::{
    core_version, default_log_level, init_logging, NotesScreen, SqliteNoteRepository,
    DEFAULT_BODY_CHAR_LIMIT,
};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "jotpad")]
#[command(about = "Single-screen note taking from the command line")]
struct Cli {
    /// Note database file
    #[arg(long, env = "JOTPAD_DB", default_value = "jotpad.sqlite3")]
    db: PathBuf,

    /// Directory for rolling log files (absolute). Logging is off when unset.
    #[arg(long, env = "JOTPAD_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, env = "JOTPAD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Body character limit enforced while composing
    #[arg(long, env = "JOTPAD_BODY_LIMIT", default_value_t = DEFAULT_BODY_CHAR_LIMIT)]
    body_limit: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all notes, most recently modified first
    List,

    /// Compose and commit a new note
    Add {
        title: String,
        body: String,
    },

    /// Open an existing note for edit and commit the changes
    Edit {
        id: Uuid,

        /// Replacement title; keeps the stored title when omitted
        #[arg(long)]
        title: Option<String>,

        /// Replacement body; keeps the stored body when omitted
        #[arg(long)]
        body: Option<String>,
    },

    /// Delete a note immediately
    Delete {
        id: Uuid,
    },

    /// Print the core version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        let dir = log_dir
            .to_str()
            .ok_or_else(|| anyhow!("log dir is not valid UTF-8"))?;
        init_logging(&level, dir).map_err(|err| anyhow!(err))?;
    }

    if matches!(cli.command, Commands::Version) {
        println!("jotpad {}", core_version());
        return Ok(());
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open note database at {}", cli.db.display()))?;
    let repo = SqliteNoteRepository::try_new(&conn).context("note database is not usable")?;
    let mut screen = NotesScreen::with_body_limit(repo, cli.body_limit);

    match cli.command {
        Commands::List => {
            let items = screen.notes().context("failed to read notes")?;
            if items.is_empty() {
                println!("no notes yet");
                return Ok(());
            }
            for item in items {
                println!("{}  [{}]", item.title, item.id);
                println!("  {}", item.body);
                println!(
                    "  created {} · modified {}",
                    item.created_label, item.modified_label
                );
            }
        }
        Commands::Add { title, body } => {
            screen.begin_create()?;
            screen.set_title(title)?;
            screen.set_body(body)?;
            let note = screen.commit().context("could not save the new note")?;
            println!("created {}", note.uuid);
        }
        Commands::Edit { id, title, body } => {
            screen.begin_edit(id)?;
            if let Some(title) = title {
                screen.set_title(title)?;
            }
            if let Some(body) = body {
                screen.set_body(body)?;
            }
            let note = screen.commit().context("could not save the edit")?;
            println!("updated {}", note.uuid);
        }
        Commands::Delete { id } => {
            screen
                .delete(id)
                .with_context(|| format!("could not delete note {id}"))?;
            println!("deleted {id}");
        }
        Commands::Version => unreachable!("handled before opening the store"),
    }

    Ok(())
}
