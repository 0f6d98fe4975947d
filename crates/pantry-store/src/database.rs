//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! the schema manager has run before any other operation.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use pantry_shared::constants::DB_FILE_NAME;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::migrations;

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/pantry/pantry.db`
    /// - macOS:   `~/Library/Application Support/app.pantry.pantry/pantry.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\pantry\pantry\data\pantry.db`
    pub fn new() -> Result<Self> {
        Self::open_at(&default_path()?)
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// Missing parent directories are created. Any failure while opening or
    /// bringing the schema up to date is reported as
    /// [`StoreError::Initialization`].
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Initialization(format!("creating {}: {e}", parent.display())))?;
        }

        tracing::info!(path = %path.display(), "opening database");

        let conn = Connection::open(path)
            .map_err(|e| StoreError::Initialization(format!("opening {}: {e}", path.display())))?;
        Self::from_connection(conn)
    }

    /// Open a throwaway in-memory database with the full schema applied.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Initialization(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| StoreError::Initialization(e.to_string()))?;

        migrations::ensure_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    ///
    /// Callers should prefer the typed repository helpers, but direct access is
    /// occasionally needed for ad-hoc queries.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().filter(|p| !p.is_empty()).map(PathBuf::from)
    }
}

/// Resolve the default database location inside the platform data directory.
pub fn default_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("app", "pantry", "pantry").ok_or(StoreError::NoDataDir)?;
    Ok(project_dirs.data_dir().join(DB_FILE_NAME))
}

/// Trim a user-supplied name, rejecting it if nothing is left.
pub(crate) fn require_name<'a>(name: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!("{what} name must not be empty")));
    }
    Ok(trimmed)
}

/// Whether `err` is a constraint failure with the given extended result code.
pub(crate) fn is_constraint(err: &rusqlite::Error, extended_code: std::os::raw::c_int) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.extended_code == extended_code)
}
