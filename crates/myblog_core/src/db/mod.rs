//! Local SQLite file behind the session store.
//!
//! # Responsibility
//! - Locate or create the store file under the data directory.
//! - Refuse to touch session keys until the schema matches this build.
//!
//! # Invariants
//! - `PRAGMA user_version` equals the number of applied migrations.
//! - A store written by a newer client is reported, never rewritten.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure to open or migrate the local store.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// The data directory holding the store file could not be created.
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file carries a schema from a newer client.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::CreateDir { path, source } => {
                write!(f, "cannot create `{}`: {source}", path.display())
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "session store has schema {found}; this client supports up to {supported}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::CreateDir { source, .. } => Some(source),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
