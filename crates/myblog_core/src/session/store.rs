//! Key/value session stores.

use crate::db::{open_db, open_db_in_memory, StoreError};
use crate::model::session::{Session, TOKEN_KEY, USER_ID_KEY};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub type SessionResult<T> = Result<T, SessionError>;

/// Session persistence failure.
#[derive(Debug)]
pub enum SessionError {
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "session storage failed: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<rusqlite::Error> for SessionError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(StoreError::Sqlite(value))
    }
}

/// Storage contract for the two session keys.
pub trait SessionStore {
    /// Current stored session; absent keys yield `None` fields.
    fn read(&self) -> Session;
    /// Overwrites both keys.
    fn write(&self, token: &str, user_id: &str) -> SessionResult<()>;
    /// Removes both keys.
    fn clear(&self) -> SessionResult<()>;
}

/// SQLite-backed store; survives process restarts when file-backed.
pub struct SqliteSessionStore {
    conn: Connection,
}

impl SqliteSessionStore {
    /// Opens (and migrates) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> SessionResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn in_memory() -> SessionResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    fn read_key(&self, key: &str) -> SessionResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM session_entries WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn try_read(&self) -> SessionResult<Session> {
        Ok(Session {
            token: self.read_key(TOKEN_KEY)?,
            user_id: self.read_key(USER_ID_KEY)?,
        })
    }
}

impl SessionStore for SqliteSessionStore {
    fn read(&self) -> Session {
        match self.try_read() {
            Ok(session) => session,
            Err(err) => {
                error!("event=session_read module=session status=error error={err}");
                Session::anonymous()
            }
        }
    }

    fn write(&self, token: &str, user_id: &str) -> SessionResult<()> {
        let now = now_epoch_ms();
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in [(TOKEN_KEY, token), (USER_ID_KEY, user_id)] {
            tx.execute(
                "INSERT INTO session_entries (key, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value, now],
            )?;
        }
        tx.commit()?;
        info!("event=session_write module=session status=ok");
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        self.conn.execute(
            "DELETE FROM session_entries WHERE key IN (?1, ?2);",
            params![TOKEN_KEY, USER_ID_KEY],
        )?;
        info!("event=session_clear module=session status=ok");
        Ok(())
    }
}

/// Process-local store; nothing outlives the value.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RefCell<HashMap<&'static str, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a signed-in session.
    pub fn signed_in(token: &str, user_id: &str) -> Self {
        let store = Self::new();
        {
            let mut entries = store.entries.borrow_mut();
            entries.insert(TOKEN_KEY, token.to_string());
            entries.insert(USER_ID_KEY, user_id.to_string());
        }
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> Session {
        let entries = self.entries.borrow();
        Session {
            token: entries.get(TOKEN_KEY).cloned(),
            user_id: entries.get(USER_ID_KEY).cloned(),
        }
    }

    fn write(&self, token: &str, user_id: &str) -> SessionResult<()> {
        let mut entries = self.entries.borrow_mut();
        entries.insert(TOKEN_KEY, token.to_string());
        entries.insert(USER_ID_KEY, user_id.to_string());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        let mut entries = self.entries.borrow_mut();
        entries.remove(TOKEN_KEY);
        entries.remove(USER_ID_KEY);
        Ok(())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn read(&self) -> Session {
        (**self).read()
    }

    fn write(&self, token: &str, user_id: &str) -> SessionResult<()> {
        (**self).write(token, user_id)
    }

    fn clear(&self) -> SessionResult<()> {
        (**self).clear()
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
