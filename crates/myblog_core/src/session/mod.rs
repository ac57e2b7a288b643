//! Durable session storage and the explicit session context handed to views.
//!
//! # Responsibility
//! - Persist `token` and `userId` across process restarts.
//! - Give views a session value at construction instead of ambient reads.
//!
//! # Invariants
//! - `read` never fails; storage errors degrade to an anonymous session.
//! - `write` replaces both keys atomically; `clear` removes both.

pub mod context;
pub mod store;

pub use context::{SessionContext, SessionEvent};
pub use store::{MemorySessionStore, SessionError, SessionResult, SessionStore, SqliteSessionStore};
