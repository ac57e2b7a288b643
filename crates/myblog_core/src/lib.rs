//! Core client logic for the My Blog front end.
//! Everything a presenter needs lives here: session storage, API access,
//! routing and the per-screen state machines.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod notify;
pub mod router;
pub mod session;
pub mod view;

pub use api::{ApiClient, ApiError, ApiResult, CancellationToken, HttpTransport, Transport};
pub use app::{Action, ActiveView, App};
pub use config::{ClientConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::post::{Author, Post, PostId, PostPayload};
pub use model::session::Session;
pub use notify::{Notification, NotificationKind, NotificationLog, Notifier};
pub use router::{resolve, Resolution, Route};
pub use session::{
    MemorySessionStore, SessionContext, SessionError, SessionEvent, SessionStore,
    SqliteSessionStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
