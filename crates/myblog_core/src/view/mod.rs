//! View state machines.
//!
//! # Responsibility
//! - Own each screen's loading/data/error state and form sub-state.
//! - Turn API results into notifications and navigation intents.
//!
//! # Invariants
//! - Each view owns one `CancellationToken`; results arriving after unmount
//!   are dropped without touching state.
//! - Views never read session storage; they receive a `Session` at mount.

pub mod auth;
pub mod home;
pub mod post_form;
pub mod single_post;

use crate::router::Route;

/// What the shell should do after a view handled an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    To(Route),
}
