//! Records mirrored from the remote blog API plus the local session value.
//!
//! # Invariants
//! - The client never owns canonical post state; records live only as long
//!   as the view that fetched them.
//! - Ownership comparisons are a UI convenience, not access control.

pub mod auth;
pub mod post;
pub mod session;
