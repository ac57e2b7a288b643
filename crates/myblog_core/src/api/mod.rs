//! REST access to the remote blog API.
//!
//! # Responsibility
//! - Send requests through a pluggable `Transport`.
//! - Decode the `{code, message, data, total}` envelope into a discriminated
//!   result so call sites never re-check `code` by hand.
//!
//! # Invariants
//! - `code == 200` is the only application-level success signal.
//! - Non-2xx responses and network failures both become `ApiError::Transport`.
//! - A result produced after cancellation is reported as `Cancelled`.

pub mod cancel;
pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod transport;

pub use cancel::CancellationToken;
pub use client::ApiClient;
pub use envelope::{ApiError, ApiResult, ApiSuccess, Envelope, SUCCESS_CODE};
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport, TransportFailure};
