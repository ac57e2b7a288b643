//! Response envelope and the discriminated call result.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Envelope code signalling application-level success.
pub const SUCCESS_CODE: i64 = 200;

/// Body shape shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    /// Some endpoints answer with `msg` instead of `message`.
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Error body of non-2xx responses; only the message is of interest.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
}

/// Decoded `code == 200` envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSuccess<T> {
    pub data: Option<T>,
    pub message: String,
    pub total: Option<u64>,
}

impl<T> ApiSuccess<T> {
    /// Server message, or `fallback` when the server sent none.
    pub fn message_or(&self, fallback: &str) -> String {
        if self.message.trim().is_empty() {
            fallback.to_string()
        } else {
            self.message.clone()
        }
    }
}

pub type ApiResult<T> = Result<ApiSuccess<T>, ApiError>;

/// Failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Envelope decoded but `code != 200`.
    App { code: i64, message: Option<String> },
    /// Network failure, non-2xx status or an undecodable body.
    ///
    /// `message` carries the server's error message when the body had one.
    Transport {
        status: Option<u16>,
        message: Option<String>,
        detail: String,
    },
    /// The owning view unmounted before the result could be committed.
    Cancelled,
}

impl ApiError {
    /// Message to surface to the user: the server's when present, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        let server_message = match self {
            Self::App { message, .. } | Self::Transport { message, .. } => message.as_deref(),
            Self::Cancelled => None,
        };
        server_message
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::App { .. } => "app",
            Self::Transport { .. } => "transport",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::App { code, message } => write!(
                f,
                "api returned code {code}: {}",
                message.as_deref().unwrap_or("no message")
            ),
            Self::Transport {
                status: Some(status),
                detail,
                ..
            } => write!(f, "http status {status}: {detail}"),
            Self::Transport {
                status: None,
                detail,
                ..
            } => write!(f, "request failed: {detail}"),
            Self::Cancelled => write!(f, "request cancelled"),
        }
    }
}

impl Error for ApiError {}
