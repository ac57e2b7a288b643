//! Client session value.

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the signed-in user's id.
pub const USER_ID_KEY: &str = "userId";

/// Snapshot of the stored credentials.
///
/// No expiry is tracked; token validity is the server's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user_id: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user_id: Some(user_id.into()),
        }
    }

    /// A session is present when a non-empty token is stored.
    pub fn is_present(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}
