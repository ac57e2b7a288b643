//! Request and response bodies for `/auth/*`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// `data` of a successful login/register envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthGrant {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
}

impl AuthGrant {
    /// Returns `(token, user_id)` when both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.token.as_deref().filter(|t| !t.is_empty())?;
        let id = self.id.as_deref().filter(|i| !i.is_empty())?;
        Some((token, id))
    }
}
