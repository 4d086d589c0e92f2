//! Wire types exchanged with the remote auth API.
//!
//! Credential types double as the page form payloads. Their `Debug` output never
//! includes passwords so they are safe to pass through `tracing` fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Login form and `POST /api/login` body.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Register form and `POST /api/register` body.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct Registration {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("password_confirmation", &"[redacted]")
            .finish()
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Successful login or registration.
///
/// `token` is only present when the backend issues API tokens; session-cookie
/// backends leave it out.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthResult {
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl fmt::Debug for AuthResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResult")
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Body of `GET /api/dashboard`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct DashboardData {
    pub user: User,
}
