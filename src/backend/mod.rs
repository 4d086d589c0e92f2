//! Client side of the remote auth API.

pub mod auth;
pub mod http;
pub mod types;

pub use self::auth::{AuthClient, AuthError};
pub use self::http::{ApiClient, HttpError};
pub use self::types::{AuthResult, Credentials, DashboardData, Registration, User};
