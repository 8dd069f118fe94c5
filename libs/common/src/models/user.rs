//! Staff identity returned by the auth endpoint

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience carried by access tokens of signed-in users
pub const TOKEN_AUDIENCE: &str = "authenticated";

/// Signed-in staff member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of a password sign-in
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: u64,
    pub user: AuthUser,
}

/// Claims of a backend access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User ID
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    /// Audience
    pub aud: String,
    #[serde(default)]
    pub role: Option<String>,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}
