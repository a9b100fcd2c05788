//! Token types for AT Protocol authentication.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TokenClaims;
use crate::Result;

/// An access token for authenticated XRPC requests.
///
/// Access tokens are short-lived JWTs sent as the bearer credential on
/// every authenticated call. The value is never shown in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token value.
    ///
    /// Use only when constructing authorization headers or persisting
    /// the session. Never log it.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value for this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A refresh token for obtaining new access tokens.
///
/// Refresh tokens are longer-lived JWTs. Their `exp` claim drives the
/// renewal schedule of the session manager.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(String);

impl RefreshToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value used by `refreshSession`.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Reads the token's claims without verifying its signature.
    pub fn claims(&self) -> Result<TokenClaims> {
        TokenClaims::read(&self.0)
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}
