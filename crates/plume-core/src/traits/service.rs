//! Session service trait.

use async_trait::async_trait;

use crate::auth::{Credentials, RefreshToken, Session};
use crate::Result;

/// The server-side session endpoints the session manager depends on.
///
/// The XRPC client implements this against a real PDS; tests substitute
/// in-memory fakes. Implementations surface failures as [`Error`](crate::Error)
/// values and never panic.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Authenticate and create a new session (`com.atproto.server.createSession`).
    async fn create_session(&self, credentials: &Credentials) -> Result<Session>;

    /// Exchange a refresh token for a new session
    /// (`com.atproto.server.refreshSession`).
    async fn refresh_session(&self, refresh_token: &RefreshToken) -> Result<Session>;
}
