//! Session snapshot type.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AccessToken, RefreshToken};
use crate::types::{Did, Handle};

/// The credential set issued by a PDS for one account.
///
/// A `Session` is an immutable snapshot. Renewal produces a new snapshot for
/// the same account rather than mutating this one. It serializes with the
/// XRPC field names (`accessJwt`, `refreshJwt`, `did`, `handle`) so it can be
/// read straight from a `createSession` / `refreshSession` response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "accessJwt")]
    pub access_token: AccessToken,
    #[serde(rename = "refreshJwt")]
    pub refresh_token: RefreshToken,
    pub did: Did,
    pub handle: Handle,
}

impl Session {
    pub fn new(
        access_token: AccessToken,
        refresh_token: RefreshToken,
        did: Did,
        handle: Handle,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            did,
            handle,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("did", &self.did)
            .field("handle", &self.handle)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_xrpc_response_shape() {
        let session: Session = serde_json::from_value(json!({
            "did": "did:plc:test123",
            "handle": "alice.test",
            "accessJwt": "access",
            "refreshJwt": "refresh",
            "email": "ignored@example.com"
        }))
        .unwrap();

        assert_eq!(session.did.as_str(), "did:plc:test123");
        assert_eq!(session.handle.as_str(), "alice.test");
        assert_eq!(session.access_token.as_str(), "access");
        assert_eq!(session.refresh_token.as_str(), "refresh");
    }

    #[test]
    fn rejects_invalid_did() {
        let result = serde_json::from_value::<Session>(json!({
            "did": "nope",
            "handle": "alice.test",
            "accessJwt": "a",
            "refreshJwt": "r"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn debug_hides_tokens() {
        let session = Session::new(
            AccessToken::new("secret-access"),
            RefreshToken::new("secret-refresh"),
            Did::new("did:plc:abc").unwrap(),
            Handle::new("alice.test").unwrap(),
        );
        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("alice.test"));
    }
}
