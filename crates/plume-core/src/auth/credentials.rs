//! Login credentials type.

use std::fmt;

/// Login credentials for AT Protocol authentication.
///
/// Holds the identifier (handle, DID or email) and the secret (account
/// password or app password) sent to `com.atproto.server.createSession`.
/// The secret never appears in `Debug` output.
///
/// # Example
///
/// ```
/// use plume_core::Credentials;
///
/// let creds = Credentials::new("alice.bsky.social", "app-password-here");
/// assert_eq!(creds.identifier(), "alice.bsky.social");
/// ```
#[derive(Clone)]
pub struct Credentials {
    identifier: String,
    password: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }

    /// Returns the identifier (handle, DID or email).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the password. Only for building the login request.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_hides_password_in_debug() {
        let creds = Credentials::new("alice.bsky.social", "secret123");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice.bsky.social"));
        assert!(!debug.contains("secret123"));
        assert!(debug.contains("[REDACTED]"));
    }
}
