//! PDS URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated PDS (Personal Data Server) base URL.
///
/// Must be HTTPS, or plain HTTP for loopback hosts so local development
/// servers and mock servers in tests work.
///
/// # Example
///
/// ```
/// use plume_core::PdsUrl;
///
/// let pds = PdsUrl::new("https://bsky.social").unwrap();
/// assert_eq!(pds.xrpc_url("com.atproto.server.refreshSession"),
///            "https://bsky.social/xrpc/com.atproto.server.refreshSession");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PdsUrl(Url);

impl PdsUrl {
    /// Create a new PDS URL from a string, validating the format.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::PdsUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;
        Ok(Self(url))
    }

    /// Returns the XRPC endpoint URL for a given method.
    pub fn xrpc_url(&self, method: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/xrpc/{}", base, method)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        let invalid = |reason: &str| -> Error {
            InvalidInputError::PdsUrl {
                value: original.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        if url.cannot_be_a_base() {
            return Err(invalid("must be an absolute URL"));
        }

        let Some(host) = url.host_str() else {
            return Err(invalid("must have a host"));
        };

        let is_loopback = matches!(host, "localhost" | "127.0.0.1" | "[::1]");
        match url.scheme() {
            "https" => Ok(()),
            "http" if is_loopback => Ok(()),
            _ => Err(invalid("must use HTTPS (HTTP allowed only for localhost)")),
        }
    }
}

impl fmt::Display for PdsUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PdsUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for PdsUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for PdsUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PdsUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let pds = PdsUrl::new("https://bsky.social").unwrap();
        assert_eq!(pds.host(), Some("bsky.social"));
    }

    #[test]
    fn valid_loopback_http() {
        assert!(PdsUrl::new("http://localhost:2583").is_ok());
        assert!(PdsUrl::new("http://127.0.0.1:2583").is_ok());
    }

    #[test]
    fn xrpc_url_ignores_trailing_slash() {
        let pds = PdsUrl::new("https://bsky.social/").unwrap();
        assert_eq!(
            pds.xrpc_url("com.atproto.server.createSession"),
            "https://bsky.social/xrpc/com.atproto.server.createSession"
        );
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(PdsUrl::new("http://bsky.social").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(PdsUrl::new("/xrpc/method").is_err());
    }

    #[test]
    fn invalid_file_url() {
        assert!(PdsUrl::new("file:///tmp/pds").is_err());
    }
}
