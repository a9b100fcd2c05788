//! Handle type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

const MAX_HANDLE_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A validated AT Protocol handle.
///
/// Handles are DNS names that resolve to a [`Did`](super::Did). They are
/// case-insensitive, so the canonical (stored) form is lowercase.
///
/// # Example
///
/// ```
/// use plume_core::Handle;
///
/// let handle = Handle::new("Alice.Bsky.Social").unwrap();
/// assert_eq!(handle.as_str(), "alice.bsky.social");
/// assert_eq!(handle.tld(), "social");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Create a new handle from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid handle.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Returns the canonical (lowercase) handle string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the top-level domain label.
    pub fn tld(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or("")
    }

    /// Returns true if `s` would parse as a handle.
    pub fn is_valid(s: &str) -> bool {
        Self::validate(s).is_ok()
    }

    fn validate(s: &str) -> Result<(), Error> {
        let invalid = |reason: String| -> Error {
            InvalidInputError::Handle {
                value: s.to_string(),
                reason,
            }
            .into()
        };

        if s.is_empty() {
            return Err(invalid("cannot be empty".to_string()));
        }

        if s.len() > MAX_HANDLE_LEN {
            return Err(invalid(format!(
                "exceeds maximum length of {} characters",
                MAX_HANDLE_LEN
            )));
        }

        let labels: Vec<&str> = s.split('.').collect();
        if labels.len() < 2 {
            return Err(invalid("must have at least two labels".to_string()));
        }

        for label in &labels {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return Err(invalid(format!(
                    "label '{}' must be 1-{} characters",
                    label, MAX_LABEL_LEN
                )));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(invalid(format!(
                    "label '{}' cannot start or end with a hyphen",
                    label
                )));
            }
            if let Some(c) = label
                .chars()
                .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
            {
                return Err(invalid(format!("contains invalid character '{}'", c)));
            }
        }

        // Checked above: there are at least two non-empty labels.
        let tld = labels[labels.len() - 1];
        if tld.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(invalid("top-level domain cannot start with a digit".to_string()));
        }

        Ok(())
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Handle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Handle {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
