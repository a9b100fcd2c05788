//! Record Key (rkey) type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated AT Protocol Record Key (rkey).
///
/// Record keys identify individual records within a collection: usually a
/// TID such as `3jui7kd54zh2y`, or a literal such as `self`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rkey(String);

impl Rkey {
    /// Create a new rkey from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid rkey format.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the rkey string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        // 1-512 characters of a-z, A-Z, 0-9, '.', '-', '_', '~', ':'
        // and never "." or "..".
        let reason = if s.is_empty() {
            Some("cannot be empty".to_string())
        } else if s.len() > 512 {
            Some("exceeds maximum length of 512 characters".to_string())
        } else if s == "." || s == ".." {
            Some("cannot be '.' or '..'".to_string())
        } else {
            s.chars()
                .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '.' | '-' | '_' | '~' | ':'))
                .map(|c| format!("contains invalid character '{}'", c))
        };

        match reason {
            Some(reason) => Err(InvalidInputError::Rkey {
                value: s.to_string(),
                reason,
            }
            .into()),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Rkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Rkey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Rkey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Rkey> for String {
    fn from(rkey: Rkey) -> Self {
        rkey.0
    }
}
