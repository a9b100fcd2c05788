//! Namespaced Identifier (NSID) type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

const MAX_NSID_LEN: usize = 317;

/// A validated AT Protocol Namespaced Identifier (NSID).
///
/// NSIDs use reverse-DNS notation to name lexicon types and collections,
/// e.g. `app.bsky.feed.post`. A `$type` tag is an NSID optionally followed
/// by `#fragment`; only the part before `#` is an NSID.
///
/// # Example
///
/// ```
/// use plume_core::Nsid;
///
/// let nsid = Nsid::new("app.bsky.feed.post").unwrap();
/// assert_eq!(nsid.authority(), "app.bsky.feed");
/// assert_eq!(nsid.name(), "post");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nsid(String);

impl Nsid {
    /// Create a new NSID from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid NSID format.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the domain authority (every segment but the last).
    pub fn authority(&self) -> &str {
        self.0.rsplit_once('.').map(|(a, _)| a).unwrap_or(&self.0)
    }

    /// Returns the name (the final segment).
    pub fn name(&self) -> &str {
        self.0.rsplit_once('.').map(|(_, n)| n).unwrap_or("")
    }

    /// Returns the full NSID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the segments of the NSID.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    fn validate(s: &str) -> Result<(), Error> {
        let invalid = |reason: String| -> Error {
            InvalidInputError::Nsid {
                value: s.to_string(),
                reason,
            }
            .into()
        };

        if s.is_empty() {
            return Err(invalid("cannot be empty".to_string()));
        }

        if s.len() > MAX_NSID_LEN {
            return Err(invalid(format!(
                "exceeds maximum length of {} characters",
                MAX_NSID_LEN
            )));
        }

        let segments: Vec<&str> = s.split('.').collect();
        if segments.len() < 3 {
            return Err(invalid(
                "must have at least 3 segments (e.g., 'app.bsky.feed')".to_string(),
            ));
        }

        for (i, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(invalid(format!("segment {} is empty", i + 1)));
            }
            if !segment.starts_with(|c: char| c.is_ascii_alphabetic()) {
                return Err(invalid(format!(
                    "segment '{}' must start with a letter",
                    segment
                )));
            }
            if let Some(c) = segment
                .chars()
                .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
            {
                return Err(invalid(format!(
                    "segment '{}' contains invalid character '{}'",
                    segment, c
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Nsid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Nsid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Nsid {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Nsid> for String {
    fn from(nsid: Nsid) -> Self {
        nsid.0
    }
}

impl AsRef<str> for Nsid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_nsid() {
        let nsid = Nsid::new("app.bsky.embed.recordWithMedia").unwrap();
        assert_eq!(nsid.authority(), "app.bsky.embed");
        assert_eq!(nsid.name(), "recordWithMedia");
        assert_eq!(nsid.segments().count(), 4);
    }

    #[test]
    fn invalid_too_few_segments() {
        assert!(Nsid::new("app.bsky").is_err());
    }

    #[test]
    fn invalid_empty_segment() {
        assert!(Nsid::new("app..feed.post").is_err());
    }

    #[test]
    fn invalid_starts_with_number() {
        assert!(Nsid::new("1app.bsky.feed").is_err());
    }

    #[test]
    fn fragment_is_not_part_of_nsid() {
        assert!(Nsid::new("app.bsky.embed.images#view").is_err());
    }
}
