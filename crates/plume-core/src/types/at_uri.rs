//! AT URI type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{AtIdentifier, Did, Nsid, Rkey};
use crate::error::{Error, InvalidInputError};

const MAX_AT_URI_LEN: usize = 8 * 1024;

/// A validated AT Protocol URI.
///
/// Format: `at://<authority>[/<collection>[/<rkey>]][#<fragment>]`, where
/// the authority is a DID or a handle. A URI naming a single record has
/// all three path parts.
///
/// # Example
///
/// ```
/// use plume_core::AtUri;
///
/// let uri = AtUri::new("at://did:plc:z72i7hdynmk6r22z27h6tvur/app.bsky.feed.post/3jui7kd54zh2y").unwrap();
/// assert_eq!(uri.collection().unwrap().as_str(), "app.bsky.feed.post");
/// assert_eq!(uri.rkey().unwrap().as_str(), "3jui7kd54zh2y");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AtUri {
    authority: AtIdentifier,
    collection: Option<Nsid>,
    rkey: Option<Rkey>,
    fragment: Option<String>,
}

impl AtUri {
    /// Create a new AT URI from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid AT URI format.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        Self::parse(s.as_ref())
    }

    /// Create a record URI from its components.
    pub fn from_parts(repo: Did, collection: Nsid, rkey: Rkey) -> Self {
        Self {
            authority: AtIdentifier::Did(repo),
            collection: Some(collection),
            rkey: Some(rkey),
            fragment: None,
        }
    }

    /// Returns the authority (repository DID or handle).
    pub fn authority(&self) -> &AtIdentifier {
        &self.authority
    }

    /// Returns the collection, if present.
    pub fn collection(&self) -> Option<&Nsid> {
        self.collection.as_ref()
    }

    /// Returns the record key, if present.
    pub fn rkey(&self) -> Option<&Rkey> {
        self.rkey.as_ref()
    }

    /// Returns the fragment (without the leading `#`), if present.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Returns true if this URI addresses a single record.
    pub fn is_record(&self) -> bool {
        self.collection.is_some() && self.rkey.is_some()
    }

    fn parse(s: &str) -> Result<Self, Error> {
        let invalid = |reason: String| -> Error {
            InvalidInputError::AtUri {
                value: s.to_string(),
                reason,
            }
            .into()
        };

        if s.len() > MAX_AT_URI_LEN {
            return Err(invalid("exceeds maximum length of 8 KiB".to_string()));
        }

        let rest = s
            .strip_prefix("at://")
            .ok_or_else(|| invalid("must start with 'at://'".to_string()))?;

        let (path, fragment) = match rest.split_once('#') {
            Some((_, "")) => return Err(invalid("fragment cannot be empty".to_string())),
            Some((path, fragment)) => (path, Some(fragment.to_string())),
            None => (rest, None),
        };

        let mut parts = path.split('/');
        let authority = parts.next().unwrap_or("");
        let collection = parts.next();
        let rkey = parts.next();
        if parts.next().is_some() {
            return Err(invalid(
                "must have format 'at://<authority>/<collection>/<rkey>'".to_string(),
            ));
        }

        let authority = AtIdentifier::new(authority)
            .map_err(|_| invalid(format!("invalid authority: {}", authority)))?;

        let collection = collection
            .map(|c| Nsid::new(c).map_err(|_| invalid(format!("invalid collection: {}", c))))
            .transpose()?;

        let rkey = rkey
            .map(|r| Rkey::new(r).map_err(|_| invalid(format!("invalid rkey: {}", r))))
            .transpose()?;

        Ok(Self {
            authority,
            collection,
            rkey,
            fragment,
        })
    }
}

impl fmt::Display for AtUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at://{}", self.authority)?;
        if let Some(ref collection) = self.collection {
            write!(f, "/{}", collection)?;
        }
        if let Some(ref rkey) = self.rkey {
            write!(f, "/{}", rkey)?;
        }
        if let Some(ref fragment) = self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

impl FromStr for AtUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for AtUri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AtUri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AtUri::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_record_uri() {
        let uri =
            AtUri::new("at://did:plc:z72i7hdynmk6r22z27h6tvur/app.bsky.feed.post/3jui7kd54zh2y")
                .unwrap();

        assert_eq!(uri.authority().as_str(), "did:plc:z72i7hdynmk6r22z27h6tvur");
        assert_eq!(uri.collection().unwrap().as_str(), "app.bsky.feed.post");
        assert_eq!(uri.rkey().unwrap().as_str(), "3jui7kd54zh2y");
        assert!(uri.is_record());
    }

    #[test]
    fn handle_authority_only() {
        let uri = AtUri::new("at://alice.bsky.social").unwrap();
        assert!(uri.authority().as_handle().is_some());
        assert!(uri.collection().is_none());
        assert!(!uri.is_record());
    }

    #[test]
    fn collection_without_rkey() {
        let uri = AtUri::new("at://did:plc:abc123/app.bsky.feed.like").unwrap();
        assert!(uri.collection().is_some());
        assert!(uri.rkey().is_none());
    }

    #[test]
    fn fragment() {
        let uri = AtUri::new("at://did:plc:abc123/app.bsky.feed.post/3k#/text").unwrap();
        assert_eq!(uri.fragment(), Some("/text"));
        assert_eq!(uri.to_string(), "at://did:plc:abc123/app.bsky.feed.post/3k#/text");
    }

    #[test]
    fn roundtrip() {
        let original = "at://did:plc:z72i7hdynmk6r22z27h6tvur/app.bsky.feed.post/3jui7kd54zh2y";
        let uri = AtUri::new(original).unwrap();
        assert_eq!(uri.to_string(), original);
    }

    #[test]
    fn from_parts() {
        let repo = Did::new("did:plc:z72i7hdynmk6r22z27h6tvur").unwrap();
        let collection = Nsid::new("app.bsky.feed.post").unwrap();
        let rkey = Rkey::new("3jui7kd54zh2y").unwrap();

        let uri = AtUri::from_parts(repo, collection, rkey);
        assert_eq!(
            uri.to_string(),
            "at://did:plc:z72i7hdynmk6r22z27h6tvur/app.bsky.feed.post/3jui7kd54zh2y"
        );
    }

    #[test]
    fn equality_uses_canonical_handle() {
        let a = AtUri::new("at://Alice.Test/app.bsky.feed.post/abc").unwrap();
        let b = AtUri::new("at://alice.test/app.bsky.feed.post/abc").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_missing_prefix() {
        assert!(AtUri::new("did:plc:z72i7hdynmk6r22z27h6tvur/app.bsky.feed.post/rkey").is_err());
    }

    #[test]
    fn invalid_extra_segment() {
        assert!(AtUri::new("at://did:plc:abc/app.bsky.feed.post/a/b").is_err());
    }

    #[test]
    fn invalid_empty_fragment() {
        assert!(AtUri::new("at://did:plc:abc/app.bsky.feed.post/a#").is_err());
    }

    #[test]
    fn invalid_authority() {
        assert!(AtUri::new("at://not_valid/app.bsky.feed.post/a").is_err());
    }
}
