//! Content identifier (CID) type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated content identifier.
///
/// Accepts multibase-encoded CIDv1 strings (`bafy...`) and base58 CIDv0
/// strings (`Qm...`). Beyond parsing, the value is opaque: equality and
/// hashing use the canonical string form.
///
/// # Example
///
/// ```
/// use plume_core::Cid;
///
/// let cid = Cid::new("bafyreiao6dcjaspidyacksbr66qomo2wqpweituindrdqp3n3tb2t66wti").unwrap();
/// assert_eq!(cid.version(), 1);
/// assert!(Cid::new("not-a-cid").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cid(ipld_core::cid::Cid);

impl Cid {
    /// Parse a CID string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid multibase/multihash CID.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        ipld_core::cid::Cid::try_from(s)
            .map(Self)
            .map_err(|e| {
                InvalidInputError::Cid {
                    value: s.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    /// Returns the CID version (0 or 1).
    pub fn version(&self) -> u64 {
        match self.0.version() {
            ipld_core::cid::Version::V0 => 0,
            ipld_core::cid::Version::V1 => 1,
        }
    }

    /// Returns the multicodec of the addressed content.
    pub fn codec(&self) -> u64 {
        self.0.codec()
    }

    /// Returns the underlying IPLD CID.
    pub fn as_ipld(&self) -> &ipld_core::cid::Cid {
        &self.0
    }
}

impl From<ipld_core::cid::Cid> for Cid {
    fn from(cid: ipld_core::cid::Cid) -> Self {
        Self(cid)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cid").field(&self.0.to_string()).finish()
    }
}

impl FromStr for Cid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Cid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cid::new(&s).map_err(serde::de::Error::custom)
    }
}
