//! Strong references (`com.atproto.repo.strongRef`).

use plume_core::{AtUri, Cid};
use serde::{Deserialize, Serialize};

/// A reference to one specific version of a record: its URI plus the CID
/// of the content at that URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrongRef {
    pub uri: AtUri,
    pub cid: Cid,
}

impl StrongRef {
    pub fn new(uri: AtUri, cid: Cid) -> Self {
        Self { uri, cid }
    }
}
