//! Blob references shared by several embed shapes.

use plume_core::Cid;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// A CID in link form: `{"$link": "<cid>"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CidLink {
    #[serde(rename = "$link")]
    pub link: Cid,
}

/// A reference to an uploaded blob (image, thumbnail).
///
/// Serializes as `{"$type":"blob","ref":{"$link":..},"mimeType":..,"size":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    #[serde(rename = "ref")]
    pub reference: CidLink,
    pub mime_type: String,
    pub size: u64,
}

impl Blob {
    pub fn new(cid: Cid, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            reference: CidLink { link: cid },
            mime_type: mime_type.into(),
            size,
        }
    }

    pub fn cid(&self) -> &Cid {
        &self.reference.link
    }
}

impl Serialize for Blob {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Blob", 4)?;
        state.serialize_field("$type", "blob")?;
        state.serialize_field("ref", &self.reference)?;
        state.serialize_field("mimeType", &self.mime_type)?;
        state.serialize_field("size", &self.size)?;
        state.end()
    }
}

/// Width and height of an image or video, used for layout before load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u64,
    pub height: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BLOB_CID: &str = "bafkreidbaxlmy5vpiabsl2knlcgoken6lp63w45ug7ofd3fehel5pjb6hu";

    #[test]
    fn serializes_with_blob_type() {
        let blob = Blob::new(Cid::new(BLOB_CID).unwrap(), "image/jpeg", 1024);
        assert_eq!(
            serde_json::to_value(&blob).unwrap(),
            json!({
                "$type": "blob",
                "ref": {"$link": BLOB_CID},
                "mimeType": "image/jpeg",
                "size": 1024
            })
        );
    }

    #[test]
    fn rejects_invalid_link() {
        let result = serde_json::from_value::<Blob>(json!({
            "$type": "blob",
            "ref": {"$link": "nope"},
            "mimeType": "image/jpeg",
            "size": 1
        }));
        assert!(result.is_err());
    }
}
