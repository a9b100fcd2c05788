//! `app.bsky.embed.external`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blob::Blob;
use crate::decoder::{DecodeContext, ShapeError, leaf};
use crate::variant::Variant;

/// A link card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct External {
    pub uri: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<Blob>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalEmbed {
    pub external: External,
}

/// A hydrated link card. The thumbnail is a URL rather than a blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewExternal {
    pub uri: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalView {
    pub external: ViewExternal,
}

pub(crate) fn decode_external(
    value: &Value,
    _: &DecodeContext<'_>,
) -> Result<Variant, ShapeError> {
    Ok(Variant::External(leaf(value)?))
}

pub(crate) fn decode_external_view(
    value: &Value,
    _: &DecodeContext<'_>,
) -> Result<Variant, ShapeError> {
    Ok(Variant::ExternalView(leaf(value)?))
}
