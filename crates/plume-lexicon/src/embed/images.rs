//! `app.bsky.embed.images`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blob::{AspectRatio, Blob};
use crate::decoder::{DecodeContext, ShapeError, leaf};
use crate::variant::Variant;

/// An image attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Alt text. Empty when the author gave none.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alt: String,
    pub image: Blob,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesEmbed {
    pub images: Vec<Image>,
}

/// A hydrated image with CDN URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewImage {
    pub thumb: String,
    pub fullsize: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesView {
    pub images: Vec<ViewImage>,
}

pub(crate) fn decode_images(value: &Value, _: &DecodeContext<'_>) -> Result<Variant, ShapeError> {
    Ok(Variant::Images(leaf(value)?))
}

pub(crate) fn decode_images_view(
    value: &Value,
    _: &DecodeContext<'_>,
) -> Result<Variant, ShapeError> {
    Ok(Variant::ImagesView(leaf(value)?))
}
