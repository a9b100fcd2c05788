//! `app.bsky.embed.recordWithMedia`

use serde::Serialize;
use serde_json::Value;

use crate::decoder::{DecodeContext, ShapeError, require};
use crate::registry::Slot;
use crate::tags;
use crate::variant::Variant;

/// A quoted record plus images or a link card.
///
/// Each member decodes on its own: unknown media leaves the quote intact.
/// `record` is referenced by schema rather than by union, so it may arrive
/// without a `$type` and is then read as `app.bsky.embed.record`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordWithMedia {
    pub record: Box<Variant>,
    pub media: Box<Variant>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordWithMediaView {
    pub record: Box<Variant>,
    pub media: Box<Variant>,
}

pub(crate) fn decode_record_with_media(
    value: &Value,
    cx: &DecodeContext<'_>,
) -> Result<Variant, ShapeError> {
    let record = require(value, "record")?;
    let media = require(value, "media")?;
    Ok(Variant::RecordWithMedia(RecordWithMedia {
        record: Box::new(cx.nested_as(record, Slot::RecordRef, tags::RECORD)),
        media: Box::new(cx.nested(media, Slot::Media)),
    }))
}

pub(crate) fn decode_record_with_media_view(
    value: &Value,
    cx: &DecodeContext<'_>,
) -> Result<Variant, ShapeError> {
    let record = require(value, "record")?;
    let media = require(value, "media")?;
    Ok(Variant::RecordWithMediaView(RecordWithMediaView {
        record: Box::new(cx.nested_as(record, Slot::RecordRefView, tags::RECORD_VIEW)),
        media: Box::new(cx.nested(media, Slot::MediaView)),
    }))
}
