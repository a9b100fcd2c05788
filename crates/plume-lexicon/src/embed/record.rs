//! `app.bsky.embed.record` and the record views it hydrates into.

use chrono::{DateTime, Utc};
use plume_core::{AtUri, Cid, Did, Handle};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decoder::{DecodeContext, ShapeError, leaf, require};
use crate::registry::Slot;
use crate::strong_ref::StrongRef;
use crate::variant::Variant;

/// A quoted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEmbed {
    pub record: StrongRef,
}

/// A hydrated quote. `record` is a `viewRecord`, `viewNotFound` or
/// `viewBlocked`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView {
    pub record: Box<Variant>,
}

/// Minimal author profile attached to views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileViewBasic {
    pub did: Did,
    pub handle: Handle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// The quoted record, resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecord {
    pub uri: AtUri,
    pub cid: Cid,
    pub author: ProfileViewBasic,
    /// The record itself (post, like, ...).
    pub value: Box<Variant>,
    pub indexed_at: DateTime<Utc>,
    /// Embeds of the quoted record, in view form.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Variant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repost_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_count: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawViewRecord {
    uri: AtUri,
    cid: Cid,
    author: ProfileViewBasic,
    value: Value,
    indexed_at: DateTime<Utc>,
    #[serde(default)]
    embeds: Vec<Value>,
    reply_count: Option<u64>,
    repost_count: Option<u64>,
    like_count: Option<u64>,
    quote_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNotFound {
    pub uri: AtUri,
    pub not_found: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedAuthor {
    pub did: Did,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewBlocked {
    pub uri: AtUri,
    pub blocked: bool,
    pub author: BlockedAuthor,
}

pub(crate) fn decode_record(value: &Value, _: &DecodeContext<'_>) -> Result<Variant, ShapeError> {
    Ok(Variant::Record(leaf(value)?))
}

pub(crate) fn decode_record_view(
    value: &Value,
    cx: &DecodeContext<'_>,
) -> Result<Variant, ShapeError> {
    let record = require(value, "record")?;
    Ok(Variant::RecordView(RecordView {
        record: Box::new(cx.nested(record, Slot::RecordViewItem)),
    }))
}

pub(crate) fn decode_view_record(
    value: &Value,
    cx: &DecodeContext<'_>,
) -> Result<Variant, ShapeError> {
    let raw: RawViewRecord = leaf(value)?;
    let embeds = raw
        .embeds
        .iter()
        .map(|embed| cx.nested(embed, Slot::EmbedView))
        .collect();

    Ok(Variant::ViewRecord(ViewRecord {
        uri: raw.uri,
        cid: raw.cid,
        author: raw.author,
        value: Box::new(cx.nested(&raw.value, Slot::Record)),
        indexed_at: raw.indexed_at,
        embeds,
        reply_count: raw.reply_count,
        repost_count: raw.repost_count,
        like_count: raw.like_count,
        quote_count: raw.quote_count,
    }))
}

pub(crate) fn decode_view_not_found(
    value: &Value,
    _: &DecodeContext<'_>,
) -> Result<Variant, ShapeError> {
    Ok(Variant::ViewNotFound(leaf(value)?))
}

pub(crate) fn decode_view_blocked(
    value: &Value,
    _: &DecodeContext<'_>,
) -> Result<Variant, ShapeError> {
    Ok(Variant::ViewBlocked(leaf(value)?))
}
