//! Likes, reposts and follows.

use chrono::{DateTime, Utc};
use plume_core::Did;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decoder::{DecodeContext, ShapeError, leaf};
use crate::strong_ref::StrongRef;
use crate::variant::Variant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub subject: StrongRef,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repost {
    pub subject: StrongRef,
    pub created_at: DateTime<Utc>,
}

/// A follow. The subject is an account, not a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub subject: Did,
    pub created_at: DateTime<Utc>,
}

pub(crate) fn decode_like(value: &Value, _: &DecodeContext<'_>) -> Result<Variant, ShapeError> {
    Ok(Variant::Like(leaf(value)?))
}

pub(crate) fn decode_repost(value: &Value, _: &DecodeContext<'_>) -> Result<Variant, ShapeError> {
    Ok(Variant::Repost(leaf(value)?))
}

pub(crate) fn decode_follow(value: &Value, _: &DecodeContext<'_>) -> Result<Variant, ShapeError> {
    Ok(Variant::Follow(leaf(value)?))
}
