//! The decoded variant union.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::decoder::Decoder;
use crate::embed::{
    ExternalEmbed, ExternalView, ImagesEmbed, ImagesView, RecordEmbed, RecordView,
    RecordWithMedia, RecordWithMediaView, ViewBlocked, ViewNotFound, ViewRecord,
};
use crate::record::{Follow, Like, Post, Repost};
use crate::registry::Slot;
use crate::tags;

/// A decoded record or embed.
///
/// Every known `$type` has its own member. Anything else decodes to
/// [`Variant::Unrecognized`], which keeps the original payload, so new
/// protocol types pass through this client without being lost.
///
/// Serializing a variant writes `$type` first, then the shape's fields in
/// lowerCamelCase with empty optional fields omitted. An unrecognized
/// variant re-emits its payload unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Images(ImagesEmbed),
    ImagesView(ImagesView),
    External(ExternalEmbed),
    ExternalView(ExternalView),
    Record(RecordEmbed),
    RecordView(RecordView),
    ViewRecord(ViewRecord),
    ViewNotFound(ViewNotFound),
    ViewBlocked(ViewBlocked),
    RecordWithMedia(RecordWithMedia),
    RecordWithMediaView(RecordWithMediaView),
    Post(Post),
    Like(Like),
    Repost(Repost),
    Follow(Follow),
    Unrecognized(Unrecognized),
}

impl Variant {
    /// Returns the `$type` tag, if known.
    ///
    /// Unrecognized payloads report the tag they carried, which is `None`
    /// when the payload had no string `$type`.
    pub fn tag(&self) -> Option<&str> {
        let tag = match self {
            Variant::Images(_) => tags::IMAGES,
            Variant::ImagesView(_) => tags::IMAGES_VIEW,
            Variant::External(_) => tags::EXTERNAL,
            Variant::ExternalView(_) => tags::EXTERNAL_VIEW,
            Variant::Record(_) => tags::RECORD,
            Variant::RecordView(_) => tags::RECORD_VIEW,
            Variant::ViewRecord(_) => tags::VIEW_RECORD,
            Variant::ViewNotFound(_) => tags::VIEW_NOT_FOUND,
            Variant::ViewBlocked(_) => tags::VIEW_BLOCKED,
            Variant::RecordWithMedia(_) => tags::RECORD_WITH_MEDIA,
            Variant::RecordWithMediaView(_) => tags::RECORD_WITH_MEDIA_VIEW,
            Variant::Post(_) => tags::POST,
            Variant::Like(_) => tags::LIKE,
            Variant::Repost(_) => tags::REPOST,
            Variant::Follow(_) => tags::FOLLOW,
            Variant::Unrecognized(u) => return u.tag(),
        };
        Some(tag)
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Variant::Unrecognized(_))
    }

    pub fn as_unrecognized(&self) -> Option<&Unrecognized> {
        match self {
            Variant::Unrecognized(u) => Some(u),
            _ => None,
        }
    }

    /// Encode into the JSON data model.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Encode as JSON bytes.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    #[serde(rename = "$type")]
    tag: &'static str,
    #[serde(flatten)]
    body: &'a T,
}

fn tagged<S, T>(serializer: S, tag: &'static str, body: &T) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    Tagged { tag, body }.serialize(serializer)
}

impl Serialize for Variant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Variant::Images(v) => tagged(serializer, tags::IMAGES, v),
            Variant::ImagesView(v) => tagged(serializer, tags::IMAGES_VIEW, v),
            Variant::External(v) => tagged(serializer, tags::EXTERNAL, v),
            Variant::ExternalView(v) => tagged(serializer, tags::EXTERNAL_VIEW, v),
            Variant::Record(v) => tagged(serializer, tags::RECORD, v),
            Variant::RecordView(v) => tagged(serializer, tags::RECORD_VIEW, v),
            Variant::ViewRecord(v) => tagged(serializer, tags::VIEW_RECORD, v),
            Variant::ViewNotFound(v) => tagged(serializer, tags::VIEW_NOT_FOUND, v),
            Variant::ViewBlocked(v) => tagged(serializer, tags::VIEW_BLOCKED, v),
            Variant::RecordWithMedia(v) => tagged(serializer, tags::RECORD_WITH_MEDIA, v),
            Variant::RecordWithMediaView(v) => {
                tagged(serializer, tags::RECORD_WITH_MEDIA_VIEW, v)
            }
            Variant::Post(v) => tagged(serializer, tags::POST, v),
            Variant::Like(v) => tagged(serializer, tags::LIKE, v),
            Variant::Repost(v) => tagged(serializer, tags::REPOST, v),
            Variant::Follow(v) => tagged(serializer, tags::FOLLOW, v),
            Variant::Unrecognized(u) => u.payload.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Variant {
    /// Deserializes through the standard decoder, so this never fails once
    /// the input is a well-formed value.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Decoder::standard().decode_value(&value))
    }
}

/// A payload the decoder could not map onto a known shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Unrecognized {
    tag: Option<String>,
    reason: UnrecognizedReason,
    payload: Value,
}

impl Unrecognized {
    pub fn new(tag: Option<String>, reason: UnrecognizedReason, payload: Value) -> Self {
        Self {
            tag,
            reason,
            payload,
        }
    }

    /// The `$type` the payload carried, if it had a string one.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn reason(&self) -> &UnrecognizedReason {
        &self.reason
    }

    /// The original payload, verbatim.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }
}

/// Why a payload decoded to [`Variant::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnrecognizedReason {
    /// The tag is not in the registry.
    UnknownTag,
    /// The object has no string `$type` field.
    MissingTag,
    /// The payload is not an object.
    NotAnObject,
    /// The bytes could not be parsed at all.
    Malformed(String),
    /// The tag is known but a required field is missing or malformed.
    InvalidShape(String),
    /// The tag is known but not permitted at this position.
    NotAllowed(Slot),
    /// Nesting went deeper than the decoder allows.
    DepthExceeded,
}

impl fmt::Display for UnrecognizedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnrecognizedReason::UnknownTag => write!(f, "unknown $type"),
            UnrecognizedReason::MissingTag => write!(f, "missing $type"),
            UnrecognizedReason::NotAnObject => write!(f, "payload is not an object"),
            UnrecognizedReason::Malformed(msg) => write!(f, "malformed payload: {}", msg),
            UnrecognizedReason::InvalidShape(msg) => write!(f, "invalid shape: {}", msg),
            UnrecognizedReason::NotAllowed(slot) => write!(f, "type not allowed in {}", slot),
            UnrecognizedReason::DepthExceeded => write!(f, "nesting too deep"),
        }
    }
}
