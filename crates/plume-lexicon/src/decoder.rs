//! The total decoder.
//!
//! Decoding never fails. Bytes that cannot be parsed, payloads without a
//! usable `$type`, unknown tags, tags in the wrong position, and known tags
//! with a broken shape all come back as [`Variant::Unrecognized`] carrying
//! the original payload and the reason.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::envelope::{self, EnvelopeError, TYPE_FIELD};
use crate::registry::{Registry, Slot};
use crate::variant::{Unrecognized, UnrecognizedReason, Variant};

/// Default limit on envelope nesting.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecodeOptions {
    /// Nested envelopes deeper than this decode to
    /// [`UnrecognizedReason::DepthExceeded`].
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Decodes envelopes through a [`Registry`].
///
/// Cheap to copy, stateless, and safe to share between threads.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    registry: &'static Registry,
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(registry: &'static Registry) -> Self {
        Self {
            registry,
            options: DecodeOptions::default(),
        }
    }

    /// A decoder over the standard registry with default options.
    pub fn standard() -> Self {
        Self::new(Registry::standard())
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode JSON bytes.
    pub fn decode_json(&self, bytes: &[u8]) -> Variant {
        match envelope::from_json(bytes) {
            Ok(value) => self.decode_value(&value),
            Err(e) => malformed(bytes, e),
        }
    }

    /// Decode DAG-CBOR bytes.
    pub fn decode_cbor(&self, bytes: &[u8]) -> Variant {
        match envelope::from_cbor(bytes) {
            Ok(value) => self.decode_value(&value),
            Err(e) => malformed(bytes, e),
        }
    }

    /// Decode an already parsed envelope at the top level.
    pub fn decode_value(&self, value: &Value) -> Variant {
        self.decode_in(value, Slot::Any)
    }

    /// Decode an envelope as if it appeared in `slot`.
    pub fn decode_in(&self, value: &Value, slot: Slot) -> Variant {
        self.dispatch(value, slot, None, 0)
    }

    fn dispatch(
        &self,
        value: &Value,
        slot: Slot,
        implied: Option<&'static str>,
        depth: usize,
    ) -> Variant {
        if depth > self.options.max_depth {
            debug!(depth, max_depth = self.options.max_depth, "Envelope nested too deep");
            return unrecognized(
                envelope::tag_of(value),
                UnrecognizedReason::DepthExceeded,
                value,
            );
        }

        let Some(object) = value.as_object() else {
            return unrecognized(None, UnrecognizedReason::NotAnObject, value);
        };

        let tag = match (object.get(TYPE_FIELD), implied) {
            (Some(Value::String(tag)), _) => tag.as_str(),
            (None, Some(implied)) => implied,
            _ => return unrecognized(None, UnrecognizedReason::MissingTag, value),
        };

        let Some(entry) = self.registry.lookup(tag) else {
            debug!(tag, %slot, "Unknown $type");
            return unrecognized(Some(tag), UnrecognizedReason::UnknownTag, value);
        };

        if !entry.allows(slot) {
            debug!(tag, %slot, "$type not allowed here");
            return unrecognized(Some(tag), UnrecognizedReason::NotAllowed(slot), value);
        }

        let cx = DecodeContext {
            decoder: self,
            depth,
        };
        match (entry.decode)(value, &cx) {
            Ok(variant) => variant,
            Err(e) => {
                debug!(tag, error = %e, "Invalid shape");
                unrecognized(Some(tag), UnrecognizedReason::InvalidShape(e.to_string()), value)
            }
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::standard()
    }
}

/// Decode JSON bytes with the standard decoder.
pub fn decode(bytes: &[u8]) -> Variant {
    Decoder::standard().decode_json(bytes)
}

/// Decode DAG-CBOR bytes with the standard decoder.
pub fn decode_cbor(bytes: &[u8]) -> Variant {
    Decoder::standard().decode_cbor(bytes)
}

fn unrecognized(tag: Option<&str>, reason: UnrecognizedReason, value: &Value) -> Variant {
    Variant::Unrecognized(Unrecognized::new(
        tag.map(str::to_owned),
        reason,
        value.clone(),
    ))
}

fn malformed(bytes: &[u8], error: EnvelopeError) -> Variant {
    debug!(error = %error, len = bytes.len(), "Malformed payload");
    Variant::Unrecognized(Unrecognized::new(
        None,
        UnrecognizedReason::Malformed(error.to_string()),
        envelope::bytes_payload(bytes),
    ))
}

/// State handed to decode functions so composites can recurse.
pub(crate) struct DecodeContext<'a> {
    decoder: &'a Decoder,
    depth: usize,
}

impl DecodeContext<'_> {
    /// Decode a nested envelope restricted to `slot`.
    pub(crate) fn nested(&self, value: &Value, slot: Slot) -> Variant {
        self.decoder.dispatch(value, slot, None, self.depth + 1)
    }

    /// Like [`nested`](Self::nested), but an object without `$type` is
    /// decoded as `implied`.
    pub(crate) fn nested_as(&self, value: &Value, slot: Slot, implied: &'static str) -> Variant {
        self.decoder
            .dispatch(value, slot, Some(implied), self.depth + 1)
    }
}

/// Why a known tag failed to decode.
#[derive(Debug, Error)]
pub(crate) enum ShapeError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error(transparent)]
    Invalid(#[from] serde_json::Error),
}

/// Fetch a required, non-null field.
pub(crate) fn require<'v>(value: &'v Value, field: &'static str) -> Result<&'v Value, ShapeError> {
    value
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or(ShapeError::MissingField(field))
}

/// Deserialize a shape with no nested envelopes.
pub(crate) fn leaf<T: DeserializeOwned>(value: &Value) -> Result<T, ShapeError> {
    Ok(T::deserialize(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reason(variant: &Variant) -> &UnrecognizedReason {
        variant.as_unrecognized().expect("unrecognized").reason()
    }

    #[test]
    fn not_an_object() {
        let variant = Decoder::standard().decode_value(&json!([1, 2, 3]));
        assert_eq!(reason(&variant), &UnrecognizedReason::NotAnObject);
        assert_eq!(variant.to_value().unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn non_string_tag_is_missing() {
        let variant = Decoder::standard().decode_value(&json!({"$type": 42}));
        assert_eq!(reason(&variant), &UnrecognizedReason::MissingTag);
        assert_eq!(variant.tag(), None);
    }

    #[test]
    fn malformed_bytes_keep_original() {
        let variant = decode(b"{\"$type\": ");
        let unrecognized = variant.as_unrecognized().unwrap();
        assert!(matches!(unrecognized.reason(), UnrecognizedReason::Malformed(_)));
        assert_eq!(unrecognized.tag(), None);
        assert_eq!(unrecognized.payload(), &envelope::bytes_payload(b"{\"$type\": "));
    }

    #[test]
    fn empty_input_is_malformed() {
        assert!(matches!(reason(&decode(b"")), UnrecognizedReason::Malformed(_)));
    }

    #[test]
    fn wrong_slot_is_not_allowed() {
        let post = json!({"$type": "app.bsky.feed.post", "text": "hi", "createdAt": "2024-01-01T00:00:00Z"});
        let variant = Decoder::standard().decode_in(&post, Slot::Media);
        assert_eq!(reason(&variant), &UnrecognizedReason::NotAllowed(Slot::Media));
        assert_eq!(variant.tag(), Some("app.bsky.feed.post"));
    }

    #[test]
    fn zero_depth_still_decodes_leaves() {
        let decoder = Decoder::standard().with_options(DecodeOptions { max_depth: 0 });
        let like = json!({
            "$type": "app.bsky.feed.like",
            "subject": {
                "uri": "at://did:plc:abc/app.bsky.feed.post/3k",
                "cid": "bafyreiao6dcjaspidyacksbr66qomo2wqpweituindrdqp3n3tb2t66wti"
            },
            "createdAt": "2024-01-01T00:00:00Z"
        });
        assert!(matches!(decoder.decode_value(&like), Variant::Like(_)));
    }

    #[test]
    fn default_options() {
        assert_eq!(DecodeOptions::default().max_depth, DEFAULT_MAX_DEPTH);
        let options: DecodeOptions = serde_json::from_value(json!({"maxDepth": 4})).unwrap();
        assert_eq!(options.max_depth, 4);
    }

    #[test]
    fn require_treats_null_as_missing() {
        let value = json!({"a": null, "b": 1});
        assert!(matches!(require(&value, "a"), Err(ShapeError::MissingField("a"))));
        assert!(matches!(require(&value, "c"), Err(ShapeError::MissingField("c"))));
        assert_eq!(require(&value, "b").unwrap(), &json!(1));
    }
}
