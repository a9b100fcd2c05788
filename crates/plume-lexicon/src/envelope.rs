//! Readers that turn wire bytes into the raw envelope tree.
//!
//! Both JSON and DAG-CBOR inputs end up in the JSON data model used by the
//! protocol: CID links become `{"$link": "<cid>"}` and byte strings become
//! `{"$bytes": "<base64>"}`. Decode functions only ever see that tree.

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use ipld_core::ipld::Ipld;
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// The discriminator field carried by every self-describing payload.
pub const TYPE_FIELD: &str = "$type";

/// Failure to parse wire bytes into an envelope tree.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid DAG-CBOR: {0}")]
    Cbor(String),
}

/// Parse JSON bytes.
pub fn from_json(bytes: &[u8]) -> Result<Value, EnvelopeError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Parse DAG-CBOR bytes into the JSON data model.
pub fn from_cbor(bytes: &[u8]) -> Result<Value, EnvelopeError> {
    let ipld: Ipld =
        serde_ipld_dagcbor::from_slice(bytes).map_err(|e| EnvelopeError::Cbor(e.to_string()))?;
    Ok(ipld_to_json(ipld))
}

/// Wrap bytes that could not be parsed so they survive inside a payload.
pub fn bytes_payload(bytes: &[u8]) -> Value {
    let mut map = Map::new();
    map.insert(
        "$bytes".to_string(),
        Value::String(STANDARD_NO_PAD.encode(bytes)),
    );
    Value::Object(map)
}

/// Returns the `$type` of an envelope, if it is an object with a string tag.
pub fn tag_of(value: &Value) -> Option<&str> {
    value.get(TYPE_FIELD).and_then(Value::as_str)
}

fn ipld_to_json(ipld: Ipld) -> Value {
    match ipld {
        Ipld::Null => Value::Null,
        Ipld::Bool(b) => Value::Bool(b),
        Ipld::Integer(i) => i64::try_from(i)
            .map(Value::from)
            .or_else(|_| u64::try_from(i).map(Value::from))
            .unwrap_or_else(|_| Value::String(i.to_string())),
        Ipld::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        Ipld::String(s) => Value::String(s),
        Ipld::Bytes(bytes) => bytes_payload(&bytes),
        Ipld::List(items) => Value::Array(items.into_iter().map(ipld_to_json).collect()),
        Ipld::Map(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, ipld_to_json(value)))
                .collect(),
        ),
        Ipld::Link(cid) => {
            let mut map = Map::new();
            map.insert("$link".to_string(), Value::String(cid.to_string()));
            Value::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipld_core::cid::Cid;
    use serde_json::json;
    use std::collections::BTreeMap;

    const BLOB_CID: &str = "bafkreidbaxlmy5vpiabsl2knlcgoken6lp63w45ug7ofd3fehel5pjb6hu";

    #[test]
    fn json_object() {
        let value = from_json(br#"{"$type":"app.bsky.feed.like"}"#).unwrap();
        assert_eq!(tag_of(&value), Some("app.bsky.feed.like"));
    }

    #[test]
    fn json_garbage_is_an_error() {
        assert!(matches!(from_json(b"{not json"), Err(EnvelopeError::Json(_))));
    }

    #[test]
    fn non_string_tag_has_no_tag() {
        assert_eq!(tag_of(&json!({"$type": 7})), None);
        assert_eq!(tag_of(&json!([1, 2])), None);
    }

    #[test]
    fn cbor_links_and_bytes_use_json_data_model() {
        let cid = Cid::try_from(BLOB_CID).unwrap();
        let mut blob = BTreeMap::new();
        blob.insert("$type".to_string(), Ipld::String("blob".to_string()));
        blob.insert("ref".to_string(), Ipld::Link(cid));
        blob.insert("mimeType".to_string(), Ipld::String("image/png".to_string()));
        blob.insert("size".to_string(), Ipld::Integer(42));
        blob.insert("sig".to_string(), Ipld::Bytes(vec![1, 2, 3]));

        let bytes = serde_ipld_dagcbor::to_vec(&Ipld::Map(blob)).unwrap();
        let value = from_cbor(&bytes).unwrap();

        assert_eq!(
            value,
            json!({
                "$type": "blob",
                "ref": {"$link": BLOB_CID},
                "mimeType": "image/png",
                "size": 42,
                "sig": {"$bytes": "AQID"}
            })
        );
    }

    #[test]
    fn cbor_garbage_is_an_error() {
        assert!(matches!(from_cbor(&[0xff, 0x00]), Err(EnvelopeError::Cbor(_))));
    }

    #[test]
    fn bytes_payload_preserves_input() {
        let payload = bytes_payload(b"\x00\x01hello");
        let encoded = payload["$bytes"].as_str().unwrap();
        assert_eq!(STANDARD_NO_PAD.decode(encoded).unwrap(), b"\x00\x01hello");
    }
}
