//! plume-lexicon - Decoding of self-describing AT Protocol payloads.
//!
//! Records and embeds carry a `$type` tag that picks their concrete shape at
//! runtime. This crate maps tags to decode functions through a [`Registry`]
//! built once per process, and decodes through a total [`Decoder`]: unknown
//! or malformed payloads become [`Variant::Unrecognized`] instead of errors,
//! keeping the original payload so it can be re-emitted.
//!
//! # Example
//!
//! ```
//! use plume_lexicon::{Variant, decode};
//!
//! let json = br#"{"$type":"app.bsky.embed.external#view","external":{"uri":"https://a","title":"T","description":"D"}}"#;
//! match decode(json) {
//!     Variant::ExternalView(view) => assert_eq!(view.external.title, "T"),
//!     other => panic!("unexpected {:?}", other),
//! }
//!
//! let unknown = decode(br#"{"$type":"app.bsky.embed.foo"}"#);
//! assert_eq!(unknown.tag(), Some("app.bsky.embed.foo"));
//! assert!(unknown.is_unrecognized());
//! ```

pub mod blob;
pub mod decoder;
pub mod embed;
pub mod envelope;
pub mod record;
pub mod registry;
pub mod strong_ref;
pub mod tags;
pub mod variant;

pub use blob::{AspectRatio, Blob, CidLink};
pub use decoder::{DecodeOptions, Decoder, decode, decode_cbor};
pub use envelope::EnvelopeError;
pub use registry::{Registry, Slot};
pub use strong_ref::StrongRef;
pub use variant::{Unrecognized, UnrecognizedReason, Variant};
