//! The process-wide table of known `$type` tags.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::decoder::{DecodeContext, ShapeError};
use crate::embed::{external, images, record, record_with_media};
use crate::record::{post, social};
use crate::tags;
use crate::variant::Variant;

/// Signature shared by every decode function in the table.
pub(crate) type DecodeFn = fn(&Value, &DecodeContext<'_>) -> Result<Variant, ShapeError>;

/// A nesting position that restricts which tags may appear there.
///
/// A known tag found in a slot that does not list it decodes to
/// [`UnrecognizedReason::NotAllowed`](crate::UnrecognizedReason::NotAllowed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    /// Top level. Every registered tag is allowed.
    Any,
    /// `embed` of a post.
    Embed,
    /// `embeds[]` of a `viewRecord`.
    EmbedView,
    /// `media` of `recordWithMedia`.
    Media,
    /// `media` of `recordWithMedia#view`.
    MediaView,
    /// `record` of `recordWithMedia`.
    RecordRef,
    /// `record` of `recordWithMedia#view`.
    RecordRefView,
    /// `record` of `record#view`.
    RecordViewItem,
    /// `value` of a `viewRecord`.
    Record,
}

impl Slot {
    /// Every slot below the top level.
    pub const NESTED: &'static [Slot] = &[
        Slot::Embed,
        Slot::EmbedView,
        Slot::Media,
        Slot::MediaView,
        Slot::RecordRef,
        Slot::RecordRefView,
        Slot::RecordViewItem,
        Slot::Record,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Any => "any",
            Slot::Embed => "embed",
            Slot::EmbedView => "embedView",
            Slot::Media => "media",
            Slot::MediaView => "mediaView",
            Slot::RecordRef => "recordRef",
            Slot::RecordRefView => "recordRefView",
            Slot::RecordViewItem => "recordViewItem",
            Slot::Record => "record",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the table.
#[derive(Clone, Copy)]
pub(crate) struct Entry {
    pub(crate) tag: &'static str,
    pub(crate) decode: DecodeFn,
    slots: &'static [Slot],
}

impl Entry {
    pub(crate) fn allows(&self, slot: Slot) -> bool {
        slot == Slot::Any || self.slots.contains(&slot)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("tag", &self.tag)
            .field("slots", &self.slots)
            .finish()
    }
}

// Adding a type means adding a row here.
const TABLE: &[(&str, DecodeFn, &[Slot])] = &[
    (tags::IMAGES, images::decode_images, &[Slot::Embed, Slot::Media]),
    (tags::IMAGES_VIEW, images::decode_images_view, &[Slot::EmbedView, Slot::MediaView]),
    (tags::EXTERNAL, external::decode_external, &[Slot::Embed, Slot::Media]),
    (tags::EXTERNAL_VIEW, external::decode_external_view, &[Slot::EmbedView, Slot::MediaView]),
    (tags::RECORD, record::decode_record, &[Slot::Embed, Slot::RecordRef]),
    (tags::RECORD_VIEW, record::decode_record_view, &[Slot::EmbedView, Slot::RecordRefView]),
    (tags::VIEW_RECORD, record::decode_view_record, &[Slot::RecordViewItem]),
    (tags::VIEW_NOT_FOUND, record::decode_view_not_found, &[Slot::RecordViewItem]),
    (tags::VIEW_BLOCKED, record::decode_view_blocked, &[Slot::RecordViewItem]),
    (tags::RECORD_WITH_MEDIA, record_with_media::decode_record_with_media, &[Slot::Embed]),
    (
        tags::RECORD_WITH_MEDIA_VIEW,
        record_with_media::decode_record_with_media_view,
        &[Slot::EmbedView],
    ),
    (tags::POST, post::decode_post, &[Slot::Record]),
    (tags::LIKE, social::decode_like, &[Slot::Record]),
    (tags::REPOST, social::decode_repost, &[Slot::Record]),
    (tags::FOLLOW, social::decode_follow, &[Slot::Record]),
];

static STANDARD: LazyLock<Registry> = LazyLock::new(|| Registry::from_table(TABLE));

/// Maps `$type` tags to decode functions.
///
/// Built once on first use and read-only afterwards, so lookups never lock.
/// A lookup miss is not an error; the decoder turns it into an unrecognized
/// variant.
#[derive(Debug)]
pub struct Registry {
    entries: HashMap<&'static str, Entry>,
}

impl Registry {
    /// The registry of every type this crate knows about.
    pub fn standard() -> &'static Registry {
        &STANDARD
    }

    fn from_table(table: &[(&'static str, DecodeFn, &'static [Slot])]) -> Self {
        let entries = table
            .iter()
            .map(|&(tag, decode, slots)| (tag, Entry { tag, decode, slots }))
            .collect();
        Self { entries }
    }

    pub(crate) fn lookup(&self, tag: &str) -> Option<&Entry> {
        self.entries.get(tag)
    }

    /// Returns true if `tag` is registered. Matching is exact.
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Returns true if `tag` is registered and may appear in `slot`.
    pub fn allows(&self, tag: &str, slot: Slot) -> bool {
        self.lookup(tag).is_some_and(|entry| entry.allows(slot))
    }

    /// All registered tags, sorted.
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.entries.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_has_every_tag() {
        let registry = Registry::standard();
        assert_eq!(registry.len(), 15);
        assert!(registry.contains(tags::RECORD_WITH_MEDIA_VIEW));
        assert!(registry.contains(tags::FOLLOW));
    }

    #[test]
    fn lookup_is_exact() {
        let registry = Registry::standard();
        assert!(!registry.contains("APP.BSKY.EMBED.IMAGES"));
        assert!(!registry.contains(" app.bsky.embed.images"));
        assert!(!registry.contains("app.bsky.embed.images#"));
    }

    #[test]
    fn slots() {
        let registry = Registry::standard();
        assert!(registry.allows(tags::IMAGES, Slot::Media));
        assert!(registry.allows(tags::IMAGES, Slot::Any));
        assert!(!registry.allows(tags::RECORD, Slot::Media));
        assert!(!registry.allows(tags::RECORD_WITH_MEDIA, Slot::Media));
        assert!(registry.allows(tags::VIEW_BLOCKED, Slot::RecordViewItem));
        assert!(!registry.allows(tags::POST, Slot::Embed));
        assert!(!registry.allows("app.bsky.embed.video", Slot::Any));
    }

    #[test]
    fn tags_sorted() {
        let tags = Registry::standard().tags();
        let mut sorted = tags.clone();
        sorted.sort();
        assert_eq!(tags, sorted);
        assert_eq!(tags.first(), Some(&tags::EXTERNAL));
    }

    #[test]
    fn every_tag_has_a_nested_slot() {
        let registry = Registry::standard();
        for tag in registry.tags() {
            assert!(
                Slot::NESTED.iter().any(|&slot| registry.allows(tag, slot)),
                "{} has no slot",
                tag
            );
        }
    }
}
