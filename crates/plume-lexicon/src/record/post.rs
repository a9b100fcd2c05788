//! `app.bsky.feed.post`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decoder::{DecodeContext, ShapeError, leaf};
use crate::registry::Slot;
use crate::strong_ref::StrongRef;
use crate::variant::Variant;

/// A post.
///
/// `facets` are kept as raw values; they are rich-text annotations that this
/// crate does not interpret.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Box<Variant>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplyRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub langs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Post {
    pub fn new(text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            created_at,
            embed: None,
            reply: None,
            langs: Vec::new(),
            facets: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_embed(mut self, embed: Variant) -> Self {
        self.embed = Some(Box::new(embed));
        self
    }

    pub fn is_reply(&self) -> bool {
        self.reply.is_some()
    }
}

/// Thread position of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRef {
    pub root: StrongRef,
    pub parent: StrongRef,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPost {
    text: String,
    created_at: DateTime<Utc>,
    embed: Option<Value>,
    reply: Option<ReplyRef>,
    #[serde(default)]
    langs: Vec<String>,
    #[serde(default)]
    facets: Vec<Value>,
    #[serde(default)]
    tags: Vec<String>,
}

pub(crate) fn decode_post(value: &Value, cx: &DecodeContext<'_>) -> Result<Variant, ShapeError> {
    let raw: RawPost = leaf(value)?;
    Ok(Variant::Post(Post {
        text: raw.text,
        created_at: raw.created_at,
        embed: raw
            .embed
            .map(|embed| Box::new(cx.nested(&embed, Slot::Embed))),
        reply: raw.reply,
        langs: raw.langs,
        facets: raw.facets,
        tags: raw.tags,
    }))
}
