//! `$type` tags understood by the standard registry.

// ============================================================================
// Embeds
// ============================================================================

/// app.bsky.embed.images
pub const IMAGES: &str = "app.bsky.embed.images";

/// app.bsky.embed.images#view
pub const IMAGES_VIEW: &str = "app.bsky.embed.images#view";

/// app.bsky.embed.external
pub const EXTERNAL: &str = "app.bsky.embed.external";

/// app.bsky.embed.external#view
pub const EXTERNAL_VIEW: &str = "app.bsky.embed.external#view";

/// app.bsky.embed.record
pub const RECORD: &str = "app.bsky.embed.record";

/// app.bsky.embed.record#view
pub const RECORD_VIEW: &str = "app.bsky.embed.record#view";

/// app.bsky.embed.record#viewRecord
pub const VIEW_RECORD: &str = "app.bsky.embed.record#viewRecord";

/// app.bsky.embed.record#viewNotFound
pub const VIEW_NOT_FOUND: &str = "app.bsky.embed.record#viewNotFound";

/// app.bsky.embed.record#viewBlocked
pub const VIEW_BLOCKED: &str = "app.bsky.embed.record#viewBlocked";

/// app.bsky.embed.recordWithMedia
pub const RECORD_WITH_MEDIA: &str = "app.bsky.embed.recordWithMedia";

/// app.bsky.embed.recordWithMedia#view
pub const RECORD_WITH_MEDIA_VIEW: &str = "app.bsky.embed.recordWithMedia#view";

// ============================================================================
// Records
// ============================================================================

/// app.bsky.feed.post
pub const POST: &str = "app.bsky.feed.post";

/// app.bsky.feed.like
pub const LIKE: &str = "app.bsky.feed.like";

/// app.bsky.feed.repost
pub const REPOST: &str = "app.bsky.feed.repost";

/// app.bsky.graph.follow
pub const FOLLOW: &str = "app.bsky.graph.follow";
