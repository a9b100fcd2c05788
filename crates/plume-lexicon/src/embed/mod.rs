//! Embed shapes (`app.bsky.embed.*`) and their hydrated `#view` forms.
//!
//! Embeds are what a post attaches: images, a link card, a quoted record, or
//! a quoted record together with media. Views are what an AppView returns
//! after resolving those references.

pub mod external;
pub mod images;
pub mod record;
pub mod record_with_media;

pub use external::{External, ExternalEmbed, ExternalView, ViewExternal};
pub use images::{Image, ImagesEmbed, ImagesView, ViewImage};
pub use record::{
    BlockedAuthor, ProfileViewBasic, RecordEmbed, RecordView, ViewBlocked, ViewNotFound,
    ViewRecord,
};
pub use record_with_media::{RecordWithMedia, RecordWithMediaView};
