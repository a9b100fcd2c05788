//! Repository record shapes (`app.bsky.feed.*`, `app.bsky.graph.*`).

pub mod post;
pub mod social;

pub use post::{Post, ReplyRef};
pub use social::{Follow, Like, Repost};
