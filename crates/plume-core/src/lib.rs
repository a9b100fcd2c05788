//! plume-core - Core AT Protocol types for the plume client.
//!
//! Identifier types validate at construction, so a [`Did`], [`Handle`],
//! [`AtUri`] or [`Cid`] value is always well formed. The [`Session`] snapshot
//! and the [`SessionService`] trait are the seam between the session manager
//! and whatever transport talks to the PDS.
//!
//! # Example
//!
//! ```
//! use plume_core::{AtUri, Did};
//!
//! let did = Did::new("did:plc:abc123").unwrap();
//! assert_eq!(did.method(), "plc");
//! assert!(Did::new("not-a-did").is_err());
//!
//! let uri = AtUri::new("at://alice.bsky.social/app.bsky.feed.post/3jui7kd54zh2y").unwrap();
//! assert_eq!(uri.collection().unwrap().as_str(), "app.bsky.feed.post");
//! ```

pub mod auth;
pub mod error;
pub mod traits;
pub mod types;

pub use auth::{AccessToken, Credentials, RefreshToken, Session, TokenClaims};
pub use error::Error;
pub use traits::SessionService;
pub use types::{AtIdentifier, AtUri, Cid, Did, Handle, Nsid, PdsUrl, Rkey};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
