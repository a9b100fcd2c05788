//! Authentication primitives: credentials, tokens, and session snapshots.
//!
//! A [`Session`] is an immutable snapshot of the credential set issued by a
//! PDS. The session manager owns the live value and hands out clones.

mod claims;
mod credentials;
mod session;
mod tokens;

pub use claims::TokenClaims;
pub use credentials::Credentials;
pub use session::Session;
pub use tokens::{AccessToken, RefreshToken};
