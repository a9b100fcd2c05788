//! plume-xrpc - XRPC transport for the plume client.
//!
//! [`XrpcClient`] speaks HTTP to a PDS. It implements
//! [`SessionService`](plume_core::SessionService) so a session manager can
//! log in and renew through it, and it fetches records straight into decoded
//! [`Variant`](plume_lexicon::Variant)s.

mod client;
pub mod endpoints;

pub use client::XrpcClient;
pub use endpoints::{RecordOutput, SessionInfo};
