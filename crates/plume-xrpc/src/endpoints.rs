//! XRPC endpoint definitions and request/response types.

use plume_core::{AtUri, Cid, Did, Handle};
use plume_lexicon::Variant;
use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Names
// ============================================================================

/// com.atproto.server.createSession
pub const CREATE_SESSION: &str = "com.atproto.server.createSession";

/// com.atproto.server.refreshSession
pub const REFRESH_SESSION: &str = "com.atproto.server.refreshSession";

/// com.atproto.server.getSession
pub const GET_SESSION: &str = "com.atproto.server.getSession";

/// com.atproto.repo.getRecord
pub const GET_RECORD: &str = "com.atproto.repo.getRecord";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for createSession.
#[derive(Debug, Serialize)]
pub(crate) struct CreateSessionRequest<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
}

/// Response from getSession.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub did: Did,
    pub handle: Handle,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Query parameters for getRecord.
#[derive(Debug, Serialize)]
pub(crate) struct GetRecordQuery<'a> {
    pub repo: &'a str,
    pub collection: &'a str,
    pub rkey: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<&'a str>,
}

/// A fetched record with its value decoded.
///
/// The value never fails to decode; unknown record types arrive as
/// [`Variant::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordOutput {
    pub uri: AtUri,
    #[serde(default)]
    pub cid: Option<Cid>,
    pub value: Variant,
}

/// XRPC error response body.
#[derive(Debug, Deserialize)]
pub(crate) struct XrpcErrorResponse {
    pub error: Option<String>,
    pub message: Option<String>,
}
