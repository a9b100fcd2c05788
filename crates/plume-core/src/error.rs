//! Error types for plume.
//!
//! One unified error type with explicit variants for transport,
//! authentication, protocol, and input validation failures. Decoding
//! record payloads never produces one of these; unknown or malformed
//! payloads become an unrecognized variant instead.

use std::fmt;
use thiserror::Error;

/// The unified error type for plume operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (no session, expired or rejected tokens).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Protocol errors (XRPC errors, unexpected responses).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (invalid DID, handle, URI, CID, token).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if the server rejected the request's credentials.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::Auth(_) => true,
            Error::Protocol(e) => e.is_auth_error(),
            _ => false,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be read or parsed.
    #[error("invalid response body: {message}")]
    Body { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No session is installed.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The session manager has been disposed.
    #[error("session manager disposed")]
    Disposed,

    /// Refresh token is invalid or expired.
    #[error("refresh token invalid")]
    RefreshTokenInvalid,

    /// Account is suspended or deactivated.
    #[error("account unavailable: {reason}")]
    AccountUnavailable { reason: String },
}

/// Protocol-level errors from XRPC responses.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// XRPC error code (if present).
    pub error: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
            || self.error.as_deref() == Some("AuthenticationRequired")
            || self.error.as_deref() == Some("ExpiredToken")
            || self.error.as_deref() == Some("InvalidToken")
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid DID format.
    #[error("invalid DID '{value}': {reason}")]
    Did { value: String, reason: String },

    /// Invalid handle format.
    #[error("invalid handle '{value}': {reason}")]
    Handle { value: String, reason: String },

    /// Invalid NSID format.
    #[error("invalid NSID '{value}': {reason}")]
    Nsid { value: String, reason: String },

    /// Invalid AT URI format.
    #[error("invalid AT URI '{value}': {reason}")]
    AtUri { value: String, reason: String },

    /// Invalid PDS URL format.
    #[error("invalid PDS URL '{value}': {reason}")]
    PdsUrl { value: String, reason: String },

    /// Invalid record key format.
    #[error("invalid rkey '{value}': {reason}")]
    Rkey { value: String, reason: String },

    /// Invalid CID format.
    #[error("invalid CID '{value}': {reason}")]
    Cid { value: String, reason: String },

    /// A token whose claims could not be read. The token itself is never
    /// included in the message.
    #[error("invalid token: {reason}")]
    Token { reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
