//! Unverified JWT claim reading.
//!
//! Session tokens are issued by the PDS this client just authenticated
//! against. Only the payload segment is decoded to learn the expiry; the
//! signature, issuer and audience are not checked.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Number;

use crate::Result;
use crate::error::InvalidInputError;

/// Claims read from a session token's payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Expiry, seconds since the Unix epoch. Fractional values are truncated.
    #[serde(default, deserialize_with = "numeric_date")]
    pub exp: Option<i64>,
    /// Issued-at, seconds since the Unix epoch.
    #[serde(default, deserialize_with = "numeric_date")]
    pub iat: Option<i64>,
    /// Subject; the account DID for PDS-issued tokens.
    #[serde(default)]
    pub sub: Option<String>,
    /// Token scope, e.g. `com.atproto.refresh`.
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenClaims {
    /// Decode the payload of a three-part `header.payload.signature` token.
    pub fn read(token: &str) -> Result<Self> {
        let invalid = |reason: String| InvalidInputError::Token { reason };

        let mut parts = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("expected three dot-separated segments".to_string()).into());
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| invalid(format!("payload is not base64url: {}", e)))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| invalid(format!("payload is not a JSON claim set: {}", e)).into())
    }

    /// Returns the expiry as a timestamp, if the `exp` claim is present
    /// and representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

/// A JWT NumericDate: integer or fractional seconds.
fn numeric_date<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(number
        .as_i64()
        .or_else(|| number.as_f64().map(|secs| secs.trunc() as i64)))
}
