//! XRPC HTTP client implementation.

use async_trait::async_trait;
use plume_core::error::{InvalidInputError, ProtocolError, TransportError};
use plume_core::{
    AccessToken, AtUri, Credentials, Error, PdsUrl, RefreshToken, Result, Session, SessionService,
};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use crate::endpoints::{
    CREATE_SESSION, CreateSessionRequest, GET_RECORD, GET_SESSION, GetRecordQuery,
    REFRESH_SESSION, RecordOutput, SessionInfo, XrpcErrorResponse,
};

/// HTTP client for XRPC requests against one PDS.
#[derive(Debug, Clone)]
pub struct XrpcClient {
    client: reqwest::Client,
    pds: PdsUrl,
}

impl XrpcClient {
    /// Create a new XRPC client for the given PDS.
    pub fn new(pds: PdsUrl) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("plume/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;

        Ok(Self { client, pds })
    }

    /// Use an existing `reqwest` client (shared pools, custom timeouts).
    pub fn with_client(pds: PdsUrl, client: reqwest::Client) -> Self {
        Self { client, pds }
    }

    /// Returns the PDS URL this client is configured for.
    pub fn pds(&self) -> &PdsUrl {
        &self.pds
    }

    // ========================================================================
    // Repository Operations
    // ========================================================================

    /// Fetch a record and decode its value.
    ///
    /// `uri` must name a record (`at://<repo>/<collection>/<rkey>`).
    /// `authorization` is a full header value (`Bearer <jwt>`), typically
    /// read from the session manager right before the call. Public records
    /// can be read without one.
    #[instrument(skip(self, authorization), fields(pds = %self.pds, %uri))]
    pub async fn get_record(
        &self,
        uri: &AtUri,
        authorization: Option<&str>,
    ) -> Result<RecordOutput> {
        let (Some(collection), Some(rkey)) = (uri.collection(), uri.rkey()) else {
            return Err(InvalidInputError::AtUri {
                value: uri.to_string(),
                reason: "not a record URI".to_string(),
            }
            .into());
        };

        let query = GetRecordQuery {
            repo: uri.authority().as_str(),
            collection: collection.as_str(),
            rkey: rkey.as_str(),
            cid: None,
        };

        let output: RecordOutput = self.query(GET_RECORD, &query, authorization).await?;
        debug!(tag = output.value.tag(), "Record fetched");
        Ok(output)
    }

    /// Describe the session an access token belongs to.
    #[instrument(skip(self, access_token), fields(pds = %self.pds))]
    pub async fn get_session(&self, access_token: &AccessToken) -> Result<SessionInfo> {
        let no_params: [(&str, &str); 0] = [];
        self.query(GET_SESSION, &no_params, Some(&access_token.bearer()))
            .await
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Make an XRPC query (GET request), sending `authorization` verbatim as
    /// the `Authorization` header when given.
    pub async fn query<Q, R>(
        &self,
        method: &str,
        params: &Q,
        authorization: Option<&str>,
    ) -> Result<R>
    where
        Q: Serialize + std::fmt::Debug + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.pds.xrpc_url(method);
        debug!(method, authed = authorization.is_some(), "XRPC query");
        trace!(?params, "query parameters");

        let mut request = self.client.get(&url).query(params);
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, bearer(value)?);
        }

        let response = request.send().await.map_err(transport_error)?;
        self.handle_response(response).await
    }

    /// Make an unauthenticated XRPC procedure (POST request).
    pub async fn procedure<B, R>(&self, method: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.pds.xrpc_url(method);
        debug!(method, "XRPC procedure");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(response).await
    }

    /// Make an XRPC procedure with no request body.
    /// Used for endpoints like refreshSession that take no input.
    async fn procedure_no_body<R>(&self, method: &str, authorization: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.pds.xrpc_url(method);
        debug!(method, "XRPC procedure (no body)");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, bearer(authorization)?)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(response).await
    }

    /// Handle an XRPC response, parsing the body or error.
    async fn handle_response<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "XRPC response");

        if status.is_success() {
            let bytes = response.bytes().await.map_err(transport_error)?;
            serde_json::from_slice(&bytes).map_err(|e| {
                TransportError::Body {
                    message: e.to_string(),
                }
                .into()
            })
        } else {
            Err(Error::Protocol(self.parse_error_response(response).await))
        }
    }

    /// Parse an XRPC error response.
    async fn parse_error_response(&self, response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<XrpcErrorResponse>().await {
            Ok(body) => ProtocolError::new(status, body.error, body.message),
            Err(_) => ProtocolError::new(status, None, None),
        }
    }
}

#[async_trait]
impl SessionService for XrpcClient {
    #[instrument(skip(self, credentials), fields(pds = %self.pds, identifier = %credentials.identifier()))]
    async fn create_session(&self, credentials: &Credentials) -> Result<Session> {
        let request = CreateSessionRequest {
            identifier: credentials.identifier(),
            password: credentials.password(),
        };
        self.procedure(CREATE_SESSION, &request).await
    }

    #[instrument(skip(self, refresh_token), fields(pds = %self.pds))]
    async fn refresh_session(&self, refresh_token: &RefreshToken) -> Result<Session> {
        self.procedure_no_body(REFRESH_SESSION, &refresh_token.bearer())
            .await
    }
}

fn bearer(value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value).map_err(|_| InvalidInputError::Token {
        reason: "token contains characters not allowed in a header".to_string(),
    })?;
    header.set_sensitive(true);
    Ok(header)
}

fn transport_error(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() || err.is_body() {
        TransportError::Body {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    transport.into()
}
