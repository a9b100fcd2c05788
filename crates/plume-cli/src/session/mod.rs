//! Persisted login state.

pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use plume_core::{PdsUrl, Session};
use plume_session::{SessionConfig, SessionManager};
use plume_xrpc::XrpcClient;

pub use storage::SessionStore;

/// A session together with the PDS that issued it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub pds: String,
    #[serde(flatten)]
    pub session: Session,
}

impl StoredSession {
    pub fn new(pds: &PdsUrl, session: Session) -> Self {
        Self {
            pds: pds.to_string(),
            session,
        }
    }

    pub fn pds_url(&self) -> Result<PdsUrl> {
        PdsUrl::new(&self.pds).context("Invalid PDS URL in session")
    }

    pub fn client(&self) -> Result<XrpcClient> {
        XrpcClient::new(self.pds_url()?).context("Failed to create XRPC client")
    }

    /// A manager seeded with this session, renewing against its PDS.
    pub fn manager(&self, config: SessionConfig) -> Result<SessionManager> {
        Ok(SessionManager::with_session(
            Arc::new(self.client()?),
            config,
            self.session.clone(),
        ))
    }
}
