//! plume-session - Session lifecycle management for the plume client.
//!
//! A [`SessionManager`] owns the current [`Session`](plume_core::Session)
//! snapshot and renews it through a [`SessionService`](plume_core::SessionService).
//! With auto-renew enabled it arms a one-shot background task per session,
//! timed from the refresh token's `exp` claim or from a fixed interval.
//! Concurrent renewal triggers coalesce onto the one already in flight.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use plume_core::{Credentials, SessionService};
//! use plume_session::{SessionConfig, SessionManager};
//!
//! # async fn example(service: Arc<dyn SessionService>) -> plume_core::Result<()> {
//! let config = SessionConfig::new().with_auto_renew(true);
//! let manager = SessionManager::new(service, config);
//!
//! manager.login(&Credentials::new("alice.bsky.social", "app-password")).await?;
//! assert!(manager.is_authenticated());
//! println!("renewing in {:?}", manager.next_renewal_delay());
//!
//! manager.dispose();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod manager;
pub mod schedule;

pub use config::SessionConfig;
pub use manager::{RefreshOutcome, SessionManager, SessionState};
pub use schedule::{MAX_RENEWAL_DELAY, renewal_delay};
