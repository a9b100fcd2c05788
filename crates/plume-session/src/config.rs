//! Session manager configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for a [`SessionManager`](crate::SessionManager).
///
/// Serializes with the interval in whole seconds:
/// `{"autoRenew": true, "renewalInterval": 300}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Arm a background renewal whenever a session is installed.
    pub auto_renew: bool,

    /// Fixed delay before each renewal. When unset the delay comes from the
    /// refresh token's `exp` claim.
    #[serde(with = "interval_secs", skip_serializing_if = "Option::is_none")]
    pub renewal_interval: Option<Duration>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_renew(mut self, auto_renew: bool) -> Self {
        self.auto_renew = auto_renew;
        self
    }

    pub fn with_renewal_interval(mut self, interval: Duration) -> Self {
        self.renewal_interval = Some(interval);
        self
    }
}

mod interval_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(interval: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match interval {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}
