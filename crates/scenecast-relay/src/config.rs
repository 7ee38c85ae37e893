//! Relay tuning knobs.

use std::time::Duration;

use serde::Deserialize;

/// Timing parameters of a job watch.
///
/// Defaults mirror the generation service's own expectations: the service
/// emits a progress frame at least every few seconds while a job is alive, so
/// a stream quiet for the full staleness window is treated as unhealthy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// WebSocket connect budget before degrading to polling.
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,
    /// Interval between client heartbeat pings on the stream.
    #[serde(with = "duration_secs")]
    pub heartbeat_interval: Duration,
    /// Stream silence tolerated before the poll loop is engaged in parallel.
    #[serde(with = "duration_secs")]
    pub staleness_window: Duration,
    /// Fixed poll interval. No jitter: a single watcher per job cannot
    /// thundering-herd the service.
    #[serde(with = "duration_secs")]
    pub poll_interval: Duration,
    /// Poll attempts before the watch gives up with a timeout event.
    pub max_poll_attempts: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            heartbeat_interval: Duration::from_secs(20),
            staleness_window: Duration::from_secs(8),
            poll_interval: Duration::from_secs(3),
            max_poll_attempts: 300,
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}
