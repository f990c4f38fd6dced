//! Timing and identity configuration for a sync session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for a [`SyncSession`](crate::SyncSession).
///
/// Every field has a default, so hosts only need to supply the values they
/// want to change. Deserializes from camelCase keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    /// Retry delay while the surface is still expected to appear shortly.
    pub retry_fast_ms: u32,
    /// Number of consecutive failed readiness checks that use the fast delay.
    pub retry_fast_attempts: u32,
    /// Retry delay once the fast attempts are exhausted.
    pub retry_slow_ms: u32,
    /// Delay coalescing event-triggered height recomputes.
    pub height_debounce_ms: u32,
    /// Period of the height heartbeat.
    pub heartbeat_ms: u32,
    /// Prefix for the injected style element's id.
    pub style_id_prefix: String,
    /// Skip content overwrites while the surface reports an IME composition,
    /// retrying once it ends. Off by default.
    pub defer_while_composing: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            retry_fast_ms: 1,
            retry_fast_attempts: 10,
            retry_slow_ms: 100,
            height_debounce_ms: 20,
            heartbeat_ms: 1000,
            style_id_prefix: "prtcss".to_string(),
            defer_while_composing: false,
        }
    }
}

impl SyncConfig {
    pub fn height_debounce(&self) -> Duration {
        Duration::from_millis(self.height_debounce_ms.into())
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: SyncConfig =
            serde_json::from_str(r#"{ "heartbeatMs": 250, "stylePrefix": "ignored" }"#).unwrap();
        assert_eq!(config.heartbeat_ms, 250);
        assert_eq!(config.retry_fast_ms, 1);
        assert_eq!(config.retry_slow_ms, 100);
        assert_eq!(config.style_id_prefix, "prtcss");
        assert_eq!(config.heartbeat(), Duration::from_millis(250));
    }

    #[test]
    fn test_default_timings() {
        let config = SyncConfig::default();
        assert_eq!(config.height_debounce(), Duration::from_millis(20));
        assert_eq!(config.heartbeat(), Duration::from_secs(1));
        assert!(!config.defer_while_composing);
    }
}
