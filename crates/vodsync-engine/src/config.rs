//! Engine configuration.

use std::time::Duration;

use crate::backoff::VerifyBackoff;
use crate::sweeper::SweeperConfig;
use crate::verifier::VerifierConfig;

/// Tuning for all four engines.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Verification budget in seconds
    pub verify_timeout_secs: u64,
    /// A progress snapshot is published every Nth poll
    pub snapshot_every: u32,
    /// Base poll backoff in milliseconds
    pub backoff_base_ms: u64,
    /// Backoff growth per attempt in milliseconds
    pub backoff_increment_ms: u64,
    /// Backoff cap in milliseconds
    pub backoff_cap_ms: u64,
    /// Wait when an asset has not propagated to read replicas yet
    pub not_visible_delay_ms: u64,
    /// Wait after other transient lookup failures
    pub lookup_error_delay_ms: u64,
    /// Pause between consecutive sweep deletes
    pub sweep_delete_delay_ms: u64,
    /// Default stuck-upload age threshold
    pub default_max_age_hours: f64,
    /// Page size for collaborator listings; collaborator default when absent
    pub list_page_size: Option<u32>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            verify_timeout_secs: 300,
            snapshot_every: 10,
            backoff_base_ms: 1000,
            backoff_increment_ms: 100,
            backoff_cap_ms: 5000,
            not_visible_delay_ms: 3000,
            lookup_error_delay_ms: 1000,
            sweep_delete_delay_ms: 500,
            default_max_age_hours: 24.0,
            list_page_size: None,
        }
    }
}

impl SyncConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            verify_timeout_secs: env_parse("VODSYNC_VERIFY_TIMEOUT_SECS", defaults.verify_timeout_secs),
            snapshot_every: env_parse("VODSYNC_SNAPSHOT_EVERY", defaults.snapshot_every),
            backoff_base_ms: env_parse("VODSYNC_BACKOFF_BASE_MS", defaults.backoff_base_ms),
            backoff_increment_ms: env_parse(
                "VODSYNC_BACKOFF_INCREMENT_MS",
                defaults.backoff_increment_ms,
            ),
            backoff_cap_ms: env_parse("VODSYNC_BACKOFF_CAP_MS", defaults.backoff_cap_ms),
            not_visible_delay_ms: env_parse(
                "VODSYNC_NOT_VISIBLE_DELAY_MS",
                defaults.not_visible_delay_ms,
            ),
            lookup_error_delay_ms: env_parse(
                "VODSYNC_LOOKUP_ERROR_DELAY_MS",
                defaults.lookup_error_delay_ms,
            ),
            sweep_delete_delay_ms: env_parse(
                "VODSYNC_SWEEP_DELETE_DELAY_MS",
                defaults.sweep_delete_delay_ms,
            ),
            default_max_age_hours: env_parse(
                "VODSYNC_DEFAULT_MAX_AGE_HOURS",
                defaults.default_max_age_hours,
            ),
            list_page_size: std::env::var("VODSYNC_LIST_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Verifier settings derived from this config.
    pub fn verifier_config(&self) -> VerifierConfig {
        VerifierConfig {
            timeout: Duration::from_secs(self.verify_timeout_secs),
            snapshot_every: self.snapshot_every,
            backoff: VerifyBackoff {
                base: Duration::from_millis(self.backoff_base_ms),
                increment: Duration::from_millis(self.backoff_increment_ms),
                cap: Duration::from_millis(self.backoff_cap_ms),
            },
            not_visible_delay: Duration::from_millis(self.not_visible_delay_ms),
            lookup_error_delay: Duration::from_millis(self.lookup_error_delay_ms),
        }
    }

    /// Sweeper settings derived from this config.
    pub fn sweeper_config(&self) -> SweeperConfig {
        SweeperConfig {
            delete_delay: Duration::from_millis(self.sweep_delete_delay_ms),
            page_limit: self.list_page_size,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.verify_timeout_secs, 300);
        assert_eq!(config.snapshot_every, 10);
        assert_eq!(config.sweep_delete_delay_ms, 500);
    }

    #[test]
    fn test_derived_verifier_config() {
        let config = SyncConfig::default();
        let verifier = config.verifier_config();
        assert_eq!(verifier.timeout, Duration::from_secs(300));
        assert_eq!(verifier.backoff.cap, Duration::from_secs(5));
        assert_eq!(verifier.not_visible_delay, Duration::from_secs(3));
    }
}
