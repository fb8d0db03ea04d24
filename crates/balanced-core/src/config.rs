#![forbid(unsafe_code)]

//! Caller-facing configuration.
//!
//! # Defaults
//!
//! | Setting | Default | Range | Description |
//! |---------|---------|-------|-------------|
//! | `interval` | 50ms | 0-1000ms | Debounce window between balancing passes |
//! | `tag` | `div` | any element name | Element the balanced content renders as |
//!
//! # Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `BALANCED_INTERVAL_MS` | u64 | 50 | Debounce window |
//! | `BALANCED_TAG` | string | `div` | Element tag override |
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use balanced_core::config::BalanceConfig;
//!
//! let config = BalanceConfig::default()
//!     .with_interval(Duration::from_millis(5_000)) // too high
//!     .with_tag("h1")
//!     .validated();
//!
//! assert_eq!(config.interval.as_millis(), 1_000);
//! assert_eq!(config.tag, "h1");
//! ```

use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Default debounce window.
pub const DEFAULT_INTERVAL_MS: u64 = 50;

/// Minimum allowed debounce window.
pub const MIN_INTERVAL_MS: u64 = 0;

/// Maximum allowed debounce window.
pub const MAX_INTERVAL_MS: u64 = 1_000;

/// Element tag used when none is given.
pub const DEFAULT_TAG: &str = "div";

/// Configuration for one balanced element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Debounce window between balancing passes.
    /// Default: 50ms.
    #[serde(rename = "interval_ms", with = "duration_ms")]
    pub interval: Duration,

    /// Element tag the content renders as. Has no effect on balancing.
    /// Default: `div`.
    pub tag: String,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            tag: DEFAULT_TAG.to_string(),
        }
    }
}

impl BalanceConfig {
    /// Set the debounce window.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the element tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Load config from environment variables.
    ///
    /// Unparseable values are ignored; the result is [`validated`](Self::validated).
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("BALANCED_INTERVAL_MS") {
            match val.trim().parse::<u64>() {
                Ok(ms) => config.interval = Duration::from_millis(ms),
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(value = %val, "ignoring unparseable BALANCED_INTERVAL_MS");
                }
            }
        }

        if let Ok(val) = std::env::var("BALANCED_TAG") {
            config.tag = val.trim().to_string();
        }

        config.validated()
    }

    /// Validate and clamp values to safe ranges.
    ///
    /// - `interval` clamped to 0-1000ms
    /// - an empty or non-alphanumeric `tag` falls back to `div`
    #[must_use]
    pub fn validated(mut self) -> Self {
        let ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX);
        self.interval = Duration::from_millis(ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS));

        if !is_valid_tag(&self.tag) {
            self.tag = DEFAULT_TAG.to_string();
        }

        self
    }

    /// Check if values are within valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let ms = self.interval.as_millis();
        ms <= u128::from(MAX_INTERVAL_MS) && is_valid_tag(&self.tag)
    }
}

/// Element names: an ASCII letter followed by letters, digits, or `-`.
fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use web_time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
