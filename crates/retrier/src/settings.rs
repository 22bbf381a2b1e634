//! Retry settings loadable from configuration documents and the environment.
//!
//! [`RetrySettings`] is the serializable subset of a [`RetryConfig`]: the retry
//! limit and the delay bounds. Predicates, backoff functions and log sinks are
//! code and stay in overrides.

use crate::error::ConfigError;
use crate::retry::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES, MaxRetries, Override, RetryConfig,
    base_delay, max_delay, max_retries,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Environment variable prefix read by [`RetrySettings::from_env`].
pub const ENV_PREFIX: &str = "RETRIER";

/// Retry limit and delay bounds.
///
/// Missing fields take the crate defaults. `max_retries = -1` means unlimited.
///
/// # Examples
///
/// ```rust
/// use retrier::{MaxRetries, RetrySettings};
/// use std::time::Duration;
///
/// let settings: RetrySettings = serde_json::from_str(r#"{ "max_retries": -1, "base_delay_ms": 10 }"#)?;
///
/// assert_eq!(settings.max_retries, MaxRetries::Unlimited);
/// assert_eq!(settings.base_delay(), Duration::from_millis(10));
/// assert_eq!(settings.max_delay(), Duration::from_secs(60));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Retries permitted after the first attempt
    pub max_retries: MaxRetries,
    /// Base delay in milliseconds
    pub base_delay_ms: u64,
    /// Max delay in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY.as_millis() as u64,
            max_delay_ms: DEFAULT_MAX_DELAY.as_millis() as u64,
        }
    }
}

impl RetrySettings {
    /// Base delay as a `Duration`.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Max delay as a `Duration`.
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// Check that the base delay does not exceed the max delay.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_delay_ms > self.max_delay_ms {
            return Err(ConfigError::DelayOrder {
                base: self.base_delay(),
                max: self.max_delay(),
            });
        }
        Ok(())
    }

    /// Load settings from `RETRIER_*` environment variables.
    ///
    /// This will look for:
    /// - `RETRIER_MAX_RETRIES` for the retry limit (`-1` for unlimited)
    /// - `RETRIER_BASE_DELAY_MS` for the base delay
    /// - `RETRIER_MAX_DELAY_MS` for the max delay
    ///
    /// Unset variables keep their defaults. Set but unparsable ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Load settings from `{prefix}_*` environment variables.
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        if let Some(raw) = read_var(prefix, "MAX_RETRIES") {
            let value = parse_var::<i64>(prefix, "MAX_RETRIES", &raw)?;
            settings.max_retries = MaxRetries::try_from(value)?;
        }

        if let Some(raw) = read_var(prefix, "BASE_DELAY_MS") {
            settings.base_delay_ms = parse_var(prefix, "BASE_DELAY_MS", &raw)?;
        }

        if let Some(raw) = read_var(prefix, "MAX_DELAY_MS") {
            settings.max_delay_ms = parse_var(prefix, "MAX_DELAY_MS", &raw)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Validate, then return the overrides reproducing these settings.
    pub fn into_overrides<E: 'static>(self) -> Result<Vec<Override<E>>, ConfigError> {
        self.validate()?;
        Ok(vec![
            max_retries(self.max_retries),
            base_delay(self.base_delay()),
            max_delay(self.max_delay()),
        ])
    }

    /// Validate, then build a configuration from the defaults and these settings.
    pub fn into_config<E: 'static>(self) -> Result<RetryConfig<E>, ConfigError> {
        Ok(RetryConfig::with_overrides(self.into_overrides()?))
    }
}

fn read_var(prefix: &str, name: &str) -> Option<String> {
    env::var(format!("{prefix}_{name}")).ok()
}

fn parse_var<T: std::str::FromStr>(prefix: &str, name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var: format!("{prefix}_{name}"),
        value: raw.to_string(),
    })
}
