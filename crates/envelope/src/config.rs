//! Configuration loading and validation for embedding services.
//!
//! All values are read from environment variables. Loading fails with a
//! clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated protocol configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Identifier of the oracle-held key pair used for wrapping. **Required.**
    pub wrap_key_id: String,

    /// Out-of-band carrier header holding the Base64 wrapped data key on
    /// the direct-wrap path.
    #[serde(default = "default_wrapped_key_header")]
    pub wrapped_key_header: String,

    /// Upper bound (seconds) for one oracle call. Oracle clients report a
    /// timeout as a key-unwrap failure.
    #[serde(default = "default_oracle_timeout")]
    pub oracle_timeout_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_wrapped_key_header() -> String {
    "X-Wrapped-Data-Key".into()
}
fn default_oracle_timeout() -> u64 {
    5
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be
    /// parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.wrap_key_id, "WRAP_KEY_ID")?;
        ensure_non_empty(&self.wrapped_key_header, "WRAPPED_KEY_HEADER")?;

        if self.oracle_timeout_secs == 0 {
            anyhow::bail!("ORACLE_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_wrapped_key_header(), "X-Wrapped-Data-Key");
        assert_eq!(default_oracle_timeout(), 5);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_rejects_empty_key_id() {
        let cfg = Config {
            wrap_key_id: "".into(),
            wrapped_key_header: default_wrapped_key_header(),
            oracle_timeout_secs: default_oracle_timeout(),
            log_level: default_log_level(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let cfg = Config {
            wrap_key_id: "alias/pii-wrap".into(),
            wrapped_key_header: default_wrapped_key_header(),
            oracle_timeout_secs: 0,
            log_level: default_log_level(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_sensible_config() {
        let cfg = Config {
            wrap_key_id: "alias/pii-wrap".into(),
            wrapped_key_header: default_wrapped_key_header(),
            oracle_timeout_secs: 5,
            log_level: default_log_level(),
        };
        assert!(cfg.validate().is_ok());
    }
}
