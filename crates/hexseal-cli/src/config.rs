//! Configuration loading and validation for the hexseal CLI.
//!
//! All values are read from `HEXSEAL_*` environment variables at startup:
//!
//! | Variable | Required | Meaning |
//! |---|---|---|
//! | `HEXSEAL_KEY` | yes | 32-byte key, 64 hex characters |
//! | `HEXSEAL_FIXED_NONCE` | yes | 12-byte nonce, 24 hex characters |
//! | `HEXSEAL_LOG_LEVEL` | no | tracing filter, default `warn` |

use anyhow::{Context, Result};
use hexseal::Options;
use serde::Deserialize;
use zeroize::Zeroize;

const ENV_PREFIX: &str = "HEXSEAL";

/// Validated CLI configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Hex-encoded encryption key. **Required.**
    pub key: String,

    /// Hex-encoded fixed nonce. **Required.**
    pub fixed_nonce: String,

    /// Tracing log level (e.g. `"warn"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or empty.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.key, "HEXSEAL_KEY")?;
        ensure_non_empty(&self.fixed_nonce, "HEXSEAL_FIXED_NONCE")?;
        Ok(())
    }

    /// Construction options for the facade, surrounding whitespace removed.
    pub fn options(&self) -> Options {
        Options::new(self.key.trim(), self.fixed_nonce.trim())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

impl Drop for Config {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("key", &"[REDACTED]")
            .field("fixed_nonce", &self.fixed_nonce)
            .field("log_level", &self.log_level)
            .finish()
    }
}
