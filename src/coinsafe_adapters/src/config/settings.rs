use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use coinsafe_application::SessionConfig;

/// Env var naming an optional JSON settings file.
pub const CONFIG_FILE_ENV_VAR: &str = "COINSAFE_CONFIG";
/// Prefix for environment overrides, e.g. `COINSAFE_API__BASE_URL`.
const ENV_PREFIX: &str = "COINSAFE";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub verification: VerificationSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
}

/// Timing knobs for the verification state machine, in plain integer units so
/// they can come from JSON or environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationSettings {
    pub request_timeout_secs: u64,
    pub fingerprint_timeout_secs: u64,
    pub typed_settle_ms: u64,
    pub paste_settle_ms: u64,
    pub error_display_secs: u64,
}

impl Settings {
    /// Layered load: built-in defaults, then the optional JSON file named by
    /// `COINSAFE_CONFIG`, then `COINSAFE_`-prefixed environment variables.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let defaults = SessionConfig::default();
        let mut builder = Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default(
                "verification.request_timeout_secs",
                defaults.request_timeout.as_secs(),
            )?
            .set_default(
                "verification.fingerprint_timeout_secs",
                defaults.fingerprint_timeout.as_secs(),
            )?
            .set_default(
                "verification.typed_settle_ms",
                defaults.typed_settle.as_millis() as u64,
            )?
            .set_default(
                "verification.paste_settle_ms",
                defaults.paste_settle.as_millis() as u64,
            )?
            .set_default(
                "verification.error_display_secs",
                defaults.error_display.as_secs(),
            )?;

        if let Ok(path) = std::env::var(CONFIG_FILE_ENV_VAR) {
            builder = builder.add_source(File::new(&path, FileFormat::Json));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

impl VerificationSettings {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            fingerprint_timeout: Duration::from_secs(self.fingerprint_timeout_secs),
            typed_settle: Duration::from_millis(self.typed_settle_ms),
            paste_settle: Duration::from_millis(self.paste_settle_ms),
            error_display: Duration::from_secs(self.error_display_secs),
        }
    }
}

impl Default for VerificationSettings {
    fn default() -> Self {
        let defaults = SessionConfig::default();
        Self {
            request_timeout_secs: defaults.request_timeout.as_secs(),
            fingerprint_timeout_secs: defaults.fingerprint_timeout.as_secs(),
            typed_settle_ms: defaults.typed_settle.as_millis() as u64,
            paste_settle_ms: defaults.paste_settle.as_millis() as u64,
            error_display_secs: defaults.error_display.as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_session_config() {
        let settings = VerificationSettings::default();
        let config = settings.session_config();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.typed_settle, Duration::from_millis(500));
        assert_eq!(config.paste_settle, Duration::from_millis(600));
        assert_eq!(config.error_display, Duration::from_secs(5));
    }

    #[test]
    fn session_config_converts_units() {
        let settings = VerificationSettings {
            request_timeout_secs: 10,
            fingerprint_timeout_secs: 1,
            typed_settle_ms: 250,
            paste_settle_ms: 300,
            error_display_secs: 2,
        };
        let config = settings.session_config();
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.typed_settle, Duration::from_millis(250));
    }
}
