//! Configuration validation with range checks.

use crate::caption::KNOWN_PROVIDERS;
use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.generate_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.generate_timeout_ms must be > 0".into(),
            ));
        }
        if self.model.prompt.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model.prompt must not be empty".into(),
            ));
        }
        if !KNOWN_PROVIDERS.contains(&self.model.provider.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "model.provider must be one of {}, got '{}'",
                KNOWN_PROVIDERS.join(", "),
                self.model.provider
            )));
        }
        Ok(())
    }
}
