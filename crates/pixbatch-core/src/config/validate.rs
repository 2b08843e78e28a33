//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.bind_addr must not be empty".into(),
            ));
        }
        if self.server.max_upload_mb == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_upload_mb must be > 0".into(),
            ));
        }
        if self.resize.default_width == 0 {
            return Err(ConfigError::ValidationError(
                "resize.default_width must be > 0".into(),
            ));
        }
        if self.resize.preset_widths.contains(&0) {
            return Err(ConfigError::ValidationError(
                "resize.preset_widths entries must be > 0".into(),
            ));
        }
        if !(1..=100).contains(&self.resize.jpeg_quality) {
            return Err(ConfigError::ValidationError(
                "resize.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if self.limits.entry_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.entry_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.batch_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.batch_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.max_entry_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_entry_mb must be > 0".into(),
            ));
        }
        let max_dim = self.limits.max_image_dimension;
        if self.resize.default_width > max_dim {
            return Err(ConfigError::ValidationError(format!(
                "resize.default_width must be <= limits.max_image_dimension ({max_dim})"
            )));
        }
        if let Some(w) = self.resize.preset_widths.iter().find(|&&w| w > max_dim) {
            return Err(ConfigError::ValidationError(format!(
                "resize.preset_widths entry {w} exceeds limits.max_image_dimension ({max_dim})"
            )));
        }
        Ok(())
    }
}
