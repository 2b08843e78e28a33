//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_addr: String,

    /// Maximum accepted request body in megabytes
    pub max_upload_mb: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            max_upload_mb: 32,
        }
    }
}

impl ServerConfig {
    /// Body limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        (self.max_upload_mb as usize).saturating_mul(1024 * 1024)
    }
}

/// Where processed images are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory that receives uploads and derivatives, also served under /images
    pub image_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("images"),
        }
    }
}

/// Resize output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Preselected thumbnail widths, reported by /health and `config show`
    pub preset_widths: Vec<u32>,

    /// Width used when a batch request does not name one
    pub default_width: u32,

    /// JPEG quality (1-100) of every derivative
    pub jpeg_quality: u8,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            preset_widths: vec![32, 64],
            default_width: 64,
            jpeg_quality: 75,
        }
    }
}

/// Deadlines for batch work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Per-entry deadline covering decode, resize and save
    pub entry_timeout_ms: u64,

    /// Deadline for collecting every report of one batch
    pub batch_timeout_ms: u64,

    /// Maximum image dimension (width or height), for sources and targets
    pub max_image_dimension: u32,

    /// Maximum uncompressed size of one archive entry in megabytes
    pub max_entry_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            entry_timeout_ms: 30_000,
            batch_timeout_ms: 300_000,
            max_image_dimension: 10_000,
            max_entry_mb: 64,
        }
    }
}

impl LimitsConfig {
    /// Entry size cap in bytes.
    pub fn max_entry_bytes(&self) -> u64 {
        self.max_entry_mb.saturating_mul(1024 * 1024)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
