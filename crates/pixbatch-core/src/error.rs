//! Error types for the pixbatch pipeline.
//!
//! Errors are organized by stage so callers can tell a rejected input from a
//! failed decode or a failed write, and map each to its own response.

use thiserror::Error;

/// Top-level error type for pixbatch operations.
#[derive(Error, Debug)]
pub enum PixbatchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Why an image could not be probed or decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Content does not match any decodable format
    #[error("unrecognized image format")]
    UnrecognizedFormat,

    /// Stream ended before the image was complete
    #[error("truncated image data: {0}")]
    Truncated(String),

    /// Headers or pixel data are malformed
    #[error("corrupt image data: {0}")]
    Corrupt(String),
}

/// Failures of the decode → resample → encode path.
#[derive(Error, Debug)]
pub enum ResizeError {
    /// Target width is zero, or it or the derived height exceeds the cap
    #[error("invalid target width: {0}")]
    InvalidWidth(u32),

    /// Source raster exceeds the configured dimension cap
    #[error("image too large: {width}x{height} exceeds max dimension {max}")]
    SourceTooLarge { width: u32, height: u32, max: u32 },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Re-encoding the resized raster failed
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Persistence sink errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Location escapes the store or is otherwise unusable
    #[error("invalid location: {0}")]
    InvalidLocation(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Content is not one of the recognized image encodings
    #[error("Not an image: {name}")]
    NotImage { name: String },

    /// Header could not be parsed
    #[error("Decode error for {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },

    /// Decoding, resampling or encoding failed
    #[error("Resize failed for {name}: {source}")]
    Resize {
        name: String,
        #[source]
        source: ResizeError,
    },

    /// The persistence sink rejected the write
    #[error("Unable to save {location}: {source}")]
    Persistence {
        location: String,
        #[source]
        source: StorageError,
    },

    /// Referenced source does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// Malformed request shape or parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Archive container could not be read
    #[error("Unable to read archive: {0}")]
    Archive(String),

    /// Operation timed out
    #[error("Timeout in {stage} stage for {name} after {timeout_ms}ms")]
    Timeout {
        name: String,
        stage: String,
        timeout_ms: u64,
    },

    /// A blocking task was cancelled or panicked
    #[error("Task failed: {0}")]
    Task(String),
}

/// Convenience type alias for pixbatch results.
pub type Result<T> = std::result::Result<T, PixbatchError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
