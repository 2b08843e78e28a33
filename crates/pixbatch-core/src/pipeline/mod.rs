//! Image processing pipeline components.
//!
//! - **classify**: magic-byte image detection
//! - **decode**: header probe and full decode
//! - **resize**: width-driven resize to JPEG
//! - **naming**: output names for accepted images
//! - **archive**: random-access zip entries
//! - **batch**: concurrent per-entry processing of an archive

pub mod archive;
pub mod batch;
pub mod classify;
pub mod decode;
pub mod naming;
pub mod resize;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenient access
pub use archive::ArchiveReader;
pub use batch::BatchProcessor;
pub use classify::{detect, is_image, ImageKind};
pub use decode::{decode_bytes, probe_bytes, probe_dimensions};
pub use naming::{sized_location, unique_name};
pub use resize::{target_height, validate_width, Resizer, OUTPUT_FORMAT};
