//! pixbatch core - content-sniffing image batch pipeline.
//!
//! Takes single images or zip archives of arbitrary files, keeps only the
//! members whose bytes are JPEG, PNG or GIF, and writes a resized JPEG
//! derivative of each through an [`ImageStore`].
//!
//! # Architecture
//!
//! ```text
//! Archive → per entry: Classify → Decode → Resize → Name → Store
//!                                                           ↓
//!                           BatchOutcome (one report per entry)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pixbatch_core::{Config, ImageService, LocalImageStore};
//!
//! #[tokio::main]
//! async fn main() -> pixbatch_core::Result<()> {
//!     let config = Config::load()?;
//!     let store = LocalImageStore::new(config.image_dir());
//!     let service = ImageService::new(&config, Arc::new(store));
//!
//!     let zip = std::fs::read("photos.zip")?;
//!     let outcome = service.process_archive(zip.into(), 64).await?;
//!     println!("{:?}", outcome.locations());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod service;
pub mod storage;
pub mod types;

pub use config::Config;
pub use error::{
    ConfigError, DecodeError, PipelineError, PipelineResult, PixbatchError, ResizeError, Result,
    StorageError,
};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{ArchiveReader, BatchProcessor, ImageKind, Resizer};
pub use service::ImageService;
pub use storage::{ImageStore, LocalImageStore};
pub use types::{BatchOutcome, Blob, EntryOutcome, EntryStatus, ProcessedItem, RasterDimensions};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
