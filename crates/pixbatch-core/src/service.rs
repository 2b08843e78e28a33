//! The use cases the transport drives.
//!
//! Single-image operations surface every error to the caller. Archive
//! processing only fails if the archive itself cannot be opened; per-entry
//! failures are absorbed by the batch pipeline.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::archive::ArchiveReader;
use crate::pipeline::batch::BatchProcessor;
use crate::pipeline::classify::is_image;
use crate::pipeline::naming::{sized_location, unique_name};
use crate::pipeline::resize::Resizer;
use crate::storage::ImageStore;
use crate::types::{BatchOutcome, Blob};

/// Uploads, archive batches and thumbnails over one image store.
#[derive(Clone)]
pub struct ImageService {
    store: Arc<dyn ImageStore>,
    resizer: Resizer,
    batch: BatchProcessor,
    default_width: u32,
    preset_widths: Vec<u32>,
    max_entry_bytes: u64,
}

impl ImageService {
    pub fn new(config: &Config, store: Arc<dyn ImageStore>) -> Self {
        Self {
            resizer: Resizer::new(config),
            batch: BatchProcessor::new(config, Arc::clone(&store)),
            default_width: config.resize.default_width,
            preset_widths: config.resize.preset_widths.clone(),
            max_entry_bytes: config.limits.max_entry_bytes(),
            store,
        }
    }

    /// Width used when a batch request does not specify one.
    pub fn default_width(&self) -> u32 {
        self.default_width
    }

    /// Thumbnail widths clients are expected to ask for.
    pub fn preset_widths(&self) -> &[u32] {
        &self.preset_widths
    }

    /// Store an uploaded image unchanged under a fresh name.
    pub async fn upload_image(&self, blob: Blob) -> PipelineResult<String> {
        if !is_image(&blob.bytes) {
            return Err(PipelineError::NotImage { name: blob.name });
        }

        let location = self.store.location_for(&unique_name(&blob.name));
        self.save(&location, &blob.bytes).await?;
        info!("Stored upload {:?} at {}", blob.name, location);
        Ok(location)
    }

    /// Resize every image in a zip archive to `width`.
    pub async fn process_archive(&self, data: Bytes, width: u32) -> PipelineResult<BatchOutcome> {
        self.check_width(width)?;
        let archive = ArchiveReader::new(data)?.with_entry_limit(self.max_entry_bytes);
        Ok(self.batch.process(archive, width).await)
    }

    /// Write a `<width>x` derivative next to a stored image.
    pub async fn generate_thumbnail(&self, image_path: &str, width: u32) -> PipelineResult<String> {
        self.check_width(width)?;
        self.store
            .validate_location(image_path)
            .map_err(|e| PipelineError::InvalidInput(format!("imagePath: {e}")))?;
        if !self.store.exists(image_path).await {
            return Err(PipelineError::NotFound(image_path.to_string()));
        }

        let source = self.read(image_path).await?;
        let resized = self
            .resizer
            .resize_blocking(image_path, Bytes::from(source), width)
            .await?;

        let location = sized_location(image_path, width);
        self.save(&location, &resized).await?;
        debug!("Thumbnail of {} at width {} -> {}", image_path, width, location);
        Ok(location)
    }

    /// Zero is malformed input; anything past the dimension cap is an
    /// invalid resize target.
    fn check_width(&self, width: u32) -> PipelineResult<()> {
        if width == 0 {
            return Err(PipelineError::InvalidInput(
                "widthSize must be a positive integer".into(),
            ));
        }
        self.resizer
            .check_width(width)
            .map_err(|source| PipelineError::Resize {
                name: "widthSize".to_string(),
                source,
            })
    }

    async fn read(&self, location: &str) -> PipelineResult<Vec<u8>> {
        self.store
            .read(location)
            .await
            .map_err(|source| PipelineError::Persistence {
                location: location.to_string(),
                source,
            })
    }

    async fn save(&self, location: &str, bytes: &[u8]) -> PipelineResult<()> {
        self.store
            .save(location, bytes)
            .await
            .map_err(|source| PipelineError::Persistence {
                location: location.to_string(),
                source,
            })
    }
}
