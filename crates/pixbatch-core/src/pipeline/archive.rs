//! Random-access zip reader over an in-memory upload.
//!
//! Cloning an [`ArchiveReader`] shares the buffer and the parsed central
//! directory, so every batch unit can open its own entry independently.
//!
//! Sizes in the central directory are client-supplied. Entry reads never
//! allocate from them and stop at the entry cap.

use bytes::Bytes;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::error::{PipelineError, PipelineResult};
use crate::types::Blob;

/// Entry cap used unless [`ArchiveReader::with_entry_limit`] is called.
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Clone)]
pub struct ArchiveReader {
    archive: ZipArchive<Cursor<Bytes>>,
    max_entry_bytes: u64,
}

impl std::fmt::Debug for ArchiveReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("entries", &self.archive.len())
            .field("max_entry_bytes", &self.max_entry_bytes)
            .finish()
    }
}

impl ArchiveReader {
    /// Parse the central directory of a zip held in memory.
    pub fn new(data: impl Into<Bytes>) -> PipelineResult<Self> {
        let archive = ZipArchive::new(Cursor::new(data.into()))
            .map_err(|e| PipelineError::Archive(e.to_string()))?;
        Ok(Self {
            archive,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        })
    }

    /// Cap the uncompressed size of any single entry.
    pub fn with_entry_limit(mut self, max_entry_bytes: u64) -> Self {
        self.max_entry_bytes = max_entry_bytes;
        self
    }

    /// Number of entries, directories included.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Read one entry fully. Directory entries yield an empty blob.
    pub fn read_entry(&self, index: usize) -> PipelineResult<Blob> {
        let mut archive = self.archive.clone();
        let mut file = archive
            .by_index(index)
            .map_err(|e| PipelineError::Archive(format!("entry {index}: {e}")))?;

        let name = file.name().to_string();
        let cap = self.max_entry_bytes;
        if file.size() > cap {
            return Err(PipelineError::Archive(format!(
                "entry {name} declares {} bytes, over the {cap} byte limit",
                file.size()
            )));
        }

        // One byte past the cap tells a lying header from an exact fit
        let mut bytes = Vec::new();
        (&mut file)
            .take(cap.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|e| PipelineError::Archive(format!("entry {name}: {e}")))?;
        if bytes.len() as u64 > cap {
            return Err(PipelineError::Archive(format!(
                "entry {name} inflates past the {cap} byte limit"
            )));
        }
        Ok(Blob::new(name, bytes))
    }

    /// Read an entry on the blocking pool.
    pub async fn read_entry_blocking(&self, index: usize) -> PipelineResult<Blob> {
        let reader = self.clone();
        tokio::task::spawn_blocking(move || reader.read_entry(index))
            .await
            .map_err(|e| PipelineError::Task(format!("read task for entry {index}: {e}")))?
    }
}
