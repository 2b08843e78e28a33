//! Core data types flowing through the pipeline.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// An immutable named byte sequence: an archive entry or an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Name as given by the archive or the upload
    pub name: String,

    /// Raw content
    pub bytes: Bytes,
}

impl Blob {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Width and height read from an image header. Both are always > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterDimensions {
    pub width: u32,
    pub height: u32,
}

/// The result of one successful unit, ready to be persisted.
#[derive(Debug, Clone)]
pub struct ProcessedItem {
    /// Entry name inside the archive
    pub original_name: String,

    /// Name chosen by the naming policy
    pub output_name: String,

    /// Encoded derivative
    pub bytes: Vec<u8>,
}

/// What happened to one archive entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    /// Resized and written
    Saved { location: String },

    /// Content did not match any image signature
    NotImage,

    /// Read, decode, encode or save failed
    Failed { reason: String },

    /// Entry or batch deadline passed before a report arrived
    TimedOut,
}

/// The single report a unit sends for its entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOutcome {
    /// Position of the entry in the archive's central directory
    pub index: usize,

    /// Entry name, when it could be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub status: EntryStatus,
}

impl EntryOutcome {
    /// Location of the saved derivative, if any.
    pub fn location(&self) -> Option<&str> {
        match &self.status {
            EntryStatus::Saved { location } => Some(location),
            _ => None,
        }
    }
}

/// Every entry's outcome, in the order the reports arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub entries: Vec<EntryOutcome>,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that produced a derivative.
    pub fn saved_count(&self) -> usize {
        self.entries.iter().filter(|e| e.location().is_some()).count()
    }

    /// Wire form: one string per entry, empty for entries without a derivative.
    pub fn locations(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.location().unwrap_or_default().to_string())
            .collect()
    }

    /// Reorder by archive position instead of completion order.
    pub fn into_input_order(mut self) -> Self {
        self.entries.sort_by_key(|e| e.index);
        self
    }
}
