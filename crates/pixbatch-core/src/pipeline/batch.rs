//! Archive batch orchestration: one task per entry, one report per task.
//!
//! Every entry is classified, and only images are decoded, resized and saved.
//! Per-entry failures degrade that entry's report to a placeholder and never
//! touch the others. Reports are collected over an unbounded channel in
//! completion order until every entry has reported or the batch deadline
//! passes; missing reports are then filled in so the outcome always has one
//! element per entry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::archive::ArchiveReader;
use super::classify::is_image;
use super::naming::unique_name;
use super::resize::Resizer;
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::storage::ImageStore;
use crate::types::{BatchOutcome, Blob, EntryOutcome, EntryStatus, ProcessedItem};

/// Runs archives through classify → resize → save.
#[derive(Clone)]
pub struct BatchProcessor {
    unit: Arc<EntryUnit>,
    batch_timeout: Duration,
}

/// Shared, read-only state for every entry task.
struct EntryUnit {
    store: Arc<dyn ImageStore>,
    resizer: Resizer,
    entry_timeout: Duration,
}

impl BatchProcessor {
    /// Create a processor with the configured resizer and deadlines.
    pub fn new(config: &Config, store: Arc<dyn ImageStore>) -> Self {
        Self::with_timeouts(
            store,
            Resizer::new(config),
            Duration::from_millis(config.limits.entry_timeout_ms),
            Duration::from_millis(config.limits.batch_timeout_ms),
        )
    }

    pub fn with_timeouts(
        store: Arc<dyn ImageStore>,
        resizer: Resizer,
        entry_timeout: Duration,
        batch_timeout: Duration,
    ) -> Self {
        Self {
            unit: Arc::new(EntryUnit {
                store,
                resizer,
                entry_timeout,
            }),
            batch_timeout,
        }
    }

    /// Process every entry of `archive` at `width`.
    ///
    /// Returns exactly `archive.len()` outcomes in completion order.
    pub async fn process(&self, archive: ArchiveReader, width: u32) -> BatchOutcome {
        let total = archive.len();
        let start = Instant::now();
        debug!("Processing archive with {} entries at width {}", total, width);

        let (tx, mut rx) = mpsc::unbounded_channel::<EntryOutcome>();
        let mut tasks = JoinSet::new();
        for index in 0..total {
            let tx = tx.clone();
            let unit = Arc::clone(&self.unit);
            let archive = archive.clone();
            tasks.spawn(async move {
                let outcome = unit.run(archive, index, width).await;
                // Receiver gone means the batch already gave up on us
                let _ = tx.send(outcome);
            });
        }
        drop(tx);

        let deadline = tokio::time::Instant::now() + self.batch_timeout;
        let mut collector = Collector::new(total);
        let mut missing = EntryStatus::TimedOut;
        while !collector.is_complete() {
            match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(Some(outcome)) => collector.push(outcome),
                Ok(None) => {
                    // Every sender is gone, so the rest died mid-flight
                    warn!(
                        "{} entries ended without reporting",
                        total - collector.received()
                    );
                    missing = EntryStatus::Failed {
                        reason: "entry task ended without reporting".to_string(),
                    };
                    break;
                }
                Err(_) => {
                    warn!(
                        "Batch deadline of {:?} passed with {}/{} reports",
                        self.batch_timeout,
                        collector.received(),
                        total
                    );
                    break;
                }
            }
        }
        tasks.abort_all();

        let outcome = collector.finish(missing);
        info!(
            "Processed {} entries in {:?}: {} saved, {} skipped",
            outcome.len(),
            start.elapsed(),
            outcome.saved_count(),
            outcome.len() - outcome.saved_count()
        );
        outcome
    }
}

impl EntryUnit {
    async fn run(&self, archive: ArchiveReader, index: usize, width: u32) -> EntryOutcome {
        let blob = match archive.read_entry_blocking(index).await {
            Ok(blob) => blob,
            Err(e) => {
                warn!("Entry {} unreadable: {}", index, e);
                return EntryOutcome {
                    index,
                    name: None,
                    status: EntryStatus::Failed {
                        reason: e.to_string(),
                    },
                };
            }
        };

        let name = blob.name.clone();
        let status = match timeout(self.entry_timeout, self.process_blob(blob, width)).await {
            Ok(Ok(location)) => {
                debug!("Entry {:?} saved to {}", name, location);
                EntryStatus::Saved { location }
            }
            Ok(Err(PipelineError::NotImage { .. })) => {
                debug!("Entry {:?} is not an image", name);
                EntryStatus::NotImage
            }
            Ok(Err(e)) => {
                warn!("Entry {:?} failed: {}", name, e);
                EntryStatus::Failed {
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                let err = PipelineError::Timeout {
                    name: name.clone(),
                    stage: "entry".to_string(),
                    timeout_ms: self.entry_timeout.as_millis() as u64,
                };
                warn!("{}", err);
                EntryStatus::TimedOut
            }
        };

        EntryOutcome {
            index,
            name: Some(name),
            status,
        }
    }

    async fn process_blob(&self, blob: Blob, width: u32) -> PipelineResult<String> {
        if !is_image(&blob.bytes) {
            return Err(PipelineError::NotImage { name: blob.name });
        }

        let bytes = self
            .resizer
            .resize_blocking(&blob.name, blob.bytes, width)
            .await?;
        let item = ProcessedItem {
            output_name: unique_name(&blob.name),
            original_name: blob.name,
            bytes,
        };

        let location = self.store.location_for(&item.output_name);
        self.store
            .save(&location, &item.bytes)
            .await
            .map_err(|source| PipelineError::Persistence {
                location: location.clone(),
                source,
            })?;
        debug!("{} -> {}", item.original_name, location);
        Ok(location)
    }
}

/// Counts distinct reports so none is lost or counted twice.
struct Collector {
    seen: Vec<bool>,
    received: usize,
    outcome: BatchOutcome,
}

impl Collector {
    fn new(total: usize) -> Self {
        Self {
            seen: vec![false; total],
            received: 0,
            outcome: BatchOutcome {
                entries: Vec::with_capacity(total),
            },
        }
    }

    fn push(&mut self, entry: EntryOutcome) {
        match self.seen.get_mut(entry.index) {
            Some(seen) if !*seen => {
                *seen = true;
                self.received += 1;
                self.outcome.entries.push(entry);
            }
            _ => warn!("Ignoring duplicate or unknown report for entry {}", entry.index),
        }
    }

    fn received(&self) -> usize {
        self.received
    }

    fn is_complete(&self) -> bool {
        self.received == self.seen.len()
    }

    /// Fill every entry that never reported with a `missing` placeholder.
    fn finish(mut self, missing: EntryStatus) -> BatchOutcome {
        for (index, seen) in self.seen.iter().enumerate() {
            if !seen {
                self.outcome.entries.push(EntryOutcome {
                    index,
                    name: None,
                    status: missing.clone(),
                });
            }
        }
        self.outcome
    }
}
