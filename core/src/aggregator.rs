//! The status aggregation loop.
//!
//! Each cycle walks the configured targets in order, makes sure a panel
//! session exists, collects a usage snapshot, renders the healthy targets
//! into a [`StatusDocument`] and publishes it through a [`DisplaySink`].
//! A target whose login or collection fails is left out of that cycle's
//! document (metrics and control) and tried again on the next one.

use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Target;
use crate::errors::DisplayError;
use crate::monitoring::{collect_usage, PanelApi, SessionCache, UsageSnapshot};
use crate::output::{build_document, HealthyTarget, StatusDocument};
use crate::state::DocumentPointer;

/// Where the status document is shown.
///
/// The chat binding implements this; tests use an in-memory sink.
#[async_trait::async_trait]
pub trait DisplaySink: Send + Sync {
    /// Confirm that the document behind `handle` still exists.
    async fn fetch(&self, handle: u64) -> Result<(), DisplayError>;

    /// Post a new document and return its handle.
    async fn publish(&self, document: &StatusDocument) -> Result<u64, DisplayError>;

    /// Replace the content and controls of an existing document.
    async fn update(&self, handle: u64, document: &StatusDocument) -> Result<(), DisplayError>;
}

/// Drives polling, rendering and publishing for all targets.
pub struct Aggregator<P, D> {
    targets: Vec<Target>,
    panel: P,
    sink: D,
    sessions: SessionCache,
    state_file: PathBuf,
    handle: Option<u64>,
}

impl<P: PanelApi, D: DisplaySink> Aggregator<P, D> {
    pub fn new(targets: Vec<Target>, panel: P, sink: D, state_file: PathBuf) -> Self {
        Self {
            targets,
            panel,
            sink,
            sessions: SessionCache::new(),
            state_file,
            handle: None,
        }
    }

    /// Pick up the persisted document if it still exists.
    ///
    /// Only a missing state file or a document reported as not found leave
    /// the aggregator without a handle. Any other fetch failure keeps the
    /// persisted handle; [`Aggregator::publish`] republishes if the update
    /// later comes back not found.
    pub async fn resume(&mut self) {
        let Some(id) = DocumentPointer::load_from(&self.state_file).message_id else {
            debug!("No persisted status document");
            return;
        };

        match self.sink.fetch(id).await {
            Ok(()) => {
                info!(message_id = id, "Resuming persisted status document");
                self.handle = Some(id);
            }
            Err(DisplayError::NotFound(_)) => {
                warn!(message_id = id, "Persisted status document not found");
            }
            Err(e) => {
                warn!(message_id = id, "Could not verify persisted status document: {e}");
                self.handle = Some(id);
            }
        }
    }

    /// Poll every target once and render the result.
    pub async fn scan(&mut self) -> StatusDocument {
        let mut snapshots: Vec<(usize, UsageSnapshot)> = Vec::with_capacity(self.targets.len());

        for (index, target) in self.targets.iter().enumerate() {
            let Some(token) = self.sessions.ensure(&self.panel, target).await else {
                continue;
            };

            match collect_usage(&self.panel, target, &token).await {
                Some(snapshot) => snapshots.push((index, snapshot)),
                None => {
                    // Possibly a stale token: log in again next cycle.
                    self.sessions.invalidate(&target.panel_url);
                }
            }
        }

        let healthy: Vec<HealthyTarget<'_>> = snapshots
            .iter()
            .map(|(index, snapshot)| HealthyTarget {
                index: *index,
                target: &self.targets[*index],
                snapshot,
            })
            .collect();

        debug!(
            healthy = healthy.len(),
            configured = self.targets.len(),
            "Scan complete"
        );
        build_document(&healthy)
    }

    /// Publish a new document or update the existing one in place.
    ///
    /// If the tracked document has disappeared, a replacement is published
    /// and its handle persisted.
    pub async fn publish(&mut self, document: &StatusDocument) -> Result<(), DisplayError> {
        if let Some(handle) = self.handle {
            match self.sink.update(handle, document).await {
                Ok(()) => return Ok(()),
                Err(DisplayError::NotFound(_)) => {
                    warn!(message_id = handle, "Status document vanished, posting a new one");
                    self.handle = None;
                }
                Err(e) => return Err(e),
            }
        }

        let handle = self.sink.publish(document).await?;
        info!(message_id = handle, "Published status document");
        self.handle = Some(handle);
        DocumentPointer::new(handle).save_to(&self.state_file);
        Ok(())
    }

    /// One full scan and publish. Publish errors are logged and retried on
    /// the next cycle, since the content is rebuilt from scratch each time.
    pub async fn run_cycle(&mut self) -> StatusDocument {
        let document = self.scan().await;
        if let Err(e) = self.publish(&document).await {
            warn!("Failed to publish status document: {e}");
        }
        document
    }

    /// Resume, then cycle every `interval` until `cancel` fires.
    pub async fn run(mut self, interval: Duration, cancel: CancellationToken) {
        self.resume().await;
        info!(
            targets = self.targets.len(),
            interval_secs = interval.as_secs(),
            "Status loop started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.run_cycle() => {}
            }
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        info!("Status loop stopped");
    }
}
