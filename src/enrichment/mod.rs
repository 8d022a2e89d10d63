//! Enrichment Coordinator
//!
//! Resolves each frame's detections against the team directory, drops the
//! ones that match no team, and publishes the survivors as the current
//! display state. Each batch replaces the previous one outright.

use futures_util::future::join_all;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::directory::TeamLookup;
use crate::shared::{
    CoordinatorStats, CoordinatorStatsSnapshot, DetectionBatch, FrameReceiver, PublishedDetections,
};
use crate::vision::DetectedNumber;

struct CoordinatorInner {
    lookup: Arc<dyn TeamLookup>,
    published: watch::Sender<Arc<PublishedDetections>>,
    stats: CoordinatorStats,
}

/// Turns raw detection batches into published, resolved detections
#[derive(Clone)]
pub struct EnrichmentCoordinator {
    inner: Arc<CoordinatorInner>,
}

impl EnrichmentCoordinator {
    /// Create a coordinator resolving numbers through `lookup`
    pub fn new(lookup: Arc<dyn TeamLookup>) -> Self {
        let (published, _) = watch::channel(Arc::new(PublishedDetections::empty()));
        Self {
            inner: Arc::new(CoordinatorInner {
                lookup,
                published,
                stats: CoordinatorStats::new(),
            }),
        }
    }

    /// Subscribe to published detections
    pub fn subscribe(&self) -> watch::Receiver<Arc<PublishedDetections>> {
        self.inner.published.subscribe()
    }

    /// Currently published detections
    pub fn current(&self) -> Arc<PublishedDetections> {
        self.inner.published.borrow().clone()
    }

    pub fn stats(&self) -> CoordinatorStatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// Attach team info to every detection that lacks it.
    ///
    /// Lookups run concurrently; a failed lookup leaves its detection
    /// unresolved without affecting the others. Order is preserved.
    pub async fn enrich(&self, detections: Vec<DetectedNumber>) -> Vec<DetectedNumber> {
        let lookups = detections.iter().filter(|d| !d.is_resolved()).count();

        let enriched = join_all(detections.into_iter().map(|mut detection| {
            let lookup = self.inner.lookup.clone();
            async move {
                if detection.team_info.is_none() {
                    detection.team_info = lookup.get_team_info(&detection.text).await;
                }
                detection
            }
        }))
        .await;

        let unresolved = enriched.iter().filter(|d| !d.is_resolved()).count();
        self.inner.stats.record_lookups(lookups, unresolved);
        enriched
    }

    /// Resolve one batch and publish it, unless a newer batch got there first.
    ///
    /// Returns whether the batch was published.
    pub async fn process(&self, batch: DetectionBatch) -> bool {
        self.inner.stats.record_received();

        let DetectionBatch {
            sequence,
            frame_size,
            detections,
        } = batch;
        let raw_count = detections.len();

        let resolved: Vec<DetectedNumber> = self
            .enrich(detections)
            .await
            .into_iter()
            .filter(DetectedNumber::is_resolved)
            .collect();

        debug!(
            "Batch {}: {} of {} detections resolved",
            sequence,
            resolved.len(),
            raw_count
        );

        let mut pending = Some(PublishedDetections {
            sequence,
            frame_size,
            detections: resolved,
        });
        let published = self.inner.published.send_if_modified(|current| {
            if sequence > current.sequence {
                if let Some(next) = pending.take() {
                    *current = Arc::new(next);
                    return true;
                }
            }
            false
        });

        if published {
            self.inner.stats.record_published();
        } else {
            debug!("Discarding batch {}: a newer batch is already published", sequence);
            self.inner.stats.record_stale();
        }
        published
    }

    /// Drain `receiver` on a dedicated thread, resolving each batch on `runtime`.
    ///
    /// Batches are resolved concurrently, so a slow batch never holds back a
    /// newer one. The thread exits once every sender is dropped.
    pub fn spawn_drain(&self, receiver: FrameReceiver, runtime: Handle) -> JoinHandle<()> {
        let coordinator = self.clone();

        std::thread::spawn(move || {
            info!("Enrichment drain thread starting...");
            while let Some(batch) = receiver.recv() {
                let coordinator = coordinator.clone();
                runtime.spawn(async move {
                    coordinator.process(batch).await;
                });
            }
            info!("Enrichment drain thread exiting...");
        })
    }
}
