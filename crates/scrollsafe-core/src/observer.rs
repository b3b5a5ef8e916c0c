//! Post discovery: an initial sweep, then a watch on document additions.
//!
//! The observer subscribes to mutations *before* sweeping, so a post added
//! while the sweep runs is seen either by the sweep or by the watch (and the
//! [`ProcessedSet`] drops the duplicate). Each discovered post is handed to
//! the [`PostPipeline`] as its own task; tasks run concurrently with no
//! ordering guarantee.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, trace};

use scrollsafe_platform::document::MutationBatch;
use scrollsafe_platform::{HostDocument, NodeId};

use crate::extractor::PostExtractor;
use crate::layout::CompiledLayout;
use crate::pipeline::PostPipeline;
use crate::processed::ProcessedSet;

const IDLE_POLL: Duration = Duration::from_millis(1);

/// Lifecycle of a [`FeedObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    /// Constructed, not yet running.
    Created,
    /// Sweeping posts already in the document.
    Scanning,
    /// Reacting to mutation batches.
    Watching,
    /// Cancelled, or the mutation stream ended.
    Stopped,
}

/// Finds posts in a document and dispatches each one once.
pub struct FeedObserver {
    doc: Arc<dyn HostDocument>,
    layout: Arc<CompiledLayout>,
    extractor: PostExtractor,
    processed: Arc<ProcessedSet>,
    pipeline: Arc<PostPipeline>,
    tracker: TaskTracker,
    state: watch::Sender<ObserverState>,
}

impl FeedObserver {
    pub fn new(
        doc: Arc<dyn HostDocument>,
        layout: Arc<CompiledLayout>,
        processed: Arc<ProcessedSet>,
        pipeline: Arc<PostPipeline>,
    ) -> Self {
        Self {
            doc,
            extractor: PostExtractor::new(layout.clone()),
            layout,
            processed,
            pipeline,
            tracker: TaskTracker::new(),
            state: watch::Sender::new(ObserverState::Created),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ObserverState {
        *self.state.borrow()
    }

    /// Receiver that sees every state change.
    pub fn watch_state(&self) -> watch::Receiver<ObserverState> {
        self.state.subscribe()
    }

    /// Sweep, then watch until `cancel` fires or the document goes away.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut mutations = self.doc.subscribe();

        self.state.send_replace(ObserverState::Scanning);
        let dispatched = self.scan_existing();
        info!(dispatched, "initial sweep complete");

        self.state.send_replace(ObserverState::Watching);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("observer cancelled");
                    break;
                }
                batch = mutations.recv() => match batch {
                    Some(batch) => {
                        self.handle_batch(&batch);
                    }
                    None => {
                        debug!("mutation stream closed");
                        break;
                    }
                },
            }
        }
        self.state.send_replace(ObserverState::Stopped);
    }

    /// Dispatch every candidate already in the document. Returns how many
    /// were new.
    pub fn scan_existing(&self) -> usize {
        let body = self.doc.body();
        self.doc
            .query_all(body, &self.layout.candidate)
            .into_iter()
            .filter(|&candidate| self.dispatch(candidate))
            .count()
    }

    /// Dispatch the candidates inside each added subtree, including a root
    /// that is itself a candidate. Returns how many were new.
    pub fn handle_batch(&self, batch: &MutationBatch) -> usize {
        let mut dispatched = 0;
        for &root in &batch.added {
            if !self.doc.is_element(root) {
                continue;
            }
            let mut candidates = Vec::new();
            if self.doc.closest(root, &self.layout.candidate) == Some(root) {
                candidates.push(root);
            }
            candidates.extend(self.doc.query_all(root, &self.layout.candidate));
            dispatched += candidates.into_iter().filter(|&c| self.dispatch(c)).count();
        }
        trace!(roots = batch.added.len(), dispatched, "mutation batch handled");
        dispatched
    }

    /// Route one candidate to the pipeline unless it was seen before or has
    /// no body. The processed mark is taken before anything is awaited.
    fn dispatch(&self, candidate: NodeId) -> bool {
        let Some(anchor) = self.extractor.anchor(self.doc.as_ref(), candidate) else {
            trace!(candidate = %candidate, "candidate without body, skipped");
            return false;
        };
        if !self.processed.insert(anchor) {
            trace!(anchor = %anchor, "already processed");
            return false;
        }

        let post = self.extractor.extract_at(self.doc.as_ref(), candidate, anchor);
        let pipeline = self.pipeline.clone();
        self.tracker.spawn(async move {
            pipeline.process(post, candidate).await;
        });
        true
    }

    /// Number of pipeline tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until no pipeline task is running.
    ///
    /// Yields first so mutation batches already queued reach the observer
    /// loop, and polls until a yield turns up no new work. On a
    /// current-thread runtime this means every post added so far has been
    /// fully processed. The tracker is only read, so this may overlap
    /// [`drain`](Self::drain).
    pub async fn idle(&self) {
        loop {
            tokio::task::yield_now().await;
            if self.tracker.is_empty() {
                return;
            }
            tokio::time::sleep(IDLE_POLL).await;
        }
    }

    /// Wait for in-flight tasks after the observer loop has been cancelled.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
