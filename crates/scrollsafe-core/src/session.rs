//! Per-page filtering session.
//!
//! [`ScrollSession`] owns everything that lives as long as one page: the
//! document handle, the processed-post set, the pipeline, the observer and
//! the cancellation token that stops it.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use scrollsafe_llm::{InferenceJudge, Judge};
use scrollsafe_platform::{HostDocument, KeyValueStore};
use scrollsafe_types::{FeedLayout, Result, RuntimeConfig, ScrollSafeError};

use crate::layout::CompiledLayout;
use crate::observer::FeedObserver;
use crate::pipeline::PostPipeline;
use crate::policy::DecisionPolicy;
use crate::processed::ProcessedSet;
use crate::settings::SettingsStore;
use crate::suppress::Suppressor;

/// The filter attached to one document.
pub struct ScrollSession {
    doc: Arc<dyn HostDocument>,
    settings: Arc<SettingsStore>,
    processed: Arc<ProcessedSet>,
    observer: Arc<FeedObserver>,
    cancel: CancellationToken,
}

impl ScrollSession {
    /// Assemble a session from its parts.
    ///
    /// # Errors
    ///
    /// [`ScrollSafeError::ConfigInvalid`] if a layout selector does not parse.
    pub fn new(
        doc: Arc<dyn HostDocument>,
        store: Arc<dyn KeyValueStore>,
        judge: Arc<dyn Judge>,
        layout: &FeedLayout,
    ) -> Result<Self> {
        let layout = Arc::new(CompiledLayout::compile(layout)?);
        let settings = Arc::new(SettingsStore::new(store));
        let processed = Arc::new(ProcessedSet::new());

        let policy = DecisionPolicy::new(settings.clone(), judge);
        let pipeline = Arc::new(PostPipeline::new(
            doc.clone(),
            policy,
            Suppressor::new(layout.clone()),
        ));
        let observer = Arc::new(FeedObserver::new(
            doc.clone(),
            layout,
            processed.clone(),
            pipeline,
        ));

        Ok(Self {
            doc,
            settings,
            processed,
            observer,
            cancel: CancellationToken::new(),
        })
    }

    /// Assemble a session that classifies with an [`InferenceJudge`].
    pub fn from_config(
        doc: Arc<dyn HostDocument>,
        store: Arc<dyn KeyValueStore>,
        config: &RuntimeConfig,
    ) -> Result<Self> {
        config.validate()?;
        let judge = InferenceJudge::new(config.judge.clone()).map_err(|e| {
            ScrollSafeError::ConfigInvalid {
                reason: format!("judge: {e}"),
            }
        })?;
        Self::new(doc, store, Arc::new(judge), &config.layout)
    }

    /// Start discovering posts. Returns the observer loop's handle.
    ///
    /// Runs even when filtering is switched off: promoted and mute-word
    /// suppression do not need the remote classifier.
    pub async fn start(&self) -> JoinHandle<()> {
        let settings = self.settings.load().await;
        if !settings.enabled {
            warn!("filtering is disabled; only promoted and muted posts will be suppressed");
        } else if settings.api_key.is_none() {
            warn!("no API credential configured; set one in the extension settings");
        }

        let observer = self.observer.clone();
        let cancel = self.cancel.clone();
        info!("scroll session started");
        tokio::spawn(async move { observer.run(cancel).await })
    }

    /// Stop watching and wait for in-flight posts to finish.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.observer.drain().await;
        info!(processed = self.processed.len(), "scroll session stopped");
    }

    /// Wait until every post discovered so far has been processed.
    pub async fn idle(&self) {
        self.observer.idle().await;
    }

    pub fn document(&self) -> &Arc<dyn HostDocument> {
        &self.doc
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    pub fn processed(&self) -> &Arc<ProcessedSet> {
        &self.processed
    }

    pub fn observer(&self) -> &Arc<FeedObserver> {
        &self.observer
    }

    /// Token that stops the observer loop when cancelled.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }
}
