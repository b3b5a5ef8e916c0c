//! One post, end to end: decide, suppress, count.

use std::sync::Arc;

use tracing::{debug, warn};

use scrollsafe_platform::{HostDocument, NodeId};
use scrollsafe_types::Decision;

use crate::extractor::ExtractedPost;
use crate::policy::DecisionPolicy;
use crate::suppress::{SuppressionOutcome, Suppressor};

/// Runs the decision policy for a post and applies the result.
pub struct PostPipeline {
    doc: Arc<dyn HostDocument>,
    policy: DecisionPolicy,
    suppressor: Suppressor,
}

impl PostPipeline {
    pub fn new(doc: Arc<dyn HostDocument>, policy: DecisionPolicy, suppressor: Suppressor) -> Self {
        Self {
            doc,
            policy,
            suppressor,
        }
    }

    /// Decide on `post` and, if suppressed, filter `post_node` with the
    /// configured mode and update the usage counters.
    ///
    /// Never fails: a counter write error is logged and the decision is
    /// still returned.
    pub async fn process(&self, post: ExtractedPost, post_node: NodeId) -> Decision {
        let decision = self.policy.decide(&post.fields).await;
        if !decision.verdict.is_suppress() {
            debug!(post = %post.anchor, reason = ?decision.reason, "post allowed");
            return decision;
        }

        let settings = self.policy.settings();
        let mode = settings.load().await.filter_mode;
        // Read before suppression; a collapsed post renders no text.
        let post_text = self.doc.inner_text(post_node);
        let outcome = self.suppressor.suppress(self.doc.as_ref(), post_node, mode);
        debug!(
            post = %post.anchor,
            reason = ?decision.reason,
            mode = %mode,
            outcome = ?outcome,
            "post suppressed"
        );

        if outcome != SuppressionOutcome::AlreadySuppressed
            && let Err(e) = settings.record_suppression(&post_text).await
        {
            warn!(error = %e, "failed to update usage stats");
        }
        decision
    }
}
