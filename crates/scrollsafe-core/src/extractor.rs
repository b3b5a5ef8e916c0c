//! Pull structured fields out of a post subtree.

use std::sync::Arc;

use scrollsafe_platform::{HostDocument, NodeId, Selector};
use scrollsafe_types::PostFields;

use crate::layout::CompiledLayout;

/// A post's identity plus its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPost {
    /// The body element. Used as the post's identity for deduplication.
    pub anchor: NodeId,
    pub fields: PostFields,
}

/// Reads [`PostFields`] from a candidate element.
#[derive(Debug, Clone)]
pub struct PostExtractor {
    layout: Arc<CompiledLayout>,
}

impl PostExtractor {
    pub fn new(layout: Arc<CompiledLayout>) -> Self {
        Self { layout }
    }

    /// The body element inside `post`, if this is a content post at all.
    pub fn anchor(&self, doc: &dyn HostDocument, post: NodeId) -> Option<NodeId> {
        doc.query(post, &self.layout.body)
    }

    /// Extract `post`. `None` when it has no body element.
    pub fn extract(&self, doc: &dyn HostDocument, post: NodeId) -> Option<ExtractedPost> {
        let anchor = self.anchor(doc, post)?;
        Some(self.extract_at(doc, post, anchor))
    }

    /// Extract `post` whose body element is already known.
    ///
    /// Missing actor elements keep their [`PostFields::default`] values.
    pub fn extract_at(&self, doc: &dyn HostDocument, post: NodeId, anchor: NodeId) -> ExtractedPost {
        let mut fields = PostFields {
            body_text: doc.inner_text(anchor).trim().to_string(),
            ..PostFields::default()
        };

        if let Some(actor) = doc.query(post, &self.layout.actor_container) {
            let read = |selector: &Selector| {
                doc.query(actor, selector)
                    .map(|el| doc.text_content(el).trim().to_string())
            };
            if let Some(name) = read(&self.layout.actor_name) {
                fields.actor_name = name;
            }
            if let Some(description) = read(&self.layout.actor_description) {
                fields.actor_description = description;
            }
            if let Some(sub) = read(&self.layout.actor_sub_description) {
                fields.actor_sub_description = sub;
            }
        }

        ExtractedPost { anchor, fields }
    }
}
