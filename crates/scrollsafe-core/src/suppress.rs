//! In-place suppression of a post: collapse it, or blur it behind a
//! "Click to View" button.
//!
//! Shape mismatches (no control-menu ancestor, no outer post container)
//! are silent no-ops. A suppressed control-menu container carries a
//! `data-scrollsafe` attribute so a post is never wrapped twice.

use std::sync::Arc;

use tracing::{debug, info};

use scrollsafe_platform::{HostDocument, NodeId};
use scrollsafe_types::FilterMode;

use crate::layout::CompiledLayout;

/// Attribute set on the control-menu container once it is suppressed.
pub const MARKER_ATTR: &str = "data-scrollsafe";

/// Label of the reveal button in blur mode.
pub const REVEAL_LABEL: &str = "Click to View";

const REMOVE_STYLES: &[(&str, &str)] = &[
    ("display", "none"),
    ("visibility", "hidden"),
    ("height", "0"),
    ("overflow", "hidden"),
    ("margin", "0"),
    ("padding", "0"),
    ("opacity", "0"),
    ("pointer-events", "none"),
];

const WRAPPER_STYLES: &[(&str, &str)] = &[
    ("filter", "blur(10px)"),
    ("transition", "all 0.3s ease"),
    ("width", "100%"),
    ("height", "100%"),
    ("position", "relative"),
    ("opacity", "0.95"),
];

const BUTTON_STYLES: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("top", "50%"),
    ("left", "50%"),
    ("transform", "translate(-50%,-50%)"),
    ("z-index", "10"),
    ("background-color", "#0a66c2"),
    ("color", "white"),
    ("border", "none"),
    ("padding", "12px 24px"),
    ("font-size", "14px"),
    ("border-radius", "24px"),
    ("cursor", "pointer"),
    ("font-weight", "600"),
    ("box-shadow", "0 0 10px rgba(0,0,0,0.1)"),
    ("transition", "all 0.2s ease"),
];

/// What [`Suppressor::suppress`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressionOutcome {
    /// The outer post container was collapsed.
    Removed,
    /// The post content was wrapped and blurred behind a reveal button.
    Blurred {
        wrapper: NodeId,
        button: NodeId,
    },
    /// The post had been suppressed before; nothing changed.
    AlreadySuppressed,
    /// The markup did not have the expected shape; nothing changed.
    Skipped,
}

/// Applies a [`FilterMode`] to a post in a [`HostDocument`].
#[derive(Debug, Clone)]
pub struct Suppressor {
    layout: Arc<CompiledLayout>,
}

impl Suppressor {
    pub fn new(layout: Arc<CompiledLayout>) -> Self {
        Self { layout }
    }

    /// Suppress the post containing (or being) `post`.
    pub fn suppress(&self, doc: &dyn HostDocument, post: NodeId, mode: FilterMode) -> SuppressionOutcome {
        let Some(menu) = doc.closest(post, &self.layout.candidate) else {
            debug!(post = %post, "no control-menu container, skipping");
            return SuppressionOutcome::Skipped;
        };
        if doc.attribute(menu, MARKER_ATTR).is_some() {
            return SuppressionOutcome::AlreadySuppressed;
        }

        match mode {
            FilterMode::Remove => self.remove(doc, menu),
            FilterMode::Blur => blur(doc, menu),
        }
    }

    fn remove(&self, doc: &dyn HostDocument, menu: NodeId) -> SuppressionOutcome {
        let Some(container) = doc.closest(menu, &self.layout.post_container) else {
            debug!(menu = %menu, "no outer post container, skipping");
            return SuppressionOutcome::Skipped;
        };
        for (property, value) in REMOVE_STYLES {
            doc.set_style(container, property, value);
        }
        doc.set_attribute(menu, MARKER_ATTR, FilterMode::Remove.as_str());
        info!(post = %container, "post removed");
        SuppressionOutcome::Removed
    }
}

fn blur(doc: &dyn HostDocument, menu: NodeId) -> SuppressionOutcome {
    doc.set_attribute(menu, MARKER_ATTR, FilterMode::Blur.as_str());

    let wrapper = doc.create_element("div");
    for child in doc.children(menu) {
        doc.append_child(wrapper, child);
    }
    for (property, value) in WRAPPER_STYLES {
        doc.set_style(wrapper, property, value);
    }
    doc.set_style(menu, "position", "relative");

    let button = doc.create_element("button");
    doc.set_text(button, REVEAL_LABEL);
    for (property, value) in BUTTON_STYLES {
        doc.set_style(button, property, value);
    }
    doc.add_click_listener(
        button,
        Arc::new(move |doc: &dyn HostDocument| {
            if doc.style(button, "display").as_deref() == Some("none") {
                return;
            }
            doc.set_style(wrapper, "filter", "");
            doc.set_style(wrapper, "opacity", "1");
            doc.set_style(button, "display", "none");
            debug!(wrapper = %wrapper, "blurred post revealed");
        }),
    );

    doc.append_child(menu, wrapper);
    doc.append_child(menu, button);
    info!(post = %menu, "post blurred");
    SuppressionOutcome::Blurred { wrapper, button }
}
