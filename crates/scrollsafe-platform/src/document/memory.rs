//! Arena-backed in-memory document.
//!
//! [`MemoryDocument`] keeps every node in a `Vec` indexed by [`NodeId`].
//! Nodes are never freed, so an id stays valid (and unique) for the life of
//! the document even after the node is detached. Subtree additions under
//! `<body>` are delivered to subscribers as [`MutationBatch`]es.
//!
//! Selector queries serialize the tree holding the scope to HTML, tagging
//! each element with its id, and run the selector over the
//! `scraper::Html` parse of that markup. Structure therefore follows HTML
//! parsing rules: a block element written inside a `<p>` ends up as its
//! sibling, exactly as it would when a browser parses the same markup.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::sync::Mutex;

use scraper::Html;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::trace;

use super::{ClickHandler, HostDocument, MutationBatch, MutationStream, NodeId, Selector};

/// Elements rendered on their own line by [`HostDocument::inner_text`].
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "div", "footer", "h1", "h2", "h3", "h4",
    "h5", "h6", "header", "li", "main", "nav", "ol", "p", "pre", "section", "ul",
];

/// Elements serialized without a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Attribute carrying the [`NodeId`] of each element in a query snapshot.
const SNAPSHOT_ID_ATTR: &str = "data-scrollsafe-node";

enum NodeKind {
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
        style: BTreeMap<String, String>,
    },
    Text(String),
}

struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<ClickHandler>,
}

struct Arena {
    nodes: Vec<Node>,
    body: NodeId,
}

impl Arena {
    fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u64);
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
        });
        id
    }

    fn element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            style: BTreeMap::new(),
        })
    }

    fn is_element(&self, id: NodeId) -> bool {
        matches!(self.get(id), Some(Node { kind: NodeKind::Element { .. }, .. }))
    }

    fn is_connected(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if node == self.body {
                return true;
            }
            cursor = self.get(node).and_then(|n| n.parent);
        }
        false
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(|n| n.parent);
        }
        false
    }

    fn detach(&mut self, child: NodeId) {
        let Some(old_parent) = self.get(child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent) = self.get_mut(old_parent) {
            parent.children.retain(|c| *c != child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
    }

    /// Move `child` under `parent`. Returns `false` (and does nothing) for
    /// invalid moves: non-element parent, unknown ids, or a cycle.
    fn attach(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.is_element(parent)
            || self.get(child).is_none()
            || self.is_inclusive_ancestor(child, parent)
        {
            return false;
        }
        self.detach(child);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        true
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for &child in &node.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    fn render_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { tag, style, .. } => {
                if style.get("display").is_some_and(|d| d == "none") {
                    return;
                }
                if tag == "br" {
                    out.push('\n');
                    return;
                }
                let block = BLOCK_TAGS.contains(&tag.as_str());
                if block && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                for &child in &node.children {
                    self.render_text(child, out);
                }
                if block && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }

    fn attr_of(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.get(node)?.kind {
            NodeKind::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            NodeKind::Text(_) => None,
        }
    }

    fn root_of(&self, node: NodeId) -> NodeId {
        let mut root = node;
        while let Some(parent) = self.parent_of(root) {
            root = parent;
        }
        root
    }

    /// Every element in `node`'s tree matching `selector`, in document
    /// order.
    fn select(&self, node: NodeId, selector: &Selector) -> Vec<NodeId> {
        let root = self.root_of(node);
        if !self.is_element(root) {
            return Vec::new();
        }
        let mut markup = String::new();
        self.write_html(root, &mut markup);
        let html = if root == self.body {
            Html::parse_document(&markup)
        } else {
            Html::parse_fragment(&markup)
        };
        html.select(selector.compiled())
            .filter_map(|el| el.value().attr(SNAPSHOT_ID_ATTR))
            .filter_map(|id| id.parse().ok())
            .map(NodeId)
            .collect()
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        match &node.kind {
            NodeKind::Text(text) => escape_html(text, out),
            NodeKind::Element { tag, attrs, style } => {
                let _ = write!(out, "<{tag} {SNAPSHOT_ID_ATTR}=\"{}\"", id.0);
                for (name, value) in attrs.iter().filter(|(n, _)| n.as_str() != SNAPSHOT_ID_ATTR) {
                    let _ = write!(out, " {name}=\"");
                    escape_html(value, out);
                    out.push('"');
                }
                if !style.is_empty() {
                    out.push_str(" style=\"");
                    for (property, value) in style {
                        escape_html(&format!("{property}: {value}; "), out);
                    }
                    out.push('"');
                }
                out.push('>');
                for &child in &node.children {
                    self.write_html(child, out);
                }
                if !VOID_TAGS.contains(&tag.as_str()) {
                    let _ = write!(out, "</{tag}>");
                }
            }
        }
    }
}

fn escape_html(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Declarative element description for [`MemoryDocument::build`].
#[derive(Debug, Clone, Default)]
pub struct El {
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    children: Vec<Child>,
}

#[derive(Debug, Clone)]
enum Child {
    Element(El),
    Text(String),
}

impl El {
    /// An element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add a class.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Append a text child.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Child::Text(text.into()));
        self
    }

    /// Append an element child.
    pub fn child(mut self, child: El) -> Self {
        self.children.push(Child::Element(child));
        self
    }
}

/// In-process [`HostDocument`].
pub struct MemoryDocument {
    arena: Mutex<Arena>,
    subscribers: Mutex<Vec<UnboundedSender<MutationBatch>>>,
}

impl MemoryDocument {
    /// A document containing only an empty `<body>`.
    pub fn new() -> Self {
        let mut arena = Arena {
            nodes: Vec::new(),
            body: NodeId(0),
        };
        arena.body = arena.element("body");
        Self {
            arena: Mutex::new(arena),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Materialize `template` as a detached subtree and return its root.
    pub fn build(&self, template: &El) -> NodeId {
        let mut arena = self.arena.lock().expect("MemoryDocument mutex poisoned");
        build_into(&mut arena, template)
    }

    /// Append several children and report them as a single mutation batch.
    pub fn append_all(&self, parent: NodeId, children: &[NodeId]) {
        let added: Vec<NodeId> = {
            let mut arena = self.arena.lock().expect("MemoryDocument mutex poisoned");
            let attached: Vec<NodeId> = children
                .iter()
                .copied()
                .filter(|&c| arena.attach(parent, c))
                .collect();
            if arena.is_connected(parent) {
                attached
            } else {
                Vec::new()
            }
        };
        self.emit(added);
    }

    fn emit(&self, added: Vec<NodeId>) {
        if added.is_empty() {
            return;
        }
        trace!(count = added.len(), "delivering mutation batch");
        let batch = MutationBatch { added };
        let mut subscribers = self
            .subscribers
            .lock()
            .expect("MemoryDocument mutex poisoned");
        subscribers.retain(|tx| tx.send(batch.clone()).is_ok());
    }

    fn with_arena<R>(&self, f: impl FnOnce(&Arena) -> R) -> R {
        let arena = self.arena.lock().expect("MemoryDocument mutex poisoned");
        f(&arena)
    }

    fn with_arena_mut<R>(&self, f: impl FnOnce(&mut Arena) -> R) -> R {
        let mut arena = self.arena.lock().expect("MemoryDocument mutex poisoned");
        f(&mut arena)
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn build_into(arena: &mut Arena, template: &El) -> NodeId {
    let id = arena.element(&template.tag);
    if let Some(Node {
        kind: NodeKind::Element { attrs, .. },
        ..
    }) = arena.get_mut(id)
    {
        for (k, v) in &template.attrs {
            attrs.insert(k.clone(), v.clone());
        }
        if !template.classes.is_empty() {
            attrs.insert("class".into(), template.classes.join(" "));
        }
    }
    for child in &template.children {
        let child_id = match child {
            Child::Element(el) => build_into(arena, el),
            Child::Text(text) => arena.alloc(NodeKind::Text(text.clone())),
        };
        arena.attach(id, child_id);
    }
    id
}

impl HostDocument for MemoryDocument {
    fn body(&self) -> NodeId {
        self.with_arena(|a| a.body)
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.with_arena(|a| a.is_element(node))
    }

    fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.with_arena(|a| {
            if a.get(scope).is_none() {
                return Vec::new();
            }
            a.select(scope, selector)
                .into_iter()
                .filter(|&n| n != scope && a.is_inclusive_ancestor(scope, n))
                .collect()
        })
    }

    fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        self.with_arena(|a| {
            a.get(node)?;
            let matched: HashSet<NodeId> = a.select(node, selector).into_iter().collect();
            let mut cursor = Some(node);
            while let Some(current) = cursor {
                if matched.contains(&current) {
                    return Some(current);
                }
                cursor = a.parent_of(current);
            }
            None
        })
    }

    fn text_content(&self, node: NodeId) -> String {
        self.with_arena(|a| {
            let mut out = String::new();
            a.collect_text(node, &mut out);
            out
        })
    }

    fn inner_text(&self, node: NodeId) -> String {
        self.with_arena(|a| {
            let mut out = String::new();
            a.render_text(node, &mut out);
            out.trim_matches('\n').to_string()
        })
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.with_arena(|a| a.get(node).map(|n| n.children.clone()).unwrap_or_default())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.with_arena(|a| a.parent_of(node))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.with_arena(|a| a.attr_of(node, name).map(str::to_string))
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.with_arena_mut(|a| {
            if let Some(Node {
                kind: NodeKind::Element { attrs, .. },
                ..
            }) = a.get_mut(node)
            {
                attrs.insert(name.to_string(), value.to_string());
            }
        });
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.with_arena(|a| match &a.get(node)?.kind {
            NodeKind::Element { style, .. } => style.get(property).cloned(),
            NodeKind::Text(_) => None,
        })
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) {
        self.with_arena_mut(|a| {
            if let Some(Node {
                kind: NodeKind::Element { style, .. },
                ..
            }) = a.get_mut(node)
            {
                if value.is_empty() {
                    style.remove(property);
                } else {
                    style.insert(property.to_string(), value.to_string());
                }
            }
        });
    }

    fn create_element(&self, tag: &str) -> NodeId {
        self.with_arena_mut(|a| a.element(tag))
    }

    fn set_text(&self, node: NodeId, text: &str) {
        let added = self.with_arena_mut(|a| {
            if !a.is_element(node) {
                return None;
            }
            let old = a.get(node).map(|n| n.children.clone()).unwrap_or_default();
            for child in old {
                a.detach(child);
            }
            let text_node = a.alloc(NodeKind::Text(text.to_string()));
            a.attach(node, text_node);
            a.is_connected(node).then_some(text_node)
        });
        if let Some(text_node) = added {
            self.emit(vec![text_node]);
        }
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        self.append_all(parent, &[child]);
    }

    fn add_click_listener(&self, node: NodeId, handler: ClickHandler) {
        self.with_arena_mut(|a| {
            if let Some(n) = a.get_mut(node) {
                n.listeners.push(handler);
            }
        });
    }

    fn click(&self, node: NodeId) {
        // Listeners run without the arena lock held; they mutate the document.
        let listeners = self.with_arena(|a| {
            a.get(node)
                .map(|n| n.listeners.clone())
                .unwrap_or_default()
        });
        let doc: &dyn HostDocument = self;
        for listener in listeners {
            listener(doc);
        }
    }

    fn subscribe(&self) -> MutationStream {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .expect("MemoryDocument mutex poisoned")
            .push(tx);
        rx
    }
}
