//! Host abstraction layer for scrollsafe.
//!
//! The filtering pipeline talks to exactly two things outside itself: a
//! key-value configuration store and the live document it filters. Both are
//! traits here so the core is host-agnostic.
//!
//! # Architecture
//!
//! - [`store::KeyValueStore`] -- async get/set over named keys, with
//!   [`store::MemoryStore`] (in-process) and [`file_store::JsonFileStore`]
//!   (a JSON document on disk) implementations.
//! - [`document::HostDocument`] -- selector queries, style and tree mutation,
//!   click listeners, and a mutation subscription. [`document::MemoryDocument`]
//!   is an arena-backed implementation where every node is addressed by an
//!   opaque [`document::NodeId`].
//!
//! # Example
//!
//! ```rust
//! use scrollsafe_platform::document::{El, HostDocument, MemoryDocument, Selector};
//!
//! let doc = MemoryDocument::new();
//! let post = doc.build(&El::new("div").class("post").text("hello"));
//! doc.append_child(doc.body(), post);
//!
//! let selector = Selector::parse(".post").unwrap();
//! assert_eq!(doc.query_all(doc.body(), &selector), vec![post]);
//! ```

pub mod document;
pub mod file_store;
pub mod store;

pub use document::{HostDocument, MemoryDocument, NodeId, Selector};
pub use file_store::JsonFileStore;
pub use store::{KeyValueStore, MemoryStore, StoreError};
