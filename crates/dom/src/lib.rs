//! Detached document model for the transition router.
//!
//! Parses HTML into an arena-backed tree and exposes the small query and
//! mutation surface navigation needs: attributes and classes, the document
//! title, stylesheet links in the head, and structural edits (insert-before,
//! detach, cross-document adoption).

#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]

pub mod document;
pub mod parser;

pub use document::{DomNode, Document, NodeKind};
pub use indextree::NodeId;
