//! HTML parsing into a detached [`Document`] via html5ever.

mod sink;

use crate::document::Document;
use html5ever::tendril::StrTendril;
use html5ever::tendril::TendrilSink as _;
use html5ever::{ParseOpts, parse_document};
use sink::DocumentSink;

/// Parse a complete HTML string into a detached document tree.
#[must_use]
pub fn parse(html: &str) -> Document {
    let sink = DocumentSink::new();
    parse_document(sink, ParseOpts::default()).one(StrTendril::from(html))
}
