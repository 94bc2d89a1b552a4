//! Shallow boundary diff between the live and incoming documents.
//!
//! Corresponding nested containers carry a marker attribute; the first
//! position at which the marker values differ is the swap boundary.
//! Everything above it is reused, everything below it is replaced.

use anyhow::{Error, anyhow};
use dom::{Document, NodeId};

/// An element carrying the boundary marker attribute, in document order.
#[derive(Debug, Clone)]
pub struct MarkerNode {
    pub node: NodeId,
    pub value: String,
}

/// Result of a boundary scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryDiff {
    /// Marker chains are identical; nothing to swap.
    Unchanged,
    /// First differing pair: the incoming document's boundary and the
    /// current document's boundary at the same index.
    Changed { incoming: NodeId, current: NodeId },
}

/// Collect every marker-carrying element with its value, in document order.
#[must_use]
pub fn marker_nodes(doc: &Document, attr: &str) -> Vec<MarkerNode> {
    doc.elements_with_attr(attr)
        .into_iter()
        .map(|(node, value)| MarkerNode { node, value })
        .collect()
}

/// Scan both documents' marker chains pairwise for the first divergence.
///
/// Positions before the divergence are untouched by the caller. Chains of
/// unequal depth with an otherwise equal common prefix are reported as an
/// error rather than silently truncated; the caller treats that as "no
/// visual change" after logging.
///
/// # Errors
/// Returns an error if the chains differ in depth without a differing
/// marker value in the common prefix.
pub fn find_boundary(
    incoming: &Document,
    current: &Document,
    attr: &str,
) -> Result<BoundaryDiff, Error> {
    let incoming_markers = marker_nodes(incoming, attr);
    let current_markers = marker_nodes(current, attr);

    for (new, old) in incoming_markers.iter().zip(current_markers.iter()) {
        if new.value != old.value {
            return Ok(BoundaryDiff::Changed {
                incoming: new.node,
                current: old.node,
            });
        }
    }

    if incoming_markers.len() != current_markers.len() {
        return Err(anyhow!(
            "marker chains diverge in depth ({} vs {}) with no differing value",
            incoming_markers.len(),
            current_markers.len()
        ));
    }
    Ok(BoundaryDiff::Unchanged)
}
