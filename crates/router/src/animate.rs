//! Animated region swap.
//!
//! The incoming boundary is adopted into the live tree immediately before
//! the old one, both slide simultaneously on the next animation frame, and
//! the old boundary is detached once the declared duration (minus a safety
//! margin) has elapsed.

use crate::config::RouterConfig;
use crate::platform::Platform;
use anyhow::{Error, anyhow};
use core::cell::RefCell;
use core::time::Duration;
use dom::{Document, NodeId};

const SLIDE_IN: &str = "slideIn";
const SLIDE_OUT: &str = "slideOut";

/// Parse the leading integer of a CSS time value, e.g. `"300ms"` -> 300.
fn parse_millis(value: &str) -> Option<u64> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Swap `old_boundary` for `incoming_boundary`, animating both.
///
/// The transition duration comes from the boundary's declared custom
/// property, falling back to the configured duration when absent or
/// unparsable. The boundaries' shared parent becomes the animation's
/// coordinate frame (`position: relative`). Resolves once the old boundary
/// has been removed.
///
/// # Errors
/// Returns an error if the old boundary has no parent to host the swap.
pub async fn animate_swap(
    live: &RefCell<Document>,
    incoming_doc: &Document,
    incoming_boundary: NodeId,
    old_boundary: NodeId,
    platform: &dyn Platform,
    config: &RouterConfig,
) -> Result<(), Error> {
    let declared_ms = incoming_doc
        .style_property(incoming_boundary, &config.duration_property)
        .and_then(|value| parse_millis(&value))
        .unwrap_or(config.fallback_duration_ms);
    let duration = Duration::from_millis(declared_ms.saturating_sub(config.anim_margin_ms));

    let new_boundary = {
        let mut doc = live.borrow_mut();
        let Some(parent) = doc.parent(old_boundary) else {
            return Err(anyhow!("old boundary has no parent to host the swap"));
        };
        doc.set_style_property(parent, "position", "relative");
        doc.adopt_before(incoming_doc, incoming_boundary, old_boundary)
    };

    platform.next_frame().await;
    {
        let mut doc = live.borrow_mut();
        doc.add_class(new_boundary, SLIDE_IN);
        doc.add_class(old_boundary, SLIDE_OUT);
    }

    platform.sleep(duration).await;
    {
        let mut doc = live.borrow_mut();
        doc.remove_class(new_boundary, SLIDE_IN);
        doc.remove(old_boundary);
    }
    Ok(())
}
