//! In-app page transition router.
//!
//! Replaces full-page navigation with an animated region swap: same-origin
//! link activations are intercepted, the target page is fetched and parsed
//! into a detached document, the first differing marker-attribute boundary is
//! located, strictly-added stylesheets are loaded before the swap and stale
//! ones detached after, and per-page behavior modules are torn down and set
//! up around the transition. Host services (network, frames, timers, history,
//! scrolling) are supplied through trait seams.

/// Timed region swap driven by the boundary's declared duration
pub mod animate;
pub mod config;
/// Marker-attribute boundary diffing between the live and incoming documents
pub mod diff;
/// Page fetching and the network transport seam
pub mod fetch;
pub mod lifecycle;
pub mod navigator;
/// Host scheduling, history, and scrolling seam
pub mod platform;
/// Behavior module registry, resolution, and the lifecycle contract
pub mod scripts;
/// Stylesheet set diffing around the swap
pub mod styles;

pub use config::RouterConfig;
pub use navigator::{NavigationOutcome, NavigationTarget, Router};
