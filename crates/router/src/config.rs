//! Runtime configuration for the transition router.
//!
//! Covers the markup contracts (marker attribute, layout prefix, duration
//! property) and the timing knobs (loading fallback delay, animation safety
//! margin, frame budget). Configuration can be loaded from environment
//! variables or constructed programmatically.

use core::time::Duration;
use std::env;

/// Runtime configuration for the transition router.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Attribute marking swappable boundary containers
    pub marker_attr: String,
    /// Marker-value prefix identifying layout boundaries; also the implicit
    /// top-level layout module key
    pub layout_prefix: String,
    /// CSS custom property on the boundary holding the transition duration
    pub duration_property: String,
    /// Delay before loading hooks fire on a slow navigation, in milliseconds
    pub loading_delay_ms: u64,
    /// Safety margin subtracted from the declared animation duration
    pub anim_margin_ms: u64,
    /// Duration used when the boundary declares none
    pub fallback_duration_ms: u64,
    /// Animation-frame budget in milliseconds
    pub frame_budget_ms: u64,
}

impl RouterConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following, falling back to the defaults:
    /// - `SLIPSTREAM_MARKER_ATTR`: boundary marker attribute (`data-page`)
    /// - `SLIPSTREAM_LAYOUT_PREFIX`: layout marker prefix (`_layouts`)
    /// - `SLIPSTREAM_LOADING_DELAY_MS`: loading fallback delay (100)
    /// - `SLIPSTREAM_ANIM_MARGIN_MS`: animation safety margin (20)
    /// - `SLIPSTREAM_FALLBACK_DURATION_MS`: duration fallback (300)
    /// - `SLIPSTREAM_FRAME_BUDGET_MS`: frame budget (16, minimum 1)
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read_ms = |name: &str, default: u64| {
            env::var(name)
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(default)
        };
        Self {
            marker_attr: env::var("SLIPSTREAM_MARKER_ATTR").unwrap_or(defaults.marker_attr),
            layout_prefix: env::var("SLIPSTREAM_LAYOUT_PREFIX").unwrap_or(defaults.layout_prefix),
            duration_property: defaults.duration_property,
            loading_delay_ms: read_ms("SLIPSTREAM_LOADING_DELAY_MS", defaults.loading_delay_ms),
            anim_margin_ms: read_ms("SLIPSTREAM_ANIM_MARGIN_MS", defaults.anim_margin_ms),
            fallback_duration_ms: read_ms(
                "SLIPSTREAM_FALLBACK_DURATION_MS",
                defaults.fallback_duration_ms,
            ),
            frame_budget_ms: read_ms("SLIPSTREAM_FRAME_BUDGET_MS", defaults.frame_budget_ms).max(1),
        }
    }

    /// Delay before the loading fallback fires.
    #[must_use]
    pub const fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_delay_ms)
    }

    /// Animation-frame budget as a `Duration`.
    #[must_use]
    pub const fn frame_budget(&self) -> Duration {
        Duration::from_millis(self.frame_budget_ms)
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            marker_attr: String::from("data-page"),
            layout_prefix: String::from("_layouts"),
            duration_property: String::from("--nav-anim-duration"),
            loading_delay_ms: 100,
            anim_margin_ms: 20,
            fallback_duration_ms: 300,
            frame_budget_ms: 16,
        }
    }
}
