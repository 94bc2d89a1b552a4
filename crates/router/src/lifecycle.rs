//! Per-navigation lifecycle state and the three hook registries.
//!
//! The context is the single owner of all cross-navigation mutable state:
//! the cleanup stack contributed by the active modules, the loading hooks
//! collected from them, the loaded-hook queue the loading hooks feed, the
//! navigation phase, and the generation counter that lets a superseded
//! navigation abandon its remaining work. It is constructed once at startup
//! and shared by reference; there are no ambient globals.

use crate::platform::Platform;
use crate::scripts::{Cleanup, LoadingHook, ScriptUnit};
use core::cell::RefCell;
use core::time::Duration;
use log::trace;
use std::rc::Rc;

/// Phase of the navigation currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPhase {
    Idle,
    /// Markup and behavior modules are resolving.
    Fetching,
    /// Added stylesheets are attaching and preloading.
    Styling,
    /// Old region cleanup and the animated swap.
    Swapping,
    /// The incoming page's modules are active.
    Active,
}

impl NavPhase {
    /// Whether the loading-hook fallback window is still open. The window
    /// closes when style resolution completes.
    #[must_use]
    pub const fn loading_window_open(self) -> bool {
        matches!(self, Self::Fetching | Self::Styling)
    }
}

/// Shared lifecycle state for the router, created once and never torn down.
pub struct NavigationContext {
    generation: u64,
    phase: NavPhase,
    /// LIFO stack of cleanups from the currently active modules.
    cleanups: Vec<Cleanup>,
    /// Hooks registered by the active modules, rebuilt each navigation.
    loading_hooks: Vec<LoadingHook>,
    /// Cleanups returned by fired loading hooks, drained once resolution
    /// completes.
    loaded_hooks: Vec<Cleanup>,
}

impl NavigationContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: 0,
            phase: NavPhase::Idle,
            cleanups: Vec::new(),
            loading_hooks: Vec::new(),
            loaded_hooks: Vec::new(),
        }
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn phase(&self) -> NavPhase {
        self.phase
    }

    /// Whether the navigation holding `generation` is still the current one.
    #[must_use]
    pub const fn owns(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Start a navigation, superseding any in flight, and return its
    /// generation token.
    pub fn begin_navigation(&mut self) -> u64 {
        self.generation += 1;
        self.phase = NavPhase::Fetching;
        self.generation
    }

    pub fn enter_styling(&mut self) {
        self.phase = NavPhase::Styling;
    }

    /// Close the loading window and move to the swap phase.
    pub fn enter_swapping(&mut self) {
        self.phase = NavPhase::Swapping;
    }

    pub fn enter_active(&mut self) {
        self.phase = NavPhase::Active;
    }

    /// Invoke every collected loading hook once, queueing returned cleanups
    /// for [`Self::drain_loaded_hooks`]. Hooks are consumed; they are never
    /// invoked twice.
    pub fn fire_loading_hooks(&mut self) {
        let hooks = core::mem::take(&mut self.loading_hooks);
        trace!("loading fallback fired with {} hooks", hooks.len());
        for hook in hooks {
            if let Some(cleanup) = hook() {
                self.loaded_hooks.push(cleanup);
            }
        }
    }

    /// Drain the loaded-hook queue. Runs exactly once per navigation when
    /// resolution completes; a no-op when the fallback never fired.
    pub fn drain_loaded_hooks(&mut self) {
        while let Some(cleanup) = self.loaded_hooks.pop() {
            cleanup();
        }
    }

    /// Invoke every active cleanup in last-registered-first order, fully
    /// emptying the stack. Must complete before any incoming unit's setup
    /// runs; draining an empty stack is a no-op.
    pub fn drain_cleanups(&mut self) {
        while let Some(cleanup) = self.cleanups.pop() {
            cleanup();
        }
    }

    /// Run each incoming unit's setup in order, collect the returned
    /// cleanups, and replace the loading-hook registry with the hooks the
    /// incoming units registered. Previously collected hooks are discarded
    /// without being invoked.
    pub fn register_and_run(&mut self, units: Vec<ScriptUnit>) {
        let mut loading_hooks = Vec::new();
        for unit in units {
            if let Some(cleanup) = unit.run(&mut loading_hooks) {
                self.cleanups.push(cleanup);
            }
        }
        self.loading_hooks = loading_hooks;
    }
}

impl Default for NavigationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Arm the loading fallback timer for the navigation holding `generation`.
///
/// After `delay`, the collected loading hooks fire only if that navigation
/// is still current and its loading window is still open; otherwise the
/// timer expires silently.
pub fn arm_loading_fallback(
    ctx: &Rc<RefCell<NavigationContext>>,
    platform: &Rc<dyn Platform>,
    generation: u64,
    delay: Duration,
) {
    let ctx = Rc::clone(ctx);
    let timer_platform = Rc::clone(platform);
    platform.spawn(Box::pin(async move {
        timer_platform.sleep(delay).await;
        let mut ctx = ctx.borrow_mut();
        if ctx.owns(generation) && ctx.phase().loading_window_open() {
            ctx.fire_loading_hooks();
        }
    }));
}
