//! Top-level navigation interceptor.
//!
//! Owns the live document and sequences the pipeline per navigation: fetch
//! and module resolution together, title update, style attach/preload,
//! loaded-hook settlement and cleanup drain, boundary diff, animated swap,
//! stale style detach, and finally activation of the incoming page's
//! modules. A generation counter supersedes overlapping navigations: every
//! step after a suspension point re-checks ownership and abandons silently
//! when a newer navigation has begun.

use crate::animate::animate_swap;
use crate::config::RouterConfig;
use crate::diff::{BoundaryDiff, find_boundary};
use crate::fetch::{Transport, fetch_page};
use crate::lifecycle::{NavigationContext, arm_loading_fallback};
use crate::platform::Platform;
use crate::scripts::{ScriptRegistry, layout_keys, load_layout_units, module_key, resolve_unit};
use crate::styles::{attach_links, detach_links, diff_styles, preload};
use anyhow::Error;
use core::cell::{Ref, RefCell};
use dom::Document;
use futures::future::join;
use log::{debug, warn};
use std::rc::Rc;
use tracing::{Instrument as _, info_span};
use url::Url;

/// Where a link activation or history pop should navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub pathname: String,
    pub href: String,
    pub fragment: Option<String>,
}

impl NavigationTarget {
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        Self {
            pathname: url.path().to_owned(),
            href: url.as_str().to_owned(),
            fragment: url.fragment().map(str::to_owned),
        }
    }
}

/// How the router handled an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Cross-origin activation; left to the host's default handling.
    NotIntercepted,
    /// Unchanged path with a fragment: scrolled in-page, no transition.
    ScrolledToFragment,
    /// Unchanged path, nothing to do.
    SamePage,
    /// Transition ran to completion (with or without a region swap).
    Completed,
    /// A newer navigation superseded this one; remaining work abandoned.
    Superseded,
}

/// The transition router.
///
/// Holds the live document, the shared [`NavigationContext`], the behavior
/// module registry, and the host seams. All methods take `&self`; state
/// lives behind `RefCell` and borrows are never held across suspension
/// points, so overlapping navigations interleave safely under the
/// generation discipline.
pub struct Router {
    live: Rc<RefCell<Document>>,
    ctx: Rc<RefCell<NavigationContext>>,
    registry: ScriptRegistry,
    transport: Rc<dyn Transport>,
    platform: Rc<dyn Platform>,
    config: RouterConfig,
    base: Url,
    current_pathname: RefCell<String>,
}

impl Router {
    #[must_use]
    pub fn new(
        live: Document,
        base: Url,
        registry: ScriptRegistry,
        transport: Rc<dyn Transport>,
        platform: Rc<dyn Platform>,
        config: RouterConfig,
    ) -> Self {
        let current_pathname = RefCell::new(base.path().to_owned());
        Self {
            live: Rc::new(RefCell::new(live)),
            ctx: Rc::new(RefCell::new(NavigationContext::new())),
            registry,
            transport,
            platform,
            config,
            base,
            current_pathname,
        }
    }

    /// The live document.
    #[must_use]
    pub fn document(&self) -> Ref<'_, Document> {
        self.live.borrow()
    }

    /// Path of the page currently active.
    #[must_use]
    pub fn current_pathname(&self) -> String {
        self.current_pathname.borrow().clone()
    }

    /// Initial-load wiring: resolve the current path's unit and the live
    /// document's layout units together, then run their setups to seed the
    /// lifecycle registries.
    pub async fn start(&self) {
        let keys = {
            let doc = self.live.borrow();
            layout_keys(&doc, &self.config)
        };
        let pathname = self.current_pathname();
        let (page_unit, layout_units) = join(
            resolve_unit(&self.registry, module_key(&pathname)),
            load_layout_units(&self.registry, &keys),
        )
        .await;
        let mut units = vec![page_unit];
        units.extend(layout_units);
        self.ctx.borrow_mut().register_and_run(units);
    }

    /// Handle a same-origin link activation.
    ///
    /// Cross-origin targets are not intercepted. A fragment on the current
    /// path scrolls in-page instead of transitioning. Otherwise history is
    /// pushed before the transition begins.
    ///
    /// # Errors
    /// Returns an error if the page fetch fails; the live document is left
    /// in its pre-navigation state.
    pub async fn on_link_activated(&self, url: &Url) -> Result<NavigationOutcome, Error> {
        if url.origin() != self.base.origin() {
            return Ok(NavigationOutcome::NotIntercepted);
        }
        let same_path = url.path() == *self.current_pathname.borrow();
        if same_path {
            if let Some(fragment) = url.fragment() {
                self.platform.scroll_to_fragment(fragment);
                return Ok(NavigationOutcome::ScrolledToFragment);
            }
            return Ok(NavigationOutcome::SamePage);
        }
        self.platform.push_history(url.as_str());
        self.navigate(&NavigationTarget::from_url(url)).await
    }

    /// Handle a history pop: run the same pipeline unless the path is
    /// unchanged or a fragment is present.
    ///
    /// # Errors
    /// Returns an error if the page fetch fails.
    pub async fn on_pop_state(&self, location: &Url) -> Result<NavigationOutcome, Error> {
        let same_path = location.path() == *self.current_pathname.borrow();
        if location.fragment().is_none() && !same_path {
            return self.navigate(&NavigationTarget::from_url(location)).await;
        }
        Ok(NavigationOutcome::SamePage)
    }

    /// Run a full transition to `target`.
    ///
    /// # Errors
    /// Returns an error if the fetch fails or the swap cannot be hosted;
    /// no error is surfaced to the page, the navigation simply does not
    /// complete.
    pub async fn navigate(&self, target: &NavigationTarget) -> Result<NavigationOutcome, Error> {
        self.navigate_inner(target)
            .instrument(info_span!("navigate", href = %target.href))
            .await
    }

    async fn navigate_inner(&self, target: &NavigationTarget) -> Result<NavigationOutcome, Error> {
        let generation = self.ctx.borrow_mut().begin_navigation();
        arm_loading_fallback(
            &self.ctx,
            &self.platform,
            generation,
            self.config.loading_delay(),
        );
        let url = self.base.join(&target.href)?;

        // Markup and the target's layout modules resolve as one task, the
        // path's own module as another; all must land before styling.
        let page_and_layouts = async {
            let page = fetch_page(self.transport.as_ref(), &url).await?;
            let keys = layout_keys(&page.document, &self.config);
            let layouts = load_layout_units(&self.registry, &keys).await;
            Ok::<_, Error>((page, layouts))
        };
        let path_unit = resolve_unit(&self.registry, module_key(&target.pathname));
        let (page_result, path_unit) = join(page_and_layouts, path_unit).await;
        let (page, layout_units) = page_result?;
        if !self.owns(generation) {
            return Ok(NavigationOutcome::Superseded);
        }

        self.live.borrow_mut().set_title(&page.title);

        self.ctx.borrow_mut().enter_styling();
        let style_diff = diff_styles(&self.live.borrow(), &page.document);
        attach_links(&mut self.live.borrow_mut(), &style_diff.to_load);
        preload(self.transport.as_ref(), &self.base, &style_diff.to_load).await;
        if !self.owns(generation) {
            return Ok(NavigationOutcome::Superseded);
        }

        // Resolution is complete: close the loading window, settle any
        // fired loading hooks, and retire the old page's modules before
        // anything of the new page runs.
        {
            let mut ctx = self.ctx.borrow_mut();
            ctx.enter_swapping();
            ctx.drain_loaded_hooks();
            ctx.drain_cleanups();
        }

        let boundary = {
            let live = self.live.borrow();
            find_boundary(&page.document, &live, &self.config.marker_attr)
        };
        match boundary {
            Ok(BoundaryDiff::Changed { incoming, current }) => {
                animate_swap(
                    &self.live,
                    &page.document,
                    incoming,
                    current,
                    self.platform.as_ref(),
                    &self.config,
                )
                .await?;
                if !self.owns(generation) {
                    return Ok(NavigationOutcome::Superseded);
                }
            }
            Ok(BoundaryDiff::Unchanged) => {
                debug!("no boundary difference; completing without a swap");
            }
            Err(err) => {
                warn!("structural mismatch between marker chains, completing without a swap: {err}");
            }
        }

        detach_links(&mut self.live.borrow_mut(), &style_diff.to_remove);

        {
            let mut ctx = self.ctx.borrow_mut();
            ctx.enter_active();
            let mut units = vec![path_unit];
            units.extend(layout_units);
            ctx.register_and_run(units);
        }
        *self.current_pathname.borrow_mut() = target.pathname.clone();
        Ok(NavigationOutcome::Completed)
    }

    fn owns(&self, generation: u64) -> bool {
        let owns = self.ctx.borrow().owns(generation);
        if !owns {
            debug!("navigation superseded; abandoning remaining work");
        }
        owns
    }
}
