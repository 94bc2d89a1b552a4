use core::cell::RefCell;
use core::time::Duration;
use futures::future::LocalBoxFuture;
use log::trace;

/// Host scheduling and navigation services the router does not own:
/// animation frames, timers, task spawning, session history, and in-page
/// scrolling. Implementations are expected to be single-threaded; futures
/// are `!Send`.
pub trait Platform {
    /// Resolves on the next animation-frame tick.
    fn next_frame(&self) -> LocalBoxFuture<'_, ()>;

    /// Resolves after the given delay.
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'_, ()>;

    /// Schedule a task on the host's event loop.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    /// Push an entry onto the session history before a transition begins.
    fn push_history(&self, href: &str);

    /// Smoothly scroll the element matching the fragment into view.
    fn scroll_to_fragment(&self, fragment: &str);
}

/// Production [`Platform`] backed by tokio timers and a local task set.
///
/// Frames tick on a fixed budget and history entries accumulate in an
/// inspectable in-memory log. Requires a current-thread runtime with a
/// [`tokio::task::LocalSet`] entered, since spawned tasks are `!Send`.
pub struct TokioPlatform {
    frame_budget: Duration,
    history: RefCell<Vec<String>>,
}

impl TokioPlatform {
    #[must_use]
    pub const fn new(frame_budget: Duration) -> Self {
        Self {
            frame_budget,
            history: RefCell::new(Vec::new()),
        }
    }

    /// Snapshot of the pushed history entries, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }
}

impl Platform for TokioPlatform {
    fn next_frame(&self) -> LocalBoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(self.frame_budget))
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(duration))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        drop(tokio::task::spawn_local(task));
    }

    fn push_history(&self, href: &str) {
        trace!("history push: {href}");
        self.history.borrow_mut().push(href.to_owned());
    }

    fn scroll_to_fragment(&self, fragment: &str) {
        trace!("scrolling #{fragment} into view");
    }
}
