#![allow(dead_code)]

use anyhow::{Error, anyhow};
use core::cell::RefCell;
use core::time::Duration;
use futures::future::LocalBoxFuture;
use router::fetch::Transport;
use router::platform::Platform;
use router::scripts::{BehaviorModule, Cleanup, SetupContext};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use url::Url;

/// Shared event log for asserting lifecycle ordering.
#[derive(Clone, Default)]
pub struct Events(Rc<RefCell<Vec<String>>>);

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.0.borrow_mut().push(event.into());
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == event)
    }

    pub fn count(&self, event: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == event).count()
    }
}

/// Canned-response transport with per-URL delays and failures.
#[derive(Default)]
pub struct MockTransport {
    pages: RefCell<HashMap<String, String>>,
    delays: RefCell<HashMap<String, Duration>>,
    failing: RefCell<HashSet<String>>,
    log: RefCell<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn serve(&self, url: &str, body: impl Into<String>) {
        self.pages.borrow_mut().insert(url.to_owned(), body.into());
    }

    pub fn delay(&self, url: &str, delay: Duration) {
        self.delays.borrow_mut().insert(url.to_owned(), delay);
    }

    pub fn fail(&self, url: &str) {
        self.failing.borrow_mut().insert(url.to_owned());
    }

    /// URLs fetched, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl Transport for MockTransport {
    fn fetch_text(&self, url: &Url) -> LocalBoxFuture<'_, Result<String, Error>> {
        let url = url.clone();
        Box::pin(async move {
            self.log.borrow_mut().push(url.to_string());
            let delay = self.delays.borrow().get(url.as_str()).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing.borrow().contains(url.as_str()) {
                return Err(anyhow!("canned failure for {url}"));
            }
            self.pages
                .borrow()
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| anyhow!("no canned page for {url}"))
        })
    }
}

/// Platform with tokio timers and recorded history/scroll calls.
#[derive(Default)]
pub struct TestPlatform {
    history: RefCell<Vec<String>>,
    scrolls: RefCell<Vec<String>>,
}

impl TestPlatform {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    pub fn scrolls(&self) -> Vec<String> {
        self.scrolls.borrow().clone()
    }
}

impl Platform for TestPlatform {
    fn next_frame(&self) -> LocalBoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(Duration::from_millis(1)))
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(duration))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        drop(tokio::task::spawn_local(task));
    }

    fn push_history(&self, href: &str) {
        self.history.borrow_mut().push(href.to_owned());
    }

    fn scroll_to_fragment(&self, fragment: &str) {
        self.scrolls.borrow_mut().push(fragment.to_owned());
    }
}

/// Module that logs setup/cleanup (and optionally a loading hook pair) to
/// the shared event log.
pub struct RecordingModule {
    name: &'static str,
    events: Events,
    with_loading_hook: bool,
}

impl RecordingModule {
    pub fn new(name: &'static str, events: &Events) -> Rc<Self> {
        Rc::new(Self {
            name,
            events: events.clone(),
            with_loading_hook: false,
        })
    }

    pub fn with_loading_hook(name: &'static str, events: &Events) -> Rc<Self> {
        Rc::new(Self {
            name,
            events: events.clone(),
            with_loading_hook: true,
        })
    }
}

impl BehaviorModule for RecordingModule {
    fn setup(&self, ctx: &mut SetupContext<'_>) -> Option<Cleanup> {
        self.events.push(format!("setup:{}", self.name));
        if self.with_loading_hook {
            let events = self.events.clone();
            let name = self.name;
            ctx.on_loading(move || {
                events.push(format!("loading:{name}"));
                let loaded = events.clone();
                Some(Box::new(move || loaded.push(format!("loaded:{name}"))) as Cleanup)
            });
        }
        let events = self.events.clone();
        let name = self.name;
        Some(Box::new(move || events.push(format!("cleanup:{name}"))))
    }
}

/// Build a page with the standard two-level boundary chain: the top-level
/// layout wrapping a per-page region, duration declared on the region.
pub fn page(title: &str, styles: &[&str], page_marker: &str) -> String {
    let links: String = styles
        .iter()
        .map(|href| format!("<link rel=\"stylesheet\" href=\"{href}\">"))
        .collect();
    format!(
        "<!DOCTYPE html><html><head><title>{title}</title>{links}</head>\
         <body><div data-page=\"_layouts\">\
         <main data-page=\"{page_marker}\" style=\"--nav-anim-duration: 30ms\">\
         <h1>{title}</h1></main></div></body></html>"
    )
}

/// Marker values of the document's boundary chain, in document order.
pub fn markers(doc: &dom::Document) -> Vec<String> {
    doc.elements_with_attr("data-page")
        .into_iter()
        .map(|(_, value)| value)
        .collect()
}
