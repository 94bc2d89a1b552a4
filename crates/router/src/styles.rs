//! Stylesheet set reconciliation around the region swap.
//!
//! Shared stylesheet URLs are never touched: strictly-added URLs are
//! attached and preloaded before the swap so the incoming region never
//! flashes unstyled, and strictly-removed URLs are detached only after the
//! old region is gone.

use crate::fetch::Transport;
use dom::Document;
use futures::future::join_all;
use log::warn;
use std::collections::HashSet;
use url::Url;

/// Stylesheet URLs strictly added by the incoming page and strictly removed
/// from the current one. URLs present in both sets appear in neither list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StyleDiff {
    pub to_load: Vec<String>,
    pub to_remove: Vec<String>,
}

/// Compare the two documents' `head > link[rel="stylesheet"]` URL sets.
#[must_use]
pub fn diff_styles(current: &Document, incoming: &Document) -> StyleDiff {
    let old = current.stylesheet_hrefs();
    let new = incoming.stylesheet_hrefs();
    let old_set: HashSet<&str> = old.iter().map(String::as_str).collect();
    let new_set: HashSet<&str> = new.iter().map(String::as_str).collect();
    StyleDiff {
        to_load: new
            .iter()
            .filter(|href| !old_set.contains(href.as_str()))
            .cloned()
            .collect(),
        to_remove: old
            .iter()
            .filter(|href| !new_set.contains(href.as_str()))
            .cloned()
            .collect(),
    }
}

/// Fetch the added stylesheets in parallel before the swap.
///
/// A failed load is logged and treated as a successful one so a broken
/// stylesheet never blocks navigation.
pub async fn preload(transport: &dyn Transport, base: &Url, hrefs: &[String]) {
    let loads = hrefs.iter().map(|href| async move {
        match base.join(href) {
            Ok(url) => {
                if let Err(err) = transport.fetch_text(&url).await {
                    warn!("stylesheet {href} failed to load, continuing: {err}");
                }
            }
            Err(err) => warn!("unresolvable stylesheet href {href}: {err}"),
        }
    });
    join_all(loads).await;
}

/// Append link elements for the added stylesheets to the live head.
pub fn attach_links(doc: &mut Document, hrefs: &[String]) {
    let Some(head) = doc.head() else {
        return;
    };
    for href in hrefs {
        let link = doc.create_element(head, "link");
        doc.set_attr(link, "rel", "stylesheet");
        doc.set_attr(link, "href", href);
    }
}

/// Detach the stale stylesheets, called only after the old region is gone.
pub fn detach_links(doc: &mut Document, hrefs: &[String]) {
    for href in hrefs {
        if let Some(link) = doc.stylesheet_link(href) {
            doc.remove(link);
        }
    }
}
