mod common;

use common::page;
use dom::Document;
use router::diff::{BoundaryDiff, find_boundary, marker_nodes};

#[test]
fn identical_marker_chains_do_not_swap() {
    let current = Document::parse(&page("Home", &[], "index"));
    let incoming = Document::parse(&page("Home", &[], "index"));
    let diff = find_boundary(&incoming, &current, "data-page").unwrap();
    assert_eq!(diff, BoundaryDiff::Unchanged);
}

#[test]
fn first_divergence_is_the_boundary() {
    // current=[_layouts, index], new=[_layouts, about]: boundary at index 1,
    // the shared layout region is reused.
    let current = Document::parse(&page("Home", &[], "index"));
    let incoming = Document::parse(&page("About", &[], "about"));

    match find_boundary(&incoming, &current, "data-page").unwrap() {
        BoundaryDiff::Changed {
            incoming: new_node,
            current: old_node,
        } => {
            assert_eq!(incoming.attr(new_node, "data-page"), Some("about"));
            assert_eq!(current.attr(old_node, "data-page"), Some("index"));
            // Positions before the divergence are never part of the swap.
            assert_ne!(marker_nodes(&incoming, "data-page")[0].node, new_node);
            assert_ne!(marker_nodes(&current, "data-page")[0].node, old_node);
        }
        other => panic!("expected a changed boundary, got {other:?}"),
    }
}

#[test]
fn divergence_in_common_prefix_wins_over_depth() {
    // Chains of different depth still swap when a value differs within the
    // common prefix.
    let current = Document::parse(&page("Home", &[], "index"));
    let incoming = Document::parse(
        "<html><body><div data-page=\"_layouts\"><main data-page=\"about\">\
         <section data-page=\"about/team\"></section></main></div></body></html>",
    );
    let diff = find_boundary(&incoming, &current, "data-page").unwrap();
    assert!(matches!(diff, BoundaryDiff::Changed { .. }));
}

#[test]
fn depth_mismatch_without_divergence_is_an_error() {
    let current = Document::parse(&page("Home", &[], "index"));
    let incoming = Document::parse(
        "<html><body><div data-page=\"_layouts\"><main data-page=\"index\">\
         <section data-page=\"index/extra\"></section></main></div></body></html>",
    );
    assert!(find_boundary(&incoming, &current, "data-page").is_err());
}

#[test]
fn marker_nodes_follow_document_order() {
    let doc = Document::parse(&page("Home", &[], "index"));
    let nodes = marker_nodes(&doc, "data-page");
    let values: Vec<&str> = nodes.iter().map(|m| m.value.as_str()).collect();
    assert_eq!(values, vec!["_layouts", "index"]);
}
