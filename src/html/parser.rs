// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML fragment parser using html5ever
//!
//! Parsing is side-effect-free: nothing is executed, nothing is fetched.
//! Input is parsed as a fragment in `<body>` context (the way browsers
//! parse `innerHTML` assignments), so the sanitizer sees the same tree a
//! browser would build for the same untrusted string.

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{local_name, namespace_url, ns, parse_fragment, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use super::tree::{Fragment, NodeData, NodeId};

/// Nesting depth beyond which subtrees are dropped. Caps the recursion of
/// the conversion here and of every later pass over the arena (walk,
/// serialization, deletion).
const MAX_DEPTH: usize = 256;

/// Parse an HTML fragment into a detached [`Fragment`]
pub fn parse_html_fragment(html: &str) -> Fragment {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_fragment(
        RcDom::default(),
        opts,
        QualName::new(None, ns!(html), local_name!("body")),
        vec![],
    )
    .one(StrTendril::from(html));

    let mut fragment = Fragment::new();
    let root = fragment.root();

    // Fragment parsing yields a synthetic <html> element wrapping the
    // parsed nodes; convert its children.
    for child in dom.document.children.borrow().iter() {
        if let RcNodeData::Element { ref name, .. } = child.data {
            if name.local.as_ref() == "html" {
                for grandchild in child.children.borrow().iter() {
                    convert_node(grandchild, root, &mut fragment, 0);
                }
                continue;
            }
        }
        convert_node(child, root, &mut fragment, 0);
    }

    fragment
}

/// Convert one html5ever node (and its subtree) into the arena
fn convert_node(handle: &Handle, parent: NodeId, fragment: &mut Fragment, depth: usize) {
    if depth > MAX_DEPTH {
        tracing::debug!("dropping subtree nested beyond depth limit");
        return;
    }
    let data = match handle.data {
        RcNodeData::Document | RcNodeData::Doctype { .. } => return,
        RcNodeData::ProcessingInstruction { .. } => return,
        RcNodeData::Text { ref contents } => NodeData::text(contents.borrow().to_string()),
        RcNodeData::Comment { ref contents } => NodeData::comment(contents.to_string()),
        RcNodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let mut data = NodeData::element(name.local.as_ref());
            for attr in attrs.borrow().iter() {
                let attr_name = attr.name.local.to_string().to_lowercase();
                // First occurrence wins, matching browser attribute parsing.
                if !data.attributes.iter().any(|(n, _)| *n == attr_name) {
                    data.attributes.push((attr_name, attr.value.to_string()));
                }
            }
            data
        }
    };

    let id = fragment.append(parent, data);
    for child in handle.children.borrow().iter() {
        convert_node(child, id, fragment, depth + 1);
    }
}
