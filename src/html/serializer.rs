// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Fragment serializer
//!
//! Text and attribute values are HTML-escaped here; filtering decides what
//! survives, escaping makes what survives inert. `<style>` text is emitted
//! raw because it is sanitizer-produced CSS (rules that could close the
//! element were already dropped by the CSS sanitizer).

use super::tree::{Fragment, NodeId, NodeType};

/// Elements serialized without a closing tag
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Serialize a whole fragment to HTML text
pub fn serialize_fragment(fragment: &Fragment) -> String {
    let mut out = String::new();
    serialize_children(fragment, fragment.root(), &mut out, false);
    out
}

fn serialize_children(fragment: &Fragment, id: NodeId, out: &mut String, raw_text: bool) {
    let children = match fragment.get(id) {
        Some(data) => data.children.clone(),
        None => return,
    };
    for child in children {
        serialize_node(fragment, child, out, raw_text);
    }
}

fn serialize_node(fragment: &Fragment, id: NodeId, out: &mut String, raw_text: bool) {
    let data = match fragment.get(id) {
        Some(data) => data,
        None => return,
    };
    match data.node_type {
        NodeType::Text => {
            let text = data.text.as_deref().unwrap_or("");
            if raw_text {
                out.push_str(text);
            } else {
                out.push_str(&html_escape(text));
            }
        }
        NodeType::Comment => {
            out.push_str("<!--");
            out.push_str(data.text.as_deref().unwrap_or(""));
            out.push_str("-->");
        }
        NodeType::Element => {
            let tag = data.tag_name.as_deref().unwrap_or("div");
            out.push('<');
            out.push_str(tag);
            for (name, value) in &data.attributes {
                out.push(' ');
                out.push_str(name);
                if !value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(&html_escape(value));
                    out.push('"');
                }
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag) {
                return;
            }
            serialize_children(fragment, id, out, tag == "style");
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        NodeType::Fragment => serialize_children(fragment, id, out, raw_text),
    }
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
