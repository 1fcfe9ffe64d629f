// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Allow-list configuration
//!
//! The table governing which elements and attributes survive sanitization,
//! and how attribute values are interpreted. Built once by the builder and
//! immutable inside a `Sanitizer`. No entry means dropped.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How an attribute value is validated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrKind {
    /// Kept verbatim (HTML-escaped on serialization)
    Text,
    /// Resolved through the URL policy engine; rejection removes the
    /// attribute
    Url,
    /// Passed through the CSS sanitizer; an empty result removes the
    /// attribute
    Style,
    /// Kept only when the value matches one of the listed tokens
    /// (ASCII case-insensitive)
    Enumerated(Vec<String>),
}

/// What happens to an element the walk encounters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    /// Element kept, attributes filtered, children walked
    Keep,
    /// Tag stripped, children promoted into its place
    Unwrap,
    /// Element and its whole subtree removed without recursing
    DropSubtree,
}

lazy_static! {
    static ref DEFAULT_ALLOWLIST: AllowList = AllowList::conservative();
}

/// Element/attribute allow-list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowList {
    /// Element name → attributes allowed specifically on it
    elements: HashMap<String, HashSet<String>>,
    /// Attributes allowed on every allowed element
    generic_attributes: HashSet<String>,
    /// Attribute name → value kind (absent means Text)
    attribute_kinds: HashMap<String, AttrKind>,
    /// Elements whose tag is stripped but children kept
    unwrap_elements: HashSet<String>,
    /// Disposition for elements with no entry anywhere
    unknown_disposition: Disposition,
    /// Keep `data-*` attributes on allowed elements
    allow_data_attributes: bool,
}

impl Default for AllowList {
    fn default() -> Self {
        DEFAULT_ALLOWLIST.clone()
    }
}

impl AllowList {
    /// The conservative default list: formatting, lists, tables, links and
    /// images. Unknown elements drop with their subtree; structural
    /// containers unwrap so full-document input degrades to its content.
    pub fn conservative() -> Self {
        let mut elements: HashMap<String, HashSet<String>> = HashMap::new();
        let plain = [
            "abbr", "b", "blockquote", "br", "caption", "cite", "code", "dd", "del", "details",
            "dfn", "div", "dl", "dt", "em", "figcaption", "figure", "h1", "h2", "h3", "h4", "h5",
            "h6", "hr", "i", "ins", "kbd", "li", "mark", "p", "pre", "s", "samp", "small", "span",
            "strike", "strong", "sub", "summary", "sup", "table", "tbody", "tfoot", "thead",
            "tr", "u", "ul", "var", "wbr",
        ];
        for tag in plain {
            elements.insert(tag.to_string(), HashSet::new());
        }
        let with_attrs: [(&str, &[&str]); 8] = [
            ("a", &["href", "hreflang"]),
            ("img", &["src", "alt", "width", "height"]),
            ("blockquote", &["cite"]),
            ("q", &["cite"]),
            ("del", &["cite", "datetime"]),
            ("ins", &["cite", "datetime"]),
            ("ol", &["start"]),
            ("time", &["datetime"]),
        ];
        for (tag, attrs) in with_attrs {
            elements.insert(
                tag.to_string(),
                attrs.iter().map(|a| a.to_string()).collect(),
            );
        }
        for tag in ["td", "th"] {
            elements.insert(
                tag.to_string(),
                ["colspan", "rowspan"].iter().map(|a| a.to_string()).collect(),
            );
        }

        // `style` values never pass through verbatim: the Style kind routes
        // them into the CSS sanitizer.
        let generic_attributes = ["title", "lang", "dir", "class", "id", "style"]
            .iter()
            .map(|a| a.to_string())
            .collect();

        let mut attribute_kinds = HashMap::new();
        for attr in ["href", "src", "cite", "action", "formaction", "poster"] {
            attribute_kinds.insert(attr.to_string(), AttrKind::Url);
        }
        attribute_kinds.insert("style".to_string(), AttrKind::Style);
        attribute_kinds.insert(
            "dir".to_string(),
            AttrKind::Enumerated(vec![
                "ltr".to_string(),
                "rtl".to_string(),
                "auto".to_string(),
            ]),
        );

        let unwrap_elements = ["html", "head", "body"]
            .iter()
            .map(|t| t.to_string())
            .collect();

        Self {
            elements,
            generic_attributes,
            attribute_kinds,
            unwrap_elements,
            unknown_disposition: Disposition::DropSubtree,
            allow_data_attributes: false,
        }
    }

    /// Load an allow-list from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decide what happens to an element
    pub fn disposition(&self, tag: &str) -> Disposition {
        if self.elements.contains_key(tag) {
            Disposition::Keep
        } else if self.unwrap_elements.contains(tag) {
            Disposition::Unwrap
        } else {
            self.unknown_disposition
        }
    }

    /// Check whether an attribute is allowed on an element
    pub fn attribute_allowed(&self, tag: &str, attr: &str) -> bool {
        if self.generic_attributes.contains(attr) {
            return true;
        }
        if self.allow_data_attributes && is_valid_data_attribute(attr) {
            return true;
        }
        self.elements
            .get(tag)
            .map(|attrs| attrs.contains(attr))
            .unwrap_or(false)
    }

    /// Value kind for an attribute (Text when unlisted)
    pub fn attribute_kind(&self, attr: &str) -> &AttrKind {
        self.attribute_kinds.get(attr).unwrap_or(&AttrKind::Text)
    }

    /// Allow an element with element-specific attributes
    pub fn allow_element(&mut self, tag: &str, attrs: &[&str]) {
        self.elements.insert(
            tag.to_lowercase(),
            attrs.iter().map(|a| a.to_lowercase()).collect(),
        );
    }

    /// Remove an element (it falls back to the unknown disposition)
    pub fn deny_element(&mut self, tag: &str) {
        let tag = tag.to_lowercase();
        self.elements.remove(&tag);
        self.unwrap_elements.remove(&tag);
    }

    /// Allow an attribute on one element, with its value kind
    pub fn allow_attribute(&mut self, tag: &str, attr: &str, kind: AttrKind) {
        let attr = attr.to_lowercase();
        self.elements
            .entry(tag.to_lowercase())
            .or_default()
            .insert(attr.clone());
        self.attribute_kinds.insert(attr, kind);
    }

    /// Allow an attribute on every allowed element
    pub fn allow_global_attribute(&mut self, attr: &str, kind: AttrKind) {
        let attr = attr.to_lowercase();
        self.generic_attributes.insert(attr.clone());
        self.attribute_kinds.insert(attr, kind);
    }

    /// Set the disposition applied to elements with no entry
    pub fn set_unknown_disposition(&mut self, disposition: Disposition) {
        self.unknown_disposition = disposition;
    }

    /// Toggle `data-*` attributes
    pub fn set_allow_data_attributes(&mut self, allow: bool) {
        self.allow_data_attributes = allow;
    }
}

/// Validate a `data-*` attribute name: the prefix plus at least one
/// character, lowercase ASCII letters, digits and hyphens only
fn is_valid_data_attribute(name: &str) -> bool {
    match name.strip_prefix("data-") {
        Some(rest) => {
            !rest.is_empty()
                && rest
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        }
        None => false,
    }
}
