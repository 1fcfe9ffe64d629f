// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML sanitizer
//!
//! Parses untrusted markup into a detached tree, walks it pre-order
//! filtering elements and attributes against the allow-list, delegates URL
//! and style values to the URL policy engine and CSS sanitizer, and either
//! serializes the result into a [`TrustedHtml`] or returns the sanitized
//! tree for direct embedding. Sanitizing already-sanitized output is a
//! no-op, so defensive re-sanitization is free.

use std::sync::Arc;

use crate::css::CssSanitizer;
use crate::error::Result;
use crate::policy::{PolicyHint, UrlPolicy};
use crate::trust::{TrustFactory, TrustedHtml, TrustedStyle, TrustedStyleSheet};

use super::allowlist::{AllowList, AttrKind, Disposition};
use super::parser::parse_html_fragment;
use super::serializer::serialize_fragment;
use super::tree::{Fragment, NodeId, NodeType};

/// The sanitization pipeline without the trust layer
///
/// Shared between the `Sanitizer` facade and the trust factory's Markup
/// hook, so minting routes raw input through exactly this pipeline exactly
/// once.
pub(crate) struct SanitizerInner {
    allowlist: AllowList,
    url_policy: Arc<dyn UrlPolicy>,
    css: CssSanitizer,
    strip_comments: bool,
}

impl SanitizerInner {
    pub(crate) fn new(
        allowlist: AllowList,
        url_policy: Arc<dyn UrlPolicy>,
        css: CssSanitizer,
        strip_comments: bool,
    ) -> Self {
        Self {
            allowlist,
            url_policy,
            css,
            strip_comments,
        }
    }

    /// Parse, filter and serialize
    pub(crate) fn clean_to_string(&self, html: &str) -> String {
        serialize_fragment(&self.clean_to_fragment(html))
    }

    /// Parse and filter, keeping the tree
    pub(crate) fn clean_to_fragment(&self, html: &str) -> Fragment {
        let mut fragment = parse_html_fragment(html);
        let root = fragment.root();
        self.walk(&mut fragment, root);
        fragment
    }

    /// Filter the children of `id` in place, recursing into kept elements.
    /// Children are re-read by index because removal and unwrapping mutate
    /// the list under the walk.
    fn walk(&self, fragment: &mut Fragment, id: NodeId) {
        let mut index = 0;
        while let Some(child) = fragment.child_at(id, index) {
            match fragment.node_type(child) {
                Some(NodeType::Text) => index += 1,
                Some(NodeType::Comment) => {
                    if self.strip_comments {
                        fragment.remove_subtree(child);
                    } else {
                        index += 1;
                    }
                }
                Some(NodeType::Element) => {
                    let tag = fragment.tag_name(child).unwrap_or("").to_string();
                    match self.allowlist.disposition(&tag) {
                        Disposition::DropSubtree => {
                            tracing::debug!(element = %tag, "dropping element with subtree");
                            fragment.remove_subtree(child);
                        }
                        Disposition::Unwrap => {
                            tracing::debug!(element = %tag, "unwrapping element");
                            fragment.unwrap(child);
                            // Promoted children now sit at this index.
                        }
                        Disposition::Keep => {
                            self.filter_attributes(fragment, child, &tag);
                            if tag == "style" {
                                if self.rewrite_style_element(fragment, child) {
                                    index += 1;
                                }
                            } else {
                                self.walk(fragment, child);
                                index += 1;
                            }
                        }
                    }
                }
                Some(NodeType::Fragment) | None => index += 1,
            }
        }
    }

    /// Apply the allow-list and value kinds to one element's attributes
    fn filter_attributes(&self, fragment: &mut Fragment, id: NodeId, tag: &str) {
        let attributes = match fragment.get(id) {
            Some(data) => data.attributes.clone(),
            None => return,
        };

        for (name, value) in attributes {
            if !self.allowlist.attribute_allowed(tag, &name) {
                tracing::debug!(element = %tag, attribute = %name, "dropping attribute");
                fragment.remove_attribute(id, &name);
                continue;
            }
            match self.allowlist.attribute_kind(&name) {
                AttrKind::Text => {}
                AttrKind::Url => {
                    let hint = PolicyHint::Attribute {
                        element: tag,
                        attribute: &name,
                    };
                    match self.url_policy.resolve(&value, &hint) {
                        Some(resolved) => fragment.set_attribute(id, &name, resolved),
                        None => {
                            tracing::debug!(element = %tag, attribute = %name, "dropping attribute with rejected url");
                            fragment.remove_attribute(id, &name);
                        }
                    }
                }
                AttrKind::Style => {
                    let sanitized = self.css.sanitize_style_attribute(&value);
                    if sanitized.is_empty() {
                        fragment.remove_attribute(id, &name);
                    } else {
                        fragment.set_attribute(id, &name, sanitized);
                    }
                }
                AttrKind::Enumerated(tokens) => {
                    let matched = tokens
                        .iter()
                        .find(|t| t.eq_ignore_ascii_case(value.trim()));
                    match matched {
                        Some(token) => fragment.set_attribute(id, &name, token.clone()),
                        None => {
                            tracing::debug!(element = %tag, attribute = %name, "dropping attribute outside token set");
                            fragment.remove_attribute(id, &name);
                        }
                    }
                }
            }
        }
    }

    /// Replace a `<style>` element's content with its sanitized stylesheet;
    /// drop the element when nothing survives. Returns whether the element
    /// was kept.
    fn rewrite_style_element(&self, fragment: &mut Fragment, id: NodeId) -> bool {
        let css = fragment.text_content(id);
        let sanitized = self.css.sanitize_stylesheet(&css);
        if sanitized.is_empty() {
            fragment.remove_subtree(id);
            false
        } else {
            fragment.set_text_content(id, sanitized);
            true
        }
    }
}

/// Allow-list HTML sanitizer
///
/// Built by [`SanitizerBuilder`](crate::SanitizerBuilder); configuration is
/// frozen at build time. `sanitize` output is minted through the trust
/// factory so it arrives as a [`TrustedHtml`] a sink can accept.
pub struct Sanitizer {
    inner: Arc<SanitizerInner>,
    factory: TrustFactory,
}

impl Sanitizer {
    pub(crate) fn from_parts(inner: Arc<SanitizerInner>, factory: TrustFactory) -> Self {
        Self { inner, factory }
    }

    /// Sanitize untrusted markup into a trusted value
    ///
    /// The only failure mode is a configuration error in the trust layer;
    /// malicious or malformed input is handled by omission, never by error.
    pub fn sanitize(&self, html: &str) -> Result<TrustedHtml> {
        self.factory.mint_html(html)
    }

    /// Sanitize untrusted markup, keeping the tree for direct embedding
    pub fn sanitize_fragment(&self, html: &str) -> Fragment {
        self.inner.clean_to_fragment(html)
    }

    /// Sanitize inline style declarations into a trusted value
    pub fn sanitize_style(&self, css: &str) -> Result<TrustedStyle> {
        self.factory.mint_style(css)
    }

    /// Sanitize stylesheet text into a trusted value
    pub fn sanitize_stylesheet(&self, css: &str) -> Result<TrustedStyleSheet> {
        self.factory.mint_style_sheet(css)
    }

    /// The trust factory minting this sanitizer's output
    pub fn factory(&self) -> &TrustFactory {
        &self.factory
    }
}

impl std::fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sanitizer")
            .field("factory", &self.factory)
            .finish_non_exhaustive()
    }
}
