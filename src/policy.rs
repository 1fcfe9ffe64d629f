// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! URL policy engine
//!
//! Classifies candidate URLs given a contextual hint (which HTML
//! element/attribute or which CSS property triggered resolution). Returns
//! the accepted URL text or `None` for rejection. Unparsable input is a
//! rejection, never an error: sanitization must always produce some safe
//! output.

use std::collections::HashSet;

use url::Url;

use crate::error::Result;

/// Where a style declaration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssSite {
    /// An inline `style` attribute
    StyleAttribute,
    /// A `<style>` element
    StyleElement,
}

/// Contextual hint identifying the call site of a URL resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyHint<'a> {
    /// An HTML attribute value, e.g. `<img src>` or `<a href>`
    Attribute {
        element: &'a str,
        attribute: &'a str,
    },
    /// A URL token inside a CSS declaration, e.g. `background-image: url(...)`
    CssProperty { property: &'a str, site: CssSite },
}

/// Decides whether and how a URL may be used
///
/// A caller-supplied policy fully replaces the default for the sanitizer it
/// is installed into; no additional layer is imposed beneath it. That is a
/// documented trust delegation: a permissive policy is honored.
pub trait UrlPolicy: Send + Sync {
    /// Resolve a candidate URL for the given call site
    ///
    /// Returns the URL text to emit (the policy may rewrite it), or `None`
    /// to reject.
    fn resolve(&self, candidate: &str, hint: &PolicyHint<'_>) -> Option<String>;
}

impl<F> UrlPolicy for F
where
    F: Fn(&str, &PolicyHint<'_>) -> Option<String> + Send + Sync,
{
    fn resolve(&self, candidate: &str, hint: &PolicyHint<'_>) -> Option<String> {
        self(candidate, hint)
    }
}

/// Default URL policy
///
/// Accepts absolute URLs with a scheme in a fixed benign set (`http`,
/// `https`, `mailto`) and relative URLs. When a base URL is configured,
/// relative URLs are resolved against it and the resulting absolute scheme
/// is re-checked.
#[derive(Debug, Clone)]
pub struct DefaultUrlPolicy {
    schemes: HashSet<String>,
    base: Option<Url>,
}

impl Default for DefaultUrlPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultUrlPolicy {
    /// Create the default policy (http, https, mailto, relative)
    pub fn new() -> Self {
        let schemes = ["http", "https", "mailto"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self {
            schemes,
            base: None,
        }
    }

    /// Set the base URL used to resolve relative candidates
    pub fn with_base(mut self, base: &str) -> Result<Self> {
        self.base = Some(Url::parse(base)?);
        Ok(self)
    }

    /// Allow an additional scheme
    pub fn allow_scheme(mut self, scheme: &str) -> Self {
        self.schemes.insert(scheme.to_ascii_lowercase());
        self
    }

    fn scheme_allowed(&self, url: &Url) -> bool {
        self.schemes.contains(url.scheme())
    }
}

impl UrlPolicy for DefaultUrlPolicy {
    fn resolve(&self, candidate: &str, hint: &PolicyHint<'_>) -> Option<String> {
        match Url::parse(candidate) {
            Ok(url) => {
                if self.scheme_allowed(&url) {
                    Some(url.to_string())
                } else {
                    tracing::debug!(scheme = %url.scheme(), ?hint, "rejected url scheme");
                    None
                }
            }
            // No scheme at all: a relative reference. Inherits the
            // document base; re-check the absolute scheme when a base is
            // configured, otherwise keep the reference as written.
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base {
                Some(base) => match base.join(candidate) {
                    Ok(resolved) if self.scheme_allowed(&resolved) => Some(resolved.to_string()),
                    _ => {
                        tracing::debug!(?hint, "rejected relative url against base");
                        None
                    }
                },
                None => Some(candidate.to_string()),
            },
            Err(_) => {
                tracing::debug!(?hint, "rejected unparsable url");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HINT: PolicyHint<'static> = PolicyHint::Attribute {
        element: "a",
        attribute: "href",
    };

    #[test]
    fn test_https_accepted() {
        let policy = DefaultUrlPolicy::new();
        let resolved = policy.resolve("https://example.com/x", &HINT).unwrap();
        assert!(resolved.starts_with("https://example.com/x"));
    }

    #[test]
    fn test_javascript_rejected() {
        let policy = DefaultUrlPolicy::new();
        assert_eq!(policy.resolve("javascript:alert(1)", &HINT), None);
        // Scheme smuggling via embedded whitespace is normalized away by
        // URL parsing and still lands on the javascript scheme.
        assert_eq!(policy.resolve("java\tscript:alert(1)", &HINT), None);
        assert_eq!(policy.resolve("JAVASCRIPT:alert(1)", &HINT), None);
    }

    #[test]
    fn test_data_and_vbscript_rejected() {
        let policy = DefaultUrlPolicy::new();
        let css_hint = PolicyHint::CssProperty {
            property: "background-image",
            site: CssSite::StyleAttribute,
        };
        assert_eq!(
            policy.resolve("data:text/html,<script>1</script>", &css_hint),
            None
        );
        assert_eq!(policy.resolve("vbscript:msgbox(1)", &HINT), None);
    }

    #[test]
    fn test_relative_accepted_without_base() {
        let policy = DefaultUrlPolicy::new();
        assert_eq!(
            policy.resolve("/images/logo.png", &HINT),
            Some("/images/logo.png".to_string())
        );
    }

    #[test]
    fn test_relative_resolved_against_base() {
        let policy = DefaultUrlPolicy::new()
            .with_base("https://example.com/app/")
            .unwrap();
        assert_eq!(
            policy.resolve("logo.png", &HINT),
            Some("https://example.com/app/logo.png".to_string())
        );
    }

    #[test]
    fn test_mailto_accepted() {
        let policy = DefaultUrlPolicy::new();
        assert_eq!(
            policy.resolve("mailto:info@bountyy.fi", &HINT),
            Some("mailto:info@bountyy.fi".to_string())
        );
    }

    #[test]
    fn test_extra_scheme() {
        let policy = DefaultUrlPolicy::new().allow_scheme("ftp");
        assert!(policy.resolve("ftp://example.com/f", &HINT).is_some());
    }

    #[test]
    fn test_closure_policy() {
        let deny_all = |_: &str, _: &PolicyHint<'_>| -> Option<String> { None };
        assert_eq!(deny_all.resolve("https://example.com", &HINT), None);
    }
}
