// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Sanitizer builder and the process-wide default instance
//!
//! Builder methods consume and return the builder; `build()` freezes the
//! configuration, wires the CSS sanitizer and URL policy together, installs
//! the sanitizing hooks into a trust factory and returns the sanitizer.
//! The default instance is constructed lazily once and reused by every
//! unconfigured call.

use std::sync::Arc;

use lazy_static::lazy_static;

use crate::css::CssSanitizer;
use crate::error::Result;
use crate::html::{AllowList, AttrKind, Disposition, Sanitizer, SanitizerInner};
use crate::policy::{DefaultUrlPolicy, UrlPolicy};
use crate::trust::{HookTable, SinkCategory, TrustEnforcer, TrustedHtml};
use crate::trust::TrustFactory;

lazy_static! {
    static ref DEFAULT_SANITIZER: Sanitizer = SanitizerBuilder::new()
        .build()
        .expect("default sanitizer configuration is valid");
}

/// Sanitize markup with the default configuration
///
/// ```
/// let safe = mureena::sanitize("<b><img onerror='alert(1)'>bold</b>").unwrap();
/// assert_eq!(safe.as_str(), "<b><img>bold</b>");
/// ```
pub fn sanitize(html: &str) -> Result<TrustedHtml> {
    DEFAULT_SANITIZER.sanitize(html)
}

/// The process-wide default sanitizer
pub fn default_sanitizer() -> &'static Sanitizer {
    &DEFAULT_SANITIZER
}

/// Assembles a [`Sanitizer`] from an allow-list, a URL policy and trust
/// layer options
pub struct SanitizerBuilder {
    allowlist: AllowList,
    url_policy: Option<Arc<dyn UrlPolicy>>,
    strip_comments: bool,
    allow_css_tags: bool,
    allow_data_attributes: bool,
    policy_name: Option<String>,
    enforcer: Option<Arc<dyn TrustEnforcer>>,
}

impl SanitizerBuilder {
    /// Start from the conservative default allow-list
    pub fn new() -> Self {
        Self {
            allowlist: AllowList::default(),
            url_policy: None,
            strip_comments: true,
            allow_css_tags: false,
            allow_data_attributes: false,
            policy_name: None,
            enforcer: None,
        }
    }

    /// Start from a caller-supplied allow-list
    pub fn with_allowlist(allowlist: AllowList) -> Self {
        Self {
            allowlist,
            ..Self::new()
        }
    }

    /// Allow an element, with attributes specific to it
    pub fn allow_element(mut self, tag: &str, attrs: &[&str]) -> Self {
        self.allowlist.allow_element(tag, attrs);
        self
    }

    /// Remove an element from the allow-list
    pub fn deny_element(mut self, tag: &str) -> Self {
        self.allowlist.deny_element(tag);
        self
    }

    /// Allow an attribute on one element, stating its value kind
    pub fn allow_attribute(mut self, tag: &str, attr: &str, kind: AttrKind) -> Self {
        self.allowlist.allow_attribute(tag, attr, kind);
        self
    }

    /// Allow an attribute on every allowed element
    pub fn allow_global_attribute(mut self, attr: &str, kind: AttrKind) -> Self {
        self.allowlist.allow_global_attribute(attr, kind);
        self
    }

    /// Replace the URL policy
    ///
    /// The supplied policy fully replaces the default; a permissive policy
    /// is honored. This is a deliberate trust delegation to the caller.
    pub fn url_policy<P: UrlPolicy + 'static>(mut self, policy: P) -> Self {
        self.url_policy = Some(Arc::new(policy));
        self
    }

    /// Allow `<style>` elements, with their content run through the
    /// stylesheet sanitizer
    pub fn allow_css_tags(mut self, allow: bool) -> Self {
        self.allow_css_tags = allow;
        self
    }

    /// Keep `data-*` attributes on allowed elements
    pub fn allow_data_attributes(mut self, allow: bool) -> Self {
        self.allow_data_attributes = allow;
        self
    }

    /// Keep or strip comment nodes (stripped by default)
    pub fn strip_comments(mut self, strip: bool) -> Self {
        self.strip_comments = strip;
        self
    }

    /// Disposition for elements absent from the allow-list
    pub fn unknown_elements(mut self, disposition: Disposition) -> Self {
        self.allowlist.set_unknown_disposition(disposition);
        self
    }

    /// Name for the trust policy registered by this sanitizer's factory
    pub fn policy_name(mut self, name: &str) -> Self {
        self.policy_name = Some(name.to_string());
        self
    }

    /// Hand the builder a host trust enforcer
    ///
    /// This is the capability probe: when present, the factory registers a
    /// named policy with the host; when absent, an equivalent in-process
    /// brand is used.
    pub fn trust_enforcer(mut self, enforcer: Arc<dyn TrustEnforcer>) -> Self {
        self.enforcer = Some(enforcer);
        self
    }

    /// Freeze configuration and construct the sanitizer
    ///
    /// Fails only on trust-layer configuration errors (e.g. a duplicate
    /// policy name under a host enforcer); such failures are fatal and must
    /// surface at initialization.
    pub fn build(self) -> Result<Sanitizer> {
        let mut allowlist = self.allowlist;
        allowlist.set_allow_data_attributes(self.allow_data_attributes);
        if self.allow_css_tags {
            allowlist.allow_element("style", &[]);
        }

        let url_policy = self
            .url_policy
            .unwrap_or_else(|| Arc::new(DefaultUrlPolicy::new()));
        let css = CssSanitizer::new(url_policy.clone());
        let inner = Arc::new(SanitizerInner::new(
            allowlist,
            url_policy,
            css.clone(),
            self.strip_comments,
        ));

        let hooks = HookTable::new()
            .with_hook(SinkCategory::Markup, {
                let inner = inner.clone();
                move |raw| inner.clean_to_string(raw)
            })
            .with_hook(SinkCategory::Style, {
                let css = css.clone();
                move |raw| css.sanitize_style_attribute(raw)
            })
            .with_hook(SinkCategory::StyleSheet, {
                let css = css.clone();
                move |raw| css.sanitize_stylesheet(raw)
            });

        let name = self
            .policy_name
            .unwrap_or_else(|| "mureena#default".to_string());
        let factory = TrustFactory::new(name, hooks, self.enforcer.as_ref())?;
        Ok(Sanitizer::from_parts(inner, factory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyHint;
    use crate::trust::InProcessEnforcer;

    #[test]
    fn test_default_singleton_reused() {
        let a = default_sanitizer() as *const Sanitizer;
        let b = default_sanitizer() as *const Sanitizer;
        assert_eq!(a, b);
    }

    #[test]
    fn test_convenience_sanitize() {
        let out = sanitize("<script>x</script><b>ok</b>").unwrap();
        assert_eq!(out.as_str(), "<b>ok</b>");
    }

    #[test]
    fn test_custom_element_allowed() {
        let sanitizer = SanitizerBuilder::new()
            .allow_element("video", &["controls"])
            .build()
            .unwrap();
        let out = sanitizer
            .sanitize("<video controls autoplay>x</video>")
            .unwrap();
        assert_eq!(out.as_str(), "<video controls>x</video>");
    }

    #[test]
    fn test_deny_element() {
        let sanitizer = SanitizerBuilder::new().deny_element("img").build().unwrap();
        let out = sanitizer.sanitize("<img src=\"https://x/a.png\">ok").unwrap();
        assert_eq!(out.as_str(), "ok");
    }

    #[test]
    fn test_permissive_url_policy_honored() {
        // Caller override fully replaces the default, by design.
        let sanitizer = SanitizerBuilder::new()
            .url_policy(|candidate: &str, _hint: &PolicyHint<'_>| Some(candidate.to_string()))
            .build()
            .unwrap();
        let out = sanitizer.sanitize("<a href=\"wss://x\">l</a>").unwrap();
        assert_eq!(out.as_str(), "<a href=\"wss://x\">l</a>");
    }

    #[test]
    fn test_strict_url_policy_per_site() {
        let sanitizer = SanitizerBuilder::new()
            .url_policy(|candidate: &str, hint: &PolicyHint<'_>| match hint {
                PolicyHint::Attribute { attribute, .. } if *attribute == "src" => None,
                _ => Some(candidate.to_string()),
            })
            .build()
            .unwrap();
        let out = sanitizer
            .sanitize("<img src=\"https://x/a.png\"><a href=\"https://x/\">l</a>")
            .unwrap();
        assert_eq!(out.as_str(), "<img><a href=\"https://x/\">l</a>");
    }

    #[test]
    fn test_allow_css_tags() {
        let sanitizer = SanitizerBuilder::new().allow_css_tags(true).build().unwrap();
        let out = sanitizer
            .sanitize("<style>p { color: red; behavior: url(#x) }</style><p>x</p>")
            .unwrap();
        assert_eq!(out.as_str(), "<style>p { color: red }</style><p>x</p>");
    }

    #[test]
    fn test_style_element_dropped_by_default() {
        let out = sanitize("<style>p { color: red }</style><p>x</p>").unwrap();
        assert_eq!(out.as_str(), "<p>x</p>");
    }

    #[test]
    fn test_style_element_dropped_when_nothing_survives() {
        let sanitizer = SanitizerBuilder::new().allow_css_tags(true).build().unwrap();
        let out = sanitizer
            .sanitize("<style>@import url(https://evil/x.css);</style>ok")
            .unwrap();
        assert_eq!(out.as_str(), "ok");
    }

    #[test]
    fn test_data_attributes_toggle() {
        let out = sanitize("<div data-user=\"7\">x</div>").unwrap();
        assert_eq!(out.as_str(), "<div>x</div>");

        let sanitizer = SanitizerBuilder::new()
            .allow_data_attributes(true)
            .build()
            .unwrap();
        let out = sanitizer.sanitize("<div data-user=\"7\">x</div>").unwrap();
        assert_eq!(out.as_str(), "<div data-user=\"7\">x</div>");
    }

    #[test]
    fn test_unknown_elements_unwrap() {
        let sanitizer = SanitizerBuilder::new()
            .unknown_elements(Disposition::Unwrap)
            .build()
            .unwrap();
        let out = sanitizer.sanitize("<widget><b>kept</b></widget>").unwrap();
        assert_eq!(out.as_str(), "<b>kept</b>");
    }

    #[test]
    fn test_comments_kept_when_configured() {
        let sanitizer = SanitizerBuilder::new().strip_comments(false).build().unwrap();
        let out = sanitizer.sanitize("a<!-- note -->b").unwrap();
        assert_eq!(out.as_str(), "a<!-- note -->b");
    }

    #[test]
    fn test_host_enforcer_wired_through_build() {
        let enforcer: Arc<dyn TrustEnforcer> = Arc::new(InProcessEnforcer::new());
        let hosted = SanitizerBuilder::new()
            .policy_name("app#main")
            .trust_enforcer(enforcer.clone())
            .build()
            .unwrap();
        assert!(hosted.factory().is_host_backed());

        // Same input through host-backed and fallback sanitizers is
        // byte-identical.
        let fallback = SanitizerBuilder::new().build().unwrap();
        let input = "<div onclick=\"evil()\">hi<script>bad()</script></div>";
        assert_eq!(
            hosted.sanitize(input).unwrap().as_str(),
            fallback.sanitize(input).unwrap().as_str()
        );

        // Re-registering the same policy name is a fatal init error.
        let err = SanitizerBuilder::new()
            .policy_name("app#main")
            .trust_enforcer(enforcer)
            .build()
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_style_minting_via_sanitizer() {
        let sanitizer = SanitizerBuilder::new().build().unwrap();
        let style = sanitizer
            .sanitize_style("color: red; width: expression(alert(1))")
            .unwrap();
        assert_eq!(style.as_str(), "color: red");
        let sheet = sanitizer.sanitize_stylesheet("p { color: red }").unwrap();
        assert_eq!(sheet.as_str(), "p { color: red }");
    }

    #[test]
    fn test_script_minting_fails_fast() {
        let sanitizer = SanitizerBuilder::new().build().unwrap();
        let err = sanitizer.factory().mint_script("alert(1)").unwrap_err();
        assert!(err.is_config());
    }
}
