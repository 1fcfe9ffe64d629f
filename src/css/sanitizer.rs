// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSS sanitizer
//!
//! Tokenizes untrusted CSS with cssparser and re-serializes only what
//! survives filtering: declarations whose property is allow-listed, whose
//! value contains no execution-capable functional values, and whose URL
//! tokens pass the URL policy. Dropped declarations are omitted, never
//! replaced with invalid tokens, so output is always syntactically valid.

use std::sync::Arc;

use cssparser::{
    serialize_identifier, serialize_string, Delimiter, ParseError, Parser, ParserInput, ToCss,
    Token,
};
use lazy_static::lazy_static;
use regex::Regex;

use super::properties;
use crate::policy::{CssSite, PolicyHint, UrlPolicy};

lazy_static! {
    // Final screen over the serialized declaration. The token walk already
    // rejects these; the screen catches anything that survives
    // re-serialization in obfuscated form.
    static ref DANGEROUS_DECLARATION: Regex =
        Regex::new(r"(?i)expression\s*\(|javascript\s*:|-moz-binding|behavior\s*:")
            .unwrap();
}

/// Functional values that execute script or bind behavior
fn is_forbidden_function(name: &str) -> bool {
    matches!(name, "expression" | "-moz-binding" | "element")
}

/// Functions whose string arguments are URL candidates (besides `url()`,
/// which is handled as its own token form)
fn is_url_function(name: &str) -> bool {
    matches!(name, "image" | "image-set" | "-webkit-image-set" | "cross-fade")
}

/// Consume every token in a delimited range
fn drain<'i>(parser: &mut Parser<'i, '_>) -> Result<(), ParseError<'i, ()>> {
    while parser.next().is_ok() {}
    Ok(())
}

/// Sanitizes style declarations and stylesheets
#[derive(Clone)]
pub struct CssSanitizer {
    url_policy: Arc<dyn UrlPolicy>,
}

impl std::fmt::Debug for CssSanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CssSanitizer").finish_non_exhaustive()
    }
}

impl CssSanitizer {
    /// Create a sanitizer resolving embedded URLs through the given policy
    pub fn new(url_policy: Arc<dyn UrlPolicy>) -> Self {
        Self { url_policy }
    }

    /// Sanitize a standalone declaration list (inline `style` attribute)
    ///
    /// Returns the surviving declarations re-serialized, or an empty string
    /// when nothing survives.
    pub fn sanitize_style_attribute(&self, css: &str) -> String {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        self.sanitize_declarations(&mut parser, CssSite::StyleAttribute)
            .join("; ")
    }

    /// Sanitize stylesheet text (`<style>` element content)
    ///
    /// Qualified rules are kept with their declaration blocks filtered;
    /// at-rules are dropped whole (they can import or load resources).
    pub fn sanitize_stylesheet(&self, css: &str) -> String {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut rules: Vec<String> = Vec::new();

        loop {
            parser.skip_whitespace();
            let token = match parser.next() {
                Ok(t) => t.clone(),
                Err(_) => break,
            };
            match token {
                Token::AtKeyword(name) => {
                    tracing::debug!(at_rule = %name.as_ref(), "dropping at-rule");
                    Self::skip_at_rule(&mut parser);
                }
                Token::CDO | Token::CDC => {}
                Token::CurlyBracketBlock => {
                    // Stray block with no prelude: consume and drop.
                    let _ = parser.parse_nested_block(drain);
                }
                first => {
                    if let Some(rule) = self.sanitize_qualified_rule(first, &mut parser) {
                        rules.push(rule);
                    }
                }
            }
        }

        rules.join("\n")
    }

    /// Parse one qualified rule whose first prelude token is `first`
    fn sanitize_qualified_rule<'i>(
        &self,
        first: Token<'i>,
        parser: &mut Parser<'i, '_>,
    ) -> Option<String> {
        let mut selector = String::new();
        let _ = first.to_css(&mut selector);
        if matches!(first, Token::Function(_)) {
            Self::write_raw_block(parser, &mut selector, ")");
        }

        let mut found_block = false;
        loop {
            let token = match parser.next_including_whitespace() {
                Ok(t) => t.clone(),
                Err(_) => break,
            };
            match token {
                Token::CurlyBracketBlock => {
                    found_block = true;
                    break;
                }
                Token::WhiteSpace(_) => {
                    if !selector.is_empty() && !selector.ends_with(' ') {
                        selector.push(' ');
                    }
                }
                Token::Function(_) => {
                    let _ = token.to_css(&mut selector);
                    Self::write_raw_block(parser, &mut selector, ")");
                }
                Token::ParenthesisBlock => {
                    selector.push('(');
                    Self::write_raw_block(parser, &mut selector, ")");
                }
                Token::SquareBracketBlock => {
                    selector.push('[');
                    Self::write_raw_block(parser, &mut selector, "]");
                }
                other => {
                    let _ = other.to_css(&mut selector);
                }
            }
        }
        if !found_block {
            return None;
        }

        let declarations = parser
            .parse_nested_block(|p| -> Result<Vec<String>, ParseError<'i, ()>> {
                Ok(self.sanitize_declarations(p, CssSite::StyleElement))
            })
            .unwrap_or_default();

        let selector = selector.trim().to_string();
        if selector.is_empty() || declarations.is_empty() {
            tracing::debug!(selector = %selector, "dropping rule");
            return None;
        }
        let rule = format!("{} {{ {} }}", selector, declarations.join("; "));
        // A rule that re-serializes with markup characters anywhere (a
        // selector, or a quoted string value) could terminate the embedding
        // <style> element.
        if rule.contains('<') {
            tracing::debug!(selector = %selector, "dropping rule with markup characters");
            return None;
        }
        Some(rule)
    }

    /// Filter a declaration list, returning the surviving declarations
    fn sanitize_declarations<'i>(
        &self,
        parser: &mut Parser<'i, '_>,
        site: CssSite,
    ) -> Vec<String> {
        let mut out = Vec::new();
        loop {
            parser.skip_whitespace();
            let token = match parser.next() {
                Ok(t) => t.clone(),
                Err(_) => break,
            };
            let property = match token {
                Token::Ident(name) => name.to_ascii_lowercase(),
                Token::Semicolon => continue,
                _ => {
                    Self::skip_to_semicolon(parser);
                    continue;
                }
            };
            if parser.expect_colon().is_err() {
                Self::skip_to_semicolon(parser);
                continue;
            }

            let allowed = properties::property_allowed(&property);
            let value = parser.parse_until_before(
                Delimiter::Semicolon,
                |p| -> Result<String, ParseError<'i, ()>> {
                    self.sanitize_value(&property, site, p)
                },
            );
            // Consume the delimiting ';' (or hit end of input).
            let _ = parser.next();

            if !allowed {
                tracing::debug!(property = %property, "dropping declaration: property not allowed");
                continue;
            }
            let value = match value {
                Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
                Ok(_) => {
                    tracing::debug!(property = %property, "dropping declaration: value empty after filtering");
                    continue;
                }
                Err(_) => {
                    tracing::debug!(property = %property, "dropping declaration: dangerous or malformed value");
                    continue;
                }
            };

            let mut declaration = String::new();
            let _ = serialize_identifier(&property, &mut declaration);
            declaration.push_str(": ");
            declaration.push_str(&value);

            if DANGEROUS_DECLARATION.is_match(&declaration) {
                tracing::debug!(property = %property, "dropping declaration: failed serialized screen");
                continue;
            }
            out.push(declaration);
        }
        out
    }

    /// Re-serialize the component values of one declaration
    fn sanitize_value<'i>(
        &self,
        property: &str,
        site: CssSite,
        parser: &mut Parser<'i, '_>,
    ) -> Result<String, ParseError<'i, ()>> {
        let mut out = String::new();
        let mut dropped = false;
        self.write_value_tokens(property, site, false, parser, &mut out, &mut dropped)?;
        Ok(out.trim().to_string())
    }

    /// Token walk over component values
    ///
    /// `strings_are_urls` marks the inside of URL-carrying functions, where
    /// quoted strings are URL candidates. `dropped_url` is set whenever a
    /// URL candidate is rejected; callers wrapping a URL function drop the
    /// whole function in that case rather than emit partial arguments.
    fn write_value_tokens<'i>(
        &self,
        property: &str,
        site: CssSite,
        strings_are_urls: bool,
        parser: &mut Parser<'i, '_>,
        out: &mut String,
        dropped_url: &mut bool,
    ) -> Result<(), ParseError<'i, ()>> {
        loop {
            let token = match parser.next_including_whitespace() {
                Ok(t) => t.clone(),
                Err(_) => return Ok(()),
            };
            match token {
                Token::WhiteSpace(_) => {
                    if !out.is_empty() && !out.ends_with(' ') {
                        out.push(' ');
                    }
                }
                Token::Comment(_) => {}
                Token::BadUrl(_) | Token::BadString(_) | Token::CurlyBracketBlock => {
                    return Err(parser.new_custom_error(()));
                }
                Token::UnquotedUrl(raw) => {
                    self.write_url(property, site, raw.as_ref(), out, dropped_url);
                }
                Token::Function(name) => {
                    let name = name.to_ascii_lowercase();
                    if is_forbidden_function(&name) {
                        return Err(parser.new_custom_error(()));
                    }
                    if name == "url" {
                        let candidate =
                            parser.parse_nested_block(|p| -> Result<String, ParseError<'i, ()>> {
                                let s = p.expect_string()?.as_ref().to_string();
                                p.expect_exhausted()?;
                                Ok(s)
                            })?;
                        self.write_url(property, site, &candidate, out, dropped_url);
                    } else {
                        let urls_inside = strings_are_urls || is_url_function(&name);
                        let mut inner = String::new();
                        let mut inner_dropped = false;
                        self.write_function_args(
                            property,
                            site,
                            urls_inside,
                            parser,
                            &mut inner,
                            &mut inner_dropped,
                        )?;
                        if urls_inside && inner_dropped {
                            // Partial image-set arguments would be invalid.
                            *dropped_url = true;
                        } else {
                            let _ = serialize_identifier(&name, out);
                            out.push('(');
                            out.push_str(inner.trim());
                            out.push(')');
                        }
                    }
                }
                Token::ParenthesisBlock => {
                    let mut inner = String::new();
                    self.write_function_args(
                        property,
                        site,
                        strings_are_urls,
                        parser,
                        &mut inner,
                        dropped_url,
                    )?;
                    out.push('(');
                    out.push_str(inner.trim());
                    out.push(')');
                }
                Token::SquareBracketBlock => {
                    let mut inner = String::new();
                    self.write_function_args(
                        property,
                        site,
                        strings_are_urls,
                        parser,
                        &mut inner,
                        dropped_url,
                    )?;
                    out.push('[');
                    out.push_str(inner.trim());
                    out.push(']');
                }
                Token::QuotedString(s) if strings_are_urls => {
                    match self.resolve_url(property, site, s.as_ref()) {
                        Some(resolved) => {
                            let _ = serialize_string(&resolved, out);
                        }
                        None => *dropped_url = true,
                    }
                }
                other => {
                    let _ = other.to_css(out);
                }
            }
        }
    }

    /// Recurse into the nested block that the last token opened
    fn write_function_args<'i>(
        &self,
        property: &str,
        site: CssSite,
        strings_are_urls: bool,
        parser: &mut Parser<'i, '_>,
        out: &mut String,
        dropped_url: &mut bool,
    ) -> Result<(), ParseError<'i, ()>> {
        parser.parse_nested_block(|p| -> Result<(), ParseError<'i, ()>> {
            self.write_value_tokens(property, site, strings_are_urls, p, out, dropped_url)
        })
    }

    fn resolve_url(&self, property: &str, site: CssSite, candidate: &str) -> Option<String> {
        let hint = PolicyHint::CssProperty { property, site };
        self.url_policy.resolve(candidate, &hint)
    }

    /// Resolve one URL token, writing `url("...")` when accepted
    fn write_url(
        &self,
        property: &str,
        site: CssSite,
        candidate: &str,
        out: &mut String,
        dropped_url: &mut bool,
    ) {
        match self.resolve_url(property, site, candidate) {
            Some(resolved) => {
                out.push_str("url(");
                let _ = serialize_string(&resolved, out);
                out.push(')');
            }
            None => {
                tracing::debug!(property = %property, "dropping rejected url token");
                *dropped_url = true;
            }
        }
    }

    /// Consume tokens through the next top-level semicolon
    fn skip_to_semicolon<'i>(parser: &mut Parser<'i, '_>) {
        let _ = parser.parse_until_after(Delimiter::Semicolon, drain);
    }

    /// Consume an at-rule: everything through its terminating semicolon or
    /// the end of its block
    fn skip_at_rule<'i>(parser: &mut Parser<'i, '_>) {
        loop {
            let token = match parser.next() {
                Ok(t) => t.clone(),
                Err(_) => return,
            };
            match token {
                Token::Semicolon => return,
                Token::CurlyBracketBlock => {
                    let _ = parser.parse_nested_block(drain);
                    return;
                }
                _ => {}
            }
        }
    }

    /// Copy a just-opened nested block verbatim into `out`
    ///
    /// Used for selector preludes, which carry no URL or execution surface
    /// and only need structural re-serialization.
    fn write_raw_block<'i>(parser: &mut Parser<'i, '_>, out: &mut String, close: &str) {
        let _ = parser.parse_nested_block(|p| -> Result<(), ParseError<'i, ()>> {
            Self::write_raw_tokens(p, out);
            Ok(())
        });
        out.push_str(close);
    }

    fn write_raw_tokens<'i>(parser: &mut Parser<'i, '_>, out: &mut String) {
        loop {
            let token = match parser.next_including_whitespace() {
                Ok(t) => t.clone(),
                Err(_) => return,
            };
            match token {
                Token::WhiteSpace(_) => {
                    if !out.is_empty() && !out.ends_with(' ') {
                        out.push(' ');
                    }
                }
                Token::Function(_) => {
                    let _ = token.to_css(out);
                    Self::write_raw_block(parser, out, ")");
                }
                Token::ParenthesisBlock => {
                    out.push('(');
                    Self::write_raw_block(parser, out, ")");
                }
                Token::SquareBracketBlock => {
                    out.push('[');
                    Self::write_raw_block(parser, out, "]");
                }
                Token::CurlyBracketBlock => {
                    out.push('{');
                    Self::write_raw_block(parser, out, "}");
                }
                other => {
                    let _ = other.to_css(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DefaultUrlPolicy;

    fn sanitizer() -> CssSanitizer {
        CssSanitizer::new(Arc::new(DefaultUrlPolicy::new()))
    }

    #[test]
    fn test_simple_declarations_kept() {
        let out = sanitizer().sanitize_style_attribute("color: red; margin-top: 4px");
        assert_eq!(out, "color: red; margin-top: 4px");
    }

    #[test]
    fn test_unknown_property_dropped() {
        let out = sanitizer().sanitize_style_attribute("color: red; -o-link: 'x'");
        assert_eq!(out, "color: red");
    }

    #[test]
    fn test_expression_rejects_declaration() {
        let out = sanitizer().sanitize_style_attribute("width: expression(alert(1))");
        assert_eq!(out, "");
    }

    #[test]
    fn test_behavior_rejected() {
        let out = sanitizer().sanitize_style_attribute("behavior: url(#default#time2)");
        assert_eq!(out, "");
    }

    #[test]
    fn test_javascript_url_token_dropped() {
        let out = sanitizer().sanitize_style_attribute("background: url(javascript:alert(1))");
        // The whole declaration goes away because its value emptied.
        assert!(!out.contains("javascript"));
        assert!(!out.contains("background"));
    }

    #[test]
    fn test_safe_url_kept_and_quoted() {
        let out =
            sanitizer().sanitize_style_attribute("background-image: url(https://example.com/a.png)");
        assert_eq!(out, "background-image: url(\"https://example.com/a.png\")");
    }

    #[test]
    fn test_rejected_url_keeps_rest_of_value() {
        let out = sanitizer()
            .sanitize_style_attribute("background: red url(\"javascript:alert(1)\")");
        assert_eq!(out, "background: red");
    }

    #[test]
    fn test_bad_url_token_rejects_declaration() {
        // An unquoted url with inner parentheses is a malformed url token;
        // malformed values drop the whole declaration.
        let out =
            sanitizer().sanitize_style_attribute("background: red url(javascript:alert(1))");
        assert_eq!(out, "");
    }

    #[test]
    fn test_quoted_url_form() {
        let out = sanitizer().sanitize_style_attribute("background: url('javascript:alert(1)')");
        assert_eq!(out, "");
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let s = sanitizer();
        let once = s.sanitize_style_attribute(
            "color: red; background: #fff url(https://example.com/a.png) no-repeat",
        );
        let twice = s.sanitize_style_attribute(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_stylesheet_rules_filtered() {
        let css = "p { color: red; behavior: url(#x) } .hidden { display: none }";
        let out = sanitizer().sanitize_stylesheet(css);
        assert_eq!(out, "p { color: red }\n.hidden { display: none }");
    }

    #[test]
    fn test_at_rules_dropped() {
        let css = "@import url(https://evil.example/x.css); p { color: red }";
        let out = sanitizer().sanitize_stylesheet(css);
        assert_eq!(out, "p { color: red }");

        let css = "@media screen { p { color: blue } } p { color: red }";
        let out = sanitizer().sanitize_stylesheet(css);
        assert_eq!(out, "p { color: red }");
    }

    #[test]
    fn test_rule_with_no_surviving_declarations_dropped() {
        let out = sanitizer().sanitize_stylesheet("p { behavior: url(#x) }");
        assert_eq!(out, "");
    }

    #[test]
    fn test_selector_with_markup_dropped() {
        let out = sanitizer().sanitize_stylesheet("a</style><script>x { color: red }");
        assert!(!out.contains('<'));
    }

    #[test]
    fn test_string_value_with_markup_dropped() {
        let css = "p { font-family: \"</style><img src=x onerror=alert(1)>\" }";
        let out = sanitizer().sanitize_stylesheet(css);
        assert!(!out.contains('<'), "markup escaped the style sink: {out:?}");

        // Clean rules around the offender survive.
        let css = format!(".safe {{ color: red }} {css}");
        let out = sanitizer().sanitize_stylesheet(&css);
        assert_eq!(out, ".safe { color: red }");
    }

    #[test]
    fn test_stylesheet_idempotent() {
        let s = sanitizer();
        let css = "p.note[data-kind=\"x\"] { color: red } ul > li { margin: 0 }";
        let once = s.sanitize_stylesheet(css);
        let twice = s.sanitize_stylesheet(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_important_preserved() {
        let out = sanitizer().sanitize_style_attribute("color: red !important");
        assert_eq!(out, "color: red !important");
    }

    #[test]
    fn test_functions_preserved() {
        let out = sanitizer().sanitize_style_attribute("width: calc(100% - 4px)");
        assert_eq!(out, "width: calc(100% - 4px)");
    }
}
