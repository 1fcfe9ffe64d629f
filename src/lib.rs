// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Mureena - Allow-list HTML/CSS Sanitizer
//!
//! A pure Rust sanitizer that turns untrusted markup into values safe to
//! hand to HTML sinks. Sanitization is allow-list based: anything not
//! explicitly permitted is removed, and the output is minted as an opaque
//! trusted type so the type system enforces the boundary between raw
//! strings and sink-ready content.
//!
//! ## Features
//!
//! - Allow-list element and attribute filtering over a real HTML5 parse
//! - CSS sanitization for style attributes and stylesheets, property by
//!   property over a token stream
//! - URL policy engine with scheme filtering and relative-URL resolution
//! - Trusted value types per sink category (HTML, Script, ScriptURL,
//!   Style, StyleSheet, ResourceURL)
//! - Optional host trust enforcement with an in-process fallback that
//!   sanitizes identically
//! - Idempotent output: sanitizing sanitized markup is a no-op
//!
//! ## Example
//!
//! ```rust
//! use mureena::SanitizerBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sanitizer = SanitizerBuilder::new().build()?;
//!
//!     let safe = sanitizer.sanitize("<p onclick=\"evil()\">hi<script>bad()</script></p>")?;
//!     assert_eq!(safe.as_str(), "<p>hi</p>");
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod css;
pub mod error;
pub mod html;
pub mod policy;
pub mod trust;

// Re-exports for convenience

// Sanitizer and builder
pub use builder::{default_sanitizer, sanitize, SanitizerBuilder};
pub use html::Sanitizer;

// Allow-list configuration
pub use html::{AllowList, AttrKind, Disposition};

// Sanitized tree
pub use html::{Fragment, NodeData, NodeId, NodeType};

// Errors
pub use error::{Error, Result};

// URL policy
pub use policy::{CssSite, DefaultUrlPolicy, PolicyHint, UrlPolicy};

// CSS
pub use css::CssSanitizer;

// Trust layer
pub use trust::{HookTable, InProcessEnforcer, SinkCategory, TrustEnforcer, TrustFactory, TrustPolicy};
pub use trust::{
    TrustedHtml, TrustedResourceUrl, TrustedScript, TrustedScriptUrl, TrustedStyle,
    TrustedStyleSheet, TrustedValue,
};

/// Mureena version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
