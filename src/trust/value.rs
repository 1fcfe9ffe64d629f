// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Opaque trust values
//!
//! One branded wrapper type per sink category. The only way to obtain an
//! instance is through a [`TrustFactory`](crate::trust::TrustFactory) mint
//! call: constructors are crate-private and the [`TrustedValue`] trait is
//! sealed, so sink-writing code can accept the branded types and be certain
//! the payload went through the category's sanitizing hook.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sink category discriminant
///
/// Identifies which kind of dangerous sink a trusted value is valid for.
/// Values of different categories are distinct Rust types; the discriminant
/// exists for hook tables, error messages and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SinkCategory {
    /// HTML markup written into a document
    Markup,
    /// Script source text
    Script,
    /// URL loaded and executed as script
    ScriptUrl,
    /// Inline style declarations
    Style,
    /// A whole stylesheet
    StyleSheet,
    /// URL loaded as a resource or navigated to
    ResourceUrl,
}

impl fmt::Display for SinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SinkCategory::Markup => "Markup",
            SinkCategory::Script => "Script",
            SinkCategory::ScriptUrl => "ScriptUrl",
            SinkCategory::Style => "Style",
            SinkCategory::StyleSheet => "StyleSheet",
            SinkCategory::ResourceUrl => "ResourceUrl",
        };
        f.write_str(name)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Common read interface of all trusted value types
///
/// Sealed: only the six types in this module implement it.
pub trait TrustedValue: sealed::Sealed + fmt::Display {
    /// The sink category this value is valid for
    const CATEGORY: SinkCategory;

    /// Read the validated payload
    fn as_str(&self) -> &str;
}

macro_rules! trusted_value {
    ($(#[$doc:meta])* $name:ident => $category:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            data: String,
        }

        impl $name {
            /// Wrap an already-sanitized payload. Reachable only from the
            /// factory module path.
            pub(crate) fn new(data: String) -> Self {
                Self { data }
            }

            /// Read the validated payload
            pub fn as_str(&self) -> &str {
                &self.data
            }

            /// Consume the value, returning the payload
            pub fn into_string(self) -> String {
                self.data
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.data)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.data
            }
        }

        impl sealed::Sealed for $name {}

        impl TrustedValue for $name {
            const CATEGORY: SinkCategory = SinkCategory::$category;

            fn as_str(&self) -> &str {
                &self.data
            }
        }
    };
}

trusted_value! {
    /// Sanitized HTML markup, safe to write into a markup sink
    TrustedHtml => Markup
}

trusted_value! {
    /// Vetted script source text
    TrustedScript => Script
}

trusted_value! {
    /// Vetted URL that may be loaded as script
    TrustedScriptUrl => ScriptUrl
}

trusted_value! {
    /// Sanitized inline style declarations
    TrustedStyle => Style
}

trusted_value! {
    /// Sanitized stylesheet text
    TrustedStyleSheet => StyleSheet
}

trusted_value! {
    /// Vetted URL that may be loaded as a resource
    TrustedResourceUrl => ResourceUrl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_payload() {
        let v = TrustedHtml::new("<b>x</b>".to_string());
        assert_eq!(v.to_string(), "<b>x</b>");
        assert_eq!(v.as_str(), "<b>x</b>");
    }

    #[test]
    fn test_category_isolation() {
        // Identical payloads in different categories stay distinct types
        // with distinct discriminants; a Markup value can never satisfy a
        // Script sink's bound.
        fn accepts<T: TrustedValue>(_: &T) -> SinkCategory {
            T::CATEGORY
        }

        let html = TrustedHtml::new("payload".to_string());
        let script = TrustedScript::new("payload".to_string());
        assert_eq!(accepts(&html), SinkCategory::Markup);
        assert_eq!(accepts(&script), SinkCategory::Script);
        assert_ne!(accepts(&html), accepts(&script));
    }

    #[test]
    fn test_equality_within_category() {
        let a = TrustedStyle::new("color: red".to_string());
        let b = TrustedStyle::new("color: red".to_string());
        assert_eq!(a, b);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(SinkCategory::ResourceUrl.to_string(), "ResourceUrl");
        assert_eq!(SinkCategory::Markup.to_string(), "Markup");
    }
}
