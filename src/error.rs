// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for Mureena
//!
//! Sanitization itself never fails: disallowed input is handled by
//! omission. Errors here are configuration errors (bad allow-list,
//! duplicate trust policy name, missing sanitizing hook) and surface
//! at construction or mint time, never mid-walk.

use thiserror::Error;

use crate::trust::SinkCategory;

/// Result type alias for Mureena operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Mureena
#[derive(Error, Debug)]
pub enum Error {
    /// URL parsing failed (configuration-time only, e.g. a base URL)
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// HTML parsing failed
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),

    /// CSS handling error
    #[error("CSS error: {0}")]
    Css(String),

    /// Configuration error (malformed allow-list, missing hook, bad option)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Trust policy registration was rejected by the host enforcer
    #[error("Trust policy registration failed for '{name}': {reason}")]
    PolicyRegistration { name: String, reason: String },

    /// No sanitizing hook is registered for a sink category
    #[error("No sanitizing hook registered for {category} values in policy '{policy}'")]
    MissingHook {
        policy: String,
        category: SinkCategory,
    },

    /// Serialization error (allow-list JSON loading)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a CSS error
    pub fn css<S: Into<String>>(msg: S) -> Self {
        Error::Css(msg.into())
    }

    /// Create a policy registration error
    pub fn policy_registration(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::PolicyRegistration {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing-hook error
    pub fn missing_hook(policy: impl Into<String>, category: SinkCategory) -> Self {
        Error::MissingHook {
            policy: policy.into(),
            category,
        }
    }

    /// Check if this is a configuration error (fatal at init, never
    /// caught per-call)
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::PolicyRegistration { .. } | Error::MissingHook { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = Error::config("bad allow-list");
        assert!(err.is_config());
        assert_eq!(err.to_string(), "Configuration error: bad allow-list");
    }

    #[test]
    fn test_policy_registration_error() {
        let err = Error::policy_registration("mureena#default", "duplicate policy name");
        assert!(err.is_config());
        assert!(err.to_string().contains("mureena#default"));
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_missing_hook_error() {
        let err = Error::missing_hook("mureena#default", SinkCategory::Script);
        assert!(err.is_config());
        assert!(err.to_string().contains("Script"));
    }

    #[test]
    fn test_url_error_converts() {
        let parse_err = url::Url::parse("http://[invalid").unwrap_err();
        let err: Error = parse_err.into();
        assert!(!err.is_config());
    }
}
