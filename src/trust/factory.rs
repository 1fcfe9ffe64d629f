// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Trust value factory
//!
//! A [`TrustFactory`] is parameterized once at construction by a policy name
//! and a hook table. If a host trust enforcer is available the factory
//! registers a named policy and delegates every mint to it; otherwise it
//! falls back to applying the same hooks in process. Either way the minted
//! value has passed through the category's sanitizing hook exactly once, and
//! the two backings are indistinguishable to consumers.

use std::fmt;
use std::sync::Arc;

use super::host::{HookTable, TrustEnforcer, TrustPolicy};
use super::value::{
    SinkCategory, TrustedHtml, TrustedResourceUrl, TrustedScript, TrustedScriptUrl, TrustedStyle,
    TrustedStyleSheet,
};
use crate::error::{Error, Result};

/// Backing strategy, selected once by a capability probe at construction.
/// Never re-probed per call.
enum Backing {
    /// Host-registered policy performs sanitization
    Host(Arc<dyn TrustPolicy>),
    /// In-process fallback applies the hooks directly
    InProcess,
}

/// Mints opaque trust values from raw strings
pub struct TrustFactory {
    name: String,
    hooks: HookTable,
    backing: Backing,
}

impl TrustFactory {
    /// Create a factory
    ///
    /// `enforcer` is the capability probe: `Some` registers a named policy
    /// with the host (registration failure, e.g. a duplicate policy name,
    /// is fatal here and must not be caught per-call); `None` selects the
    /// in-process fallback.
    pub fn new(
        name: impl Into<String>,
        hooks: HookTable,
        enforcer: Option<&Arc<dyn TrustEnforcer>>,
    ) -> Result<Self> {
        let name = name.into();
        let backing = match enforcer {
            Some(enforcer) => Backing::Host(enforcer.register_policy(&name, hooks.clone())?),
            None => {
                tracing::debug!(policy = %name, "no trust enforcer available, using in-process brand");
                Backing::InProcess
            }
        };
        Ok(Self {
            name,
            hooks,
            backing,
        })
    }

    /// The policy name this factory was constructed with
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the factory is backed by a host-registered policy
    pub fn is_host_backed(&self) -> bool {
        matches!(self.backing, Backing::Host(_))
    }

    /// Whether a category can be minted by this factory
    pub fn supports(&self, category: SinkCategory) -> bool {
        self.hooks.supports(category)
    }

    /// Run the category hook over the raw input. No input is assumed
    /// already-safe; raw strings are never branded without passing here.
    fn create(&self, category: SinkCategory, input: &str) -> Result<String> {
        match &self.backing {
            Backing::Host(policy) => policy.create(category, input),
            Backing::InProcess => {
                let hook = self
                    .hooks
                    .get(category)
                    .ok_or_else(|| Error::missing_hook(&self.name, category))?;
                Ok(hook(input))
            }
        }
    }

    /// Mint sanitized markup
    pub fn mint_html(&self, raw: &str) -> Result<TrustedHtml> {
        Ok(TrustedHtml::new(self.create(SinkCategory::Markup, raw)?))
    }

    /// Mint vetted script text
    pub fn mint_script(&self, raw: &str) -> Result<TrustedScript> {
        Ok(TrustedScript::new(self.create(SinkCategory::Script, raw)?))
    }

    /// Mint a vetted script URL
    pub fn mint_script_url(&self, raw: &str) -> Result<TrustedScriptUrl> {
        Ok(TrustedScriptUrl::new(
            self.create(SinkCategory::ScriptUrl, raw)?,
        ))
    }

    /// Mint sanitized inline style declarations
    pub fn mint_style(&self, raw: &str) -> Result<TrustedStyle> {
        Ok(TrustedStyle::new(self.create(SinkCategory::Style, raw)?))
    }

    /// Mint a sanitized stylesheet
    pub fn mint_style_sheet(&self, raw: &str) -> Result<TrustedStyleSheet> {
        Ok(TrustedStyleSheet::new(
            self.create(SinkCategory::StyleSheet, raw)?,
        ))
    }

    /// Mint a vetted resource URL
    pub fn mint_resource_url(&self, raw: &str) -> Result<TrustedResourceUrl> {
        Ok(TrustedResourceUrl::new(
            self.create(SinkCategory::ResourceUrl, raw)?,
        ))
    }
}

impl fmt::Debug for TrustFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrustFactory")
            .field("name", &self.name)
            .field("host_backed", &self.is_host_backed())
            .field("hooks", &self.hooks)
            .finish()
    }
}
