// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Host trust-enforcement seam
//!
//! Some embedding hosts provide their own trust-enforcement registry: a
//! named policy is registered once with a table of per-category sanitizing
//! hooks, and every mint call goes through the returned policy object. The
//! [`TrustEnforcer`] trait is that registration surface. Hosts are detected
//! by capability (an `Arc<dyn TrustEnforcer>` handed to the factory), never
//! assumed present.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::value::SinkCategory;
use crate::error::{Error, Result};

/// A sanitizing hook for one sink category
pub type SanitizeHook = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Table of per-category sanitizing hooks
///
/// A category with no hook cannot be minted through the owning policy.
#[derive(Clone, Default)]
pub struct HookTable {
    hooks: HashMap<SinkCategory, SanitizeHook>,
}

impl HookTable {
    /// Create an empty hook table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hook for a category (fluent)
    pub fn with_hook<F>(mut self, category: SinkCategory, hook: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.hooks.insert(category, Arc::new(hook));
        self
    }

    /// Get the hook for a category
    pub fn get(&self, category: SinkCategory) -> Option<&SanitizeHook> {
        self.hooks.get(&category)
    }

    /// Check whether a category can be minted
    pub fn supports(&self, category: SinkCategory) -> bool {
        self.hooks.contains_key(&category)
    }

    /// Categories with a registered hook
    pub fn categories(&self) -> Vec<SinkCategory> {
        self.hooks.keys().copied().collect()
    }
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookTable")
            .field("categories", &self.categories())
            .finish()
    }
}

/// A registered trust policy: performs sanitization for mint calls
pub trait TrustPolicy: Send + Sync {
    /// The policy name it was registered under
    fn name(&self) -> &str;

    /// Run the category's sanitizing hook over the input, returning the
    /// sanitized payload the factory will brand
    fn create(&self, category: SinkCategory, input: &str) -> Result<String>;
}

/// Host trust-enforcement registry
pub trait TrustEnforcer: Send + Sync {
    /// Register a named policy with its sanitizing hooks
    ///
    /// Rejects duplicate policy names. Rejection is a configuration error:
    /// factory construction fails fatally, never per-call.
    fn register_policy(&self, name: &str, hooks: HookTable) -> Result<Arc<dyn TrustPolicy>>;
}

/// Reference enforcer
///
/// Polices duplicate policy names process-wide. Used directly by embedders
/// that want name enforcement without a platform registry, and by tests to
/// simulate a present host mechanism.
#[derive(Default)]
pub struct InProcessEnforcer {
    registered: RwLock<HashSet<String>>,
}

impl InProcessEnforcer {
    /// Create a new enforcer with no registered policies
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrustEnforcer for InProcessEnforcer {
    fn register_policy(&self, name: &str, hooks: HookTable) -> Result<Arc<dyn TrustPolicy>> {
        let mut registered = self.registered.write();
        if !registered.insert(name.to_string()) {
            return Err(Error::policy_registration(name, "duplicate policy name"));
        }
        tracing::debug!(policy = %name, "registered trust policy");
        Ok(Arc::new(RegisteredPolicy {
            name: name.to_string(),
            hooks,
        }))
    }
}

/// Policy object returned by [`InProcessEnforcer`]
struct RegisteredPolicy {
    name: String,
    hooks: HookTable,
}

impl TrustPolicy for RegisteredPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, category: SinkCategory, input: &str) -> Result<String> {
        let hook = self
            .hooks
            .get(category)
            .ok_or_else(|| Error::missing_hook(&self.name, category))?;
        Ok(hook(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper_hooks() -> HookTable {
        HookTable::new().with_hook(SinkCategory::Markup, |s| s.to_uppercase())
    }

    #[test]
    fn test_register_and_create() {
        let enforcer = InProcessEnforcer::new();
        let policy = enforcer.register_policy("p1", upper_hooks()).unwrap();
        assert_eq!(policy.name(), "p1");
        assert_eq!(
            policy.create(SinkCategory::Markup, "abc").unwrap(),
            "ABC"
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let enforcer = InProcessEnforcer::new();
        enforcer.register_policy("p1", upper_hooks()).unwrap();
        let err = match enforcer.register_policy("p1", upper_hooks()) {
            Ok(_) => panic!("duplicate policy name must be rejected"),
            Err(err) => err,
        };
        assert!(err.is_config());
    }

    #[test]
    fn test_missing_hook_fails_fast() {
        let enforcer = InProcessEnforcer::new();
        let policy = enforcer.register_policy("p1", upper_hooks()).unwrap();
        let err = policy.create(SinkCategory::Script, "x").unwrap_err();
        assert!(matches!(err, Error::MissingHook { .. }));
    }

    #[test]
    fn test_hook_table_debug_lists_categories() {
        let table = upper_hooks();
        let dbg = format!("{:?}", table);
        assert!(dbg.contains("Markup"));
    }
}
