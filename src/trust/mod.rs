// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Trust value layer
//!
//! Opaque branded values per sink category, the factory that mints them,
//! and the optional host trust-enforcement seam.

mod factory;
mod host;
mod value;

pub use factory::TrustFactory;
pub use host::{HookTable, InProcessEnforcer, SanitizeHook, TrustEnforcer, TrustPolicy};
pub use value::{
    SinkCategory, TrustedHtml, TrustedResourceUrl, TrustedScript, TrustedScriptUrl, TrustedStyle,
    TrustedStyleSheet, TrustedValue,
};
