// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSS sanitization
//!
//! Declaration and stylesheet filtering over cssparser token streams.

mod properties;
mod sanitizer;

pub use properties::{property_allowed, property_forbidden};
pub use sanitizer::CssSanitizer;
