// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML sanitization
//!
//! Fragment parsing, the detached tree, the allow-list walk and the
//! escaping serializer.

mod allowlist;
mod parser;
mod sanitizer;
mod serializer;
mod tree;

pub use allowlist::{AllowList, AttrKind, Disposition};
pub use parser::parse_html_fragment;
pub use sanitizer::Sanitizer;
pub use serializer::serialize_fragment;
pub use tree::{Fragment, NodeData, NodeId, NodeType};

pub(crate) use sanitizer::SanitizerInner;
