// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSS property allow-list
//!
//! Properties known not to trigger script execution or unexpected resource
//! loads. Everything else is dropped. A small deny set is rejected even if
//! a caller edits the allow-list: those are legacy execution vectors.

use std::collections::HashSet;

use lazy_static::lazy_static;

lazy_static! {
    static ref ALLOWED_PROPERTIES: HashSet<&'static str> = [
        // Color and background
        "color", "background", "background-color", "background-image",
        "background-position", "background-repeat", "background-size",
        "background-attachment", "background-clip", "background-origin",
        "opacity",
        // Typography
        "font", "font-family", "font-size", "font-style", "font-variant",
        "font-weight", "font-stretch", "line-height", "letter-spacing",
        "word-spacing", "text-align", "text-decoration",
        "text-decoration-color", "text-decoration-line",
        "text-decoration-style", "text-indent", "text-overflow",
        "text-shadow", "text-transform", "white-space", "word-break",
        "word-wrap", "overflow-wrap", "vertical-align", "direction",
        "unicode-bidi", "quotes", "tab-size", "hyphens",
        // Box model
        "margin", "margin-top", "margin-right", "margin-bottom",
        "margin-left", "padding", "padding-top", "padding-right",
        "padding-bottom", "padding-left", "width", "min-width", "max-width",
        "height", "min-height", "max-height", "box-sizing", "box-shadow",
        // Border and outline
        "border", "border-top", "border-right", "border-bottom",
        "border-left", "border-color", "border-style", "border-width",
        "border-top-color", "border-right-color", "border-bottom-color",
        "border-left-color", "border-top-style", "border-right-style",
        "border-bottom-style", "border-left-style", "border-top-width",
        "border-right-width", "border-bottom-width", "border-left-width",
        "border-radius", "border-top-left-radius", "border-top-right-radius",
        "border-bottom-left-radius", "border-bottom-right-radius",
        "border-collapse", "border-spacing", "outline", "outline-color",
        "outline-style", "outline-width", "outline-offset",
        // Layout
        "display", "visibility", "overflow", "overflow-x", "overflow-y",
        "position", "top", "right", "bottom", "left", "z-index", "float",
        "clear", "clip", "zoom",
        // Flexbox and grid
        "flex", "flex-basis", "flex-direction", "flex-flow", "flex-grow",
        "flex-shrink", "flex-wrap", "order", "justify-content",
        "align-items", "align-content", "align-self", "gap", "row-gap",
        "column-gap", "grid", "grid-area", "grid-auto-columns",
        "grid-auto-flow", "grid-auto-rows", "grid-column",
        "grid-column-end", "grid-column-start", "grid-row", "grid-row-end",
        "grid-row-start", "grid-template", "grid-template-areas",
        "grid-template-columns", "grid-template-rows",
        // Lists, tables, counters
        "list-style", "list-style-position", "list-style-type",
        "caption-side", "empty-cells", "table-layout", "counter-reset",
        "counter-increment",
        // Transforms and transitions (no external loads)
        "transform", "transform-origin", "transition", "transition-delay",
        "transition-duration", "transition-property",
        "transition-timing-function",
        // Misc presentational
        "cursor", "caret-color", "accent-color", "object-fit",
        "object-position", "aspect-ratio", "page-break-after",
        "page-break-before", "page-break-inside", "break-after",
        "break-before", "break-inside",
    ]
    .iter()
    .copied()
    .collect();

    /// Rejected regardless of the allow-list: legacy script-execution and
    /// binding vectors (`expression()`-capable or resource-binding).
    static ref FORBIDDEN_PROPERTIES: HashSet<&'static str> = [
        "behavior", "-moz-binding", "filter", "-ms-filter",
    ]
    .iter()
    .copied()
    .collect();
}

/// Check whether a declaration with this property survives filtering
pub fn property_allowed(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    !FORBIDDEN_PROPERTIES.contains(name.as_str()) && ALLOWED_PROPERTIES.contains(name.as_str())
}

/// Check whether the property is in the hard deny set
pub fn property_forbidden(name: &str) -> bool {
    FORBIDDEN_PROPERTIES.contains(name.to_ascii_lowercase().as_str())
}
