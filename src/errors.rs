//! Error types with diagnostics using miette
//!
//! Every error names the node type it was raised for, so a failure deep in a
//! tree can be traced back to the constructor call that caused it.

use miette::Diagnostic;
use thiserror::Error;

use crate::types::NumericError;

// ============================================================================
// Specification Errors
// ============================================================================

/// Errors raised while validating a node's layout specification
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum SpecError {
    #[error("{node}: `{field}` must be a rect of 4 numbers, got {len}")]
    #[diagnostic(
        code(vecta::spec::invalid_rect),
        help("rects are written as [x1, y1, x2, y2]")
    )]
    InvalidRect {
        node: &'static str,
        field: &'static str,
        len: usize,
    },

    #[error("{node}: `{field}` must be a point of 2 numbers, got {len}")]
    #[diagnostic(code(vecta::spec::invalid_point))]
    InvalidPoint {
        node: &'static str,
        field: &'static str,
        len: usize,
    },

    #[error("{node}: `{field}` must be a limit of 2 numbers, got {len}")]
    #[diagnostic(code(vecta::spec::invalid_limit))]
    InvalidLimit {
        node: &'static str,
        field: &'static str,
        len: usize,
    },

    #[error("{node}: unknown alignment `{token}`")]
    #[diagnostic(
        code(vecta::spec::unknown_anchor),
        help("use a number in [0, 1] or one of left, center, right, top, middle, bottom")
    )]
    UnknownAnchor { node: &'static str, token: String },

    #[error("{node}: `align` takes 1 or 2 anchors, got {len}")]
    #[diagnostic(code(vecta::spec::invalid_align))]
    InvalidAlign { node: &'static str, len: usize },

    #[error("{node}: `{first}` conflicts with `{second}`")]
    #[diagnostic(
        code(vecta::spec::conflicting_keys),
        help("supply only one way of specifying the same layout field")
    )]
    ConflictingKeys {
        node: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("{node}: invalid `{field}`: {source}")]
    #[diagnostic(code(vecta::spec::invalid_number))]
    InvalidNumber {
        node: &'static str,
        field: &'static str,
        #[source]
        source: NumericError,
    },
}

// ============================================================================
// Layout Errors
// ============================================================================

/// Errors raised while resolving a tree into pixel geometry
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("{node} requires exactly {expected} child, got {got}")]
    #[diagnostic(code(vecta::tree::child_count))]
    ChildCount {
        node: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid canvas size {width}x{height}")]
    #[diagnostic(
        code(vecta::layout::invalid_size),
        help("the root size must be finite and strictly positive")
    )]
    InvalidSize { width: f64, height: f64 },

    #[error("{node}: {axis} weights need one entry per track ({expected}), got {got}")]
    #[diagnostic(code(vecta::layout::weight_count))]
    WeightCount {
        node: &'static str,
        axis: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{node}: geometry resolved to NaN or infinity")]
    #[diagnostic(code(vecta::layout::non_finite))]
    NonFinite { node: &'static str },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Spec(#[from] SpecError),
}
