//! SVG rendering for element trees
//!
//! This module is organized into submodules:
//! - `defaults`: Default sizes and settings
//! - `types`: Attributes, styles and small shared enums
//! - `geometry`: Rect encodings, aspect embedding and rotation-aware fitting
//! - `spec`: Layout specifications and argument validation
//! - `context`: Coordinate mapping and the per-render Metadata registry
//! - `shapes`: The component trait, the element enum and leaf shapes
//! - `group`, `stack`, `grid`: Containers
//! - `path_builder`: Path data and curve primitives
//! - `svg`: Markup serialization

pub mod context;
pub mod defaults;
pub mod geometry;
pub mod grid;
pub mod group;
pub mod path_builder;
pub mod shapes;
pub mod spec;
pub mod stack;
pub mod svg;
pub mod types;

// Re-export commonly used items
pub use context::{Context, Metadata};
pub use grid::Grid;
pub use group::{Frame, Group};
pub use shapes::{
    Arrow, ArrowHead, Component, Element, Ellipse, Line, MonospaceMetrics, Polyline, ProportionalMetrics, Rectangle,
    Spline, Text, TextMetrics,
};
pub use spec::{Align, Aspect, Coord, Spec, SpecArgs};
pub use stack::{Stack, StackChild};
pub use types::{ArrowHeadStyle, Attrs, BorderStyle, Corners, Direction, Style};

use crate::errors::LayoutError;
use crate::types::Size;

use geometry::embed;

/// Per-render settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Requested canvas size; shrunk to the root's aspect if it has one
    pub size: Size,
    /// Decimal places in emitted numbers
    pub precision: usize,
    /// Singularity threshold for rotated fits
    pub tolerance: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            size: Size::new(defaults::CANVAS_SIZE, defaults::CANVAS_SIZE),
            precision: defaults::PRECISION,
            tolerance: defaults::TOLERANCE,
        }
    }
}

impl RenderOptions {
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Resolve `root` into an SVG document.
pub fn render_svg(root: &Element, options: &RenderOptions) -> Result<String, LayoutError> {
    let Size { w, h } = options.size;
    let size = Size::try_new(w, h).map_err(|_| LayoutError::InvalidSize { width: w, height: h })?;
    let size = embed(size, root.layout_aspect()?, false);
    crate::log::debug!(width = size.w, height = size.h, "root canvas");

    let ctx = Context::root(size)
        .with_precision(options.precision)
        .with_tolerance(options.tolerance);
    let mut meta = Metadata::new();
    let body = root.render_in(&ctx, &mut meta)?;
    Ok(svg::document(size, &meta, &body, options.precision))
}

/// Render an element tree to an SVG string
pub fn render(root: impl Into<Element>, options: &RenderOptions) -> Result<String, miette::Report> {
    Ok(render_svg(&root.into(), options)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_shrinks_to_root_aspect() {
        let svg = render(Rectangle::new().with_spec(Spec::new().with_aspect(2.0)), &RenderOptions::default()).unwrap();
        assert!(svg.starts_with(r#"<svg viewBox="0 0 500 250" width="500" height="250""#), "{svg}");
        assert!(svg.contains(r#"<rect x="0" y="0" width="500" height="250"/>"#));
    }

    #[test]
    fn invalid_canvas_is_rejected() {
        let err = render_svg(&Rectangle::new().into(), &RenderOptions::default().with_size(0.0, 10.0)).unwrap_err();
        assert_eq!(err, LayoutError::InvalidSize { width: 0.0, height: 10.0 });
    }

    #[test]
    fn report_carries_diagnostic_code() {
        let group = Group::new([Element::from(Rectangle::new()), Ellipse::new().into()]).with_spec(Spec::new().with_auto_aspect());
        let report = render(group, &RenderOptions::default()).unwrap_err();
        let code = report.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("vecta::tree::child_count"));
    }
}
