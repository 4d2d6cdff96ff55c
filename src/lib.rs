//! vecta: geometry resolution for declarative vector graphics.
//!
//! A diagram is a tree of [`Element`]s. Every element carries a [`Spec`]
//! saying where it sits in its parent's coordinate space, what aspect it
//! wants, and how it is aligned and rotated. Rendering walks the tree once,
//! mapping each spec to a pixel rectangle, and emits SVG.
//!
//! ```
//! use vecta::{RenderOptions, Rectangle, Spec, Stack, Text, render};
//!
//! let root = Stack::vertical([
//!     vecta::Element::from(Text::new("Hello")),
//!     vecta::Element::from(Rectangle::square()),
//! ]);
//! let svg = render(root, &RenderOptions::default()).unwrap();
//! assert!(svg.starts_with("<svg"));
//! # let _ = Spec::new();
//! ```

pub mod errors;
pub mod log;
pub mod render;
pub mod types;

pub use errors::{LayoutError, SpecError};
pub use render::{
    Align, Arrow, ArrowHead, ArrowHeadStyle, Aspect, BorderStyle, Component, Context, Coord, Corners, Direction,
    Element, Ellipse, Frame, Grid, Group, Line, Metadata, Polyline, Rectangle, RenderOptions, Spec, SpecArgs, Spline,
    Stack, StackChild, Style, Text, TextMetrics, render, render_svg,
};
pub use types::{Color, Limit, MetaNumber, MetaPoint, Point, Rect, Size};
