//! Element types for the component tree
//!
//! Each element is its own type that knows how to:
//! - Report the aspect ratio it wants (and, for containers, derive one)
//! - Produce the SVG attributes for the pixel region it was given
//! - Render its children, if it has any
//!
//! [`Element`] wraps every type for uniform storage; dispatch to the
//! [`Component`] methods goes through `enum_dispatch`.

use enum_dispatch::enum_dispatch;
use glam::dvec2;

use crate::errors::LayoutError;
use crate::types::{Color, MetaPoint, Point, Rect, Size};

use super::context::{Context, Metadata};
use super::defaults;
use super::geometry::{radial_rect, rotated_apparent_aspect};
use super::grid::Grid;
use super::group::{Frame, Group};
use super::path_builder::{PathData, SplineOptions, arrow_head_points, cardinal_spline, rounded_rect_path, unit_dir};
use super::spec::{Coord, Spec};
use super::stack::Stack;
use super::svg::{self, escape_xml};
use super::types::{ArrowHeadStyle, Attrs, Corners, Style};

/// Common behavior for all elements
#[enum_dispatch]
pub trait Component {
    /// Node type name used in diagnostics
    fn kind(&self) -> &'static str;

    fn spec(&self) -> &Spec;

    fn spec_mut(&mut self) -> &mut Spec;

    fn style(&self) -> &Style;

    /// SVG tag this element renders as
    fn tag(&self) -> &'static str;

    /// Width/height ratio this element wants, if any
    fn aspect(&self) -> Result<Option<f64>, LayoutError> {
        Ok(self.spec().fixed_aspect())
    }

    /// Coordinate rect derived from the element's content, for `coord: auto`
    fn auto_coord(&self) -> Result<Option<Rect>, LayoutError> {
        Ok(None)
    }

    /// The aspect and, if the spec asks for `coord: auto`, the derived coord.
    /// Containers override this to walk their children once for both.
    fn auto_layout(&self) -> Result<(Option<f64>, Option<Rect>), LayoutError> {
        let coord = match self.spec().coord {
            Some(Coord::Auto) => self.auto_coord()?,
            _ => None,
        };
        Ok((self.aspect()?, coord))
    }

    /// Element-specific attributes for the resolved pixel region
    fn geometry(&self, ctx: &Context, meta: &mut Metadata) -> Result<Attrs, LayoutError>;

    /// Child markup, for elements that have any
    fn inner(&self, _ctx: &Context, _meta: &mut Metadata) -> Result<Option<String>, LayoutError> {
        Ok(None)
    }
}

/// Accessors shared by every element that stores `spec` and `style` fields
macro_rules! spec_access {
    () => {
        fn spec(&self) -> &Spec {
            &self.spec
        }

        fn spec_mut(&mut self) -> &mut Spec {
            &mut self.spec
        }

        fn style(&self) -> &Style {
            &self.style
        }
    };
}

/// `with_spec` / `with_style` builders
macro_rules! node_builders {
    () => {
        pub fn with_spec(mut self, spec: Spec) -> Self {
            self.spec = spec;
            self
        }

        pub fn with_style(mut self, style: Style) -> Self {
            self.style = style;
            self
        }
    };
}

pub(crate) use node_builders;
pub(crate) use spec_access;

/// An element wrapping all element types
#[enum_dispatch(Component)]
#[derive(Debug, Clone)]
pub enum Element {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Line(Line),
    Polyline(Polyline),
    Spline(Spline),
    ArrowHead(ArrowHead),
    Arrow(Arrow),
    Text(Text),
    Group(Group),
    Frame(Frame),
    Stack(Stack),
    Grid(Grid),
}

impl Element {
    /// A copy of this element with its spec edited by `f`
    pub fn with_spec(&self, f: impl FnOnce(&mut Spec)) -> Element {
        let mut e = self.clone();
        f(e.spec_mut());
        e
    }

    /// A copy of this element placed at `rect` in its parent's coordinates
    pub fn with_rect(&self, rect: Rect) -> Element {
        self.with_spec(|s| s.rect = Some(rect))
    }

    /// The spec with `aspect: auto` and `coord: auto` replaced by concrete values.
    pub fn resolved_spec(&self) -> Result<Spec, LayoutError> {
        let mut spec = self.spec().clone();
        let (aspect, coord) = self.auto_layout()?;
        spec.aspect = aspect.map(super::spec::Aspect::Fixed);
        if spec.coord == Some(Coord::Auto) {
            spec.coord = coord.map(Coord::Rect);
        }
        Ok(spec)
    }

    /// The aspect a parent's size solver should plan around: the rotated
    /// bounding-box aspect for rotated elements.
    pub fn layout_aspect(&self) -> Result<Option<f64>, LayoutError> {
        let spec = self.spec();
        Ok(self.aspect()?.map(|a| {
            if spec.is_rotated() {
                rotated_apparent_aspect(a, spec.rotate)
            } else {
                a
            }
        }))
    }

    /// Where this element lands, in the coordinates of the parent context `ctx`.
    pub fn rect(&self, ctx: &Context) -> Result<Rect, LayoutError> {
        let spec = self.resolved_spec()?;
        Ok(ctx.unmap_rect(ctx.map(&spec).prect))
    }

    /// [`Element::resolved_spec`] with the rotation cleared
    pub(crate) fn upright_spec(&self) -> Result<Spec, LayoutError> {
        let mut spec = self.resolved_spec()?;
        spec.rotate = 0.0;
        Ok(spec)
    }

    /// All attributes for this element drawn in `ctx`
    pub fn props(&self, ctx: &Context, meta: &mut Metadata) -> Result<Attrs, LayoutError> {
        if !ctx.prect.is_finite() {
            return Err(LayoutError::NonFinite { node: self.kind() });
        }
        let mut attrs = self.geometry(ctx, meta)?;
        attrs.extend(self.style().to_attrs(ctx.precision));
        if let Some(t) = &ctx.transform {
            attrs.set("transform", t.clone());
        }
        Ok(attrs)
    }

    /// Render this element into the context it was already mapped to
    pub fn svg(&self, ctx: &Context, meta: &mut Metadata) -> Result<String, LayoutError> {
        let props = self.props(ctx, meta)?;
        let inner = self.inner(ctx, meta)?;
        Ok(svg::element(self.tag(), &props, inner.as_deref()))
    }

    /// Map this element into `parent` and render it
    pub fn render_in(&self, parent: &Context, meta: &mut Metadata) -> Result<String, LayoutError> {
        let ctx = parent.map(&self.resolved_spec()?);
        self.svg(&ctx, meta)
    }
}

// ============================================================================
// Rectangle
// ============================================================================

/// A rectangle, optionally with rounded corners
#[derive(Debug, Clone, Default)]
pub struct Rectangle {
    pub spec: Spec,
    pub style: Style,
    /// Corner radii as fractions of the shorter side
    pub rounded: Option<Corners>,
}

impl Rectangle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A square: a rectangle with aspect 1
    pub fn square() -> Self {
        Self::new().with_spec(Spec::new().with_aspect(1.0))
    }

    pub fn with_rounded(mut self, corners: Corners) -> Self {
        self.rounded = Some(corners);
        self
    }

    node_builders!();
}

impl Component for Rectangle {
    spec_access!();

    fn kind(&self) -> &'static str {
        "Rectangle"
    }

    fn tag(&self) -> &'static str {
        match self.rounded {
            Some(c) if !c.is_zero() => "path",
            _ => "rect",
        }
    }

    fn geometry(&self, ctx: &Context, _meta: &mut Metadata) -> Result<Attrs, LayoutError> {
        let r = ctx.prect.upright();
        let mut attrs = Attrs::new();
        match self.rounded {
            Some(c) if !c.is_zero() => {
                let side = r.width().min(r.height());
                let d = rounded_rect_path(r, c.scale(side));
                attrs.set("d", d.to_svg(ctx.precision));
            }
            _ => {
                attrs.set("x", ctx.fmt(r.x1));
                attrs.set("y", ctx.fmt(r.y1));
                attrs.set("width", ctx.fmt(r.width()));
                attrs.set("height", ctx.fmt(r.height()));
            }
        }
        Ok(attrs)
    }
}

// ============================================================================
// Ellipse
// ============================================================================

/// An ellipse inscribed in its rect
#[derive(Debug, Clone, Default)]
pub struct Ellipse {
    pub spec: Spec,
    pub style: Style,
}

impl Ellipse {
    pub fn new() -> Self {
        Self::default()
    }

    /// An ellipse with aspect 1
    pub fn circle() -> Self {
        Self::new().with_spec(Spec::new().with_aspect(1.0))
    }

    node_builders!();
}

impl Component for Ellipse {
    spec_access!();

    fn kind(&self) -> &'static str {
        "Ellipse"
    }

    fn tag(&self) -> &'static str {
        "ellipse"
    }

    fn geometry(&self, ctx: &Context, _meta: &mut Metadata) -> Result<Attrs, LayoutError> {
        let r = ctx.prect.upright();
        let c = r.center();
        let mut attrs = Attrs::new();
        attrs.set("cx", ctx.fmt(c.x));
        attrs.set("cy", ctx.fmt(c.y));
        attrs.set("rx", ctx.fmt(r.width() / 2.0));
        attrs.set("ry", ctx.fmt(r.height() / 2.0));
        Ok(attrs)
    }
}

// ============================================================================
// Line-like shapes
// ============================================================================

/// A straight segment between two points of the element's coordinate space
#[derive(Debug, Clone)]
pub struct Line {
    pub spec: Spec,
    pub style: Style,
    pub from: MetaPoint,
    pub to: MetaPoint,
}

impl Line {
    pub fn new(from: impl Into<MetaPoint>, to: impl Into<MetaPoint>) -> Self {
        Line {
            spec: Spec::default(),
            style: Style::default(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Full-width horizontal line at height `y`
    pub fn horizontal(y: f64) -> Self {
        Line::new((0.0, y), (1.0, y))
    }

    /// Full-height vertical line at `x`
    pub fn vertical(x: f64) -> Self {
        Line::new((x, 0.0), (x, 1.0))
    }

    node_builders!();
}

impl Component for Line {
    spec_access!();

    fn kind(&self) -> &'static str {
        "Line"
    }

    fn tag(&self) -> &'static str {
        "line"
    }

    fn geometry(&self, ctx: &Context, _meta: &mut Metadata) -> Result<Attrs, LayoutError> {
        let a = ctx.map_point(self.from);
        let b = ctx.map_point(self.to);
        let mut attrs = Attrs::new();
        attrs.set("x1", ctx.fmt(a.x));
        attrs.set("y1", ctx.fmt(a.y));
        attrs.set("x2", ctx.fmt(b.x));
        attrs.set("y2", ctx.fmt(b.y));
        Ok(attrs)
    }
}

fn points_attr(ctx: &Context, points: &[MetaPoint]) -> String {
    points
        .iter()
        .map(|p| {
            let p = ctx.map_point(*p);
            format!("{},{}", ctx.fmt(p.x), ctx.fmt(p.y))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A connected run of straight segments, optionally closed into a polygon
#[derive(Debug, Clone, Default)]
pub struct Polyline {
    pub spec: Spec,
    pub style: Style,
    pub points: Vec<MetaPoint>,
    pub closed: bool,
}

impl Polyline {
    pub fn new(points: impl IntoIterator<Item = impl Into<MetaPoint>>) -> Self {
        Polyline {
            points: points.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// A closed polygon through `points`
    pub fn polygon(points: impl IntoIterator<Item = impl Into<MetaPoint>>) -> Self {
        Polyline {
            closed: true,
            ..Self::new(points)
        }
    }

    node_builders!();
}

impl Component for Polyline {
    spec_access!();

    fn kind(&self) -> &'static str {
        "Polyline"
    }

    fn tag(&self) -> &'static str {
        if self.closed { "polygon" } else { "polyline" }
    }

    fn geometry(&self, ctx: &Context, _meta: &mut Metadata) -> Result<Attrs, LayoutError> {
        let mut attrs = Attrs::new();
        attrs.set("points", points_attr(ctx, &self.points));
        Ok(attrs)
    }
}

/// A smooth cardinal spline through a sequence of points
#[derive(Debug, Clone, Default)]
pub struct Spline {
    pub spec: Spec,
    pub style: Style,
    pub points: Vec<MetaPoint>,
    /// Tangent directions in the spline's own coordinate space
    pub options: SplineOptions,
}

impl Spline {
    pub fn new(points: impl IntoIterator<Item = impl Into<MetaPoint>>) -> Self {
        Spline {
            points: points.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: SplineOptions) -> Self {
        self.options = options;
        self
    }

    node_builders!();
}

impl Component for Spline {
    spec_access!();

    fn kind(&self) -> &'static str {
        "Spline"
    }

    fn tag(&self) -> &'static str {
        "path"
    }

    fn geometry(&self, ctx: &Context, _meta: &mut Metadata) -> Result<Attrs, LayoutError> {
        let points: Vec<Point> = self.points.iter().map(|p| ctx.map_point(*p)).collect();
        // directions are extents, so they pick up axis flips but not offsets
        let to_pixels = |d: glam::DVec2| {
            let s = ctx.map_size(Size::new(d.x, d.y));
            dvec2(s.w, s.h)
        };
        let options = SplineOptions {
            start_dir: self.options.start_dir.map(to_pixels),
            end_dir: self.options.end_dir.map(to_pixels),
            ..self.options
        };
        let mut attrs = Attrs::new();
        attrs.set("d", cardinal_spline(&points, options).to_svg(ctx.precision));
        Ok(attrs)
    }
}

// ============================================================================
// Arrows
// ============================================================================

/// An arrow head inscribed in its rect, tip pointing along `direction`
#[derive(Debug, Clone, Default)]
pub struct ArrowHead {
    pub spec: Spec,
    pub style: Style,
    /// Degrees clockwise from +x
    pub direction: f64,
    pub head: ArrowHeadStyle,
}

impl ArrowHead {
    pub fn new(direction: f64) -> Self {
        ArrowHead {
            direction,
            ..Self::default()
        }
    }

    pub fn with_head(mut self, head: ArrowHeadStyle) -> Self {
        self.head = head;
        self
    }

    node_builders!();
}

impl Component for ArrowHead {
    spec_access!();

    fn kind(&self) -> &'static str {
        "ArrowHead"
    }

    fn tag(&self) -> &'static str {
        "path"
    }

    fn geometry(&self, ctx: &Context, _meta: &mut Metadata) -> Result<Attrs, LayoutError> {
        let r = ctx.prect.upright();
        let center = r.center().to_dvec2();
        let radius = dvec2(r.width() / 2.0, r.height() / 2.0);

        // pull the head back so the stroke's outer edge lands on the tip
        let stroke = self.style.stroke_width.unwrap_or(defaults::STROKE_WIDTH);
        let inset = (unit_dir(self.direction) * radius).normalize_or_zero() * (stroke / 2.0);

        let [left, tip, right] =
            arrow_head_points(self.direction, self.head.arc).map(|u| Point::from(center + u * radius - inset));

        let mut path = PathData::new()
            .m(left.x, left.y)
            .l(tip.x, tip.y)
            .l(right.x, right.y);
        let mut attrs = Attrs::new();
        if self.head.base {
            path = path.z();
            if self.style.fill.is_none() {
                let fill = self.style.stroke.clone().unwrap_or_else(|| Color::from(defaults::STROKE));
                attrs.set("fill", fill.to_string());
            }
        }
        attrs.set("d", path.to_svg(ctx.precision));
        attrs.set("stroke-linejoin", "round");
        Ok(attrs)
    }
}

/// A straight arrow across its rect, pointing along `direction`
#[derive(Debug, Clone, Default)]
pub struct Arrow {
    pub spec: Spec,
    pub style: Style,
    /// Degrees clockwise from +x
    pub direction: f64,
    pub head: ArrowHeadStyle,
}

impl Arrow {
    pub fn new(direction: f64) -> Self {
        Arrow {
            direction,
            ..Self::default()
        }
    }

    pub fn with_head(mut self, head: ArrowHeadStyle) -> Self {
        self.head = head;
        self
    }

    node_builders!();

    /// The shaft and head, in the arrow's unit coordinate space
    fn parts(&self, ctx: &Context) -> [Element; 2] {
        let dir = unit_dir(self.direction);
        let center = dvec2(0.5, 0.5);
        let tip = center + dir / 2.0;
        let tail = center - dir / 2.0;
        let h = self.head.size;
        let head_center = tip - dir * h;
        let shaft_end = if self.head.base {
            MetaPoint::from(Point::from(head_center))
        } else {
            // an open head's tip is pulled back by half a stroke, in pixels
            let scale = ctx.map_size(Size::new(1.0, 1.0)).abs();
            let stroke = self.style.stroke_width.unwrap_or(defaults::STROKE_WIDTH);
            let back = (dir * dvec2(scale.w, scale.h)).normalize_or_zero() * (stroke / 2.0);
            MetaPoint::offset(Point::from(tip), -back.x, -back.y)
        };

        let shaft = Line::new(Point::from(tail), shaft_end).with_style(self.style.clone());
        let head = ArrowHead::new(self.direction)
            .with_head(self.head)
            .with_style(self.style.clone())
            .with_spec(Spec::new().with_rect(radial_rect(head_center.into(), h, h)));
        [shaft.into(), head.into()]
    }
}

impl Component for Arrow {
    spec_access!();

    fn kind(&self) -> &'static str {
        "Arrow"
    }

    fn tag(&self) -> &'static str {
        "g"
    }

    fn geometry(&self, _ctx: &Context, _meta: &mut Metadata) -> Result<Attrs, LayoutError> {
        Ok(Attrs::new())
    }

    fn inner(&self, ctx: &Context, meta: &mut Metadata) -> Result<Option<String>, LayoutError> {
        let parts = self
            .parts(ctx)
            .iter()
            .map(|p| p.render_in(ctx, meta))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(parts.join("\n")))
    }
}

// ============================================================================
// Text
// ============================================================================

/// Character widths in hundredths of a nominal character, for ASCII 0x20..=0x7E
const CHAR_WIDTHS: [u8; 95] = [
    45, 55, 62, 115, 90, 132, 125, 40, //
    55, 55, 71, 115, 45, 48, 45, 50, //
    91, 91, 91, 91, 91, 91, 91, 91, //
    91, 91, 50, 50, 120, 120, 120, 78, //
    142, 102, 105, 110, 115, 105, 98, 105, //
    125, 58, 58, 107, 95, 145, 125, 115, //
    95, 115, 107, 95, 97, 118, 102, 150, //
    100, 93, 100, 58, 50, 58, 119, 72, //
    72, 86, 92, 80, 92, 85, 52, 92, //
    92, 47, 47, 88, 48, 135, 92, 86, //
    92, 92, 69, 75, 58, 92, 80, 121, //
    81, 80, 76, 91, 49, 91, 118,
];

/// Measures a single line of text
pub trait TextMetrics {
    /// Rendered width in ems (multiples of the font size)
    fn width_em(&self, text: &str) -> f64;
}

/// Per-character widths from a sans-serif table; non-ASCII counts as one full character.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalMetrics;

impl TextMetrics for ProportionalMetrics {
    fn width_em(&self, text: &str) -> f64 {
        let hundredths: u32 = text
            .chars()
            .map(|c| match c {
                ' '..='~' => CHAR_WIDTHS[c as usize - 0x20] as u32,
                _ => 100,
            })
            .sum();
        hundredths as f64 / 100.0 * defaults::CHAR_EM
    }
}

/// Every character the same width
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMetrics;

impl TextMetrics for MonospaceMetrics {
    fn width_em(&self, text: &str) -> f64 {
        text.chars().count() as f64 * defaults::MONO_EM
    }
}

/// A single line of text sized to fill its rect's height
#[derive(Debug, Clone)]
pub struct Text {
    pub spec: Spec,
    pub style: Style,
    pub text: String,
    /// Measured width over font size
    width_em: f64,
}

fn text_default_style() -> Style {
    Style::new().with_fill(defaults::TEXT_FILL).with_stroke(Color::None)
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_metrics(text, &ProportionalMetrics)
    }

    pub fn with_metrics(text: impl Into<String>, metrics: &dyn TextMetrics) -> Self {
        let text = text.into();
        Text {
            spec: Spec::default(),
            style: text_default_style(),
            width_em: metrics.width_em(&text),
            text,
        }
    }

    pub fn with_spec(mut self, spec: Spec) -> Self {
        self.spec = spec;
        self
    }

    /// Replace the style; unset fields keep the text defaults (black fill, no stroke)
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style.or(&text_default_style());
        self
    }

    pub fn width_em(&self) -> f64 {
        self.width_em
    }
}

impl Component for Text {
    spec_access!();

    fn kind(&self) -> &'static str {
        "Text"
    }

    fn tag(&self) -> &'static str {
        "text"
    }

    fn aspect(&self) -> Result<Option<f64>, LayoutError> {
        Ok(self
            .spec
            .fixed_aspect()
            .or((self.width_em > 0.0).then_some(self.width_em)))
    }

    fn geometry(&self, ctx: &Context, _meta: &mut Metadata) -> Result<Attrs, LayoutError> {
        let r = ctx.prect.upright();
        let c = r.center();
        let mut attrs = Attrs::new();
        attrs.set("x", ctx.fmt(c.x));
        attrs.set("y", ctx.fmt(c.y));
        attrs.set("font-size", ctx.fmt(r.height()));
        attrs.set("text-anchor", "middle");
        attrs.set("dominant-baseline", "central");
        Ok(attrs)
    }

    fn inner(&self, _ctx: &Context, _meta: &mut Metadata) -> Result<Option<String>, LayoutError> {
        Ok(Some(escape_xml(&self.text)))
    }
}
