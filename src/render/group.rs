//! Containers that place children by their own specs: Group and Frame

use crate::errors::LayoutError;
use crate::types::{Color, Rect};

use super::context::{Context, Metadata};
use super::defaults;
use super::shapes::{Component, Element, Rectangle, node_builders, spec_access};
use super::spec::{Aspect, Coord, Spec};
use super::svg;
use super::types::{Attrs, BorderStyle, Corners, Style};

/// Render `children` into `ctx`, one line each, with optional debug boxes
pub(crate) fn render_children(
    children: &[Element],
    ctx: &Context,
    meta: &mut Metadata,
    debug: bool,
) -> Result<String, LayoutError> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        let child_ctx = ctx.map(&child.resolved_spec()?);
        out.push(child.svg(&child_ctx, meta)?);
        if debug {
            out.push(debug_box(&child_ctx));
        }
    }
    Ok(out.join("\n"))
}

/// Dashed outline of a child's resolved pixel rect
fn debug_box(ctx: &Context) -> String {
    let r = ctx.prect.upright();
    let mut attrs = Attrs::new();
    attrs.set("x", ctx.fmt(r.x1));
    attrs.set("y", ctx.fmt(r.y1));
    attrs.set("width", ctx.fmt(r.width()));
    attrs.set("height", ctx.fmt(r.height()));
    attrs.set("stroke", defaults::DEBUG_STROKE);
    attrs.set("stroke-dasharray", defaults::DEBUG_DASH);
    attrs.set("fill", "none");
    if let Some(t) = &ctx.transform {
        attrs.set("transform", t.clone());
    }
    svg::element("rect", &attrs, None)
}

/// Bounding box of the children's unrotated rects, in the group's coordinates
pub(crate) fn children_bounds(children: &[Element]) -> Result<Option<Rect>, LayoutError> {
    Ok(spec_bounds(&upright_specs(children)?))
}

fn upright_specs(children: &[Element]) -> Result<Vec<Spec>, LayoutError> {
    children.iter().map(Element::upright_spec).collect()
}

/// Where a resolved spec lands in the coordinate space `coord`
fn placed_rect(spec: &Spec, coord: Rect) -> Rect {
    // identity mapping: pixels are coordinate units
    let ctx = Context::new(coord, coord);
    ctx.unmap_rect(ctx.map(spec).prect)
}

fn spec_bounds(specs: &[Spec]) -> Option<Rect> {
    let rects: Vec<Rect> = specs.iter().map(|s| placed_rect(s, Rect::UNIT)).collect();
    Rect::bounding(&rects)
}

/// A container whose children each place themselves via their own spec
#[derive(Debug, Clone, Default)]
pub struct Group {
    pub spec: Spec,
    pub style: Style,
    pub children: Vec<Element>,
    /// Clip children to the group's own rect
    pub clip: bool,
    /// Element drawn into a `<mask>` over the group
    pub mask: Option<Box<Element>>,
    /// Outline every child's rect
    pub debug: bool,
}

impl Group {
    pub fn new(children: impl IntoIterator<Item = impl Into<Element>>) -> Self {
        Group {
            children: children.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    pub fn with_mask(mut self, mask: impl Into<Element>) -> Self {
        self.mask = Some(Box::new(mask.into()));
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    node_builders!();

    /// Auto aspect and auto coord from a single pass over the children.
    /// The coord is only derived when `with_coord` is set or the aspect needs it.
    fn resolve_auto(&self, with_coord: bool) -> Result<(Option<f64>, Option<Rect>), LayoutError> {
        let auto_aspect = self.spec.aspect == Some(Aspect::Auto);
        let auto_coord = self.spec.coord == Some(Coord::Auto) && (with_coord || auto_aspect);
        if auto_aspect && self.children.len() != 1 {
            return Err(LayoutError::ChildCount {
                node: self.kind(),
                expected: 1,
                got: self.children.len(),
            });
        }
        if !auto_aspect && !auto_coord {
            return Ok((self.spec.fixed_aspect(), None));
        }

        let specs = upright_specs(&self.children)?;
        let bounds = if auto_coord { spec_bounds(&specs) } else { None };
        if auto_coord && bounds.is_none() {
            crate::log::warn!("auto coord on an empty group, using the unit square");
        }

        let aspect = match specs.as_slice() {
            [child] if auto_aspect => {
                let coord = match self.spec.coord {
                    Some(Coord::Rect(r)) => r,
                    _ => bounds.unwrap_or(Rect::UNIT),
                };
                placed_rect(child, coord).aspect()
            }
            _ => self.spec.fixed_aspect(),
        };
        Ok((aspect, bounds))
    }
}

impl Component for Group {
    spec_access!();

    fn kind(&self) -> &'static str {
        "Group"
    }

    fn tag(&self) -> &'static str {
        "g"
    }

    fn aspect(&self) -> Result<Option<f64>, LayoutError> {
        Ok(self.resolve_auto(false)?.0)
    }

    fn auto_coord(&self) -> Result<Option<Rect>, LayoutError> {
        children_bounds(&self.children)
    }

    fn auto_layout(&self) -> Result<(Option<f64>, Option<Rect>), LayoutError> {
        self.resolve_auto(true)
    }

    fn geometry(&self, ctx: &Context, meta: &mut Metadata) -> Result<Attrs, LayoutError> {
        let mut attrs = Attrs::new();
        if self.clip {
            let id = meta.unique_id("clip");
            let r = ctx.prect.upright();
            let mut rect = Attrs::new();
            rect.set("x", ctx.fmt(r.x1));
            rect.set("y", ctx.fmt(r.y1));
            rect.set("width", ctx.fmt(r.width()));
            rect.set("height", ctx.fmt(r.height()));
            let body = svg::element("rect", &rect, None);
            let mut clip = Attrs::new();
            clip.set("id", id.clone());
            meta.define(svg::element("clipPath", &clip, Some(&body)));
            crate::log::debug!(%id, "registered clip path");
            attrs.set("clip-path", format!("url(#{})", id));
        }
        if let Some(mask) = &self.mask {
            let id = meta.unique_id("mask");
            let body = mask.render_in(ctx, meta)?;
            let mut def = Attrs::new();
            def.set("id", id.clone());
            meta.define(svg::element("mask", &def, Some(&body)));
            attrs.set("mask", format!("url(#{})", id));
        }
        Ok(attrs)
    }

    fn inner(&self, ctx: &Context, meta: &mut Metadata) -> Result<Option<String>, LayoutError> {
        render_children(&self.children, ctx, meta, self.debug).map(Some)
    }
}

/// A single child surrounded by padding, an optional border and background, and a margin.
///
/// Padding and margin are in units of the child's width; the vertical amount
/// is scaled by the child's aspect so the gap looks the same on every side.
#[derive(Debug, Clone)]
pub struct Frame {
    pub spec: Spec,
    pub style: Style,
    pub child: Box<Element>,
    pub padding: f64,
    pub margin: f64,
    pub border: Option<BorderStyle>,
    pub fill: Option<Color>,
}

impl Frame {
    pub fn new(child: impl Into<Element>) -> Self {
        Frame {
            spec: Spec::new().with_auto_coord(),
            style: Style::default(),
            child: Box::new(child.into()),
            padding: defaults::FRAME_PADDING,
            margin: defaults::FRAME_MARGIN,
            border: None,
            fill: None,
        }
    }

    /// Build from a child list, which must hold exactly one element
    pub fn from_children(children: Vec<Element>) -> Result<Self, LayoutError> {
        let got = children.len();
        match <[Element; 1]>::try_from(children) {
            Ok([child]) => Ok(Frame::new(child)),
            Err(_) => Err(LayoutError::ChildCount {
                node: "Frame",
                expected: 1,
                got,
            }),
        }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_border(mut self, border: BorderStyle) -> Self {
        self.border = Some(border);
        self
    }

    pub fn with_fill(mut self, fill: impl Into<Color>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Keeps the frame's own coordinate space, which is always derived
    pub fn with_spec(mut self, spec: Spec) -> Self {
        self.spec = spec.with_auto_coord();
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// The border box, with the child occupying the unit square
    fn border_rect(&self, child_aspect: Option<f64>) -> Rect {
        let (px, py) = insets(self.padding, child_aspect);
        Rect::new(-px, -py, 1.0 + px, 1.0 + py)
    }

    /// The margin box, which is the frame's coordinate space
    fn outer_rect(&self, child_aspect: Option<f64>) -> Rect {
        let (x, y) = insets(self.padding + self.margin, child_aspect);
        Rect::new(-x, -y, 1.0 + x, 1.0 + y)
    }

    fn outer_aspect(&self, child_aspect: Option<f64>) -> Option<f64> {
        if let Some(a) = self.spec.fixed_aspect() {
            return Some(a);
        }
        let a = child_aspect?;
        let (x, y) = insets(self.padding + self.margin, child_aspect);
        Some(a * (1.0 + 2.0 * x) / (1.0 + 2.0 * y))
    }
}

/// `(horizontal, vertical)` extents of `amount` in child-box units
fn insets(amount: f64, child_aspect: Option<f64>) -> (f64, f64) {
    (amount, amount * child_aspect.unwrap_or(1.0))
}

impl Component for Frame {
    spec_access!();

    fn kind(&self) -> &'static str {
        "Frame"
    }

    fn tag(&self) -> &'static str {
        "g"
    }

    fn aspect(&self) -> Result<Option<f64>, LayoutError> {
        if let Some(a) = self.spec.fixed_aspect() {
            return Ok(Some(a));
        }
        Ok(self.outer_aspect(self.child.layout_aspect()?))
    }

    fn auto_coord(&self) -> Result<Option<Rect>, LayoutError> {
        Ok(Some(self.outer_rect(self.child.layout_aspect()?)))
    }

    fn auto_layout(&self) -> Result<(Option<f64>, Option<Rect>), LayoutError> {
        let child_aspect = self.child.layout_aspect()?;
        Ok((self.outer_aspect(child_aspect), Some(self.outer_rect(child_aspect))))
    }

    fn geometry(&self, _ctx: &Context, _meta: &mut Metadata) -> Result<Attrs, LayoutError> {
        Ok(Attrs::new())
    }

    fn inner(&self, ctx: &Context, meta: &mut Metadata) -> Result<Option<String>, LayoutError> {
        let mut parts = Vec::new();
        if self.border.is_some() || self.fill.is_some() {
            let border = self.border.clone();
            let mut style = border.as_ref().map(BorderStyle::to_style).unwrap_or_else(|| {
                // background only
                Style::new().with_stroke(Color::None)
            });
            style.fill = self.fill.clone();
            let rounded = border.map_or(0.0, |b| b.rounded);
            let mut rect = Rectangle::new()
                .with_spec(Spec::new().with_rect(self.border_rect(self.child.layout_aspect()?)))
                .with_style(style);
            if rounded > 0.0 {
                rect = rect.with_rounded(Corners::uniform(rounded));
            }
            parts.push(Element::from(rect));
        }
        parts.push(self.child.with_rect(Rect::UNIT));
        render_children(&parts, ctx, meta, false).map(Some)
    }
}
