//! Rendering context - maps a node's coordinate space onto pixels

use crate::types::{MetaNumber, MetaPoint, Point, Rect, Size};

use super::defaults;
use super::geometry::{CenterBox, cbox_rect, rotate_fit};
use super::spec::Spec;
use super::svg::fmt_num;

/// Affine map from one coordinate axis onto one pixel axis
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rescale {
    c0: f64,
    p0: f64,
    scale: f64,
}

impl Rescale {
    fn new(coord: (f64, f64), pixel: (f64, f64)) -> Self {
        let span = coord.1 - coord.0;
        if span == 0.0 {
            crate::log::warn!(c = coord.0, "zero-extent coordinate axis, collapsing to midpoint");
            Rescale {
                c0: coord.0,
                p0: (pixel.0 + pixel.1) / 2.0,
                scale: 0.0,
            }
        } else {
            Rescale {
                c0: coord.0,
                p0: pixel.0,
                scale: (pixel.1 - pixel.0) / span,
            }
        }
    }

    fn apply(&self, c: f64) -> f64 {
        self.p0 + (c - self.c0) * self.scale
    }

    fn invert(&self, p: f64) -> f64 {
        if self.scale == 0.0 {
            self.c0
        } else {
            self.c0 + (p - self.p0) / self.scale
        }
    }
}

/// The pixel region a node draws into and the coordinate space laid over it.
///
/// Contexts are immutable; [`Context::map`] derives a child context from a
/// [`Spec`] without touching the parent. Shared mutable state lives in
/// [`Metadata`] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    /// Pixel rect, possibly flipped
    pub prect: Rect,
    /// Logical coordinate rect mapped onto `prect`
    pub coord: Rect,
    /// Pending `rotate(...)` transform for the node drawn in this context
    pub transform: Option<String>,
    /// Decimal places in emitted numbers
    pub precision: usize,
    pub tolerance: f64,
    xs: Rescale,
    ys: Rescale,
}

impl Context {
    pub fn new(prect: Rect, coord: Rect) -> Self {
        Context {
            prect,
            coord,
            transform: None,
            precision: defaults::PRECISION,
            tolerance: defaults::TOLERANCE,
            xs: Rescale::new((coord.x1, coord.x2), (prect.x1, prect.x2)),
            ys: Rescale::new((coord.y1, coord.y2), (prect.y1, prect.y2)),
        }
    }

    /// Root context: a `size` canvas with the unit square laid over it
    pub fn root(size: Size) -> Self {
        Context::new(Rect::new(0.0, 0.0, size.w, size.h), Rect::UNIT)
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Derive the context of a child laid out by `spec`.
    pub fn map(&self, spec: &Spec) -> Context {
        let slot = self.map_rect(spec.rect.unwrap_or(self.coord));
        let fitted = rotate_fit(
            slot.size(),
            spec.rotate,
            spec.fixed_aspect(),
            spec.expand,
            spec.invar,
            self.tolerance,
        );

        // align in upright pixel space, then rebuild with the signed size so
        // a flipped slot yields a flipped child
        let upright = slot.upright();
        let (fw, fh) = (fitted.w.abs(), fitted.h.abs());
        let left = upright.x1 + spec.align.x * (upright.width() - fw);
        let top = upright.y1 + spec.align.y * (upright.height() - fh);
        let center = Point::new(left + fw / 2.0, top + fh / 2.0);
        let prect = cbox_rect(CenterBox { center, size: fitted });

        let transform = (spec.rotate != 0.0).then(|| {
            format!(
                "rotate({} {} {})",
                self.fmt(spec.rotate),
                self.fmt(center.x),
                self.fmt(center.y)
            )
        });

        let coord = spec.coord_rect().unwrap_or(Rect::UNIT);
        crate::log::trace!(?slot, ?prect, ?coord, "mapped child context");

        Context {
            transform,
            ..Context::new(prect, coord)
                .with_precision(self.precision)
                .with_tolerance(self.tolerance)
        }
    }

    /// Logical point to pixels; offsets are added after scaling.
    pub fn map_point(&self, p: MetaPoint) -> Point {
        Point::new(self.map_x(p.x), self.map_y(p.y))
    }

    pub fn map_x(&self, x: MetaNumber) -> f64 {
        self.xs.apply(x.value) + x.offset
    }

    pub fn map_y(&self, y: MetaNumber) -> f64 {
        self.ys.apply(y.value) + y.offset
    }

    /// Logical rect to pixels, keeping orientation
    pub fn map_rect(&self, r: Rect) -> Rect {
        Rect::new(
            self.xs.apply(r.x1),
            self.ys.apply(r.y1),
            self.xs.apply(r.x2),
            self.ys.apply(r.y2),
        )
    }

    /// Logical extent to signed pixel extent
    pub fn map_size(&self, s: Size) -> Size {
        Size::new(s.w * self.xs.scale, s.h * self.ys.scale)
    }

    pub fn unmap_point(&self, p: Point) -> Point {
        Point::new(self.xs.invert(p.x), self.ys.invert(p.y))
    }

    /// Pixel rect back to logical coordinates
    pub fn unmap_rect(&self, r: Rect) -> Rect {
        Rect::from_points(self.unmap_point(r.p1()), self.unmap_point(r.p2()))
    }

    /// Format a number at this context's precision
    pub fn fmt(&self, v: f64) -> String {
        fmt_num(v, self.precision)
    }
}

/// Document-wide state shared across a single render pass
#[derive(Debug, Default)]
pub struct Metadata {
    next_id: usize,
    defs: Vec<String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a document-unique id such as `clip-0`.
    pub fn unique_id(&mut self, prefix: &str) -> String {
        let id = format!("{}-{}", prefix, self.next_id);
        self.next_id += 1;
        id
    }

    /// Register markup for the document's `<defs>` block.
    pub fn define(&mut self, markup: String) {
        self.defs.push(markup);
    }

    pub fn defs(&self) -> &[String] {
        &self.defs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::spec::Align;

    fn close(a: Rect, b: Rect) -> bool {
        [a.x1 - b.x1, a.y1 - b.y1, a.x2 - b.x2, a.y2 - b.y2]
            .iter()
            .all(|d| d.abs() < 1e-9)
    }

    fn root() -> Context {
        Context::root(Size::new(200.0, 100.0))
    }

    #[test]
    fn default_spec_fills_parent() {
        let ctx = root();
        let child = ctx.map(&Spec::new());
        assert_eq!(child.prect, ctx.prect);
        assert_eq!(child.coord, Rect::UNIT);
        assert_eq!(child.transform, None);
    }

    #[test]
    fn rect_maps_through_coord() {
        let ctx = root();
        let child = ctx.map(&Spec::new().with_rect(Rect::new(0.25, 0.5, 0.75, 1.0)));
        assert!(close(child.prect, Rect::new(50.0, 50.0, 150.0, 100.0)));
    }

    #[test]
    fn aspect_centers_in_slot() {
        let ctx = root();
        let child = ctx.map(&Spec::new().with_aspect(1.0));
        assert!(close(child.prect, Rect::new(50.0, 0.0, 150.0, 100.0)));
    }

    #[test]
    fn aspect_honors_alignment() {
        let ctx = root();
        let left = ctx.map(&Spec::new().with_aspect(1.0).with_align(Align::new(0.0, 0.5)));
        assert!(close(left.prect, Rect::new(0.0, 0.0, 100.0, 100.0)));
        let right = ctx.map(&Spec::new().with_aspect(1.0).with_align(Align::new(1.0, 0.5)));
        assert!(close(right.prect, Rect::new(100.0, 0.0, 200.0, 100.0)));
    }

    #[test]
    fn flipped_coord_flips_child() {
        let ctx = Context::new(Rect::new(0.0, 0.0, 100.0, 100.0), Rect::new(0.0, 1.0, 1.0, 0.0));
        let child = ctx.map(&Spec::new().with_rect(Rect::new(0.0, 0.0, 0.5, 0.5)));
        assert!(child.prect.is_flipped_y());
        assert!(close(child.prect.upright(), Rect::new(0.0, 50.0, 50.0, 100.0)));
    }

    #[test]
    fn flipped_slot_keeps_flip_after_aspect_fit() {
        let ctx = Context::new(Rect::new(0.0, 100.0, 200.0, 0.0), Rect::UNIT);
        let child = ctx.map(&Spec::new().with_aspect(1.0));
        assert!(child.prect.is_flipped_y());
        assert!(close(child.prect.upright(), Rect::new(50.0, 0.0, 150.0, 100.0)));
    }

    #[test]
    fn rotation_sets_transform_about_center() {
        let ctx = Context::root(Size::new(100.0, 100.0));
        let child = ctx.map(&Spec::new().with_rotate(90.0));
        assert_eq!(child.transform.as_deref(), Some("rotate(90 50 50)"));
    }

    #[test]
    fn mapping_composes() {
        let ctx = root();
        let outer = Spec::new().with_rect(Rect::new(0.1, 0.2, 0.9, 0.6));
        let inner = Spec::new().with_rect(Rect::new(0.5, 0.0, 1.0, 0.5));

        let nested = ctx.map(&outer).map(&inner);

        // the same region expressed directly in the root's coordinates
        let direct_rect = ctx.unmap_rect(ctx.map(&outer).map_rect(Rect::new(0.5, 0.0, 1.0, 0.5)));
        let direct = ctx.map(&Spec::new().with_rect(direct_rect));

        assert!(close(nested.prect, direct.prect));
        assert!(close(direct_rect, Rect::new(0.5, 0.2, 0.9, 0.4)));
    }

    #[test]
    fn mapping_is_deterministic() {
        let ctx = root();
        let spec = Spec::new().with_aspect(2.5).with_rotate(30.0);
        assert_eq!(ctx.map(&spec), ctx.map(&spec));
    }

    #[test]
    fn meta_point_offsets_are_pixels() {
        let ctx = root();
        let p = ctx.map_point(MetaPoint::offset(Point::new(0.5, 0.5), 3.0, -2.0));
        assert_eq!(p, Point::new(103.0, 48.0));
    }

    #[test]
    fn zero_extent_coord_collapses_to_midpoint() {
        let ctx = Context::new(Rect::new(0.0, 0.0, 100.0, 100.0), Rect::new(1.0, 0.0, 1.0, 1.0));
        assert_eq!(ctx.map_point(MetaPoint::new(7.0, 0.5)), Point::new(50.0, 50.0));
    }

    #[test]
    fn unmap_inverts_map() {
        let ctx = Context::new(Rect::new(10.0, 20.0, 110.0, 70.0), Rect::new(-1.0, 1.0, 1.0, -1.0));
        let r = Rect::new(-0.5, 0.25, 0.75, -0.5);
        assert!(close(ctx.unmap_rect(ctx.map_rect(r)), r));
    }

    #[test]
    fn unique_ids_increase() {
        let mut meta = Metadata::new();
        assert_eq!(meta.unique_id("clip"), "clip-0");
        assert_eq!(meta.unique_id("mask"), "mask-1");
        meta.define("<clipPath id=\"clip-0\"/>".to_string());
        assert_eq!(meta.defs().len(), 1);
    }
}
