//! Path data and the curve primitives built on it.
//!
//! - [`PathData`]: fluent builder for SVG path commands
//! - [`rounded_rect_path`]: rectangle with four independently-radiused corners
//! - [`cardinal_spline`]: smooth cubic curve through a point sequence
//! - [`arrow_head_points`]: arrow-head corners on the unit circle

use glam::{DVec2, dvec2};

use crate::types::{Point, Rect};

use super::svg::fmt_num;
use super::types::Corners;

/// A single SVG path command in absolute coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    Arc {
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
    Quad {
        ctrl: Point,
        to: Point,
    },
    Cubic {
        c1: Point,
        c2: Point,
        to: Point,
    },
    Close,
}

impl PathCommand {
    /// Where the pen is after this command; `None` for `Z`.
    pub fn end_point(&self) -> Option<Point> {
        match self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(*p),
            PathCommand::Arc { to, .. } | PathCommand::Quad { to, .. } | PathCommand::Cubic { to, .. } => {
                Some(*to)
            }
            PathCommand::Close => None,
        }
    }
}

/// Fluent builder for the `d` attribute of a `<path>`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn m(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    pub fn l(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn a(mut self, rx: f64, ry: f64, rotation: f64, large_arc: bool, sweep: bool, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::Arc {
            rx,
            ry,
            rotation,
            large_arc,
            sweep,
            to: Point::new(x, y),
        });
        self
    }

    pub fn q(mut self, cx: f64, cy: f64, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::Quad {
            ctrl: Point::new(cx, cy),
            to: Point::new(x, y),
        });
        self
    }

    pub fn c(mut self, c1: Point, c2: Point, to: Point) -> Self {
        self.commands.push(PathCommand::Cubic { c1, c2, to });
        self
    }

    pub fn z(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Pen position after the last drawing command
    pub fn end_point(&self) -> Option<Point> {
        self.commands.iter().rev().find_map(PathCommand::end_point)
    }

    /// Render to a `d` attribute value
    pub fn to_svg(&self, precision: usize) -> String {
        let n = |v: f64| fmt_num(v, precision);
        let pt = |p: Point| format!("{},{}", n(p.x), n(p.y));
        self.commands
            .iter()
            .map(|cmd| match *cmd {
                PathCommand::MoveTo(p) => format!("M{}", pt(p)),
                PathCommand::LineTo(p) => format!("L{}", pt(p)),
                PathCommand::Arc {
                    rx,
                    ry,
                    rotation,
                    large_arc,
                    sweep,
                    to,
                } => format!(
                    "A{},{} {} {} {} {}",
                    n(rx),
                    n(ry),
                    n(rotation),
                    large_arc as u8,
                    sweep as u8,
                    pt(to)
                ),
                PathCommand::Quad { ctrl, to } => format!("Q{} {}", pt(ctrl), pt(to)),
                PathCommand::Cubic { c1, c2, to } => format!("C{} {} {}", pt(c1), pt(c2), pt(to)),
                PathCommand::Close => "Z".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Rectangle outline with per-corner radii, traced clockwise from the top edge.
///
/// The rect is normalized upright first and each radius is clamped to half the
/// shorter side, so oversized radii degrade to a pill or a circle. Straight
/// edges are only emitted when they have positive length.
pub fn rounded_rect_path(rect: Rect, radii: Corners) -> PathData {
    let Rect { x1, y1, x2, y2 } = rect.upright();
    let limit = (x2 - x1).min(y2 - y1) / 2.0;
    let clamp = |r: f64| r.clamp(0.0, limit.max(0.0));
    let (tl, tr, br, bl) = (
        clamp(radii.top_left),
        clamp(radii.top_right),
        clamp(radii.bottom_right),
        clamp(radii.bottom_left),
    );

    let mut path = PathData::new().m(x1 + tl, y1);

    if x2 - tr > x1 + tl {
        path = path.l(x2 - tr, y1);
    }
    if tr > 0.0 {
        path = path.a(tr, tr, 0.0, false, true, x2, y1 + tr);
    }

    if y2 - br > y1 + tr {
        path = path.l(x2, y2 - br);
    }
    if br > 0.0 {
        path = path.a(br, br, 0.0, false, true, x2 - br, y2);
    }

    if x1 + bl < x2 - br {
        path = path.l(x1 + bl, y2);
    }
    if bl > 0.0 {
        path = path.a(bl, bl, 0.0, false, true, x1, y2 - bl);
    }

    if y1 + tl < y2 - bl {
        path = path.l(x1, y1 + tl);
    }
    if tl > 0.0 {
        path = path.a(tl, tl, 0.0, false, true, x1 + tl, y1);
    }

    path.z()
}

/// Options for [`cardinal_spline`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineOptions {
    /// Tangent scale: 0 gives straight segments, 1 the full neighbor difference
    pub curve: f64,
    pub closed: bool,
    /// Override the tangent direction at the first point (open curves)
    pub start_dir: Option<DVec2>,
    /// Override the tangent direction at the last point (open curves)
    pub end_dir: Option<DVec2>,
}

impl Default for SplineOptions {
    fn default() -> Self {
        SplineOptions {
            curve: super::defaults::SPLINE_CURVE,
            closed: false,
            start_dir: None,
            end_dir: None,
        }
    }
}

/// Keep `default`'s length but point it along `dir`.
fn redirect(default: DVec2, dir: DVec2) -> DVec2 {
    match dir.try_normalize() {
        Some(unit) => unit * default.length(),
        None => default,
    }
}

/// Cubic path through `points` with tangents from neighbor differences.
pub fn cardinal_spline(points: &[Point], opts: SplineOptions) -> PathData {
    let Some(first) = points.first() else {
        return PathData::new();
    };
    let path = PathData::new().m(first.x, first.y);
    let n = points.len();
    if n < 2 {
        return path;
    }

    let p: Vec<DVec2> = points.iter().map(|p| p.to_dvec2()).collect();
    let mut tangents: Vec<DVec2> = (0..n)
        .map(|i| {
            if opts.closed {
                p[(i + 1) % n] - p[(i + n - 1) % n]
            } else if i == 0 {
                p[1] - p[0]
            } else if i == n - 1 {
                p[n - 1] - p[n - 2]
            } else {
                p[i + 1] - p[i - 1]
            }
        })
        .map(|t| t * opts.curve)
        .collect();

    if !opts.closed {
        if let Some(dir) = opts.start_dir {
            tangents[0] = redirect(tangents[0], dir);
        }
        if let Some(dir) = opts.end_dir {
            tangents[n - 1] = redirect(tangents[n - 1], dir);
        }
    }

    let segments = if opts.closed { n } else { n - 1 };
    let path = (0..segments).fold(path, |path, i| {
        let j = (i + 1) % n;
        let c1 = p[i] + tangents[i] / 3.0;
        let c2 = p[j] - tangents[j] / 3.0;
        path.c(c1.into(), c2.into(), p[j].into())
    });

    if opts.closed { path.z() } else { path }
}

/// Unit vector at `degrees`, clockwise from +x in y-down space
pub fn unit_dir(degrees: f64) -> DVec2 {
    let r = degrees.to_radians();
    dvec2(r.cos(), r.sin())
}

/// Arrow-head corners `[left, tip, right]` on the unit circle.
///
/// The tip sits at `direction`; the back corners sit symmetrically behind it
/// at `direction + 180 ± 2·half_angle`, which makes the angle at the tip
/// `2·half_angle`.
pub fn arrow_head_points(direction: f64, half_angle: f64) -> [DVec2; 3] {
    let back = direction + 180.0;
    [
        unit_dir(back - 2.0 * half_angle),
        unit_dir(direction),
        unit_dir(back + 2.0 * half_angle),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn rounded_rect_closes_on_its_start() {
        let path = rounded_rect_path(Rect::UNIT, Corners::uniform(0.1));
        let cmds = path.commands();
        let PathCommand::MoveTo(start) = cmds[0] else {
            panic!("path must start with a move");
        };
        assert!(near(start, Point::new(0.1, 0.0)));
        assert_eq!(cmds.last(), Some(&PathCommand::Close));
        assert!(near(path.end_point().unwrap(), start));
        // 4 edges + 4 arcs between the move and the close
        assert_eq!(cmds.len(), 10);
    }

    #[test]
    fn oversized_radius_becomes_circle() {
        let path = rounded_rect_path(Rect::new(0.0, 0.0, 2.0, 2.0), Corners::uniform(5.0));
        let arcs = path
            .commands()
            .iter()
            .filter(|c| matches!(c, PathCommand::Arc { rx, .. } if *rx == 1.0))
            .count();
        let lines = path
            .commands()
            .iter()
            .filter(|c| matches!(c, PathCommand::LineTo(_)))
            .count();
        assert_eq!(arcs, 4);
        assert_eq!(lines, 0);
    }

    #[test]
    fn pill_keeps_long_edges() {
        let path = rounded_rect_path(Rect::new(0.0, 0.0, 4.0, 1.0), Corners::uniform(0.5));
        let lines: Vec<_> = path
            .commands()
            .iter()
            .filter_map(|c| match c {
                PathCommand::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(lines, vec![Point::new(3.5, 0.0), Point::new(0.5, 1.0)]);
    }

    #[test]
    fn flipped_rect_is_normalized() {
        let a = rounded_rect_path(Rect::new(1.0, 1.0, 0.0, 0.0), Corners::uniform(0.2));
        let b = rounded_rect_path(Rect::UNIT, Corners::uniform(0.2));
        assert_eq!(a, b);
    }

    #[test]
    fn sharp_rect_path() {
        let path = rounded_rect_path(Rect::new(0.0, 0.0, 2.0, 1.0), Corners::default());
        assert_eq!(path.to_svg(2), "M0,0 L2,0 L2,1 L0,1 L0,0 Z");
    }

    #[test]
    fn colinear_spline_stays_on_the_line() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0)];
        let path = cardinal_spline(&points, SplineOptions::default());
        for cmd in path.commands() {
            if let PathCommand::Cubic { c1, c2, to } = cmd {
                for p in [c1, c2, to] {
                    assert!((p.x - p.y).abs() < 1e-12, "{p:?} is off the line");
                }
            }
        }
    }

    #[test]
    fn zero_curve_gives_straight_controls() {
        let points = [Point::new(0.0, 0.0), Point::new(3.0, 0.0), Point::new(3.0, 3.0)];
        let path = cardinal_spline(&points, SplineOptions { curve: 0.0, ..Default::default() });
        let PathCommand::Cubic { c1, c2, to } = path.commands()[1] else {
            panic!("expected a cubic segment");
        };
        assert_eq!(c1, Point::new(0.0, 0.0));
        assert_eq!(c2, Point::new(3.0, 0.0));
        assert_eq!(to, Point::new(3.0, 0.0));
    }

    #[test]
    fn closed_spline_wraps() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.5, 1.0)];
        let path = cardinal_spline(&points, SplineOptions { closed: true, ..Default::default() });
        let cubics = path
            .commands()
            .iter()
            .filter(|c| matches!(c, PathCommand::Cubic { .. }))
            .count();
        assert_eq!(cubics, 3);
        assert_eq!(path.commands().last(), Some(&PathCommand::Close));
        assert_eq!(path.end_point(), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn spline_start_direction_override() {
        let points = [Point::new(0.0, 0.0), Point::new(2.0, 0.0)];
        let opts = SplineOptions {
            curve: 1.0,
            start_dir: Some(dvec2(0.0, 1.0)),
            ..Default::default()
        };
        let PathCommand::Cubic { c1, .. } = cardinal_spline(&points, opts).commands()[1] else {
            panic!("expected a cubic segment");
        };
        assert!(near(c1, Point::new(0.0, 2.0 / 3.0)));
    }

    #[test]
    fn single_point_spline_is_a_move() {
        let path = cardinal_spline(&[Point::new(1.0, 2.0)], SplineOptions::default());
        assert_eq!(path.commands(), &[PathCommand::MoveTo(Point::new(1.0, 2.0))]);
    }

    #[test]
    fn arrow_head_default_is_equilateral() {
        let [l, tip, r] = arrow_head_points(0.0, 30.0);
        assert!((tip - dvec2(1.0, 0.0)).length() < 1e-12);
        let side = (tip - l).length();
        assert!(((tip - r).length() - side).abs() < 1e-12);
        assert!(((l - r).length() - side).abs() < 1e-12);
    }

    #[test]
    fn arrow_head_is_symmetric_about_direction() {
        let [l, tip, r] = arrow_head_points(90.0, 20.0);
        assert!((tip - dvec2(0.0, 1.0)).length() < 1e-12);
        assert!((l.y - r.y).abs() < 1e-12);
        assert!((l.x + r.x).abs() < 1e-12);
    }
}
