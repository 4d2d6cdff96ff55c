//! Layout specifications attached to every node
//!
//! A [`Spec`] is the contract between a node and its parent: which
//! sub-rectangle of the parent's coordinate space it occupies, what aspect it
//! wants inside that rectangle, how it is aligned and rotated, and which
//! coordinate space its own children use.
//!
//! [`SpecArgs`] is the loosely-typed form an evaluator hands over. It is
//! validated once, in [`Spec::from_args`], so malformed values are rejected at
//! construction rather than surfacing as odd geometry later.

use crate::errors::SpecError;
use crate::types::{Limit, Point, Rect, check_finite, check_fraction, check_positive};

use super::geometry::radial_rect;

/// Requested aspect ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aspect {
    Fixed(f64),
    /// Derive from the node's single child
    Auto,
}

/// Coordinate space for a node's children
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coord {
    Rect(Rect),
    /// Bounding box of the children's own rects
    Auto,
}

/// Fractional anchors used to place an aspect-fitted box inside its slot.
/// `(0, 0)` is top-left, `(1, 1)` bottom-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Align {
    pub x: f64,
    pub y: f64,
}

impl Default for Align {
    fn default() -> Self {
        Align::CENTER
    }
}

impl Align {
    pub const CENTER: Align = Align { x: 0.5, y: 0.5 };

    pub const fn new(x: f64, y: f64) -> Self {
        Align { x, y }
    }
}

/// One alignment token as an evaluator supplies it
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorArg {
    Num(f64),
    Name(String),
}

impl From<f64> for AnchorArg {
    fn from(v: f64) -> Self {
        AnchorArg::Num(v)
    }
}

impl From<&str> for AnchorArg {
    fn from(s: &str) -> Self {
        AnchorArg::Name(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Which axes a single token pins down
#[derive(Debug, Clone, Copy, PartialEq)]
enum Anchor {
    X(f64),
    Y(f64),
    Both(f64),
}

fn parse_anchor(node: &'static str, arg: &AnchorArg) -> Result<Anchor, SpecError> {
    match arg {
        AnchorArg::Num(v) => check_fraction(*v)
            .map(Anchor::Both)
            .map_err(|source| SpecError::InvalidNumber { node, field: "align", source }),
        AnchorArg::Name(name) => match name.as_str() {
            "left" => Ok(Anchor::X(0.0)),
            "right" => Ok(Anchor::X(1.0)),
            "top" => Ok(Anchor::Y(0.0)),
            "bottom" => Ok(Anchor::Y(1.0)),
            "center" | "middle" => Ok(Anchor::Both(0.5)),
            _ => Err(SpecError::UnknownAnchor { node, token: name.clone() }),
        },
    }
}

fn anchor_on(node: &'static str, arg: &AnchorArg, axis: Axis) -> Result<f64, SpecError> {
    match (parse_anchor(node, arg)?, axis) {
        (Anchor::Both(v), _) | (Anchor::X(v), Axis::X) | (Anchor::Y(v), Axis::Y) => Ok(v),
        _ => match arg {
            AnchorArg::Name(name) => Err(SpecError::UnknownAnchor { node, token: name.clone() }),
            AnchorArg::Num(_) => unreachable!("numeric anchors apply to both axes"),
        },
    }
}

impl Align {
    /// Parse one or two anchors. A single named anchor only moves its own
    /// axis (`"left"` keeps vertical centering); a pair is `(x, y)`.
    pub fn parse(node: &'static str, args: &[AnchorArg]) -> Result<Align, SpecError> {
        match args {
            [one] => Ok(match parse_anchor(node, one)? {
                Anchor::X(x) => Align::new(x, 0.5),
                Anchor::Y(y) => Align::new(0.5, y),
                Anchor::Both(v) => Align::new(v, v),
            }),
            [x, y] => Ok(Align::new(anchor_on(node, x, Axis::X)?, anchor_on(node, y, Axis::Y)?)),
            _ => Err(SpecError::InvalidAlign { node, len: args.len() }),
        }
    }
}

/// The layout contract attached to every node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spec {
    /// Target rect in the parent's coordinate space (default: all of it)
    pub rect: Option<Rect>,
    /// Coordinate space for this node's children (default: unit square)
    pub coord: Option<Coord>,
    pub aspect: Option<Aspect>,
    /// Let aspect fitting overflow the slot instead of shrinking into it
    pub expand: bool,
    pub align: Align,
    /// Degrees, clockwise in pixel space
    pub rotate: f64,
    /// Rotate content in place without refitting the reserved box
    pub invar: bool,
}

impl Spec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Radial shorthand: a rect centered on `pos` with half-extents `rx, ry`.
    pub fn with_pos_rad(mut self, pos: Point, rx: f64, ry: f64) -> Self {
        self.rect = Some(radial_rect(pos, rx, ry));
        self
    }

    pub fn with_coord(mut self, coord: Rect) -> Self {
        self.coord = Some(Coord::Rect(coord));
        self
    }

    pub fn with_auto_coord(mut self) -> Self {
        self.coord = Some(Coord::Auto);
        self
    }

    pub fn with_aspect(mut self, aspect: f64) -> Self {
        self.aspect = Some(Aspect::Fixed(aspect));
        self
    }

    pub fn with_auto_aspect(mut self) -> Self {
        self.aspect = Some(Aspect::Auto);
        self
    }

    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_rotate(mut self, degrees: f64) -> Self {
        self.rotate = degrees;
        self
    }

    pub fn with_invar(mut self, invar: bool) -> Self {
        self.invar = invar;
        self
    }

    /// The aspect if it is a concrete number
    pub fn fixed_aspect(&self) -> Option<f64> {
        match self.aspect {
            Some(Aspect::Fixed(a)) => Some(a),
            _ => None,
        }
    }

    /// The coordinate rect if it is concrete
    pub fn coord_rect(&self) -> Option<Rect> {
        match self.coord {
            Some(Coord::Rect(r)) => Some(r),
            _ => None,
        }
    }

    pub fn is_rotated(&self) -> bool {
        self.rotate != 0.0 && !self.invar
    }

    /// Validate evaluator-supplied arguments into a spec.
    pub fn from_args(node: &'static str, args: SpecArgs) -> Result<Spec, SpecError> {
        let mut spec = Spec::new();

        if let Some(rect) = &args.rect {
            if args.pos.is_some() {
                return Err(SpecError::ConflictingKeys { node, first: "rect", second: "pos" });
            }
            if args.rad.is_some() {
                return Err(SpecError::ConflictingKeys { node, first: "rect", second: "rad" });
            }
            spec.rect = Some(rect_arg(node, "rect", rect)?);
        } else if args.pos.is_some() || args.rad.is_some() {
            let pos = match &args.pos {
                Some(p) => point_arg(node, "pos", p)?,
                None => Point::new(0.5, 0.5),
            };
            let (rx, ry) = match args.rad.as_deref() {
                None => (0.5, 0.5),
                Some([r]) => (finite(node, "rad", *r)?, finite(node, "rad", *r)?),
                Some([rx, ry]) => (finite(node, "rad", *rx)?, finite(node, "rad", *ry)?),
                Some(other) => {
                    return Err(SpecError::InvalidPoint { node, field: "rad", len: other.len() });
                }
            };
            spec.rect = Some(radial_rect(pos, rx, ry));
        }

        match (&args.coord, &args.xlim, &args.ylim) {
            (Some(_), Some(_), _) => {
                return Err(SpecError::ConflictingKeys { node, first: "coord", second: "xlim" });
            }
            (Some(_), _, Some(_)) => {
                return Err(SpecError::ConflictingKeys { node, first: "coord", second: "ylim" });
            }
            (Some(CoordArg::Auto), _, _) => spec.coord = Some(Coord::Auto),
            (Some(CoordArg::Rect(r)), _, _) => spec.coord = Some(Coord::Rect(rect_arg(node, "coord", r)?)),
            (None, None, None) => {}
            (None, xlim, ylim) => {
                let x = match xlim {
                    Some(v) => limit_arg(node, "xlim", v)?,
                    None => Limit::UNIT,
                };
                // larger y values draw higher up
                let y = match ylim {
                    Some(v) => {
                        let l = limit_arg(node, "ylim", v)?;
                        Limit::new(l.hi, l.lo)
                    }
                    None => Limit::UNIT,
                };
                spec.coord = Some(Coord::Rect(Rect::from_limits(x, y)));
            }
        }

        spec.aspect = match args.aspect {
            None => None,
            Some(AspectArg::Auto) => Some(Aspect::Auto),
            Some(AspectArg::Num(a)) => Some(Aspect::Fixed(
                check_positive(a).map_err(|source| SpecError::InvalidNumber { node, field: "aspect", source })?,
            )),
        };

        if let Some(align) = &args.align {
            spec.align = Align::parse(node, align)?;
        }
        if let Some(rotate) = args.rotate {
            spec.rotate = finite(node, "rotate", rotate)?;
        }
        spec.expand = args.expand.unwrap_or(false);
        spec.invar = args.invar.unwrap_or(false);

        Ok(spec)
    }
}

/// `coord` as an evaluator supplies it
#[derive(Debug, Clone, PartialEq)]
pub enum CoordArg {
    Rect(Vec<f64>),
    Auto,
}

/// `aspect` as an evaluator supplies it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AspectArg {
    Num(f64),
    Auto,
}

/// Loosely-typed layout arguments, as produced by the markup evaluator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecArgs {
    pub rect: Option<Vec<f64>>,
    pub pos: Option<Vec<f64>>,
    pub rad: Option<Vec<f64>>,
    pub coord: Option<CoordArg>,
    pub xlim: Option<Vec<f64>>,
    pub ylim: Option<Vec<f64>>,
    pub aspect: Option<AspectArg>,
    pub expand: Option<bool>,
    pub align: Option<Vec<AnchorArg>>,
    pub rotate: Option<f64>,
    pub invar: Option<bool>,
}

fn finite(node: &'static str, field: &'static str, v: f64) -> Result<f64, SpecError> {
    check_finite(v).map_err(|source| SpecError::InvalidNumber { node, field, source })
}

fn all_finite(node: &'static str, field: &'static str, vals: &[f64]) -> Result<(), SpecError> {
    vals.iter().try_for_each(|v| finite(node, field, *v).map(|_| ()))
}

fn rect_arg(node: &'static str, field: &'static str, vals: &[f64]) -> Result<Rect, SpecError> {
    all_finite(node, field, vals)?;
    Rect::from_slice(vals).ok_or(SpecError::InvalidRect { node, field, len: vals.len() })
}

fn point_arg(node: &'static str, field: &'static str, vals: &[f64]) -> Result<Point, SpecError> {
    all_finite(node, field, vals)?;
    match vals {
        [x, y] => Ok(Point::new(*x, *y)),
        _ => Err(SpecError::InvalidPoint { node, field, len: vals.len() }),
    }
}

fn limit_arg(node: &'static str, field: &'static str, vals: &[f64]) -> Result<Limit, SpecError> {
    all_finite(node, field, vals)?;
    Limit::from_slice(vals).ok_or(SpecError::InvalidLimit { node, field, len: vals.len() })
}
