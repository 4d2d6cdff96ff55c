//! Strongly-typed numeric primitives for vecta.
//!
//! Rects are stored as corner pairs and are *not* required to be upright:
//! `x1 > x2` encodes a horizontally flipped axis, which is how inverted plot
//! axes travel through the layout engine. Sizes are signed for the same reason.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use glam::{DVec2, dvec2};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum NumericError {
    /// Value is NaN
    #[error("value is NaN")]
    NaN,
    /// Value is infinite
    #[error("value is infinite")]
    Infinite,
    /// Value is zero when non-zero required
    #[error("value is zero")]
    Zero,
    /// Value is negative when positive required
    #[error("value is negative")]
    Negative,
    /// Value lies outside `0..=1` when a fraction is required
    #[error("value {0} is outside 0..=1")]
    NotFraction(f64),
}

/// Reject NaN and infinities.
#[inline]
pub fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// Reject anything that is not a finite number in `0..=1`.
#[inline]
pub fn check_fraction(val: f64) -> Result<f64, NumericError> {
    let val = check_finite(val)?;
    if (0.0..=1.0).contains(&val) {
        Ok(val)
    } else {
        Err(NumericError::NotFraction(val))
    }
}

/// Reject anything that is not a finite, strictly positive number.
#[inline]
pub fn check_positive(val: f64) -> Result<f64, NumericError> {
    let val = check_finite(val)?;
    if val == 0.0 {
        Err(NumericError::Zero)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// A point in either logical or pixel space
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Calculate the midpoint between two points
    pub fn midpoint(self, other: Self) -> Self {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn to_dvec2(self) -> DVec2 {
        dvec2(self.x, self.y)
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Point::new(v.x, v.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// A signed 2D size. Negative components mean the axis is flipped.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub const fn new(w: f64, h: f64) -> Self {
        Size { w, h }
    }

    /// Create a canvas size, rejecting anything that is not strictly positive.
    pub fn try_new(w: f64, h: f64) -> Result<Size, NumericError> {
        Ok(Size {
            w: check_positive(w)?,
            h: check_positive(h)?,
        })
    }

    /// Unsigned width/height ratio, `None` for a zero-height size.
    pub fn aspect(self) -> Option<f64> {
        if self.h == 0.0 {
            None
        } else {
            Some((self.w / self.h).abs())
        }
    }

    pub fn abs(self) -> Size {
        Size::new(self.w.abs(), self.h.abs())
    }

    pub fn is_finite(self) -> bool {
        self.w.is_finite() && self.h.is_finite()
    }
}

/// A corner-pair rectangle `(x1, y1, x2, y2)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Default for Rect {
    fn default() -> Self {
        Rect::UNIT
    }
}

impl Rect {
    /// The unit square, default rect and default coordinate space
    pub const UNIT: Rect = Rect { x1: 0.0, y1: 0.0, x2: 1.0, y2: 1.0 };

    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Rect { x1, y1, x2, y2 }
    }

    /// Build from a slice of exactly four numbers.
    pub fn from_slice(vals: &[f64]) -> Option<Rect> {
        match vals {
            [x1, y1, x2, y2] => Some(Rect::new(*x1, *y1, *x2, *y2)),
            _ => None,
        }
    }

    pub fn from_points(p1: Point, p2: Point) -> Self {
        Rect::new(p1.x, p1.y, p2.x, p2.y)
    }

    /// Signed width (`x2 - x1`)
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Signed height (`y2 - y1`)
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn p1(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn p2(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// `|x2-x1| / |y2-y1|`, or `None` when the rect has no height.
    pub fn aspect(&self) -> Option<f64> {
        self.size().aspect()
    }

    /// The same region with `x1 <= x2` and `y1 <= y2`.
    pub fn upright(&self) -> Rect {
        Rect::new(
            self.x1.min(self.x2),
            self.y1.min(self.y2),
            self.x1.max(self.x2),
            self.y1.max(self.y2),
        )
    }

    pub fn is_flipped_x(&self) -> bool {
        self.x1 > self.x2
    }

    pub fn is_flipped_y(&self) -> bool {
        self.y1 > self.y2
    }

    pub fn x_limit(&self) -> Limit {
        Limit::new(self.x1, self.x2)
    }

    pub fn y_limit(&self) -> Limit {
        Limit::new(self.y1, self.y2)
    }

    pub fn from_limits(x: Limit, y: Limit) -> Self {
        Rect::new(x.lo, y.lo, x.hi, y.hi)
    }

    /// Smallest upright rect containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let a = self.upright();
        let b = other.upright();
        Rect::new(a.x1.min(b.x1), a.y1.min(b.y1), a.x2.max(b.x2), a.y2.max(b.y2))
    }

    /// Bounding box of a set of rects, `None` if empty.
    pub fn bounding<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
        rects
            .into_iter()
            .fold(None, |acc: Option<Rect>, r| match acc {
                None => Some(r.upright()),
                Some(b) => Some(b.union(r)),
            })
    }

    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }
}

/// A `(lo, hi)` interval along one axis
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Limit {
    pub lo: f64,
    pub hi: f64,
}

impl Limit {
    pub const UNIT: Limit = Limit { lo: 0.0, hi: 1.0 };

    pub const fn new(lo: f64, hi: f64) -> Self {
        Limit { lo, hi }
    }

    pub fn from_slice(vals: &[f64]) -> Option<Limit> {
        match vals {
            [lo, hi] => Some(Limit::new(*lo, *hi)),
            _ => None,
        }
    }

    /// Signed length (`hi - lo`)
    pub fn len(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn is_empty(&self) -> bool {
        self.hi == self.lo
    }
}

/// A coordinate expressed as a logical value plus an absolute pixel nudge.
///
/// The value goes through the coordinate mapping; the offset is added
/// afterwards, so it stays a fixed number of pixels at any scale.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MetaNumber {
    pub value: f64,
    pub offset: f64,
}

impl MetaNumber {
    pub const fn new(value: f64, offset: f64) -> Self {
        MetaNumber { value, offset }
    }

    /// A plain number, if there is no pixel offset.
    pub fn as_number(&self) -> Option<f64> {
        if self.offset == 0.0 { Some(self.value) } else { None }
    }
}

impl From<f64> for MetaNumber {
    fn from(value: f64) -> Self {
        MetaNumber { value, offset: 0.0 }
    }
}

impl Add for MetaNumber {
    type Output = MetaNumber;
    fn add(self, rhs: MetaNumber) -> MetaNumber {
        MetaNumber::new(self.value + rhs.value, self.offset + rhs.offset)
    }
}

impl Add<f64> for MetaNumber {
    type Output = MetaNumber;
    fn add(self, rhs: f64) -> MetaNumber {
        MetaNumber::new(self.value + rhs, self.offset)
    }
}

impl Sub for MetaNumber {
    type Output = MetaNumber;
    fn sub(self, rhs: MetaNumber) -> MetaNumber {
        MetaNumber::new(self.value - rhs.value, self.offset - rhs.offset)
    }
}

impl Neg for MetaNumber {
    type Output = MetaNumber;
    fn neg(self) -> MetaNumber {
        MetaNumber::new(-self.value, -self.offset)
    }
}

impl Mul<f64> for MetaNumber {
    type Output = MetaNumber;
    fn mul(self, rhs: f64) -> MetaNumber {
        MetaNumber::new(self.value * rhs, self.offset * rhs)
    }
}

/// A pair of [`MetaNumber`]s
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MetaPoint {
    pub x: MetaNumber,
    pub y: MetaNumber,
}

impl MetaPoint {
    pub fn new(x: impl Into<MetaNumber>, y: impl Into<MetaNumber>) -> Self {
        MetaPoint { x: x.into(), y: y.into() }
    }

    /// A logical point nudged by a fixed pixel offset.
    pub fn offset(p: Point, dx: f64, dy: f64) -> Self {
        MetaPoint {
            x: MetaNumber::new(p.x, dx),
            y: MetaNumber::new(p.y, dy),
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        Some(Point::new(self.x.as_number()?, self.y.as_number()?))
    }
}

impl From<Point> for MetaPoint {
    fn from(p: Point) -> Self {
        MetaPoint::new(p.x, p.y)
    }
}

impl From<(f64, f64)> for MetaPoint {
    fn from((x, y): (f64, f64)) -> Self {
        MetaPoint::new(x, y)
    }
}

impl Add for MetaPoint {
    type Output = MetaPoint;
    fn add(self, rhs: MetaPoint) -> MetaPoint {
        MetaPoint { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

/// Simple color model; named and raw colors pass through verbatim.
#[derive(Clone, Debug, PartialEq)]
pub enum Color {
    None,
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f64),
    Raw(String),
}

impl Color {
    pub fn named(name: impl Into<String>) -> Self {
        Color::Named(name.into())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::None => write!(f, "none"),
            Color::Named(s) | Color::Raw(s) => write!(f, "{}", s),
            Color::Rgb(r, g, b) => write!(f, "rgb({},{},{})", r, g, b),
            Color::Rgba(r, g, b, a) => write!(f, "rgba({},{},{},{})", r, g, b, a),
        }
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case("none") {
            Color::None
        } else {
            Color::Named(s.to_string())
        }
    }
}
