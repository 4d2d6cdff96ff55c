//! Geometry algebra: rect encodings, aspect embedding and rotation-aware fitting
//!
//! Everything here is a pure function of its arguments. Sizes are signed so
//! that flipped coordinate systems stay flipped through every conversion.

use crate::types::{Point, Rect, Size};

/// Min corner plus signed size (`[x, y, w, h]`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Center plus signed size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterBox {
    pub center: Point,
    pub size: Size,
}

/// Center plus signed half-extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radial {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
}

pub fn rect_box(r: Rect) -> MinBox {
    MinBox {
        x: r.x1,
        y: r.y1,
        w: r.width(),
        h: r.height(),
    }
}

pub fn box_rect(b: MinBox) -> Rect {
    Rect::new(b.x, b.y, b.x + b.w, b.y + b.h)
}

pub fn rect_cbox(r: Rect) -> CenterBox {
    CenterBox {
        center: r.center(),
        size: r.size(),
    }
}

pub fn cbox_rect(c: CenterBox) -> Rect {
    let (hw, hh) = (c.size.w / 2.0, c.size.h / 2.0);
    Rect::new(c.center.x - hw, c.center.y - hh, c.center.x + hw, c.center.y + hh)
}

pub fn rect_radial(r: Rect) -> Radial {
    Radial {
        center: r.center(),
        rx: r.width() / 2.0,
        ry: r.height() / 2.0,
    }
}

pub fn radial_rect(center: Point, rx: f64, ry: f64) -> Rect {
    Rect::new(center.x - rx, center.y - ry, center.x + rx, center.y + ry)
}

/// Largest (or, with `expand`, smallest covering) size of ratio `aspect`
/// inside `size`, keeping the sign of each component.
pub fn embed(size: Size, aspect: Option<f64>, expand: bool) -> Size {
    let Some(aspect) = aspect.filter(|a| a.is_finite() && *a > 0.0) else {
        return size;
    };
    let (aw, ah) = (size.w.abs(), size.h.abs());
    let h = if expand {
        (aw / aspect).max(ah)
    } else {
        (aw / aspect).min(ah)
    };
    let w = h * aspect;
    Size::new(w.copysign(size.w), h.copysign(size.h))
}

/// Absolute cosine and sine of an angle given in degrees
fn abs_cos_sin(degrees: f64) -> (f64, f64) {
    let theta = degrees.to_radians();
    (theta.cos().abs(), theta.sin().abs())
}

/// Size of the axis-aligned bounding box of `size` rotated by `degrees`.
pub fn rotated_bounds(size: Size, degrees: f64) -> Size {
    let (c, s) = abs_cos_sin(degrees);
    let (w, h) = (size.w.abs(), size.h.abs());
    Size::new(w * c + h * s, w * s + h * c)
}

/// Aspect of the bounding box of an `aspect`-ratioed rect after rotation.
pub fn rotated_apparent_aspect(aspect: f64, degrees: f64) -> f64 {
    let (c, s) = abs_cos_sin(degrees);
    (aspect * c + s) / (aspect * s + c)
}

/// Size of a rect that, once rotated by `rotate` degrees, fits inside `size`.
///
/// With `invar` (or no rotation) this is plain [`embed`]. With a known
/// aspect the solution is closed form. Without one, the result maximizes
/// area over three regimes chosen by comparing the container's own aspect
/// against `tan θ` and `cot θ`.
pub fn rotate_fit(
    size: Size,
    rotate: f64,
    aspect: Option<f64>,
    expand: bool,
    invar: bool,
    tolerance: f64,
) -> Size {
    if invar || rotate == 0.0 {
        return embed(size, aspect, expand);
    }

    let (c, s) = abs_cos_sin(rotate);
    let (aw, ah) = (size.w.abs(), size.h.abs());

    let (w, h) = match aspect.filter(|a| a.is_finite() && *a > 0.0) {
        Some(a) => {
            let dw = a * c + s;
            let dh = a * s + c;
            let h = if expand {
                (aw / dw).max(ah / dh)
            } else {
                (aw / dw).min(ah / dh)
            };
            (h * a, h)
        }
        None => fit_free(aw, ah, c, s, tolerance),
    };

    Size::new(w.copysign(size.w), h.copysign(size.h))
}

/// Area-maximizing rect inside `(aw, ah)` under rotation with `|cos|=c`,
/// `|sin|=s`. Constraints: `c·w + s·h ≤ aw`, `s·w + c·h ≤ ah`.
fn fit_free(aw: f64, ah: f64, c: f64, s: f64, tolerance: f64) -> (f64, f64) {
    if aw == 0.0 || ah == 0.0 {
        crate::log::warn!(aw, ah, "rotated fit into an empty box");
        return (0.0, 0.0);
    }

    let ratio = aw / ah;
    let tan = s / c;
    let cot = c / s;
    let (lo, hi) = (tan.min(cot), tan.max(cot));

    if ratio <= lo {
        // steep: only the width constraint binds
        (aw / (2.0 * c), aw / (2.0 * s))
    } else if ratio >= hi {
        // shallow: only the height constraint binds
        (ah / (2.0 * s), ah / (2.0 * c))
    } else {
        let det = c * c - s * s;
        if det.abs() < tolerance {
            crate::log::warn!(det, "near-singular rotation system, splitting evenly");
            let side = aw.min(ah) / (c + s);
            (side, side)
        } else {
            ((c * aw - s * ah) / det, (c * ah - s * aw) / det)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn close_size(a: Size, b: Size) -> bool {
        close(a.w, b.w) && close(a.h, b.h)
    }

    #[test]
    fn embed_without_aspect_is_identity() {
        for size in [Size::new(3.0, 2.0), Size::new(-1.0, 5.0), Size::new(0.0, 0.0)] {
            assert_eq!(embed(size, None, false), size);
            assert_eq!(embed(size, None, true), size);
        }
    }

    #[test]
    fn embed_shrinks_to_fit() {
        let out = embed(Size::new(4.0, 2.0), Some(1.0), false);
        assert!(close_size(out, Size::new(2.0, 2.0)));
        let out = embed(Size::new(4.0, 2.0), Some(4.0), false);
        assert!(close_size(out, Size::new(4.0, 1.0)));
    }

    #[test]
    fn embed_expand_covers() {
        let out = embed(Size::new(4.0, 2.0), Some(1.0), true);
        assert!(close_size(out, Size::new(4.0, 4.0)));
    }

    #[test]
    fn embed_preserves_flip() {
        let out = embed(Size::new(-4.0, 2.0), Some(1.0), false);
        assert!(close_size(out, Size::new(-2.0, 2.0)));
        let out = embed(Size::new(4.0, -2.0), Some(0.5), false);
        assert!(close_size(out, Size::new(1.0, -2.0)));
    }

    #[test]
    fn rotate_fit_at_zero_matches_embed() {
        let sizes = [Size::new(3.0, 2.0), Size::new(1.0, 7.0), Size::new(-2.0, 2.0)];
        let aspects = [None, Some(0.25), Some(1.0), Some(3.0)];
        for size in sizes {
            for aspect in aspects {
                for expand in [false, true] {
                    for invar in [false, true] {
                        assert_eq!(
                            rotate_fit(size, 0.0, aspect, expand, invar, 1e-9),
                            embed(size, aspect, expand)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn invariant_rotation_ignores_angle() {
        let size = Size::new(2.0, 1.0);
        assert_eq!(
            rotate_fit(size, 37.0, Some(1.0), false, true, 1e-9),
            embed(size, Some(1.0), false)
        );
    }

    #[test]
    fn square_rotated_ninety_is_limited_by_height() {
        let out = rotate_fit(Size::new(2.0, 1.0), 90.0, Some(1.0), false, false, 1e-9);
        assert!(close_size(out, Size::new(1.0, 1.0)), "got {:?}", out);
    }

    #[test]
    fn rotated_fit_is_contained() {
        let sizes = [
            Size::new(2.0, 1.0),
            Size::new(1.0, 3.0),
            Size::new(1.0, 1.0),
            Size::new(10.0, 0.5),
            Size::new(0.2, 4.0),
        ];
        let aspects = [None, Some(0.3), Some(1.0), Some(2.5)];
        for size in sizes {
            for aspect in aspects {
                for deg in (5..360).step_by(10) {
                    let deg = deg as f64;
                    let fit = rotate_fit(size, deg, aspect, false, false, 1e-9);
                    let bounds = rotated_bounds(fit, deg);
                    assert!(
                        bounds.w <= size.w.abs() + 1e-9 && bounds.h <= size.h.abs() + 1e-9,
                        "size {:?} aspect {:?} deg {} -> fit {:?} bounds {:?}",
                        size,
                        aspect,
                        deg,
                        fit,
                        bounds
                    );
                }
            }
        }
    }

    #[test]
    fn rotated_fit_keeps_requested_aspect() {
        let fit = rotate_fit(Size::new(3.0, 2.0), 30.0, Some(2.0), false, false, 1e-9);
        assert!(close(fit.w / fit.h, 2.0));
    }

    #[test]
    fn rotated_expand_covers_container() {
        let size = Size::new(3.0, 2.0);
        let fit = rotate_fit(size, 30.0, Some(1.0), true, false, 1e-9);
        let bounds = rotated_bounds(fit, 30.0);
        assert!(bounds.w >= size.w - EPS && bounds.h >= size.h - EPS);
    }

    #[test]
    fn free_fit_middle_regime_touches_all_sides() {
        // 30 degrees in a unit square: tan < 1 < cot
        let fit = rotate_fit(Size::new(1.0, 1.0), 30.0, None, false, false, 1e-9);
        let bounds = rotated_bounds(fit, 30.0);
        assert!(close(bounds.w, 1.0) && close(bounds.h, 1.0));
        assert!(close(fit.w, fit.h));
    }

    #[test]
    fn free_fit_steep_regime_is_width_bound() {
        // very narrow container at 30 degrees
        let size = Size::new(0.1, 4.0);
        let fit = rotate_fit(size, 30.0, None, false, false, 1e-9);
        let bounds = rotated_bounds(fit, 30.0);
        assert!(close(bounds.w, 0.1));
        assert!(bounds.h < 4.0);
    }

    #[test]
    fn free_fit_shallow_regime_is_height_bound() {
        let size = Size::new(4.0, 0.1);
        let fit = rotate_fit(size, 30.0, None, false, false, 1e-9);
        let bounds = rotated_bounds(fit, 30.0);
        assert!(close(bounds.h, 0.1));
        assert!(bounds.w < 4.0);
    }

    #[test]
    fn free_fit_near_singular_splits_evenly() {
        let fit = rotate_fit(Size::new(1.0, 1.0), 45.0, None, false, false, 1e-6);
        assert!(close(fit.w, fit.h));
        let bounds = rotated_bounds(fit, 45.0);
        assert!(bounds.w <= 1.0 + EPS && bounds.h <= 1.0 + EPS);
    }

    #[test]
    fn free_fit_ninety_swaps_axes() {
        let fit = rotate_fit(Size::new(3.0, 1.0), 90.0, None, false, false, 1e-9);
        assert!(close_size(fit, Size::new(1.0, 3.0)), "got {:?}", fit);
    }

    #[test]
    fn free_fit_empty_container() {
        let fit = rotate_fit(Size::new(0.0, 1.0), 20.0, None, false, false, 1e-9);
        assert_eq!(fit, Size::new(0.0, 0.0));
    }

    #[test]
    fn apparent_aspect_under_rotation() {
        assert!(close(rotated_apparent_aspect(2.0, 0.0), 2.0));
        assert!(close(rotated_apparent_aspect(2.0, 90.0), 0.5));
        assert!(close(rotated_apparent_aspect(3.0, 45.0), 1.0));
    }

    #[test]
    fn rect_box_round_trip() {
        for r in [
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Rect::new(0.1, 0.2, 0.7, 0.9),
            Rect::new(5.0, -3.0, -2.0, 4.5),
        ] {
            let back = box_rect(rect_box(r));
            assert!(close(back.x1, r.x1) && close(back.y1, r.y1));
            assert!(close(back.x2, r.x2) && close(back.y2, r.y2));
        }
    }

    #[test]
    fn rect_cbox_round_trip() {
        for r in [
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Rect::new(0.1, 0.2, 0.7, 0.9),
            Rect::new(5.0, -3.0, -2.0, 4.5),
        ] {
            let back = cbox_rect(rect_cbox(r));
            assert!(close(back.x1, r.x1) && close(back.y1, r.y1));
            assert!(close(back.x2, r.x2) && close(back.y2, r.y2));
        }
    }

    #[test]
    fn radial_round_trip() {
        let r = Rect::new(1.0, 2.0, 3.0, 6.0);
        let rad = rect_radial(r);
        assert_eq!(rad.center, Point::new(2.0, 4.0));
        assert_eq!((rad.rx, rad.ry), (1.0, 2.0));
        assert_eq!(radial_rect(rad.center, rad.rx, rad.ry), r);
    }
}
