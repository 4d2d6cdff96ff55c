//! One-dimensional stack layout
//!
//! Children are laid end to end along the main axis. Each child may give an
//! explicit size (a fraction of the main axis), an aspect, both, or neither;
//! the solver works out every child's share and, where it is determined, the
//! aspect of the whole stack.

use crate::errors::LayoutError;
use crate::types::{Limit, Rect};

use super::context::{Context, Metadata};
use super::group::render_children;
use super::shapes::{Component, Element, node_builders, spec_access};
use super::spec::Spec;
use super::types::{Attrs, Direction, Style};

/// Solver input for one child, in main-axis terms
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StackItem {
    /// Fraction of the main axis
    pub size: Option<f64>,
    /// Main-axis length over cross-axis length
    pub aspect: Option<f64>,
}

/// Solver output
#[derive(Debug, Clone, PartialEq)]
pub struct StackLayout {
    /// Main-axis range of each child within `[0, 1]`
    pub ranges: Vec<Limit>,
    /// Main-axis length over cross-axis length of the whole stack
    pub length: Option<f64>,
}

/// Length ratio that lets every sized child with an aspect fit its slot
fn over_length(items: &[StackItem], usable: f64) -> Option<f64> {
    items
        .iter()
        .filter_map(|it| match (it.size, it.aspect) {
            (Some(s), Some(m)) if s > 0.0 && m > 0.0 => Some(m / (usable * s)),
            _ => None,
        })
        .reduce(f64::min)
}

/// Allocate main-axis ranges.
///
/// `length`, if given, fixes the stack's main/cross ratio. Otherwise it is
/// derived from the sized children with aspects, or failing that from the
/// children with only an aspect, which then exactly fill the space left by
/// the sized children. Children with neither share whatever remains.
pub fn solve_stack(items: &[StackItem], spacing: f64, length: Option<f64>) -> StackLayout {
    let n = items.len();
    if n == 0 {
        return StackLayout {
            ranges: Vec::new(),
            length: None,
        };
    }

    let mut spacing = spacing;
    let mut usable = 1.0 - spacing * (n - 1) as f64;
    if usable <= 0.0 {
        crate::log::warn!(spacing, n, "spacing consumes the whole stack, ignoring it");
        spacing = 0.0;
        usable = 1.0;
    }

    let mut sizes: Vec<f64> = items.iter().map(|it| it.size.unwrap_or(0.0)).collect();
    let fixed: f64 = sizes.iter().sum();
    let expanding: Vec<usize> = (0..n)
        .filter(|&i| items[i].size.is_none() && items[i].aspect.is_some_and(|m| m > 0.0))
        .collect();
    let flexible: Vec<usize> = (0..n)
        .filter(|&i| items[i].size.is_none() && !expanding.contains(&i))
        .collect();

    let length = if fixed >= 1.0 || (expanding.is_empty() && flexible.is_empty()) {
        if fixed > 1.0 {
            crate::log::warn!(fixed, "explicit sizes overflow the stack, scaling down");
            sizes.iter_mut().for_each(|s| *s /= fixed);
        }
        let total = fixed.max(1.0);
        let scaled: Vec<StackItem> = items
            .iter()
            .map(|it| StackItem {
                size: it.size.map(|s| s / total),
                ..*it
            })
            .collect();
        length.or_else(|| over_length(&scaled, usable))
    } else {
        let remaining = 1.0 - fixed;
        let length = length.or_else(|| over_length(items, usable)).or_else(|| {
            let aspects: f64 = expanding.iter().filter_map(|&i| items[i].aspect).sum();
            (!expanding.is_empty()).then(|| aspects / (remaining * usable))
        });

        if let Some(length) = length.filter(|_| !expanding.is_empty()) {
            let wants: Vec<f64> = expanding
                .iter()
                .map(|&i| items[i].aspect.unwrap_or(0.0) / (usable * length))
                .collect();
            let total: f64 = wants.iter().sum();
            if total > remaining {
                if let [only] = expanding.as_slice() {
                    sizes[*only] = remaining;
                } else {
                    let k = remaining / total;
                    for (&i, w) in expanding.iter().zip(&wants) {
                        sizes[i] = w * k;
                    }
                }
            } else {
                for (&i, w) in expanding.iter().zip(&wants) {
                    sizes[i] = *w;
                }
            }
        }

        if !flexible.is_empty() {
            let used: f64 = sizes.iter().sum();
            let share = (1.0 - used).max(0.0) / flexible.len() as f64;
            for &i in &flexible {
                sizes[i] = share;
            }
        }
        length
    };

    let mut ranges = Vec::with_capacity(n);
    let mut pos = 0.0;
    for s in &sizes {
        let lo = pos;
        let hi = lo + usable * s;
        ranges.push(Limit::new(lo, hi));
        pos = hi + spacing;
    }

    crate::log::debug!(n, ?length, "stack layout");
    StackLayout { ranges, length }
}

/// A child and its stack parameters
#[derive(Debug, Clone)]
pub struct StackChild {
    pub element: Element,
    /// Fraction of the main axis
    pub size: Option<f64>,
    /// Whether the child's aspect drives its share
    pub expand: bool,
}

impl StackChild {
    pub fn new(element: impl Into<Element>) -> Self {
        StackChild {
            element: element.into(),
            size: None,
            expand: true,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    /// Ignore the child's aspect when sharing out space
    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }
}

/// Children laid end to end, vertically or horizontally
#[derive(Debug, Clone, Default)]
pub struct Stack {
    pub spec: Spec,
    pub style: Style,
    pub direction: Direction,
    pub children: Vec<StackChild>,
    /// Gap between neighbors, as a fraction of the main axis
    pub spacing: f64,
    /// Cross-axis anchor applied to every child
    pub align: Option<f64>,
    pub debug: bool,
}

impl Stack {
    pub fn new(direction: Direction, children: impl IntoIterator<Item = StackChild>) -> Self {
        Stack {
            direction,
            children: children.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Vertical stack of elements with default stack parameters
    pub fn vertical(elements: impl IntoIterator<Item = impl Into<Element>>) -> Self {
        Self::new(Direction::Vertical, elements.into_iter().map(StackChild::new))
    }

    /// Horizontal stack of elements with default stack parameters
    pub fn horizontal(elements: impl IntoIterator<Item = impl Into<Element>>) -> Self {
        Self::new(Direction::Horizontal, elements.into_iter().map(StackChild::new))
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_align(mut self, align: f64) -> Self {
        self.align = Some(align);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    node_builders!();

    /// Convert between width/height and main/cross ratios (an involution)
    fn main_ratio(&self, aspect: f64) -> f64 {
        match self.direction {
            Direction::Horizontal => aspect,
            Direction::Vertical => 1.0 / aspect,
        }
    }

    pub fn layout(&self) -> Result<StackLayout, LayoutError> {
        let items = self
            .children
            .iter()
            .map(|c| {
                let aspect = if c.expand { c.element.layout_aspect()? } else { None };
                Ok(StackItem {
                    size: c.size,
                    aspect: aspect.filter(|a| *a > 0.0).map(|a| self.main_ratio(a)),
                })
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;
        let length = self.spec.fixed_aspect().map(|a| self.main_ratio(a));
        Ok(solve_stack(&items, self.spacing, length))
    }

    /// Children placed into their slots
    fn placed(&self) -> Result<Vec<Element>, LayoutError> {
        let layout = self.layout()?;
        Ok(self
            .children
            .iter()
            .zip(&layout.ranges)
            .map(|(c, r)| {
                let rect = match self.direction {
                    Direction::Vertical => Rect::new(0.0, r.lo, 1.0, r.hi),
                    Direction::Horizontal => Rect::new(r.lo, 0.0, r.hi, 1.0),
                };
                c.element.with_spec(|s| {
                    s.rect = Some(rect);
                    if let Some(a) = self.align {
                        match self.direction {
                            Direction::Vertical => s.align.x = a,
                            Direction::Horizontal => s.align.y = a,
                        }
                    }
                })
            })
            .collect())
    }
}

impl Component for Stack {
    spec_access!();

    fn kind(&self) -> &'static str {
        "Stack"
    }

    fn tag(&self) -> &'static str {
        "g"
    }

    fn aspect(&self) -> Result<Option<f64>, LayoutError> {
        if let Some(a) = self.spec.fixed_aspect() {
            return Ok(Some(a));
        }
        Ok(self.layout()?.length.filter(|l| *l > 0.0).map(|l| self.main_ratio(l)))
    }

    fn geometry(&self, _ctx: &Context, _meta: &mut Metadata) -> Result<Attrs, LayoutError> {
        Ok(Attrs::new())
    }

    fn inner(&self, ctx: &Context, meta: &mut Metadata) -> Result<Option<String>, LayoutError> {
        render_children(&self.placed()?, ctx, meta, self.debug).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shapes::Rectangle;

    const EPS: f64 = 1e-9;

    fn item(size: Option<f64>, aspect: Option<f64>) -> StackItem {
        StackItem { size, aspect }
    }

    fn assert_ranges(layout: &StackLayout, expected: &[(f64, f64)]) {
        assert_eq!(layout.ranges.len(), expected.len());
        for (r, (lo, hi)) in layout.ranges.iter().zip(expected) {
            assert!((r.lo - lo).abs() < EPS && (r.hi - hi).abs() < EPS, "{r:?} != ({lo}, {hi})");
        }
    }

    #[test]
    fn fixed_then_flexible() {
        let layout = solve_stack(&[item(Some(0.3), None), item(None, None), item(None, None)], 0.0, None);
        assert_ranges(&layout, &[(0.0, 0.3), (0.3, 0.65), (0.65, 1.0)]);
        assert_eq!(layout.length, None);
    }

    #[test]
    fn empty_stack() {
        let layout = solve_stack(&[], 0.1, Some(2.0));
        assert!(layout.ranges.is_empty());
        assert_eq!(layout.length, None);
    }

    #[test]
    fn expanding_children_share_by_aspect() {
        // main/cross ratios 1 and 3: the stack is 4 long and splits 1:3
        let layout = solve_stack(&[item(None, Some(1.0)), item(None, Some(3.0))], 0.0, None);
        assert_ranges(&layout, &[(0.0, 0.25), (0.25, 1.0)]);
        assert!((layout.length.unwrap() - 4.0).abs() < EPS);
    }

    #[test]
    fn spacing_sits_between_children() {
        let layout = solve_stack(&[item(None, None), item(None, None)], 0.1, None);
        assert_ranges(&layout, &[(0.0, 0.45), (0.55, 1.0)]);
    }

    #[test]
    fn overflowing_expander_saturates_remaining() {
        // the requested length would give the expander 0.8 of the axis; only 0.5 is left
        let layout = solve_stack(&[item(Some(0.5), None), item(None, Some(2.0))], 0.0, Some(2.5));
        assert_ranges(&layout, &[(0.0, 0.5), (0.5, 1.0)]);
        assert_eq!(layout.length, Some(2.5));
    }

    #[test]
    fn sized_child_with_aspect_sets_length() {
        // a square taking half the axis makes the stack twice as long as it is wide
        let layout = solve_stack(&[item(Some(0.5), Some(1.0)), item(None, None)], 0.0, None);
        assert!((layout.length.unwrap() - 2.0).abs() < EPS);
        assert_ranges(&layout, &[(0.0, 0.5), (0.5, 1.0)]);
    }

    #[test]
    fn sized_aspect_child_sets_length_for_expanders() {
        let items = [item(Some(0.5), Some(1.0)), item(None, Some(0.5)), item(None, None)];
        let layout = solve_stack(&items, 0.0, None);
        assert!((layout.length.unwrap() - 2.0).abs() < EPS);
        assert_ranges(&layout, &[(0.0, 0.5), (0.5, 0.75), (0.75, 1.0)]);

        let layout = solve_stack(&items, 0.1, None);
        assert!((layout.length.unwrap() - 2.5).abs() < EPS);
        assert_ranges(&layout, &[(0.0, 0.4), (0.5, 0.7), (0.8, 1.0)]);
    }

    #[test]
    fn strict_sizes_keep_gap() {
        let layout = solve_stack(&[item(Some(0.2), None), item(Some(0.3), None)], 0.0, None);
        assert_ranges(&layout, &[(0.0, 0.2), (0.2, 0.5)]);
    }

    #[test]
    fn oversized_explicit_sizes_are_normalized() {
        let layout = solve_stack(&[item(Some(1.0), None), item(Some(1.0), None)], 0.0, None);
        assert_ranges(&layout, &[(0.0, 0.5), (0.5, 1.0)]);
    }

    #[test]
    fn ranges_cover_axis() {
        let cases: Vec<Vec<StackItem>> = vec![
            vec![item(None, Some(0.5)), item(None, None), item(Some(0.2), Some(1.0))],
            vec![item(None, Some(2.0)), item(None, Some(1.0)), item(None, Some(0.25))],
            vec![item(Some(0.1), None), item(None, None)],
        ];
        for items in cases {
            let layout = solve_stack(&items, 0.05, None);
            assert!(layout.ranges[0].lo.abs() < EPS);
            assert!((layout.ranges.last().unwrap().hi - 1.0).abs() < EPS, "{layout:?}");
        }
    }

    #[test]
    fn excessive_spacing_is_dropped() {
        let layout = solve_stack(&[item(None, None), item(None, None)], 1.5, None);
        assert_ranges(&layout, &[(0.0, 0.5), (0.5, 1.0)]);
    }

    #[test]
    fn vertical_stack_of_squares() {
        let stack = Stack::vertical([Rectangle::square(), Rectangle::square()]);
        let aspect = Element::from(stack).aspect().unwrap().unwrap();
        assert!((aspect - 0.5).abs() < EPS);
    }

    #[test]
    fn horizontal_stack_of_squares() {
        let stack = Stack::horizontal([Rectangle::square(), Rectangle::square(), Rectangle::square()]);
        let aspect = Element::from(stack).aspect().unwrap().unwrap();
        assert!((aspect - 3.0).abs() < EPS);
    }

    #[test]
    fn non_expanding_child_is_flexible() {
        let stack = Stack::new(
            Direction::Horizontal,
            [
                StackChild::new(Rectangle::square()).with_expand(false),
                StackChild::new(Rectangle::new()),
            ],
        );
        assert_eq!(Element::from(stack).aspect().unwrap(), None);
    }

    #[test]
    fn stack_places_children() {
        let stack = Stack::new(
            Direction::Vertical,
            [StackChild::new(Rectangle::new()).with_size(0.25), StackChild::new(Rectangle::new())],
        );
        let ctx = Context::root(crate::types::Size::new(40.0, 100.0));
        let svg = Element::from(stack).render_in(&ctx, &mut Metadata::new()).unwrap();
        insta::assert_snapshot!(svg, @r#"
        <g><rect x="0" y="0" width="40" height="25"/>
        <rect x="0" y="25" width="40" height="75"/></g>
        "#);
    }

    #[test]
    fn cross_alignment_overrides_children() {
        let stack = Stack::vertical([Rectangle::square()]).with_align(0.0).with_spec(Spec::new().with_aspect(2.0));
        let ctx = Context::root(crate::types::Size::new(200.0, 100.0));
        let svg = Element::from(stack).render_in(&ctx, &mut Metadata::new()).unwrap();
        assert!(svg.contains(r#"<rect x="0" y="0" width="100" height="100"/>"#), "{svg}");
    }
}
