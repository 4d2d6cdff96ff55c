//! Two-dimensional grid layout
//!
//! Column widths and row heights are chosen so that cells come close to
//! their children's aspects. Working in the log domain turns the per-cell
//! condition `w_j / h_i ≈ a_ij` into an additive one, solved in closed form
//! by row and column means. The fit is a least-squares approximation: it is
//! exact only when the aspect matrix factors as `a_ij = u_j · v_i`.

use crate::errors::LayoutError;
use crate::types::{Limit, Rect};

use super::context::{Context, Metadata};
use super::group::render_children;
use super::shapes::{Component, Element, node_builders, spec_access};
use super::spec::Spec;
use super::types::{Attrs, Style};

/// Solver output
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub columns: Vec<Limit>,
    pub rows: Vec<Limit>,
    /// Width/height of the whole grid, gaps included
    pub aspect: Option<f64>,
}

impl GridLayout {
    fn empty() -> Self {
        GridLayout {
            columns: Vec::new(),
            rows: Vec::new(),
            aspect: None,
        }
    }
}

/// Normalize positive weights to sum to 1
fn normalize(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    weights.iter().map(|w| w / total).collect()
}

fn mean(vals: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = vals.len() as f64;
    vals.sum::<f64>() / n
}

/// Consecutive ranges of the given sizes separated by `gap`
fn tracks(sizes: &[f64], gap: f64) -> Vec<Limit> {
    let mut pos = 0.0;
    sizes
        .iter()
        .map(|s| {
            let r = Limit::new(pos, pos + s);
            pos = r.hi + gap;
            r
        })
        .collect()
}

/// Lay out a ragged matrix of cell aspects.
///
/// Missing cells (short rows) and cells without an aspect count as square.
/// Explicit `widths`/`heights` replace the solved weights and are
/// normalized; `spacing` is the `(column, row)` gap as a fraction of the
/// grid's width and height.
pub fn solve_grid(
    aspects: &[Vec<Option<f64>>],
    widths: Option<&[f64]>,
    heights: Option<&[f64]>,
    spacing: (f64, f64),
) -> GridLayout {
    let nr = aspects.len();
    let nc = aspects.iter().map(Vec::len).max().unwrap_or(0);
    if nr == 0 || nc == 0 {
        return GridLayout::empty();
    }

    let log_a: Vec<Vec<f64>> = aspects
        .iter()
        .map(|row| {
            (0..nc)
                .map(|j| row.get(j).copied().flatten().filter(|a| *a > 0.0).map_or(0.0, f64::ln))
                .collect()
        })
        .collect();

    let log_mu = mean(log_a.iter().flatten().copied().collect::<Vec<_>>().into_iter());
    let col_log: Vec<f64> = (0..nc).map(|j| mean(log_a.iter().map(|row| row[j])) - log_mu).collect();
    let row_log: Vec<f64> = log_a.iter().map(|row| log_mu - mean(row.iter().copied())).collect();

    let widths = match widths {
        Some(w) => normalize(w),
        None => normalize(&col_log.iter().map(|l| l.exp()).collect::<Vec<_>>()),
    };
    let heights = match heights {
        Some(h) => normalize(h),
        None => normalize(&row_log.iter().map(|l| l.exp()).collect::<Vec<_>>()),
    };

    // aspect of the cell block before gaps are inserted
    let content = (log_mu - mean(widths.iter().map(|w| w.ln())) + mean(heights.iter().map(|h| h.ln()))).exp();

    let (mut sx, mut sy) = spacing;
    let mut fc = 1.0 - sx * (nc - 1) as f64;
    let mut fr = 1.0 - sy * (nr - 1) as f64;
    if fc <= 0.0 {
        crate::log::warn!(sx, nc, "column spacing consumes the grid, ignoring it");
        (sx, fc) = (0.0, 1.0);
    }
    if fr <= 0.0 {
        crate::log::warn!(sy, nr, "row spacing consumes the grid, ignoring it");
        (sy, fr) = (0.0, 1.0);
    }

    let columns = tracks(&widths.iter().map(|w| w * fc).collect::<Vec<_>>(), sx);
    let rows = tracks(&heights.iter().map(|h| h * fr).collect::<Vec<_>>(), sy);
    let aspect = content * fr / fc;

    crate::log::debug!(rows = nr, columns = nc, aspect, "grid layout");
    GridLayout {
        columns,
        rows,
        aspect: aspect.is_finite().then_some(aspect),
    }
}

/// Children arranged in rows and columns
#[derive(Debug, Clone, Default)]
pub struct Grid {
    pub spec: Spec,
    pub style: Style,
    pub rows: Vec<Vec<Element>>,
    /// Explicit column weights, one per column
    pub widths: Option<Vec<f64>>,
    /// Explicit row weights, one per row
    pub heights: Option<Vec<f64>>,
    /// `(column, row)` gap as a fraction of the grid's width and height
    pub spacing: (f64, f64),
    pub debug: bool,
}

impl Grid {
    pub fn new(rows: impl IntoIterator<Item = Vec<Element>>) -> Self {
        Grid {
            rows: rows.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_widths(mut self, widths: Vec<f64>) -> Self {
        self.widths = Some(widths);
        self
    }

    pub fn with_heights(mut self, heights: Vec<f64>) -> Self {
        self.heights = Some(heights);
        self
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = (spacing, spacing);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    node_builders!();

    fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn check_weights(&self, axis: &'static str, weights: Option<&[f64]>, expected: usize) -> Result<(), LayoutError> {
        match weights {
            Some(w) if w.len() != expected || w.iter().any(|v| !(v.is_finite() && *v > 0.0)) => {
                Err(LayoutError::WeightCount {
                    node: self.kind(),
                    axis,
                    expected,
                    got: w.len(),
                })
            }
            _ => Ok(()),
        }
    }

    pub fn layout(&self) -> Result<GridLayout, LayoutError> {
        self.check_weights("column", self.widths.as_deref(), self.column_count())?;
        self.check_weights("row", self.heights.as_deref(), self.rows.len())?;
        let aspects = self
            .rows
            .iter()
            .map(|row| row.iter().map(Element::layout_aspect).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(solve_grid(
            &aspects,
            self.widths.as_deref(),
            self.heights.as_deref(),
            self.spacing,
        ))
    }

    fn placed(&self) -> Result<Vec<Element>, LayoutError> {
        let layout = self.layout()?;
        let mut out = Vec::new();
        for (row, rlim) in self.rows.iter().zip(&layout.rows) {
            for (child, clim) in row.iter().zip(&layout.columns) {
                out.push(child.with_rect(Rect::new(clim.lo, rlim.lo, clim.hi, rlim.hi)));
            }
        }
        Ok(out)
    }
}

impl Component for Grid {
    spec_access!();

    fn kind(&self) -> &'static str {
        "Grid"
    }

    fn tag(&self) -> &'static str {
        "g"
    }

    fn aspect(&self) -> Result<Option<f64>, LayoutError> {
        if let Some(a) = self.spec.fixed_aspect() {
            return Ok(Some(a));
        }
        Ok(self.layout()?.aspect)
    }

    fn geometry(&self, _ctx: &Context, _meta: &mut Metadata) -> Result<Attrs, LayoutError> {
        Ok(Attrs::new())
    }

    fn inner(&self, ctx: &Context, meta: &mut Metadata) -> Result<Option<String>, LayoutError> {
        render_children(&self.placed()?, ctx, meta, self.debug).map(Some)
    }
}
