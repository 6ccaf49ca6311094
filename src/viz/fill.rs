//! Area fill rasterization. Plotters' `AreaSeries` only takes a flat color, so
//! gradient fills are painted column by column with per-pixel alpha.

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::scale::RenderContext;
use super::util::to_plotters;
use crate::gradient::FillStyle;

/// Runs of consecutive indices that carry a value, as stacked pixel points.
pub fn drawable_runs(ctx: &RenderContext<'_>, series_idx: usize) -> Vec<Vec<(f64, f64)>> {
    let Some(series) = ctx.datasets.get(series_idx) else {
        return Vec::new();
    };
    let mut runs: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut cur: Vec<(f64, f64)> = Vec::new();
    for i in 0..series.len() {
        if series.value(i).is_some() {
            cur.push(ctx.stacked_point(series_idx, i));
        } else if !cur.is_empty() {
            runs.push(std::mem::take(&mut cur));
        }
    }
    if !cur.is_empty() {
        runs.push(cur);
    }
    runs
}

/// Line height at pixel column `x` within a run (linear between neighbors).
fn line_y_at(run: &[(f64, f64)], x: f64) -> Option<f64> {
    if let [only] = run {
        return ((x - only.0).abs() < 0.5).then_some(only.1);
    }
    run.windows(2).find_map(|w| {
        let ((x0, y0), (x1, y1)) = (w[0], w[1]);
        if x < x0 || x > x1 || x1 <= x0 {
            return None;
        }
        Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
    })
}

/// Paint the region between the stacked line of `series_idx` and the zero line.
///
/// Isolated points have no area and are left unfilled.
pub fn fill_series_area<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    ctx: &RenderContext<'_>,
    series_idx: usize,
    style: &FillStyle,
) -> Result<()> {
    let baseline = ctx.y.pixel_for_value(0.0).clamp(ctx.area.top, ctx.area.bottom);
    for run in drawable_runs(ctx, series_idx) {
        if run.len() < 2 {
            continue;
        }
        let (Some(first), Some(last)) = (run.first(), run.last()) else {
            continue;
        };
        let x_start = first.0.floor().max(ctx.area.left) as i32;
        let x_end = last.0.ceil().min(ctx.area.right) as i32;
        for px in x_start..=x_end {
            let Some(line_y) = line_y_at(&run, px as f64 + 0.5) else {
                continue;
            };
            if !line_y.is_finite() {
                continue;
            }
            let line_y = line_y.clamp(ctx.area.top, ctx.area.bottom);
            let (y0, y1) = if line_y <= baseline {
                (line_y, baseline)
            } else {
                (baseline, line_y)
            };
            for py in y0.round() as i32..y1.round() as i32 {
                let color = style.color_at(px as f64 + 0.5, py as f64 + 0.5);
                if color.a <= 0.0 {
                    continue;
                }
                root.draw_pixel((px, py), &to_plotters(color))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
        }
    }
    Ok(())
}
