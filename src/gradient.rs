//! Trend-following fill for stacked series.
//!
//! The fill fades along the normal of a least-squares line fitted through the
//! series' stacked pixel positions, so it follows the overall rise or fall of the
//! stack instead of a fixed vertical direction. It is recomputed on every draw:
//! visibility and stacking can change between frames.

use crate::color::{Rgb, Rgba};
use crate::viz::scale::RenderContext;

/// Fade parameters for [`trend_gradient`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientConfig {
    /// Opacity of the series color at the data edge.
    pub start_opacity: f64,
    /// Minimum fade distance in pixels.
    pub fade_height: f64,
    /// Pixels the ramp starts ahead of the outermost data point.
    pub padding: f64,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            start_opacity: 0.13,
            fade_height: 150.0,
            padding: 20.0,
        }
    }
}

/// Opacity of the flat fallback fill for degenerate geometry.
pub const FALLBACK_OPACITY: f64 = 0.2;

/// Gradients this close to zero are treated as singular.
const SINGULAR_EPS: f64 = 1e-10;

/// Extra pixels added to the observed data spread before fading out.
const SPREAD_MARGIN: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

/// Canvas-style linear gradient between two pixel positions.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: (f64, f64),
    pub end: (f64, f64),
    /// Sorted by offset, offsets in `0..=1`.
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    /// Color at pixel `(x, y)`: project onto the gradient axis, clamp, and blend
    /// the surrounding stops.
    pub fn color_at(&self, x: f64, y: f64) -> Rgba {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgba::TRANSPARENT_WHITE;
        };
        let dx = self.end.0 - self.start.0;
        let dy = self.end.1 - self.start.1;
        let len2 = dx * dx + dy * dy;
        if len2 <= 0.0 {
            return first.color;
        }
        let t = (((x - self.start.0) * dx + (y - self.start.1) * dy) / len2).clamp(0.0, 1.0);
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= 0.0 {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.offset) / span);
            }
        }
        last.color
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FillStyle {
    Linear(LinearGradient),
    Solid(Rgba),
}

impl FillStyle {
    pub fn color_at(&self, x: f64, y: f64) -> Rgba {
        match self {
            FillStyle::Linear(g) => g.color_at(x, y),
            FillStyle::Solid(c) => *c,
        }
    }
}

/// Fill for dataset `series_idx` following the trend of its stacked values.
///
/// Fewer than two drawable points yields the plain series color; a fit whose
/// endpoints come out non-finite yields a flat translucent fill.
pub fn trend_gradient(
    ctx: &RenderContext<'_>,
    series_idx: usize,
    color: Rgb,
    cfg: &GradientConfig,
) -> FillStyle {
    let Some(series) = ctx.datasets.get(series_idx) else {
        return FillStyle::Solid(color.opaque());
    };

    let mut points: Vec<(f64, f64)> = Vec::with_capacity(series.len());
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for i in 0..series.len() {
        if series.value(i).is_none() {
            continue;
        }
        let (x, y) = ctx.stacked_point(series_idx, i);
        points.push((x, y));
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let n = points.len() as f64;
    if points.len() < 2 {
        return FillStyle::Solid(color.opaque());
    }

    let (cx, cy) = (sum_x / n, sum_y / n);
    // Unit normal of the fitted line; vertical when the fit is singular.
    let (mut nx, mut ny) = (0.0, 1.0);
    let denom = n * sum_xx - sum_x * sum_x;
    if denom.abs() > SINGULAR_EPS {
        let slope = (n * sum_xy - sum_x * sum_y) / denom;
        let len = (slope * slope + 1.0).sqrt();
        nx = -slope / len;
        ny = 1.0 / len;
    } else {
        log::debug!("gradient for `{}`: singular fit, using vertical axis", series.label);
    }

    let (mut min_proj, mut max_proj) = (f64::INFINITY, f64::NEG_INFINITY);
    for (x, y) in &points {
        let proj = (x - cx) * nx + (y - cy) * ny;
        min_proj = min_proj.min(proj);
        max_proj = max_proj.max(proj);
    }

    min_proj -= cfg.padding;
    let spread = max_proj - min_proj - cfg.padding;
    let fade = cfg.fade_height.max(spread + SPREAD_MARGIN);
    let total = ctx.area.height().max(fade + cfg.padding);

    let start = (cx + nx * min_proj, cy + ny * min_proj);
    let end = (cx + nx * (min_proj + total), cy + ny * (min_proj + total));
    if ![start.0, start.1, end.0, end.1].iter().all(|v| v.is_finite()) {
        log::warn!("gradient for `{}`: non-finite axis, using flat fill", series.label);
        return FillStyle::Solid(color.with_opacity(FALLBACK_OPACITY));
    }

    let fade_stop = ((cfg.padding + fade) / total).min(1.0);
    FillStyle::Linear(LinearGradient {
        start,
        end,
        stops: vec![
            ColorStop {
                offset: 0.0,
                color: color.with_opacity(cfg.start_opacity),
            },
            ColorStop {
                offset: fade_stop,
                color: Rgba::TRANSPARENT_WHITE,
            },
            ColorStop {
                offset: 1.0,
                color: Rgba::TRANSPARENT_WHITE,
            },
        ],
    })
}
