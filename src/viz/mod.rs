//! Chart rendering with plotters: stacked trend-filled lines drawn into an
//! in-memory RGB buffer, followed by the missing-data grayscale pass.
//!
//! - Gradient fill per visible series, painted against its stacked line
//! - Line segments touching an interpolated day drawn in the neutral segment color
//! - Tick labels thinned by the responsive profile, anchored to the last day
//! - Mode title and subtitle above the plot
//! - Bottom legend; text only once a font has been registered (`ab_glyph` does
//!   not discover system fonts)

pub mod fill;
pub mod legend;
pub mod scale;
pub mod text;
pub mod util;

use crate::error::UsageError;
use crate::gradient::GradientConfig;
use crate::overlay::{RgbBuffer, apply_missing_data_overlay};
use crate::processor::{ChartState, fill_style};
use crate::responsive::{ResponsiveProfile, responsive_profile, show_tick_label};
use anyhow::{Context, Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use legend::{LegendItem, draw_legend, legend_height};
use scale::{CategoryScale, ChartArea, LinearScale, RenderContext};
use util::{
    Y_INTERVALS, compute_left_label_area_px, format_y_tick, nice_axis_max, to_plotters,
    to_plotters_rgb,
};

/// Outer margin around the plot, in pixels.
const MARGIN: i32 = 16;
/// Gutter left of the plot when no tick labels are drawn.
const BARE_GUTTER: i32 = 8;
const TICK_LABEL_GAP: i32 = 6;
const TITLE_GAP: i32 = 4;

/// Canvas color; the overlay leaves it untouched.
const BACKGROUND: [u8; 3] = [255, 255, 255];

const GRID_COLOR: RGBAColor = RGBAColor(0, 0, 0, 0.1);
const AXIS_COLOR: RGBColor = RGBColor(160, 160, 160);
const LABEL_COLOR: RGBColor = RGBColor(102, 102, 102);
const TITLE_COLOR: RGBColor = RGBColor(51, 51, 51);

static FONT_REGISTERED: AtomicBool = AtomicBool::new(false);

/// Register a TrueType file as the `sans-serif` family used for every label.
///
/// The font bytes are leaked: plotters keeps a `'static` reference for the
/// rest of the process.
pub fn register_font_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("read font {}", path.display()))?;
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, bytes)
        .map_err(|_| anyhow!("not a usable font file: {}", path.display()))?;
    FONT_REGISTERED.store(true, Ordering::Relaxed);
    log::debug!("registered font {}", path.display());
    Ok(())
}

pub fn fonts_registered() -> bool {
    FONT_REGISTERED.load(Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub gradient: GradientConfig,
    /// Locale tag for value-axis labels (see [`util::map_locale`]).
    pub locale: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            gradient: GradientConfig::default(),
            locale: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub width: u32,
    pub height: u32,
    pub rgb: RgbBuffer,
    pub profile: ResponsiveProfile,
    /// Plot rectangle the data was mapped into.
    pub area: ChartArea,
    /// Number of grayscale bands applied by the overlay pass.
    pub overlay_regions: usize,
}

/// Draw the chart for the state's current mode and visibility.
pub fn render_chart(state: &ChartState, opts: &RenderOptions) -> Result<RenderedChart> {
    let (width, height) = (opts.width, opts.height);
    if width == 0 || height == 0 {
        return Err(UsageError::NoSurface { width, height }.into());
    }

    let labels = state.chart_labels();
    let datasets = state.processed();
    let visible = state.visibility();
    let profile = responsive_profile(labels.len(), width as f64);
    let with_text = fonts_registered();
    if !with_text {
        log::info!("no font registered, drawing chart without text");
    }

    // The value range only depends on the data, so probe it before laying out.
    let probe = RenderContext {
        area: ChartArea::new(0.0, 0.0, 1.0, 1.0),
        x: CategoryScale::new(0.0, 1.0, labels.len()),
        y: LinearScale::new(0.0, 1.0, 0.0, 1.0),
        datasets: &datasets,
        visible,
    };
    let (y_max, y_step) = nice_axis_max(probe.max_stacked_total());

    let tick_px = profile.font_sizes.axis_ticks;
    let left_gutter = if with_text {
        compute_left_label_area_px(y_step, tick_px, &opts.locale) as i32
    } else {
        BARE_GUTTER
    };
    let bottom_gutter = if with_text {
        tick_px as i32 + 2 * TICK_LABEL_GAP
    } else {
        BARE_GUTTER
    };
    let items: Vec<LegendItem> = state
        .datasets()
        .iter()
        .enumerate()
        .map(|(i, s)| LegendItem {
            label: s.label.clone(),
            color: s.color,
            hidden: !visible.get(i).copied().unwrap_or(true),
        })
        .collect();
    let legend_px = profile.font_sizes.legend;
    let legend_h = legend_height(&items, width as i32, legend_px, with_text);
    let title_h = title_block_height(&profile, with_text);

    let area = ChartArea::new(
        (MARGIN + left_gutter) as f64,
        (MARGIN + title_h) as f64,
        (width as i32 - MARGIN) as f64,
        (height as i32 - MARGIN - bottom_gutter - legend_h) as f64,
    );
    if area.width() < 1.0 || area.height() < 1.0 {
        return Err(anyhow!("surface {width}x{height} leaves no room for the plot"));
    }
    let ctx = RenderContext {
        area,
        x: CategoryScale::new(area.left, area.right, labels.len()),
        y: LinearScale::new(area.top, area.bottom, 0.0, y_max),
        datasets: &datasets,
        visible,
    };

    let mut buf = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        let [r, g, b] = BACKGROUND;
        root.fill(&RGBColor(r, g, b)).map_err(|e| anyhow!("{:?}", e))?;

        draw_grid(&root, &ctx, y_step)?;

        // Top of the stack first, so lower series blend over it.
        let mut draw_order: Vec<usize> = (0..datasets.len()).filter(|i| ctx.is_visible(*i)).collect();
        draw_order.sort_by_key(|i| std::cmp::Reverse(datasets[*i].order.unwrap_or(0)));
        for &idx in &draw_order {
            if datasets[idx].line.fill {
                let style = fill_style(&ctx, idx, &opts.gradient);
                fill::fill_series_area(&root, &ctx, idx, &style)?;
            }
        }
        for &idx in &draw_order {
            draw_series_line(&root, &ctx, idx)?;
        }

        if with_text {
            draw_title(&root, state, &profile, width)?;
            draw_tick_labels(&root, &ctx, &labels, &profile, y_step, &opts.locale)?;
        }
        if legend_h > 0 {
            let (_, legend_area) = root.split_vertically(height as i32 - legend_h);
            draw_legend(&legend_area, &items, legend_px, with_text)?;
        }
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }

    let mut rgb = RgbBuffer::from_raw(width, height, buf)?.with_background(BACKGROUND);
    let overlay_regions = apply_missing_data_overlay(&mut rgb, &ctx);
    log::debug!(
        "rendered {}x{} chart: {} series, {} overlay regions",
        width,
        height,
        datasets.len(),
        overlay_regions
    );

    Ok(RenderedChart {
        width,
        height,
        rgb,
        profile,
        area,
        overlay_regions,
    })
}

/// Title plus subtitle lines; nothing is reserved when text cannot be drawn.
fn title_block_height(profile: &ResponsiveProfile, with_text: bool) -> i32 {
    if !with_text {
        return 0;
    }
    let fonts = profile.font_sizes;
    (fonts.axis_title + 2) as i32 + TITLE_GAP + fonts.axis_ticks as i32 + 2 * TITLE_GAP
}

fn draw_title<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    state: &ChartState,
    profile: &ResponsiveProfile,
    width: u32,
) -> Result<()> {
    let fonts = profile.font_sizes;
    let title_px = fonts.axis_title + 2;
    let title_style = TextStyle::from((FontFamily::SansSerif, title_px))
        .color(&TITLE_COLOR)
        .pos(Pos::new(HPos::Center, VPos::Top));
    let subtitle_style = TextStyle::from((FontFamily::SansSerif, fonts.axis_ticks))
        .color(&LABEL_COLOR)
        .pos(Pos::new(HPos::Center, VPos::Top));
    let center_x = width as i32 / 2;
    root.draw(&Text::new(state.title(), (center_x, MARGIN), title_style))
        .map_err(|e| anyhow!("{:?}", e))?;
    let subtitle_y = MARGIN + title_px as i32 + TITLE_GAP;
    root.draw(&Text::new(state.subtitle(), (center_x, subtitle_y), subtitle_style))
        .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_grid<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    ctx: &RenderContext<'_>,
    y_step: f64,
) -> Result<()> {
    let (left, right) = (ctx.area.left as i32, ctx.area.right as i32);
    for i in 1..=Y_INTERVALS {
        let y = ctx.y.pixel_for_value(i as f64 * y_step).round() as i32;
        root.draw(&PathElement::new(vec![(left, y), (right, y)], GRID_COLOR.stroke_width(1)))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    let bottom = ctx.area.bottom.round() as i32;
    root.draw(&PathElement::new(
        vec![(left, bottom), (right, bottom)],
        AXIS_COLOR.stroke_width(1),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Straight segments between consecutive drawable points, colored per segment.
fn draw_series_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    ctx: &RenderContext<'_>,
    idx: usize,
) -> Result<()> {
    let series = &ctx.datasets[idx];
    let base = to_plotters_rgb(series.color);
    for i in 1..series.len() {
        if series.value(i - 1).is_none() || series.value(i).is_none() {
            continue;
        }
        let (x0, y0) = ctx.stacked_point(idx, i - 1);
        let (x1, y1) = ctx.stacked_point(idx, i);
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            continue;
        }
        let color = series.segment_color(i - 1, i).map_or(base, to_plotters);
        root.draw(&PathElement::new(
            vec![
                (x0.round() as i32, y0.round() as i32),
                (x1.round() as i32, y1.round() as i32),
            ],
            color.stroke_width(series.line.border_width),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

fn draw_tick_labels<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    ctx: &RenderContext<'_>,
    labels: &[String],
    profile: &ResponsiveProfile,
    y_step: f64,
    locale: &str,
) -> Result<()> {
    let font_px = profile.font_sizes.axis_ticks;
    let x_style = TextStyle::from((FontFamily::SansSerif, font_px))
        .color(&LABEL_COLOR)
        .pos(Pos::new(HPos::Center, VPos::Top));
    let y_style = TextStyle::from((FontFamily::SansSerif, font_px))
        .color(&LABEL_COLOR)
        .pos(Pos::new(HPos::Right, VPos::Center));

    let label_y = ctx.area.bottom as i32 + TICK_LABEL_GAP;
    for (i, label) in labels.iter().enumerate() {
        if label.is_empty() || !show_tick_label(i, labels.len(), profile.tick_interval) {
            continue;
        }
        let x = ctx.x.pixel_for_index(i).round() as i32;
        root.draw(&Text::new(label.as_str(), (x, label_y), x_style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    let label_x = ctx.area.left as i32 - TICK_LABEL_GAP;
    for i in 0..=Y_INTERVALS {
        let v = i as f64 * y_step;
        let y = ctx.y.pixel_for_value(v).round() as i32;
        let text = format_y_tick(v, y_step, locale);
        root.draw(&Text::new(text, (label_x, y), y_style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// Write the rendered pixels as a PNG file.
pub fn save_png<P: AsRef<Path>>(chart: &RenderedChart, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let mut backend = BitMapBackend::new(path, (chart.width, chart.height));
    backend
        .blit_bitmap((0, 0), (chart.width, chart.height), chart.rgb.as_raw())
        .map_err(|e| anyhow!("{:?}", e))?;
    backend
        .present()
        .map_err(|e| anyhow!("write {}: {:?}", path.display(), e))?;
    Ok(())
}
