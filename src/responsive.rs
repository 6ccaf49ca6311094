//! Width-dependent tick spacing and font sizes.
//!
//! Recomputed from the current surface width every time labels are laid out;
//! nothing is cached across resizes.

use serde::Serialize;

/// Width assumed when the surface cannot report one.
pub const DEFAULT_CHART_WIDTH: f64 = 800.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontSizes {
    pub legend: u32,
    pub axis_ticks: u32,
    pub axis_title: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponsiveProfile {
    pub tick_interval: usize,
    pub font_sizes: FontSizes,
}

const fn fonts(legend: u32, axis_ticks: u32, axis_title: u32) -> FontSizes {
    FontSizes {
        legend,
        axis_ticks,
        axis_title,
    }
}

/// `(exclusive upper width, target tick count, font sizes)`, checked in order.
const BANDS: [(f64, usize, FontSizes); 5] = [
    (400.0, 4, fonts(9, 8, 9)),
    (576.0, 6, fonts(10, 9, 10)),
    (600.0, 6, fonts(11, 10, 11)),
    (768.0, 8, fonts(11, 10, 11)),
    (800.0, 8, fonts(12, 11, 12)),
];
const WIDE: (usize, FontSizes) = (10, fonts(12, 11, 12));

fn band(width: f64) -> (usize, FontSizes) {
    BANDS
        .iter()
        .find(|(upper, _, _)| width < *upper)
        .map(|(_, ticks, f)| (*ticks, *f))
        .unwrap_or(WIDE)
}

/// Show every `n`-th label: `ceil(total / target)` clamped to `[1, ceil(total / 3)]`.
pub fn tick_interval(total_labels: usize, width: f64) -> usize {
    let (target, _) = band(width);
    let interval = total_labels.div_ceil(target);
    interval.min(total_labels.div_ceil(3)).max(1)
}

pub fn font_sizes(width: f64) -> FontSizes {
    band(width).1
}

pub fn responsive_profile(total_labels: usize, width: f64) -> ResponsiveProfile {
    ResponsiveProfile {
        tick_interval: tick_interval(total_labels, width),
        font_sizes: font_sizes(width),
    }
}

/// Whether the tick at `index` gets a label.
///
/// Counting backwards from the last index, so the most recent day is always
/// labelled and the spacing is anchored to "now".
pub fn show_tick_label(index: usize, total_labels: usize, interval: usize) -> bool {
    let Some(last) = total_labels.checked_sub(1) else {
        return false;
    };
    index <= last && (last - index) % interval.max(1) == 0
}

/// Tick text for `index` at the given width: the label, or `""` when skipped.
pub fn tick_label(labels: &[String], index: usize, width: f64) -> String {
    let interval = tick_interval(labels.len(), width);
    if show_tick_label(index, labels.len(), interval) {
        labels[index].clone()
    } else {
        String::new()
    }
}
