//! Chart styling constants, per-resource palette, and the fallback sample datasets.

use crate::calendar::days_in_month;
use crate::color::{Rgb, Rgba};
use crate::models::{ResourceKind, Series};

/// Palette in display order: CPU, GPU H100, GPU V100, GPU A100, storage, network.
pub const COLOR_PALETTE: [Rgb; 6] = [
    Rgb::new(0, 192, 232),
    Rgb::new(117, 213, 92),
    Rgb::new(255, 146, 138),
    Rgb::new(255, 206, 86),
    Rgb::new(153, 102, 255),
    Rgb::new(255, 159, 64),
];

/// Palette entry for a resource kind; unknown kinds cycle through the palette by `idx`.
pub fn dataset_color(kind: &ResourceKind, idx: usize) -> Rgb {
    match kind {
        ResourceKind::Cpu => COLOR_PALETTE[0],
        ResourceKind::GpuH100 => COLOR_PALETTE[1],
        ResourceKind::GpuV100 => COLOR_PALETTE[2],
        ResourceKind::GpuA100 => COLOR_PALETTE[3],
        ResourceKind::Storage => COLOR_PALETTE[4],
        ResourceKind::Network => COLOR_PALETTE[5],
        ResourceKind::Other(_) => COLOR_PALETTE[idx % COLOR_PALETTE.len()],
    }
}

/// Line drawing properties attached to every processed dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub fill: bool,
    pub border_width: u32,
}

pub const LINE_STYLE: LineStyle = LineStyle {
    fill: true,
    border_width: 2,
};

/// Colors used to flag interpolated data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissingDataStyle {
    /// Flat color for any line segment touching a missing index.
    pub segment_color: Rgba,
    /// Luminance multiplier applied by the grayscale overlay.
    pub darken: f64,
}

pub const MISSING_DATA_STYLE: MissingDataStyle = MissingDataStyle {
    segment_color: Rgba {
        r: 70,
        g: 70,
        b: 70,
        a: 0.7,
    },
    darken: 0.85,
};

/// Whether a missing dataset collection falls back to [`sample_datasets`].
pub const USE_SAMPLE_DATA: bool = true;

const SAMPLE_CPU: [f64; 30] = [
    2.0, 2.3, 2.5, 2.9, 3.2, 3.6, 4.1, 4.5, 4.8, 5.2, 5.7, 6.1, 6.5, 7.0, 7.4, 7.9, 8.3, 8.8, 9.2,
    9.7, 10.1, 10.6, 11.0, 11.5, 12.0, 12.4, 12.9, 13.3, 13.8, 14.2,
];
const SAMPLE_H100: [f64; 30] = [
    1.0, 1.8, 2.5, 3.4, 4.2, 5.0, 5.9, 6.7, 7.5, 8.4, 9.2, 10.0, 10.9, 11.7, 12.5, 13.4, 14.2,
    15.0, 15.9, 16.7, 17.5, 18.4, 19.2, 20.0, 20.9, 21.7, 22.5, 23.4, 24.2, 25.0,
];
const SAMPLE_V100: [f64; 30] = [
    5.0, 5.5, 6.0, 6.5, 7.0, 7.5, 8.0, 8.5, 9.0, 9.5, 10.0, 10.5, 11.0, 11.5, 12.0, 12.5, 13.0,
    13.5, 14.0, 14.5, 15.0, 15.5, 16.0, 16.5, 17.0, 17.5, 18.0, 18.5, 19.0, 19.5,
];

/// Development/demo series for a period, truncated to the month's length.
///
/// Returns an empty set when [`USE_SAMPLE_DATA`] is off.
pub fn sample_datasets(year: i32, month0: u32) -> Vec<Series> {
    if !USE_SAMPLE_DATA {
        return Vec::new();
    }
    let days = days_in_month(year, month0) as usize;
    let make = |label: &str, kind: ResourceKind, data: &[f64]| {
        let color = dataset_color(&kind, 0);
        let values = data.iter().take(days).copied().map(Some).collect();
        Series::new(label, kind, values, color)
    };
    vec![
        make("CPU", ResourceKind::Cpu, &SAMPLE_CPU),
        make("GPU H100", ResourceKind::GpuH100, &SAMPLE_H100),
        make("GPU V100", ResourceKind::GpuV100, &SAMPLE_V100),
    ]
}
