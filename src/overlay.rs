//! Post-draw grayscale pass over interpolated spans.
//!
//! Works on any canvas-like surface that can hand back and accept rectangles
//! of RGBA pixels. Layout is never touched; only already-rendered pixels change.

use crate::config::MISSING_DATA_STYLE;
use crate::error::UsageError;
use crate::models::MissingRegion;
use crate::viz::scale::RenderContext;
use std::collections::BTreeSet;

/// A rectangle of RGBA8 pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ImageData {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }
}

/// Canvas-like pixel readback.
///
/// Reads outside the surface come back as transparent black; writes outside it
/// are dropped.
pub trait PixelSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn get_image_data(&self, x: i64, y: i64, width: u32, height: u32) -> ImageData;
    fn put_image_data(&mut self, image: &ImageData, x: i64, y: i64);
}

/// Opaque RGB8 buffer, the layout the bitmap backend renders into.
///
/// With a background color set, pixels of exactly that color read back as
/// transparent, so only drawn content is treated as painted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
    background: Option<[u8; 3]>,
}

impl RgbBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
            background: None,
        }
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, UsageError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(UsageError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
            background: None,
        })
    }

    /// Treat `color` as unpainted canvas.
    pub fn with_background(mut self, color: [u8; 3]) -> Self {
        self.background = Some(color);
        self
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 3)
    }
}

impl PixelSurface for RgbBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn get_image_data(&self, x: i64, y: i64, width: u32, height: u32) -> ImageData {
        let mut out = ImageData::new(width, height);
        for row in 0..height as i64 {
            for col in 0..width as i64 {
                if let Some(src) = self.offset(x + col, y + row) {
                    let dst = ((row * width as i64 + col) * 4) as usize;
                    let px = &self.data[src..src + 3];
                    out.data[dst..dst + 3].copy_from_slice(px);
                    out.data[dst + 3] = if self.background.is_some_and(|bg| bg.as_slice() == px) {
                        0
                    } else {
                        255
                    };
                }
            }
        }
        out
    }

    fn put_image_data(&mut self, image: &ImageData, x: i64, y: i64) {
        for row in 0..image.height as i64 {
            for col in 0..image.width as i64 {
                if let Some(dst) = self.offset(x + col, y + row) {
                    let src = ((row * image.width as i64 + col) * 4) as usize;
                    self.data[dst..dst + 3].copy_from_slice(&image.data[src..src + 3]);
                }
            }
        }
    }
}

/// Maximal runs of missing indices, each widened by one index on both sides
/// (clamped to `0..len`) so the grayscale band starts and ends on real samples.
pub fn missing_regions(missing: &BTreeSet<usize>, len: usize) -> Vec<MissingRegion> {
    let Some(last) = len.checked_sub(1) else {
        return Vec::new();
    };
    let mut regions: Vec<MissingRegion> = Vec::new();
    let mut current: Option<MissingRegion> = None;
    for i in 0..len {
        if missing.contains(&i) {
            current = Some(match current {
                Some(r) => MissingRegion { end: i, ..r },
                None => MissingRegion {
                    start: i.saturating_sub(1),
                    end: i,
                },
            });
        } else if let Some(r) = current.take() {
            regions.push(MissingRegion {
                end: (r.end + 1).min(last),
                ..r
            });
        }
    }
    if let Some(r) = current {
        regions.push(MissingRegion {
            end: (r.end + 1).min(last),
            ..r
        });
    }
    regions
}

/// Replace every non-transparent pixel with its luminance times `darken`.
pub fn desaturate(image: &mut ImageData, darken: f64) {
    for px in image.data.chunks_exact_mut(4) {
        if px[3] == 0 {
            continue;
        }
        let gray = (0.299 * px[0] as f64 + 0.587 * px[1] as f64 + 0.114 * px[2] as f64) * darken;
        let gray = gray.round().clamp(0.0, 255.0) as u8;
        px[0] = gray;
        px[1] = gray;
        px[2] = gray;
    }
}

/// Gray out the plot band under every missing region of every visible dataset.
///
/// Returns how many regions were applied; zero-width regions are skipped.
pub fn apply_missing_data_overlay<S: PixelSurface + ?Sized>(
    surface: &mut S,
    ctx: &RenderContext<'_>,
) -> usize {
    let mut regions: Vec<MissingRegion> = Vec::new();
    for (idx, series) in ctx.datasets.iter().enumerate() {
        if !ctx.is_visible(idx) || series.missing.is_empty() {
            continue;
        }
        regions.extend(missing_regions(&series.missing, series.len()));
    }

    let top = ctx.area.top.floor() as i64;
    let height = ctx.area.height().ceil() as u32;
    let mut applied = 0;
    for MissingRegion { start, end } in regions {
        let start_x = ctx.x.pixel_for_index(start);
        let width = ctx.x.pixel_for_index(end) - start_x;
        if width <= 0.0 || height == 0 {
            log::debug!("skipping empty missing-data region {start}..={end}");
            continue;
        }
        let x = start_x.floor() as i64;
        let w = (start_x + width).ceil() as i64 - x;
        let mut image = surface.get_image_data(x, top, w as u32, height);
        desaturate(&mut image, MISSING_DATA_STYLE.darken);
        surface.put_image_data(&image, x, top);
        applied += 1;
    }
    applied
}
