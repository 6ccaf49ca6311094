//! Pixel mapping and the per-draw render context.
//!
//! A `RenderContext` is built fresh for every draw from the current layout,
//! visible datasets and stacking order; nothing here outlives a frame.

use crate::processor::ProcessedSeries;

/// Plot rectangle in surface pixels (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ChartArea {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        (self.right - self.left).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }
}

/// Category x axis with half-slot offset: index `i` sits in the middle of slot `i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryScale {
    pub left: f64,
    pub right: f64,
    pub count: usize,
}

impl CategoryScale {
    pub fn new(left: f64, right: f64, count: usize) -> Self {
        Self { left, right, count }
    }

    pub fn slot_width(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.right - self.left) / self.count as f64
        }
    }

    pub fn pixel_for_value(&self, index: f64) -> f64 {
        self.left + self.slot_width() * (index + 0.5)
    }

    pub fn pixel_for_index(&self, index: usize) -> f64 {
        self.pixel_for_value(index as f64)
    }
}

/// Linear value axis, `min` at `bottom` and `max` at `top`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub top: f64,
    pub bottom: f64,
    pub min: f64,
    pub max: f64,
}

impl LinearScale {
    pub fn new(top: f64, bottom: f64, min: f64, max: f64) -> Self {
        Self {
            top,
            bottom,
            min,
            max,
        }
    }

    pub fn pixel_for_value(&self, v: f64) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            return self.bottom;
        }
        self.bottom - (v - self.min) / range * (self.bottom - self.top)
    }
}

/// Everything a draw-time computation needs, passed explicitly.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub area: ChartArea,
    pub x: CategoryScale,
    pub y: LinearScale,
    pub datasets: &'a [ProcessedSeries],
    /// Per-dataset visibility; indices past the end count as visible.
    pub visible: &'a [bool],
}

impl RenderContext<'_> {
    pub fn is_visible(&self, idx: usize) -> bool {
        self.visible.get(idx).copied().unwrap_or(true)
    }

    /// Whether `other` sits at or below `current` in the stack.
    ///
    /// Uses the stacking order when both have one, the input index otherwise.
    pub fn stacks_under(&self, current: usize, other: usize) -> bool {
        let order = |i: usize| self.datasets.get(i).and_then(|s| s.order);
        match (order(other), order(current)) {
            (Some(o), Some(c)) => o <= c,
            _ => other <= current,
        }
    }

    /// Sum of the values at `index` of every visible dataset stacked at or below `current`.
    pub fn stacked_value(&self, current: usize, index: usize) -> f64 {
        self.datasets
            .iter()
            .enumerate()
            .filter(|(d, _)| self.is_visible(*d) && self.stacks_under(current, *d))
            .filter_map(|(_, s)| s.value(index))
            .sum()
    }

    /// Pixel position of the stacked value of `current` at `index`.
    pub fn stacked_point(&self, current: usize, index: usize) -> (f64, f64) {
        (
            self.x.pixel_for_index(index),
            self.y.pixel_for_value(self.stacked_value(current, index)),
        )
    }

    /// Largest stacked total over all visible datasets and indices.
    pub fn max_stacked_total(&self) -> f64 {
        let n = self.datasets.iter().map(ProcessedSeries::len).max().unwrap_or(0);
        (0..self.datasets.len())
            .filter(|d| self.is_visible(*d))
            .flat_map(|d| (0..n).map(move |i| (d, i)))
            .map(|(d, i)| self.stacked_value(d, i))
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }
}
