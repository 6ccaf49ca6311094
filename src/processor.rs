//! Turns raw datasets into render-ready series and owns the interactive chart state.

use crate::calendar::{current_period, month_labels};
use crate::color::{Rgb, Rgba};
use crate::config::{LINE_STYLE, LineStyle, MISSING_DATA_STYLE, sample_datasets};
use crate::error::UsageError;
use crate::export;
use crate::gradient::{FillStyle, GradientConfig, trend_gradient};
use crate::interpolate::interpolate_missing;
use crate::models::{DisplayMode, ResourceKind, Series, UsageInput};
use crate::table::{UsageTable, build_table};
use crate::tooltip::{Tooltip, tooltip_model};
use crate::transform::{LOW_DATA_THRESHOLD, center_data, center_labels, data_for_mode};
use crate::viz::scale::RenderContext;
use anyhow::{Context, Result};
use std::collections::BTreeSet;

/// A dataset ready for drawing: gaps filled, missing indices attached, stacking order set.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedSeries {
    pub label: String,
    pub resource_kind: ResourceKind,
    /// Interpolated values. `None` only appears as centering padding.
    pub values: Vec<Option<f64>>,
    pub missing: BTreeSet<usize>,
    pub color: Rgb,
    /// Stacking order; a series stacks on top of every visible series with a lower or equal order.
    pub order: Option<i32>,
    pub line: LineStyle,
}

/// Interpolate `series` and attach drawing metadata.
///
/// Order is the reverse of the input index, so the first dataset ends up on top
/// of the stack.
pub fn process_dataset(series: &Series, idx: usize, count: usize) -> ProcessedSeries {
    let filled = interpolate_missing(&series.raw_values);
    ProcessedSeries {
        label: series.label.clone(),
        resource_kind: series.resource_kind.clone(),
        values: filled.values.into_iter().map(Some).collect(),
        missing: filled.missing,
        color: series.color,
        order: Some(count as i32 - idx as i32),
        line: LINE_STYLE,
    }
}

pub fn process_datasets(series: &[Series]) -> Vec<ProcessedSeries> {
    series
        .iter()
        .enumerate()
        .map(|(idx, s)| process_dataset(s, idx, series.len()))
        .collect()
}

impl ProcessedSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied().flatten()
    }

    pub fn is_missing(&self, i: usize) -> bool {
        self.missing.contains(&i)
    }

    /// Pad a short series (1–3 samples) with `None` on both sides.
    /// Missing indices shift along with the values.
    pub fn centered(mut self) -> Self {
        let n = self.values.len();
        if n == 0 || n >= LOW_DATA_THRESHOLD {
            return self;
        }
        self.values = center_data(&self.values)
            .into_iter()
            .map(Option::flatten)
            .collect();
        self.missing = self.missing.iter().map(|i| i + 1).collect();
        self
    }

    /// Override color for the segment `i0 -> i1`: the neutral missing-data color when
    /// either end was interpolated, `None` to keep the series color.
    pub fn segment_color(&self, i0: usize, i1: usize) -> Option<Rgba> {
        if self.is_missing(i0) || self.is_missing(i1) {
            Some(MISSING_DATA_STYLE.segment_color)
        } else {
            None
        }
    }

    /// Color for a hovered point: grayscale on interpolated days.
    pub fn hover_color(&self, index: usize) -> Rgb {
        if self.is_missing(index) {
            self.color.to_grayscale()
        } else {
            self.color
        }
    }
}

/// Fill for dataset `series_idx`, bound to the trend gradient of the current stack.
pub fn fill_style(ctx: &RenderContext<'_>, series_idx: usize, cfg: &GradientConfig) -> FillStyle {
    match ctx.datasets.get(series_idx) {
        Some(s) => trend_gradient(ctx, series_idx, s.color, cfg),
        None => FillStyle::Solid(Rgba::TRANSPARENT_WHITE),
    }
}

/// The bound datasets plus the two pieces of interactive state: display mode and
/// per-series visibility. Every derived view is recomputed on request.
#[derive(Debug, Clone)]
pub struct ChartState {
    year: i32,
    month0: u32,
    labels: Vec<String>,
    datasets: Vec<Series>,
    mode: DisplayMode,
    visible: Vec<bool>,
}

impl ChartState {
    pub fn new(year: i32, month0: u32, datasets: Vec<Series>) -> Result<Self, UsageError> {
        if month0 > 11 {
            return Err(UsageError::InvalidMonth(month0));
        }
        let visible = vec![true; datasets.len()];
        Ok(Self {
            year,
            month0,
            labels: month_labels(year, month0),
            datasets,
            mode: DisplayMode::default(),
            visible,
        })
    }

    /// Build from the host contract; no datasets selects the built-in sample set.
    pub fn from_input(input: UsageInput) -> Result<Self> {
        let (cur_year, cur_month) = current_period();
        let year = input.year.unwrap_or(cur_year);
        let month0 = input.month.unwrap_or(cur_month);
        if month0 > 11 {
            return Err(UsageError::InvalidMonth(month0).into());
        }
        let datasets = match input.datasets {
            Some(records) => records
                .into_iter()
                .map(|r| {
                    let label = r.label.clone();
                    Series::try_from(r).with_context(|| format!("dataset `{label}`"))
                })
                .collect::<Result<Vec<_>>>()?,
            None => {
                log::info!("no datasets supplied, using sample data for {year}-{:02}", month0 + 1);
                sample_datasets(year, month0)
            }
        };
        Ok(Self::new(year, month0, datasets)?)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    /// One label per calendar day of the period.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn datasets(&self) -> &[Series] {
        &self.datasets
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Chart heading for the current mode.
    pub fn title(&self) -> &'static str {
        self.mode.title()
    }

    pub fn subtitle(&self) -> &'static str {
        self.mode.subtitle()
    }

    pub fn visibility(&self) -> &[bool] {
        &self.visible
    }

    /// Returns `true` when the mode changed and views need a redraw.
    pub fn switch_mode(&mut self, mode: DisplayMode) -> bool {
        if self.mode == mode {
            return false;
        }
        log::debug!("display mode {} -> {}", self.mode, mode);
        self.mode = mode;
        true
    }

    pub fn set_visible(&mut self, idx: usize, visible: bool) {
        if let Some(v) = self.visible.get_mut(idx) {
            *v = visible;
        }
    }

    /// Flip visibility of dataset `idx`; returns the new state.
    pub fn toggle_visibility(&mut self, idx: usize) -> Option<bool> {
        let v = self.visible.get_mut(idx)?;
        *v = !*v;
        Some(*v)
    }

    /// Hide every dataset labelled `label`; returns whether any matched.
    pub fn hide_label(&mut self, label: &str) -> bool {
        let mut hit = false;
        for (s, v) in self.datasets.iter().zip(self.visible.iter_mut()) {
            if s.label == label {
                *v = false;
                hit = true;
            }
        }
        hit
    }

    /// Datasets transformed for the current mode (absences preserved).
    pub fn current_datasets(&self) -> Vec<Series> {
        data_for_mode(&self.datasets, self.mode)
    }

    /// Longest dataset length.
    pub fn data_len(&self) -> usize {
        self.datasets.iter().map(Series::len).max().unwrap_or(0)
    }

    pub fn is_low_data(&self) -> bool {
        self.data_len() < LOW_DATA_THRESHOLD
    }

    /// X-axis labels, centered when there are fewer than four samples.
    pub fn chart_labels(&self) -> Vec<String> {
        center_labels(&self.labels, self.data_len())
    }

    pub fn processed(&self) -> Vec<ProcessedSeries> {
        let processed = process_datasets(&self.current_datasets());
        if self.is_low_data() {
            processed.into_iter().map(ProcessedSeries::centered).collect()
        } else {
            processed
        }
    }

    pub fn table(&self) -> UsageTable {
        build_table(&self.labels, &self.current_datasets())
    }

    pub fn csv(&self) -> Result<String> {
        export::csv_document(&self.labels, &self.current_datasets())
    }

    pub fn export_file_name(&self) -> String {
        export::export_file_name(self.mode)
    }

    /// Hover tooltip at chart index `index` (chart coordinates, i.e. after centering).
    pub fn tooltip(&self, index: usize) -> Option<Tooltip> {
        let labels = self.chart_labels();
        let title = labels.get(index)?;
        let processed = self.processed();
        let visible: Vec<&ProcessedSeries> = processed
            .iter()
            .zip(&self.visible)
            .filter_map(|(s, v)| v.then_some(s))
            .collect();
        Some(tooltip_model(title, &visible, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(label: &str, values: Vec<Option<f64>>) -> Series {
        Series::new(label, ResourceKind::Cpu, values, Rgb::new(0, 192, 232))
    }

    #[test]
    fn order_reverses_input_index() {
        let input = vec![
            series("a", vec![Some(1.0)]),
            series("b", vec![Some(1.0)]),
            series("c", vec![Some(1.0)]),
        ];
        let orders: Vec<_> = process_datasets(&input).iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![Some(3), Some(2), Some(1)]);
    }

    #[test]
    fn segment_and_hover_colors_flag_missing() {
        let p = process_dataset(&series("a", vec![Some(1.0), None, Some(3.0), Some(4.0)]), 0, 1);
        assert_eq!(p.segment_color(0, 1), Some(MISSING_DATA_STYLE.segment_color));
        assert_eq!(p.segment_color(1, 2), Some(MISSING_DATA_STYLE.segment_color));
        assert_eq!(p.segment_color(2, 3), None);
        assert_eq!(p.hover_color(1), Rgb::new(0, 192, 232).to_grayscale());
        assert_eq!(p.hover_color(2), Rgb::new(0, 192, 232));
    }

    #[test]
    fn centering_shifts_missing_indices() {
        let p = process_dataset(&series("a", vec![Some(1.0), None]), 0, 1).centered();
        assert_eq!(p.values, vec![None, Some(1.0), Some(1.0), None]);
        assert!(p.is_missing(2));
        assert!(!p.is_missing(1));
    }

    #[test]
    fn mode_switch_reports_change_once() {
        let mut st = ChartState::new(2024, 5, vec![series("a", vec![Some(1.0); 30])]).unwrap();
        assert!(!st.switch_mode(DisplayMode::Cumulative));
        assert!(st.switch_mode(DisplayMode::Daily));
        assert!(!st.switch_mode(DisplayMode::Daily));
        assert_eq!(st.export_file_name(), "su_usage_daily.csv");
        assert_eq!(st.title(), "SU Cost - Daily");
        assert_eq!(st.subtitle(), "Showing the daily cost for the last month");
    }

    #[test]
    fn visibility_toggles() {
        let mut st = ChartState::new(2024, 5, vec![series("a", vec![]), series("b", vec![])]).unwrap();
        assert_eq!(st.toggle_visibility(1), Some(false));
        assert_eq!(st.visibility(), &[true, false]);
        assert_eq!(st.toggle_visibility(5), None);
        assert!(st.hide_label("a"));
        assert_eq!(st.visibility(), &[false, false]);
    }

    #[test]
    fn invalid_month_rejected() {
        assert_eq!(
            ChartState::new(2024, 12, vec![]).unwrap_err(),
            UsageError::InvalidMonth(12)
        );
    }

    #[test]
    fn out_of_range_month_is_rejected_before_sample_fallback() {
        let err = ChartState::from_input(UsageInput {
            year: Some(2024),
            month: Some(u32::MAX),
            datasets: None,
        })
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<UsageError>(),
            Some(&UsageError::InvalidMonth(u32::MAX))
        );
    }

    #[test]
    fn missing_datasets_fall_back_to_samples() {
        let st = ChartState::from_input(UsageInput {
            year: Some(2024),
            month: Some(1),
            datasets: None,
        })
        .unwrap();
        assert_eq!(st.datasets().len(), 3);
        assert_eq!(st.data_len(), 29);
        assert_eq!(st.chart_labels().len(), 29);
    }
}
