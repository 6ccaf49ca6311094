use su_usage::color::Rgb;
use su_usage::gradient::{FillStyle, GradientConfig};
use su_usage::models::MissingRegion;
use su_usage::overlay::missing_regions;
use su_usage::processor::fill_style;
use su_usage::table::Cell;
use su_usage::viz::scale::{CategoryScale, ChartArea, LinearScale, RenderContext};
use su_usage::{ChartState, DisplayMode, ResourceKind, Series, UsageInput};

fn june_with_gap() -> ChartState {
    let mut values: Vec<Option<f64>> = (1..=30).map(|d| Some(d as f64)).collect();
    values[2] = None;
    let cpu = Series::new("CPU", ResourceKind::Cpu, values, Rgb::new(0, 192, 232));
    let gpu = Series::new(
        "GPU H100",
        ResourceKind::GpuH100,
        (1..=30).map(|d| Some(2.0 * d as f64)).collect(),
        Rgb::new(255, 193, 7),
    );
    ChartState::new(2025, 5, vec![cpu, gpu]).unwrap()
}

#[test]
fn gap_is_interpolated_flagged_and_grayed() {
    let state = june_with_gap();
    assert_eq!(state.labels().len(), 30);
    let processed = state.processed();
    let cpu = &processed[0];
    assert_eq!(cpu.value(2), Some(3.0));
    assert!(cpu.is_missing(2));
    assert_eq!(cpu.missing.len(), 1);
    assert_eq!(
        missing_regions(&cpu.missing, cpu.len()),
        vec![MissingRegion { start: 1, end: 3 }]
    );
    // segments into and out of the gap use the neutral color
    assert!(cpu.segment_color(1, 2).is_some());
    assert!(cpu.segment_color(2, 3).is_some());
    assert!(cpu.segment_color(3, 4).is_none());
    assert_eq!(cpu.hover_color(2), Rgb::new(0, 192, 232).to_grayscale());
}

#[test]
fn table_keeps_raw_gap() {
    let state = june_with_gap();
    let table = state.table();
    assert_eq!(table.rows[2].cells[0], Cell::Missing);
    assert_eq!(table.rows[2].cells[1], Cell::Value(6.0));
    assert!(table.rows[2].total.is_missing());
    assert_eq!(table.rows[3].total, Cell::Value(12.0));
}

#[test]
fn daily_mode_propagates_absence() {
    let mut state = june_with_gap();
    assert!(state.switch_mode(DisplayMode::Daily));
    assert!(!state.switch_mode(DisplayMode::Daily));
    let daily = state.current_datasets();
    assert_eq!(daily[0].raw_values[1], Some(1.0));
    assert_eq!(daily[0].raw_values[2], None);
    assert_eq!(daily[0].raw_values[3], None);
    assert_eq!(daily[1].raw_values[3], Some(2.0));
    assert_eq!(state.export_file_name(), "su_usage_daily.csv");
}

#[test]
fn visibility_changes_the_stack_under_a_series() {
    let mut state = june_with_gap();
    let area = ChartArea::new(40.0, 16.0, 784.0, 330.0);
    let cfg = GradientConfig::default();
    let start_of = |state: &ChartState| {
        let datasets = state.processed();
        let ctx = RenderContext {
            area,
            x: CategoryScale::new(area.left, area.right, 30),
            y: LinearScale::new(area.top, area.bottom, 0.0, 120.0),
            datasets: &datasets,
            visible: state.visibility(),
        };
        match fill_style(&ctx, 0, &cfg) {
            FillStyle::Linear(g) => g.start,
            FillStyle::Solid(_) => panic!("expected a gradient"),
        }
    };
    let stacked = start_of(&state);
    assert_eq!(state.toggle_visibility(1), Some(false));
    let alone = start_of(&state);
    // without the GPU series underneath the CPU fill starts lower on screen
    assert!(alone.1 > stacked.1);
}

#[test]
fn short_months_are_centered() {
    let s = Series::new("CPU", ResourceKind::Cpu, vec![Some(1.0), None], Rgb::new(0, 0, 0));
    let state = ChartState::new(2025, 0, vec![s]).unwrap();
    assert!(state.is_low_data());
    assert_eq!(state.chart_labels(), vec!["", "Jan 1", "Jan 2", ""]);
    let p = &state.processed()[0];
    assert_eq!(p.values, vec![None, Some(1.0), Some(1.0), None]);
    assert!(p.is_missing(2));
    let tip = state.tooltip(2).unwrap();
    assert_eq!(tip.title, "Jan 2");
    assert!(tip.rows[0].missing);
}

#[test]
fn missing_datasets_fall_back_to_samples() {
    let input = UsageInput {
        year: Some(2024),
        month: Some(1),
        datasets: None,
    };
    let state = ChartState::from_input(input).unwrap();
    assert_eq!(state.labels().len(), 29);
    assert_eq!(state.datasets().len(), 3);
    assert!(state.datasets().iter().all(|s| s.len() == 29));
}

#[test]
fn invalid_month_is_rejected() {
    let input = UsageInput {
        year: Some(2024),
        month: Some(12),
        datasets: Some(Vec::new()),
    };
    assert!(ChartState::from_input(input).is_err());
}
