use su_usage::color::Rgb;
use su_usage::viz::scale::CategoryScale;
use su_usage::viz::{self, RenderOptions, RenderedChart};
use su_usage::{ChartState, ResourceKind, Series};
use tempfile::tempdir;

fn state_with_gap() -> ChartState {
    let mut values: Vec<Option<f64>> = (1..=30).map(|d| Some(d as f64)).collect();
    values[10] = None;
    values[11] = None;
    let cpu = Series::new("CPU", ResourceKind::Cpu, values, Rgb::new(0, 192, 232));
    ChartState::new(2025, 5, vec![cpu]).unwrap()
}

fn column_is_gray(chart: &RenderedChart, x: u32) -> bool {
    let (top, bottom) = (chart.area.top as u32, chart.area.bottom as u32);
    (top..bottom).all(|y| {
        let [r, g, b] = chart.rgb.pixel(x, y).unwrap();
        r == g && g == b
    })
}

#[test]
fn interpolated_span_is_desaturated() {
    let chart = viz::render_chart(&state_with_gap(), &RenderOptions::default()).unwrap();
    assert_eq!(chart.overlay_regions, 1);
    let x = CategoryScale::new(chart.area.left, chart.area.right, 30);
    assert!(column_is_gray(&chart, x.pixel_for_index(10).round() as u32));
    assert!(column_is_gray(&chart, x.pixel_for_index(11).round() as u32));
    // real data keeps its color (at least the line itself)
    assert!(!column_is_gray(&chart, x.pixel_for_index(20).round() as u32));
}

#[test]
fn overlay_leaves_empty_canvas_white() {
    let chart = viz::render_chart(&state_with_gap(), &RenderOptions::default()).unwrap();
    let x = CategoryScale::new(chart.area.left, chart.area.right, 30);
    let y = chart.area.top as u32 + 2;
    let in_band = x.pixel_for_index(10).round() as u32;
    let outside = x.pixel_for_index(20).round() as u32;
    assert_eq!(chart.rgb.pixel(in_band, y), Some([255, 255, 255]));
    assert_eq!(chart.rgb.pixel(outside, y), Some([255, 255, 255]));
    // the fill just above the baseline is painted, and so is grayed inside the band
    let [r, g, b] = chart.rgb.pixel(in_band, chart.area.bottom as u32 - 2).unwrap();
    assert!(r == g && g == b && r < 255);
}

#[test]
fn hidden_series_skip_the_overlay() {
    let mut state = state_with_gap();
    assert!(state.hide_label("CPU"));
    let chart = viz::render_chart(&state, &RenderOptions::default()).unwrap();
    assert_eq!(chart.overlay_regions, 0);
}

#[test]
fn narrow_surface_uses_small_profile() {
    let opts = RenderOptions {
        width: 360,
        height: 240,
        ..RenderOptions::default()
    };
    let chart = viz::render_chart(&state_with_gap(), &opts).unwrap();
    assert_eq!(chart.profile.tick_interval, 8);
    assert_eq!(chart.profile.font_sizes.legend, 9);
    assert_eq!(chart.rgb.as_raw().len(), 360 * 240 * 3);
}

#[test]
fn too_small_surface_is_an_error() {
    let opts = RenderOptions {
        width: 20,
        height: 20,
        ..RenderOptions::default()
    };
    assert!(viz::render_chart(&state_with_gap(), &opts).is_err());
}

#[test]
fn save_png_writes_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("chart.png");
    let chart = viz::render_chart(&state_with_gap(), &RenderOptions::default()).unwrap();
    viz::save_png(&chart, &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

#[test]
fn bad_font_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("font.ttf");
    std::fs::write(&path, b"not a font").unwrap();
    assert!(viz::register_font_file(&path).is_err());
    assert!(viz::register_font_file(dir.path().join("missing.ttf")).is_err());
}
