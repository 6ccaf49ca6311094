//! Rendering with a registered font. Kept in its own test binary because font
//! registration is process-wide.

use su_usage::color::Rgb;
use su_usage::viz::scale::CategoryScale;
use su_usage::viz::{self, RenderOptions, RenderedChart};
use su_usage::{ChartState, DisplayMode, ResourceKind, Series};

const FONT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/DejaVuSans.ttf");

fn state() -> ChartState {
    let mut values: Vec<Option<f64>> = (1..=30).map(|d| Some(d as f64)).collect();
    values[10] = None;
    let cpu = Series::new("CPU", ResourceKind::Cpu, values, Rgb::new(0, 192, 232));
    let gpu = Series::new(
        "GPU H100",
        ResourceKind::GpuH100,
        (1..=30).map(|d| Some(d as f64 / 2.0)).collect(),
        Rgb::new(117, 213, 92),
    );
    ChartState::new(2025, 5, vec![cpu, gpu]).unwrap()
}

fn render(state: &ChartState, width: u32) -> RenderedChart {
    viz::register_font_file(FONT).unwrap();
    let opts = RenderOptions {
        width,
        height: 300,
        ..RenderOptions::default()
    };
    viz::render_chart(state, &opts).unwrap()
}

fn any_ink(chart: &RenderedChart, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> bool {
    xs.flat_map(|x| ys.clone().map(move |y| (x, y)))
        .filter_map(|(x, y)| chart.rgb.pixel(x, y))
        .any(|p| p != [255, 255, 255])
}

#[test]
fn title_is_drawn_above_the_plot() {
    let chart = render(&state(), 800);
    assert!(viz::fonts_registered());
    assert!(chart.area.top > 16.0);
    assert!(any_ink(&chart, 0..chart.width, 16..chart.area.top as u32));
}

#[test]
fn daily_mode_keeps_the_title_band() {
    let mut st = state();
    st.switch_mode(DisplayMode::Daily);
    let chart = render(&st, 800);
    assert!(any_ink(&chart, 0..chart.width, 16..chart.area.top as u32));
}

#[test]
fn tick_labels_anchor_to_the_last_day() {
    let chart = render(&state(), 360);
    assert_eq!(chart.profile.tick_interval, 8);
    assert_eq!(chart.profile.font_sizes.axis_ticks, 8);

    let x = CategoryScale::new(chart.area.left, chart.area.right, 30);
    let bottom = chart.area.bottom as u32;
    let band = bottom + 3..bottom + 20;
    let around = |i: usize, half: u32| {
        let c = x.pixel_for_index(i).round() as u32;
        c - half..c + half + 1
    };
    // shown: 29, 21, 13, 5
    assert!(any_ink(&chart, around(29, 8), band.clone()));
    assert!(any_ink(&chart, around(21, 8), band.clone()));
    // index 25 sits halfway between two labelled days
    assert!(!any_ink(&chart, around(25, 2), band));
}

#[test]
fn legend_text_is_drawn() {
    let chart = render(&state(), 800);
    let legend_top = chart.area.bottom as u32 + 24;
    assert!(any_ink(&chart, 0..chart.width, legend_top..chart.height));
}
