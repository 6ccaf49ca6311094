//! Axis helpers: nice ranges, locale-aware tick labels, label gutter sizing, color conversion.

use crate::color::{Rgb, Rgba};
use num_format::{Locale, ToFormattedString};
use plotters::style::RGBAColor;

use super::text::estimate_text_width_px;

/// Headroom added above the tallest stack.
pub const Y_GRACE: f64 = 0.30;

/// Number of intervals between value-axis ticks (five ticks including zero).
pub const Y_INTERVALS: usize = 4;

pub fn to_plotters(c: Rgba) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, c.a)
}

pub fn to_plotters_rgb(c: Rgb) -> RGBAColor {
    to_plotters(c.opaque())
}

/// Smallest 1/2/2.5/5 × 10^k step that is at least `raw`.
pub fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw * (1.0 - 1e-12))
        .unwrap_or(10.0 * magnitude)
}

/// Axis top for a stack peaking at `max_total`: zero-based, with grace, on a nice step.
/// Returns `(axis_max, step)`.
pub fn nice_axis_max(max_total: f64) -> (f64, f64) {
    let target = max_total.max(0.0) * (1.0 + Y_GRACE);
    let step = nice_step(target / Y_INTERVALS as f64);
    (step * Y_INTERVALS as f64, step)
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Value-axis tick text with grouped thousands; decimals only when the step needs them.
pub fn format_y_tick(v: f64, step: f64, locale_tag: &str) -> String {
    let (locale, dec_sep) = map_locale(locale_tag);
    let prec = if step >= 1.0 {
        0
    } else if step >= 0.1 {
        1
    } else {
        2
    };
    let plain = format!("{:.*}", prec, v.abs());
    let (int_part, frac) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };
    let mut out = int_part
        .parse::<u64>()
        .map(|n| n.to_formatted_string(locale))
        .unwrap_or_else(|_| int_part.to_string());
    if let Some(f) = frac {
        out.push(dec_sep);
        out.push_str(f);
    }
    if v < 0.0 && out.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.insert(0, '-');
    }
    out
}

/// Width of the left label gutter for the value-axis ticks `0, step, ..`, in pixels.
pub fn compute_left_label_area_px(step: f64, font_px: u32, locale_tag: &str) -> u32 {
    let max_px = (0..=Y_INTERVALS)
        .map(|i| format_y_tick(i as f64 * step, step, locale_tag))
        .map(|s| estimate_text_width_px(&s, font_px))
        .max()
        .unwrap_or(0);
    max_px.saturating_add(12).clamp(24, 120)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(0.7), 1.0);
        assert_eq!(nice_step(1.3), 2.0);
        assert_eq!(nice_step(2.2), 2.5);
        assert_eq!(nice_step(3.0), 5.0);
        assert_eq!(nice_step(6.0), 10.0);
        assert_eq!(nice_step(20.0), 20.0);
        assert_eq!(nice_step(0.0), 1.0);
    }

    #[test]
    fn axis_includes_grace() {
        // 58.7 * 1.3 = 76.31 -> 19.08 per interval -> step 20 -> max 80
        let (max, step) = nice_axis_max(58.7);
        assert_eq!(step, 20.0);
        assert_eq!(max, 80.0);
        assert!(nice_axis_max(0.0).0 > 0.0);
    }

    #[test]
    fn tick_labels_follow_locale() {
        assert_eq!(format_y_tick(12500.0, 2500.0, "en"), "12,500");
        assert_eq!(format_y_tick(12500.0, 2500.0, "de"), "12.500");
        assert_eq!(format_y_tick(0.5, 0.25, "de"), "0,5");
        assert_eq!(format_y_tick(-2.0, 1.0, "en"), "-2");
        assert_eq!(format_y_tick(-0.0, 1.0, "en"), "0");
    }
}
