//! Gap filling for daily series.

use crate::models::InterpolatedSeries;

#[inline]
fn present(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

/// Replace every absent (or non-finite) sample and record which indices were filled.
///
/// A gap takes the midpoint of the nearest present neighbours on both sides;
/// a leading gap copies the first present value, a trailing gap the last one.
/// An all-absent sequence becomes all zeros. Present values are kept bit for bit.
pub fn interpolate_missing(raw: &[Option<f64>]) -> InterpolatedSeries {
    let n = raw.len();

    // Nearest present value at or before / at or after each index.
    let mut prev: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut last = None;
    for v in raw {
        if let Some(x) = present(*v) {
            last = Some(x);
        }
        prev.push(last);
    }
    let mut next: Vec<Option<f64>> = vec![None; n];
    let mut upcoming = None;
    for (i, v) in raw.iter().enumerate().rev() {
        if let Some(x) = present(*v) {
            upcoming = Some(x);
        }
        next[i] = upcoming;
    }

    let mut out = InterpolatedSeries {
        values: Vec::with_capacity(n),
        missing: Default::default(),
    };
    for (i, v) in raw.iter().enumerate() {
        if let Some(x) = present(*v) {
            out.values.push(x);
            continue;
        }
        out.missing.insert(i);
        let filled = match (prev[i], next[i]) {
            (Some(p), Some(q)) => (p + q) / 2.0,
            (Some(p), None) => p,
            (None, Some(q)) => q,
            (None, None) => 0.0,
        };
        out.values.push(filled);
    }
    out
}
