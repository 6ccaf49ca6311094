//! Series transforms applied before charting and tabulation.

use crate::models::{DisplayMode, Series};

/// Series shorter than this are padded so they sit in the middle of the x axis.
pub const LOW_DATA_THRESHOLD: usize = 4;

#[inline]
fn present(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

/// Day-over-day deltas of a cumulative sequence.
///
/// `d[0] = c[0]`; later entries are absent unless both `c[i]` and `c[i-1]` are
/// present. Absence is propagated, not filled, so interpolation can flag it later.
pub fn cumulative_to_daily(cumulative: &[Option<f64>]) -> Vec<Option<f64>> {
    cumulative
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let cur = present(*c)?;
            if i == 0 {
                return Some(cur);
            }
            let prev = present(cumulative[i - 1])?;
            Some(cur - prev)
        })
        .collect()
}

/// Running total of a daily sequence.
///
/// An absent day yields an absent total for that day and adds nothing to the sum.
pub fn daily_to_cumulative(daily: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut sum = 0.0;
    daily
        .iter()
        .map(|d| {
            let d = present(*d)?;
            sum += d;
            Some(sum)
        })
        .collect()
}

/// Labels for a chart holding `data_len` samples.
///
/// For 1–3 samples one empty label is added on each side; otherwise the first
/// `data_len` labels are returned as-is.
pub fn center_labels(labels: &[String], data_len: usize) -> Vec<String> {
    let take = data_len.min(labels.len());
    let head = labels[..take].to_vec();
    if data_len == 0 || data_len >= LOW_DATA_THRESHOLD {
        return head;
    }
    let mut out = Vec::with_capacity(head.len() + 2);
    out.push(String::new());
    out.extend(head);
    out.push(String::new());
    out
}

/// Pad short data the same way as [`center_labels`]; `None` marks the padding.
pub fn center_data<T: Copy>(data: &[T]) -> Vec<Option<T>> {
    let inner = data.iter().copied().map(Some);
    if data.is_empty() || data.len() >= LOW_DATA_THRESHOLD {
        return inner.collect();
    }
    std::iter::once(None)
        .chain(inner)
        .chain(std::iter::once(None))
        .collect()
}

/// The series as they should be displayed in `mode`.
pub fn data_for_mode(series: &[Series], mode: DisplayMode) -> Vec<Series> {
    match mode {
        DisplayMode::Cumulative => series.to_vec(),
        DisplayMode::Daily => series
            .iter()
            .map(|s| Series {
                raw_values: cumulative_to_daily(&s.raw_values),
                ..s.clone()
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_propagates_absence() {
        let c = [Some(1.0), Some(3.0), None, Some(7.0), Some(8.0)];
        assert_eq!(
            cumulative_to_daily(&c),
            vec![Some(1.0), Some(2.0), None, None, Some(1.0)]
        );
    }

    #[test]
    fn daily_first_value_absent() {
        assert_eq!(cumulative_to_daily(&[None, Some(2.0)]), vec![None, None]);
    }

    #[test]
    fn cumulative_round_trip() {
        let c: Vec<Option<f64>> = [2.0, 2.5, 3.25, 4.0, 10.0]
            .into_iter()
            .map(Some)
            .collect();
        let back = daily_to_cumulative(&cumulative_to_daily(&c));
        for (a, b) in back.iter().zip(&c) {
            assert!((a.unwrap() - b.unwrap()).abs() < 1e-12);
        }
    }

    #[test]
    fn centering_short_series() {
        let labels: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(center_labels(&labels, 1), vec!["", "a", ""]);
        assert_eq!(center_labels(&labels, 3), vec!["", "a", "b", "c", ""]);
        assert_eq!(center_labels(&labels, 4), labels);
        assert_eq!(center_data(&[5.0]), vec![None, Some(5.0), None]);
        assert_eq!(center_data(&[1, 2]), vec![None, Some(1), Some(2), None]);
        assert_eq!(center_data(&[1, 2, 3, 4]).len(), 4);
        assert!(center_data::<f64>(&[]).is_empty());
    }

    #[test]
    fn daily_mode_keeps_identity() {
        let s = Series::new(
            "CPU",
            crate::models::ResourceKind::Cpu,
            vec![Some(1.0), Some(4.0)],
            crate::color::Rgb::new(0, 192, 232),
        );
        let daily = data_for_mode(std::slice::from_ref(&s), DisplayMode::Daily);
        assert_eq!(daily[0].label, "CPU");
        assert_eq!(daily[0].raw_values, vec![Some(1.0), Some(3.0)]);
        assert_eq!(data_for_mode(&[s.clone()], DisplayMode::Cumulative)[0], s);
    }
}
