//! Hover tooltip content for one day across the visible series.

use crate::color::Rgb;
use crate::processor::ProcessedSeries;
use serde::Serialize;
use std::fmt;

pub const UNAVAILABLE: &str = "Data unavailable";
pub const UNAVAILABLE_INFO: &str = "Data temporarily unavailable for display";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipRow {
    pub label: String,
    /// Legend swatch; grayscale when the value was interpolated.
    pub swatch: Rgb,
    pub value: f64,
    pub missing: bool,
}

impl TooltipRow {
    /// Right-hand text: `"<value> USD"` or the unavailable notice.
    pub fn text(&self) -> String {
        if self.missing {
            UNAVAILABLE.to_string()
        } else {
            format!("{} USD", format_value(self.value))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub rows: Vec<TooltipRow>,
    /// Set when any row was interpolated.
    pub info: Option<String>,
    /// Only shown when the sum is positive and nothing is missing.
    pub total: Option<f64>,
}

/// Up to two decimals, trailing zeros dropped (`3`, `3.5`, `3.25`).
fn format_value(v: f64) -> String {
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Tooltip for chart index `index`; datasets without a value there are left out.
pub fn tooltip_model(title: &str, datasets: &[&ProcessedSeries], index: usize) -> Tooltip {
    let rows: Vec<TooltipRow> = datasets
        .iter()
        .filter_map(|s| {
            let value = s.value(index)?;
            let missing = s.is_missing(index);
            Some(TooltipRow {
                label: s.label.clone(),
                swatch: if missing { s.color.to_grayscale() } else { s.color },
                value,
                missing,
            })
        })
        .collect();

    let any_missing = rows.iter().any(|r| r.missing);
    let sum: f64 = rows.iter().map(|r| r.value).filter(|v| v.is_finite()).sum();
    Tooltip {
        title: title.to_string(),
        info: any_missing.then(|| UNAVAILABLE_INFO.to_string()),
        total: (sum > 0.0 && !any_missing).then_some(sum),
        rows,
    }
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for row in &self.rows {
            writeln!(f, "  {} ({})  {}", row.label, row.swatch, row.text())?;
        }
        if let Some(info) = &self.info {
            writeln!(f, "  {info}")?;
        }
        if let Some(total) = self.total {
            writeln!(f, "  Total  {total:.2} USD")?;
        }
        Ok(())
    }
}
