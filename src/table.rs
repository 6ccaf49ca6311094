//! Day-by-day table handed to the tabular display.
//!
//! Built from the raw (non-interpolated) values of the current mode, so a
//! missing day shows a placeholder rather than the synthesized chart value.

use crate::models::Series;
use serde::Serialize;
use std::fmt;

/// Placeholder shown for missing cells.
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Value(f64),
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Cell::Value(v) => Some(*v),
            Cell::Missing => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Value(v) => write!(f, "{v:.2}"),
            Cell::Missing => f.write_str(PLACEHOLDER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub date: String,
    pub cells: Vec<Cell>,
    /// Row total; missing as soon as any series is missing that day.
    pub total: Cell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageTable {
    pub header: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// `Date`, one `<label> (USD)` column per series, then `Total (USD)`.
pub fn header_row(datasets: &[Series]) -> Vec<String> {
    std::iter::once("Date".to_string())
        .chain(datasets.iter().map(|s| format!("{} (USD)", s.label)))
        .chain(std::iter::once("Total (USD)".to_string()))
        .collect()
}

/// One row per calendar day in `labels`.
pub fn build_table(labels: &[String], datasets: &[Series]) -> UsageTable {
    let rows = labels
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let cells: Vec<Cell> = datasets
                .iter()
                .map(|s| s.value(i).map_or(Cell::Missing, Cell::Value))
                .collect();
            let total = if cells.iter().any(Cell::is_missing) {
                Cell::Missing
            } else {
                Cell::Value(cells.iter().filter_map(Cell::value).sum())
            };
            TableRow {
                date: date.clone(),
                cells,
                total,
            }
        })
        .collect();
    UsageTable {
        header: header_row(datasets),
        rows,
    }
}

impl fmt::Display for UsageTable {
    /// Plain aligned text rendering, one line per row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.chars().count()).collect();
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| {
                std::iter::once(r.date.clone())
                    .chain(r.cells.iter().map(Cell::to_string))
                    .chain(std::iter::once(r.total.to_string()))
                    .collect()
            })
            .collect();
        for row in &rendered {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }
        let line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let parts: Vec<String> = cells
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (c, &w))| {
                    if i == 0 {
                        format!("{c:<w$}")
                    } else {
                        format!("{c:>w$}")
                    }
                })
                .collect();
            writeln!(f, "{}", parts.join("  "))
        };
        line(f, &self.header)?;
        for row in &rendered {
            line(f, row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::models::ResourceKind;

    fn series(label: &str, values: Vec<Option<f64>>) -> Series {
        Series::new(label, ResourceKind::Cpu, values, Rgb::new(0, 0, 0))
    }

    #[test]
    fn missing_day_shows_placeholder_and_no_total() {
        let labels: Vec<String> = (1..=3).map(|d| format!("Jun {d}")).collect();
        let data = [
            series("CPU", vec![Some(1.0), None, Some(3.0)]),
            series("GPU", vec![Some(0.5), Some(0.5), Some(0.25)]),
        ];
        let t = build_table(&labels, &data);
        assert_eq!(t.header, vec!["Date", "CPU (USD)", "GPU (USD)", "Total (USD)"]);
        assert_eq!(t.rows[0].total, Cell::Value(1.5));
        assert_eq!(t.rows[1].cells[0].to_string(), "-");
        assert!(t.rows[1].total.is_missing());
        assert_eq!(t.rows[2].total.to_string(), "3.25");
    }

    #[test]
    fn short_series_are_missing_past_their_end() {
        let labels: Vec<String> = (1..=2).map(|d| format!("Feb {d}")).collect();
        let t = build_table(&labels, &[series("CPU", vec![Some(1.0)])]);
        assert!(t.rows[1].cells[0].is_missing());
    }

    #[test]
    fn text_rendering_aligns_columns() {
        let labels = vec!["Jun 1".to_string()];
        let t = build_table(&labels, &[series("CPU", vec![Some(12.5)])]);
        let text = t.to_string();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("Date "));
        assert!(lines.next().unwrap().ends_with("12.50"));
    }
}
