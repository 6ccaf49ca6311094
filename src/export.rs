//! Delimited-text export of the daily table.

use crate::models::{DisplayMode, Series};
use crate::table::header_row;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix text cells that a spreadsheet would otherwise evaluate as a formula.
fn sanitize_text_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{s}"),
        _ => s.to_string(),
    }
}

/// Build the CSV document: one row per day, one column per series plus a row total.
///
/// Values use two decimals. A missing value leaves its cell blank, and a day with
/// any missing value leaves the total blank too.
pub fn csv_document(labels: &[String], datasets: &[Series]) -> Result<String> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    let header: Vec<String> = header_row(datasets)
        .iter()
        .map(|h| sanitize_text_cell(h))
        .collect();
    wtr.write_record(&header)?;

    for (i, label) in labels.iter().enumerate() {
        let mut record: Vec<String> = Vec::with_capacity(datasets.len() + 2);
        record.push(sanitize_text_cell(label));
        let mut total = 0.0;
        let mut has_missing = false;
        for s in datasets {
            match s.value(i) {
                Some(v) => {
                    total += v;
                    record.push(format!("{v:.2}"));
                }
                None => {
                    has_missing = true;
                    record.push(String::new());
                }
            }
        }
        record.push(if has_missing {
            String::new()
        } else {
            format!("{total:.2}")
        });
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().context("flush csv writer")?;
    Ok(String::from_utf8(bytes)?)
}

/// `su_usage_<mode>.csv`
pub fn export_file_name(mode: DisplayMode) -> String {
    format!("su_usage_{}.csv", mode.as_str())
}

/// Write the export for `mode` into `dir`; returns the file path.
pub fn save_csv<P: AsRef<Path>>(
    labels: &[String],
    datasets: &[Series],
    mode: DisplayMode,
    dir: P,
) -> Result<PathBuf> {
    let path = dir.as_ref().join(export_file_name(mode));
    let doc = csv_document(labels, datasets)?;
    fs::write(&path, doc).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::models::ResourceKind;
    use tempfile::tempdir;

    fn series(label: &str, values: Vec<Option<f64>>) -> Series {
        Series::new(label, ResourceKind::Cpu, values, Rgb::new(0, 0, 0))
    }

    #[test]
    fn document_layout() {
        let labels = vec!["Jun 1".to_string(), "Jun 2".to_string()];
        let data = [
            series("CPU", vec![Some(1.0), None]),
            series("GPU", vec![Some(2.346), Some(1.0)]),
        ];
        let doc = csv_document(&labels, &data).unwrap();
        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(lines[0], "Date,CPU (USD),GPU (USD),Total (USD)");
        assert_eq!(lines[1], "Jun 1,1.00,2.35,3.35");
        assert_eq!(lines[2], "Jun 2,,1.00,");
    }

    #[test]
    fn formula_like_labels_are_prefixed() {
        let doc = csv_document(&[], &[series("=cmd()", vec![])]).unwrap();
        assert!(doc.starts_with("Date,'=cmd() (USD),"));
    }

    #[test]
    fn save_names_file_by_mode() {
        let dir = tempdir().unwrap();
        let path = save_csv(&[], &[], DisplayMode::Daily, dir.path()).unwrap();
        assert!(path.ends_with("su_usage_daily.csv"));
        assert!(path.exists());
    }
}
