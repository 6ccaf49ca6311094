use crate::models::UsageInput;
use crate::table::UsageTable;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Parse an input document (`{ year, month, datasets: [...] }`).
pub fn parse_input(json: &str) -> Result<UsageInput> {
    let input: UsageInput = serde_json::from_str(json).context("parse usage input")?;
    Ok(input)
}

/// Load an input document from disk.
pub fn load_input<P: AsRef<Path>>(path: P) -> Result<UsageInput> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_input(&text).with_context(|| format!("load {}", path.display()))
}

/// Save the table as pretty JSON.
pub fn save_table_json<P: AsRef<Path>>(table: &UsageTable, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(table)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::build_table;
    use tempfile::tempdir;

    #[test]
    fn load_and_save_round_trip_files() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("usage.json");
        fs::write(
            &input,
            r#"{"year":2025,"month":5,"datasets":[
                {"label":"CPU","resourceType":"cpu","data":[1,null,3],"borderColor":"rgb(0, 192, 232)"}]}"#,
        )
        .unwrap();
        let parsed = load_input(&input).unwrap();
        assert_eq!(parsed.year, Some(2025));
        assert_eq!(parsed.month, Some(5));
        assert_eq!(parsed.datasets.as_ref().map(Vec::len), Some(1));

        let out = dir.path().join("table.json");
        save_table_json(&build_table(&[], &[]), &out).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn empty_document_means_defaults() {
        let parsed = parse_input("{}").unwrap();
        assert!(parsed.year.is_none());
        assert!(parsed.datasets.is_none());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_input("/definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("not/here.json"));
    }
}
