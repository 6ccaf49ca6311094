use crate::color::{Rgb, parse_css_color};
use crate::error::UsageError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Cost category a series belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceKind {
    Cpu,
    GpuH100,
    GpuV100,
    GpuA100,
    Storage,
    Network,
    /// Anything the host sends that has no dedicated palette entry.
    Other(String),
}

impl ResourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::Cpu => "cpu",
            ResourceKind::GpuH100 => "gpuH100",
            ResourceKind::GpuV100 => "gpuV100",
            ResourceKind::GpuA100 => "gpuA100",
            ResourceKind::Storage => "storage",
            ResourceKind::Network => "network",
            ResourceKind::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for ResourceKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "cpu" => ResourceKind::Cpu,
            "gpuH100" => ResourceKind::GpuH100,
            "gpuV100" => ResourceKind::GpuV100,
            "gpuA100" => ResourceKind::GpuA100,
            "storage" => ResourceKind::Storage,
            "network" => ResourceKind::Network,
            _ => ResourceKind::Other(s),
        }
    }
}

impl From<ResourceKind> for String {
    fn from(k: ResourceKind) -> Self {
        k.as_str().to_string()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named numeric time sequence for a billing period (one value per day).
///
/// Identity is `(label, resource_kind)`. A new period produces a new set of series;
/// values are never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub resource_kind: ResourceKind,
    /// `None` = sample not supplied by the data source (distinct from zero).
    pub raw_values: Vec<Option<f64>>,
    pub color: Rgb,
}

impl Series {
    pub fn new(
        label: impl Into<String>,
        resource_kind: ResourceKind,
        raw_values: Vec<Option<f64>>,
        color: Rgb,
    ) -> Self {
        Self {
            label: label.into(),
            resource_kind,
            raw_values,
            color,
        }
    }

    /// Value at `i`, with non-finite and out-of-range indices reported as missing.
    pub fn value(&self, i: usize) -> Option<f64> {
        self.raw_values.get(i).copied().flatten().filter(|v| v.is_finite())
    }

    pub fn len(&self) -> usize {
        self.raw_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_values.is_empty()
    }
}

/// Whether values are shown as running totals or day-over-day deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Cumulative,
    Daily,
}

impl DisplayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Cumulative => "cumulative",
            DisplayMode::Daily => "daily",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DisplayMode::Cumulative => "SU Cost - Cumulative",
            DisplayMode::Daily => "SU Cost - Daily",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            DisplayMode::Cumulative => "Showing the cumulative cost for the last month",
            DisplayMode::Daily => "Showing the daily cost for the last month",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cumulative" => Ok(DisplayMode::Cumulative),
            "daily" => Ok(DisplayMode::Daily),
            other => Err(format!("unknown display mode `{other}`")),
        }
    }
}

/// A series with every gap filled, plus the indices that were synthesized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InterpolatedSeries {
    pub values: Vec<f64>,
    pub missing: BTreeSet<usize>,
}

impl InterpolatedSeries {
    pub fn is_missing(&self, i: usize) -> bool {
        self.missing.contains(&i)
    }
}

/// Inclusive index span of a run of missing samples, widened by one real
/// sample on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MissingRegion {
    pub start: usize,
    pub end: usize,
}

/// Dataset record as delivered by the host page.
///
/// `data` is kept as raw JSON values so that anything that is not a number
/// (strings, booleans, nulls) is classified as missing instead of failing the load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub label: String,
    #[serde(rename = "resourceType", default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    #[serde(rename = "borderColor", alias = "color")]
    pub border_color: String,
}

impl TryFrom<DatasetRecord> for Series {
    type Error = UsageError;

    fn try_from(rec: DatasetRecord) -> Result<Self, Self::Error> {
        let color = parse_css_color(&rec.border_color)?.rgb();
        let raw_values = rec
            .data
            .iter()
            .map(|v| v.as_f64().filter(|x| x.is_finite()))
            .collect();
        let resource_kind = ResourceKind::from(rec.resource_type.unwrap_or_default());
        Ok(Series::new(rec.label, resource_kind, raw_values, color))
    }
}

/// Input contract from the page bootstrap: period and (optionally) datasets.
///
/// Missing `year`/`month` mean "current period"; missing `datasets` selects the
/// built-in sample set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageInput {
    #[serde(default)]
    pub year: Option<i32>,
    /// Zero-indexed month (0 = January).
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub datasets: Option<Vec<DatasetRecord>>,
}
