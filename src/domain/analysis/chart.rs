// ============================================================
// CHART TYPES
// ============================================================
// Chart contracts consumed by the UI layer

use crate::domain::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use validator::Validate;

/// Supported chart types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartType {
    Bar,
    Line,
    Area,
    Pie,
    Donut,
    Scatter,
    Bubble,
}

/// Layout family a chart type belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFamily {
    /// Bar/Line/Area: one series per numeric column
    Cartesian,
    /// Pie/Donut: a single series from the first numeric column
    Radial,
    /// Scatter/Bubble: {x, y} pairs from the first two numeric columns
    Paired,
}

impl ChartType {
    pub const ALL: [ChartType; 7] = [
        ChartType::Bar,
        ChartType::Line,
        ChartType::Area,
        ChartType::Pie,
        ChartType::Donut,
        ChartType::Scatter,
        ChartType::Bubble,
    ];

    pub fn family(&self) -> ChartFamily {
        match self {
            ChartType::Bar | ChartType::Line | ChartType::Area => ChartFamily::Cartesian,
            ChartType::Pie | ChartType::Donut => ChartFamily::Radial,
            ChartType::Scatter | ChartType::Bubble => ChartFamily::Paired,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "Bar",
            ChartType::Line => "Line",
            ChartType::Area => "Area",
            ChartType::Pie => "Pie",
            ChartType::Donut => "Donut",
            ChartType::Scatter => "Scatter",
            ChartType::Bubble => "Bubble",
        }
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ChartType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                AppError::validation("chart_type", format!("unsupported chart type '{}'", wanted))
            })
    }
}

/// Caller-supplied chart options. Fields other than the three named ones are
/// carried opaquely and only matter for cache-key hashing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfiguration {
    #[validate(range(min = 1, message = "MaxDataPoints must be greater than 0"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_data_points: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis_label: Option<String>,

    /// Sorted so serialization is deterministic
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ChartConfiguration {
    pub fn with_max_data_points(mut self, max: i64) -> Self {
        self.max_data_points = Some(max);
        self
    }

    pub fn with_axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_axis_label = Some(x.into());
        self.y_axis_label = Some(y.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Compact JSON used for cache-key hashing
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

/// Series payload: plain values, or {x, y} pairs for scatter/bubble charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesData {
    Values(Vec<f64>),
    Points(Vec<ChartPoint>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Values(v) => v.len(),
            SeriesData::Points(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub data: SeriesData,
}

impl ChartSeries {
    pub fn values(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: SeriesData::Values(values),
        }
    }

    pub fn points(name: impl Into<String>, points: Vec<ChartPoint>) -> Self {
        Self {
            name: name.into(),
            data: SeriesData::Points(points),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub dataset_id: i64,
    pub chart_type: ChartType,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub configuration: Option<ChartConfiguration>,
}

impl ChartData {
    pub fn empty(
        dataset_id: i64,
        chart_type: ChartType,
        configuration: Option<ChartConfiguration>,
    ) -> Self {
        Self {
            dataset_id,
            chart_type,
            labels: Vec::new(),
            series: Vec::new(),
            configuration,
        }
    }

    /// Point count of the longest series
    pub fn max_series_len(&self) -> usize {
        self.series.iter().map(|s| s.data.len()).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonChartData {
    pub dataset_id1: i64,
    pub dataset_id2: i64,
    pub chart_type: ChartType,
    /// Always the first dataset's labels
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub configuration: Option<ChartConfiguration>,
}
