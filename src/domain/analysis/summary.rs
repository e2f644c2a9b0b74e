// ============================================================
// SUMMARY TYPES
// ============================================================
// Descriptive and statistical summaries over a row set

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inferred column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Numeric,
    DateTime,
    Boolean,
    String,
    /// Column has no non-null values
    Unknown,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Numeric => "numeric",
            DataType::DateTime => "datetime",
            DataType::Boolean => "boolean",
            DataType::String => "string",
            DataType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-column descriptive summary. Counts derive from non-null values only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub data_type: DataType,
    pub non_null_count: usize,
    pub null_count: usize,
    /// Distinct non-null values
    pub unique_count: usize,
    /// First few non-null values, rendered as strings
    pub sample_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    pub dataset_id: i64,
    pub total_rows: usize,
    /// Key count of the first row
    pub total_columns: usize,
    pub missing_values: usize,
    pub duplicate_rows: usize,
    pub columns: BTreeMap<String, ColumnSummary>,
}

impl DataSummary {
    pub fn empty(dataset_id: i64) -> Self {
        Self {
            dataset_id,
            total_rows: 0,
            total_columns: 0,
            missing_values: 0,
            duplicate_rows: 0,
            columns: BTreeMap::new(),
        }
    }
}

/// Moments and quantiles of one numeric column. Degenerate inputs yield 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation (divides by N)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub skewness: f64,
    /// Excess kurtosis (normal distribution ~ 0)
    pub kurtosis: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub dataset_id: i64,
    /// Only numeric columns have an entry
    pub columns: BTreeMap<String, ColumnStatistics>,
}
