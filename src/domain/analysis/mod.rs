// ============================================================
// ANALYSIS DOMAIN LAYER
// ============================================================
// Row, summary and chart contracts for the analysis engine
// No I/O, no async

mod chart;
mod context;
mod summary;
mod tabular_row;

pub use chart::{
    ChartConfiguration, ChartData, ChartFamily, ChartPoint, ChartSeries, ChartType,
    ComparisonChartData, SeriesData,
};
pub use context::OperationContext;
pub use summary::{ColumnStatistics, ColumnSummary, DataSummary, DataType, StatisticalSummary};
pub use tabular_row::{ScalarValue, TabularRow};

/// Column names of a row set, taken from the first row.
/// Rows are assumed to share one schema.
pub fn column_names(rows: &[TabularRow]) -> Vec<String> {
    rows.first()
        .map(|row| row.columns().map(str::to_string).collect())
        .unwrap_or_default()
}

/// All values of one column, `Null` where a row lacks the key.
pub fn column_values<'a>(rows: &'a [TabularRow], column: &str) -> Vec<&'a ScalarValue> {
    rows.iter().map(|row| row.value_or_null(column)).collect()
}
