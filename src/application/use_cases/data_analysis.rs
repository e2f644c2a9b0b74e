//! Column type inference and descriptive statistics over caller-supplied rows.
//!
//! Nothing here fails: empty data, zero variance and non-convertible values all
//! degrade to 0 or empty collections. In lenient extraction mode (the default)
//! a non-null value in a numeric column that cannot be read as a number counts
//! as 0, which can hide data-quality problems; `NumericExtraction::Strict`
//! skips such values instead.

pub mod moments;
pub mod type_inference;

use crate::domain::analysis::{
    column_names, column_values, ColumnStatistics, ColumnSummary, DataSummary, DataType,
    ScalarValue, StatisticalSummary, TabularRow,
};
use crate::infrastructure::config::{NumericExtraction, SummarySettings};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

pub use type_inference::{
    determine_data_type, is_boolean, is_date_time, is_numeric, is_numeric_column, to_f64,
};

/// Type inference and statistics component
pub struct DataAnalyzer {
    settings: SummarySettings,
}

impl DataAnalyzer {
    pub fn new(settings: SummarySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SummarySettings {
        &self.settings
    }

    pub fn determine_data_type<'a, I>(&self, values: I) -> DataType
    where
        I: IntoIterator<Item = &'a ScalarValue>,
    {
        determine_data_type(values)
    }

    pub fn is_numeric_column<'a, I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a ScalarValue>,
    {
        is_numeric_column(values)
    }

    /// Descriptive summary of every column of the first row
    pub fn generate_data_summary(&self, dataset_id: i64, rows: &[TabularRow]) -> DataSummary {
        if rows.is_empty() {
            return DataSummary::empty(dataset_id);
        }

        let names = column_names(rows);
        let mut columns = BTreeMap::new();
        let mut missing_values = 0usize;

        for name in &names {
            let summary = self.summarize_column(name, &column_values(rows, name));
            missing_values += summary.null_count;
            columns.insert(name.clone(), summary);
        }

        let distinct_rows: HashSet<String> = rows.iter().map(TabularRow::canonical_json).collect();
        let duplicate_rows = rows.len() - distinct_rows.len();

        debug!(
            dataset_id,
            total_rows = rows.len(),
            total_columns = names.len(),
            missing_values,
            duplicate_rows,
            "Generated data summary"
        );

        DataSummary {
            dataset_id,
            total_rows: rows.len(),
            total_columns: names.len(),
            missing_values,
            duplicate_rows,
            columns,
        }
    }

    fn summarize_column(&self, name: &str, values: &[&ScalarValue]) -> ColumnSummary {
        let non_null: Vec<&ScalarValue> = values.iter().copied().filter(|v| !v.is_null()).collect();

        // Distinct by typed value: Number(1) and "1" are two values
        let mut seen = HashSet::new();
        let mut sample_values = Vec::new();
        for value in &non_null {
            if sample_values.len() < self.settings.sample_size {
                sample_values.push(value.to_display_string());
            }
            seen.insert(serde_json::to_string(value).unwrap_or_default());
        }

        ColumnSummary {
            name: name.to_string(),
            data_type: determine_data_type(values.iter().copied()),
            non_null_count: non_null.len(),
            null_count: values.len() - non_null.len(),
            unique_count: seen.len(),
            sample_values,
        }
    }

    /// Statistics for every numeric column; other columns get no entry
    pub fn generate_statistical_summary(
        &self,
        dataset_id: i64,
        rows: &[TabularRow],
    ) -> StatisticalSummary {
        let mut columns = BTreeMap::new();

        for name in column_names(rows) {
            let values = column_values(rows, &name);
            if !is_numeric_column(values.iter().copied()) {
                continue;
            }
            let numbers = self.extract_numbers(&values);
            columns.insert(name, Self::column_statistics(&numbers));
        }

        debug!(
            dataset_id,
            numeric_columns = columns.len(),
            "Generated statistical summary"
        );

        StatisticalSummary {
            dataset_id,
            columns,
        }
    }

    /// Non-null values as doubles. Never yields NaN or infinities.
    pub fn extract_numbers(&self, values: &[&ScalarValue]) -> Vec<f64> {
        values
            .iter()
            .filter(|v| !v.is_null())
            .filter_map(|v| match (to_f64(v), self.settings.numeric_extraction) {
                (Some(n), _) => Some(n),
                (None, NumericExtraction::Lenient) => Some(0.0),
                (None, NumericExtraction::Strict) => None,
            })
            .collect()
    }

    pub fn column_statistics(values: &[f64]) -> ColumnStatistics {
        if values.is_empty() {
            return ColumnStatistics::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean = moments::mean(values);
        let std_dev = moments::std_dev(values, mean);

        ColumnStatistics {
            mean,
            median: moments::median(&sorted),
            std_dev,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            q1: moments::quartile(&sorted, 0.25),
            q2: moments::quartile(&sorted, 0.5),
            q3: moments::quartile(&sorted, 0.75),
            skewness: moments::skewness(values, mean, std_dev),
            kurtosis: moments::kurtosis(values, mean, std_dev),
        }
    }
}

impl Default for DataAnalyzer {
    fn default() -> Self {
        Self::new(SummarySettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales_rows() -> Vec<TabularRow> {
        vec![
            TabularRow::new().with("region", "East").with("sales", 10),
            TabularRow::new().with("region", "West").with("sales", 20),
            TabularRow::new().with("region", "North").with("sales", 30),
            TabularRow::new().with("region", "East").with("sales", 10),
        ]
    }

    #[test]
    fn test_data_summary_counts() {
        let mut rows = sales_rows();
        rows.push(TabularRow::new().with("region", ScalarValue::Null).with("sales", 40));

        let summary = DataAnalyzer::default().generate_data_summary(7, &rows);

        assert_eq!(summary.dataset_id, 7);
        assert_eq!(summary.total_rows, 5);
        assert_eq!(summary.total_columns, 2);
        assert_eq!(summary.missing_values, 1);
        assert_eq!(summary.duplicate_rows, 1);

        let region = &summary.columns["region"];
        assert_eq!(region.data_type, DataType::String);
        assert_eq!(region.non_null_count, 4);
        assert_eq!(region.null_count, 1);
        assert_eq!(region.unique_count, 3);

        let sales = &summary.columns["sales"];
        assert_eq!(sales.data_type, DataType::Numeric);
        assert_eq!(sales.sample_values, vec!["10", "20", "30", "10", "40"]);
    }

    #[test]
    fn test_sample_values_are_bounded() {
        let rows: Vec<TabularRow> = (0..20).map(|i| TabularRow::new().with("n", i)).collect();
        let analyzer = DataAnalyzer::new(SummarySettings {
            sample_size: 3,
            ..Default::default()
        });
        let summary = analyzer.generate_data_summary(1, &rows);
        assert_eq!(summary.columns["n"].sample_values, vec!["0", "1", "2"]);
        assert_eq!(summary.columns["n"].unique_count, 20);
    }

    #[test]
    fn test_empty_rows_produce_empty_summaries() {
        let analyzer = DataAnalyzer::default();
        let summary = analyzer.generate_data_summary(3, &[]);
        assert_eq!(summary.total_rows, 0);
        assert!(summary.columns.is_empty());

        let stats = analyzer.generate_statistical_summary(3, &[]);
        assert!(stats.columns.is_empty());
    }

    #[test]
    fn test_statistical_summary_only_numeric_columns() {
        let stats = DataAnalyzer::default().generate_statistical_summary(1, &sales_rows());

        assert!(!stats.columns.contains_key("region"));
        let sales = stats.columns["sales"];
        assert_eq!(sales.mean, 17.5);
        assert_eq!(sales.median, 15.0);
        assert_eq!(sales.min, 10.0);
        assert_eq!(sales.max, 30.0);
        assert_eq!(sales.q1, 10.0);
        assert_eq!(sales.q3, 22.5);
    }

    #[test]
    fn test_lenient_extraction_counts_bad_values_as_zero() {
        let values = [
            ScalarValue::from(4.0),
            ScalarValue::from(true),
            ScalarValue::Null,
            ScalarValue::Number(f64::NAN),
        ];
        let refs: Vec<&ScalarValue> = values.iter().collect();

        let lenient = DataAnalyzer::default();
        assert_eq!(lenient.extract_numbers(&refs), vec![4.0, 0.0, 0.0]);

        let strict = DataAnalyzer::new(SummarySettings {
            numeric_extraction: NumericExtraction::Strict,
            ..Default::default()
        });
        assert_eq!(strict.extract_numbers(&refs), vec![4.0]);
    }

    #[test]
    fn test_non_finite_columns_are_not_numeric() {
        let rows = vec![
            TabularRow::new().with("x", f64::NAN).with("name", "Infinity"),
            TabularRow::new().with("x", f64::NAN).with("name", "1"),
        ];
        let analyzer = DataAnalyzer::default();

        let stats = analyzer.generate_statistical_summary(1, &rows);
        assert!(stats.columns.is_empty());

        let summary = analyzer.generate_data_summary(1, &rows);
        assert_eq!(summary.columns["name"].data_type, DataType::String);
        assert_eq!(summary.columns["x"].data_type, DataType::String);
    }

    #[test]
    fn test_unique_count_distinguishes_types() {
        let rows = vec![
            TabularRow::new().with("v", 1),
            TabularRow::new().with("v", "1"),
            TabularRow::new().with("v", true),
            TabularRow::new().with("v", "true"),
            TabularRow::new().with("v", 1.0),
        ];
        let summary = DataAnalyzer::default().generate_data_summary(1, &rows);
        assert_eq!(summary.columns["v"].unique_count, 4);
    }

    #[test]
    fn test_column_statistics_of_constant_values() {
        let stats = DataAnalyzer::column_statistics(&[5.0, 5.0, 5.0, 5.0]);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.skewness, 0.0);
        assert_eq!(stats.kurtosis, 0.0);
        assert_eq!(stats.q2, 5.0);
    }
}
