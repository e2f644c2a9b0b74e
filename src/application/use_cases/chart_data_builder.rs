// ============================================================
// CHART DATA BUILDER
// ============================================================
// Turn rows + chart type + configuration into labels and series

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};
use validator::Validate;

use crate::application::use_cases::data_analysis::{is_numeric_column, to_f64};
use crate::application::use_cases::step_logger::StepLogger;
use crate::domain::analysis::{
    column_names, column_values, ChartConfiguration, ChartData, ChartFamily, ChartPoint,
    ChartSeries, ChartType, ComparisonChartData, OperationContext, TabularRow,
};
use crate::domain::error::Result;
use crate::infrastructure::config::ChartSettings;

/// Labels plus series, index-aligned
type Layout = (Vec<String>, Vec<ChartSeries>);

pub struct ChartDataBuilder {
    settings: ChartSettings,
    logger: Arc<dyn StepLogger>,
}

impl ChartDataBuilder {
    pub fn new(settings: ChartSettings, logger: Arc<dyn StepLogger>) -> Self {
        Self { settings, logger }
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Build chart-ready labels and series for one dataset.
    ///
    /// Rows are truncated to MaxDataPoints (or the configured default) before
    /// any series is built. When the chart type lacks the numeric columns it
    /// needs, a placeholder series of row ordinals is returned instead.
    pub fn generate_chart_data(
        &self,
        context: &OperationContext,
        dataset_id: i64,
        rows: &[TabularRow],
        chart_type: ChartType,
        configuration: Option<&ChartConfiguration>,
    ) -> ChartData {
        if rows.is_empty() {
            self.logger.log_step(
                context,
                "No rows to chart, returning empty chart data",
                &json!({ "datasetId": dataset_id, "chartType": chart_type.as_str() }),
            );
            return ChartData::empty(dataset_id, chart_type, configuration.cloned());
        }

        let limit = self.max_data_points(configuration);
        let rows = &rows[..rows.len().min(limit)];

        let (labels, series) = match chart_type.family() {
            ChartFamily::Cartesian => self.cartesian_layout(context, rows),
            ChartFamily::Radial => self.radial_layout(context, rows),
            ChartFamily::Paired => self.paired_layout(context, rows),
        };

        debug!(
            dataset_id,
            chart_type = %chart_type,
            rows = rows.len(),
            series = series.len(),
            "Generated chart data"
        );

        ChartData {
            dataset_id,
            chart_type,
            labels,
            series,
            configuration: configuration.cloned(),
        }
    }

    /// Chart both datasets with the same type and configuration and merge the
    /// series. Labels come from the first dataset only; the two row sets are
    /// assumed to line up.
    #[allow(clippy::too_many_arguments)]
    pub fn generate_comparison_chart_data(
        &self,
        context: &OperationContext,
        dataset_id1: i64,
        dataset_id2: i64,
        rows1: &[TabularRow],
        rows2: &[TabularRow],
        chart_type: ChartType,
        configuration: Option<&ChartConfiguration>,
    ) -> ComparisonChartData {
        let first = self.generate_chart_data(context, dataset_id1, rows1, chart_type, configuration);
        let second =
            self.generate_chart_data(context, dataset_id2, rows2, chart_type, configuration);

        if first.labels.len() != second.labels.len() {
            self.logger.log_step(
                context,
                "Comparison datasets differ in label count, using first dataset's labels",
                &json!({
                    "datasetId1": dataset_id1,
                    "datasetId2": dataset_id2,
                    "labels1": first.labels.len(),
                    "labels2": second.labels.len(),
                }),
            );
        }

        let mut series = first.series;
        series.extend(second.series);

        ComparisonChartData {
            dataset_id1,
            dataset_id2,
            chart_type,
            labels: first.labels,
            series,
            configuration: configuration.cloned(),
        }
    }

    /// MaxDataPoints must be positive when present. Axis-label oddities are
    /// only warned about.
    pub fn validate_chart_configuration(
        &self,
        chart_type: ChartType,
        configuration: Option<&ChartConfiguration>,
    ) -> Result<()> {
        let Some(configuration) = configuration else {
            return Ok(());
        };

        configuration.validate()?;

        match chart_type.family() {
            ChartFamily::Radial => {
                if configuration.x_axis_label.is_some() || configuration.y_axis_label.is_some() {
                    warn!(chart_type = %chart_type, "Axis labels are ignored for radial charts");
                }
            }
            ChartFamily::Paired => {
                if configuration.x_axis_label.is_none() || configuration.y_axis_label.is_none() {
                    warn!(chart_type = %chart_type, "Paired chart is missing an axis label");
                }
            }
            ChartFamily::Cartesian => {}
        }

        Ok(())
    }

    fn max_data_points(&self, configuration: Option<&ChartConfiguration>) -> usize {
        match configuration.and_then(|c| c.max_data_points) {
            Some(n) => n.max(0) as usize,
            None => self.settings.default_max_data_points,
        }
    }

    /// Bar/Line/Area: label column is the first non-numeric column (else the
    /// first column); one series per numeric column.
    fn cartesian_layout(&self, context: &OperationContext, rows: &[TabularRow]) -> Layout {
        let names = column_names(rows);
        let numeric = numeric_columns(rows, &names);
        if numeric.is_empty() {
            return self.fallback_layout(context, rows, "no numeric columns");
        }

        let label_column = names
            .iter()
            .find(|name| !numeric.contains(name))
            .unwrap_or(&names[0]);

        let series = numeric
            .iter()
            .map(|name| ChartSeries::values(name.clone(), series_values(rows, name)))
            .collect();

        (labels_from(rows, label_column), series)
    }

    /// Pie/Donut: labels from the first column, one series from the first
    /// numeric column. Further numeric columns are ignored.
    fn radial_layout(&self, context: &OperationContext, rows: &[TabularRow]) -> Layout {
        let names = column_names(rows);
        let numeric = numeric_columns(rows, &names);
        let Some(value_column) = numeric.first() else {
            return self.fallback_layout(context, rows, "no numeric columns");
        };

        (
            labels_from(rows, &names[0]),
            vec![ChartSeries::values(
                value_column.clone(),
                series_values(rows, value_column),
            )],
        )
    }

    /// Scatter/Bubble: labels from the first column, one series of {x, y}
    /// pairs from the first two numeric columns.
    fn paired_layout(&self, context: &OperationContext, rows: &[TabularRow]) -> Layout {
        let names = column_names(rows);
        let numeric = numeric_columns(rows, &names);
        if numeric.len() < 2 {
            return self.fallback_layout(context, rows, "fewer than two numeric columns");
        }

        let (x_column, y_column) = (&numeric[0], &numeric[1]);
        let points = series_values(rows, x_column)
            .into_iter()
            .zip(series_values(rows, y_column))
            .map(|(x, y)| ChartPoint { x, y })
            .collect();

        (
            labels_from(rows, &names[0]),
            vec![ChartSeries::points(
                format!("{} vs {}", x_column, y_column),
                points,
            )],
        )
    }

    /// "Row 1".."Row N" with a single series holding the ordinals 1..N
    fn fallback_layout(
        &self,
        context: &OperationContext,
        rows: &[TabularRow],
        reason: &str,
    ) -> Layout {
        self.logger.log_step(
            context,
            "Using fallback series",
            &json!({ "reason": reason, "rows": rows.len() }),
        );

        let labels = (1..=rows.len()).map(|i| format!("Row {}", i)).collect();
        let ordinals = (1..=rows.len()).map(|i| i as f64).collect();

        (
            labels,
            vec![ChartSeries::values(
                self.settings.fallback_series_name.clone(),
                ordinals,
            )],
        )
    }
}

fn numeric_columns(rows: &[TabularRow], names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| is_numeric_column(column_values(rows, name)))
        .cloned()
        .collect()
}

fn labels_from(rows: &[TabularRow], column: &str) -> Vec<String> {
    rows.iter()
        .map(|row| row.value_or_null(column).to_display_string())
        .collect()
}

/// Null, non-finite or non-convertible cells become 0 so series stay aligned
/// with labels
fn series_values(rows: &[TabularRow], column: &str) -> Vec<f64> {
    rows.iter()
        .map(|row| to_f64(row.value_or_null(column)).unwrap_or(0.0))
        .collect()
}
