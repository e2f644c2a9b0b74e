//! Argument checks run before any analysis work.
//!
//! Checks run in a fixed order and stop at the first failure:
//! dataset id(s) positive, comparison ids distinct, user id present, then the
//! chart configuration.

use std::sync::Arc;

use crate::application::use_cases::chart_data_builder::ChartDataBuilder;
use crate::domain::analysis::{ChartConfiguration, ChartType};
use crate::domain::error::{AppError, Result};

pub struct PreconditionValidator {
    chart_builder: Arc<ChartDataBuilder>,
}

impl PreconditionValidator {
    pub fn new(chart_builder: Arc<ChartDataBuilder>) -> Self {
        Self { chart_builder }
    }

    /// For summary and statistics requests
    pub fn validate_dataset_request(&self, dataset_id: i64, user_id: &str) -> Result<()> {
        Self::require_dataset_id("dataset_id", dataset_id)?;
        Self::require_user_id(user_id)
    }

    pub fn validate_chart_request(
        &self,
        dataset_id: i64,
        user_id: &str,
        chart_type: ChartType,
        configuration: Option<&ChartConfiguration>,
    ) -> Result<()> {
        Self::require_dataset_id("dataset_id", dataset_id)?;
        Self::require_user_id(user_id)?;
        self.chart_builder
            .validate_chart_configuration(chart_type, configuration)
    }

    pub fn validate_comparison_request(
        &self,
        dataset_id1: i64,
        dataset_id2: i64,
        user_id: &str,
        chart_type: ChartType,
        configuration: Option<&ChartConfiguration>,
    ) -> Result<()> {
        Self::require_dataset_id("dataset_id1", dataset_id1)?;
        Self::require_dataset_id("dataset_id2", dataset_id2)?;
        if dataset_id1 == dataset_id2 {
            return Err(AppError::validation(
                "dataset_id2",
                "Cannot compare a dataset with itself",
            ));
        }
        Self::require_user_id(user_id)?;
        self.chart_builder
            .validate_chart_configuration(chart_type, configuration)
    }

    fn require_dataset_id(field: &str, dataset_id: i64) -> Result<()> {
        if dataset_id <= 0 {
            return Err(AppError::validation(
                field,
                format!("Dataset id must be greater than 0, got {}", dataset_id),
            ));
        }
        Ok(())
    }

    fn require_user_id(user_id: &str) -> Result<()> {
        if user_id.trim().is_empty() {
            return Err(AppError::validation("user_id", "User id is required"));
        }
        Ok(())
    }
}
