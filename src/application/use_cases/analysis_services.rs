use std::sync::Arc;

use crate::application::use_cases::analysis_cache::AnalysisCache;
use crate::application::use_cases::chart_data_builder::ChartDataBuilder;
use crate::application::use_cases::data_analysis::DataAnalyzer;
use crate::application::use_cases::precondition_validator::PreconditionValidator;

/// The four engine components behind one handle for the orchestrating service
#[derive(Clone)]
pub struct AnalysisServices {
    analyzer: Arc<DataAnalyzer>,
    chart_builder: Arc<ChartDataBuilder>,
    cache: Arc<AnalysisCache>,
    validator: Arc<PreconditionValidator>,
}

impl AnalysisServices {
    pub fn new(
        analyzer: Arc<DataAnalyzer>,
        chart_builder: Arc<ChartDataBuilder>,
        cache: Arc<AnalysisCache>,
        validator: Arc<PreconditionValidator>,
    ) -> Self {
        Self {
            analyzer,
            chart_builder,
            cache,
            validator,
        }
    }

    pub fn analyzer(&self) -> &Arc<DataAnalyzer> {
        &self.analyzer
    }

    pub fn chart_builder(&self) -> &Arc<ChartDataBuilder> {
        &self.chart_builder
    }

    pub fn cache(&self) -> &Arc<AnalysisCache> {
        &self.cache
    }

    pub fn validator(&self) -> &Arc<PreconditionValidator> {
        &self.validator
    }
}
