use std::sync::Arc;

use tracing::info;

use crate::application::use_cases::analysis_cache::AnalysisCache;
use crate::application::use_cases::analysis_services::AnalysisServices;
use crate::application::use_cases::chart_data_builder::ChartDataBuilder;
use crate::application::use_cases::data_analysis::DataAnalyzer;
use crate::application::use_cases::precondition_validator::PreconditionValidator;
use crate::application::use_cases::step_logger::{StepLogger, TracingStepLogger};
use crate::infrastructure::cache_store::{CacheStore, InMemoryCacheStore};
use crate::infrastructure::config::AnalysisSettings;

/// Wire the engine components around a caller-provided store and step logger
pub fn build_services(
    settings: &AnalysisSettings,
    store: Arc<dyn CacheStore>,
    logger: Arc<dyn StepLogger>,
) -> AnalysisServices {
    let analyzer = Arc::new(DataAnalyzer::new(settings.summary.clone()));
    let chart_builder = Arc::new(ChartDataBuilder::new(settings.charts.clone(), logger));
    let cache = Arc::new(AnalysisCache::new(store, settings.cache.clone()));
    let validator = Arc::new(PreconditionValidator::new(chart_builder.clone()));

    info!(
        cache_enabled = settings.cache.enabled,
        default_max_data_points = settings.charts.default_max_data_points,
        "Analysis services initialized"
    );

    AnalysisServices::new(analyzer, chart_builder, cache, validator)
}

/// In-memory store sized from settings, steps forwarded to `tracing`
pub fn build_default_services(settings: &AnalysisSettings) -> AnalysisServices {
    let store: Arc<dyn CacheStore> = Arc::new(InMemoryCacheStore::new(settings.cache.max_entries));
    build_services(settings, store, Arc::new(TracingStepLogger))
}
