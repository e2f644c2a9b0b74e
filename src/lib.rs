//! Dataset insights engine: column type inference, descriptive statistics,
//! chart-ready series, deterministic cache keys and request preconditions over
//! in-memory tabular rows.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use crate::application::{
    AnalysisCache, AnalysisServices, ChartDataBuilder, DataAnalyzer, PreconditionValidator,
    StepLogBuffer, StepLogger, TracingStepLogger,
};
pub use crate::domain::analysis::{
    ChartConfiguration, ChartData, ChartType, ComparisonChartData, DataSummary, DataType,
    OperationContext, ScalarValue, StatisticalSummary, TabularRow,
};
pub use crate::domain::error::{AppError, Result};
pub use crate::infrastructure::bootstrap::{build_default_services, build_services};
pub use crate::infrastructure::cache_store::{CacheExpiry, CacheStore, InMemoryCacheStore};
pub use crate::infrastructure::config::AnalysisSettings;
pub use crate::infrastructure::csv::TabularRowReader;

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
/// A no-op when a global subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
