pub mod use_cases;

pub use use_cases::analysis_cache::AnalysisCache;
pub use use_cases::analysis_services::AnalysisServices;
pub use use_cases::chart_data_builder::ChartDataBuilder;
pub use use_cases::data_analysis::DataAnalyzer;
pub use use_cases::precondition_validator::PreconditionValidator;
pub use use_cases::step_logger::{StepLogBuffer, StepLogger, TracingStepLogger};
