pub mod analysis_cache;
pub mod analysis_services;
pub mod chart_data_builder;
pub mod data_analysis;
pub mod precondition_validator;
pub mod step_logger;
