pub mod bootstrap;
pub mod cache_store;
#[path = "config/mod.rs"]
pub mod config_mod;
pub use config_mod as config;
pub mod csv;
