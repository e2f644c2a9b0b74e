pub mod analysis;
pub mod error;
