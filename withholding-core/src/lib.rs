pub mod calculations;
pub mod config;
pub mod engine;
pub mod models;

pub use calculations::validate_deductible_expenses;
pub use config::{TaxYearRegistry, TaxYearRegistryError};
pub use engine::{WithholdingEngine, WithholdingError, calculate_with_config};
pub use models::*;
