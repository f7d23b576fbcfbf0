pub mod builtin;
pub mod registry;

pub use builtin::{builtin_tax_year, builtin_tax_years, standard_brackets, standard_expense_rates};
pub use registry::{TaxYearRegistry, TaxYearRegistryError};
