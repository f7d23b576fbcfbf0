pub mod loader;
pub mod logging;
pub mod parameters;
pub mod report;

pub use loader::{TaxBracketRecord, TaxYearLoader, TaxYearLoaderError, TaxYearRecord};
pub use parameters::{ParametersError, ParametersFile};
