pub mod country;
pub mod table;
pub mod validate;

pub use country::{value_for_year, CountryRecord, Projections, YearValue};
pub use table::{validate_table_file, CountryTable, TableError, TableFile, BUILTIN_COUNTRIES};
pub use validate::{
    validate_records, ValidationDiagnostic, ValidationReport, ValidationSeverity,
};
