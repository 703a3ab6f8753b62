pub mod loader;
pub mod schema;

pub use loader::{load_criteria, parse_criteria, validate_against_schema};
pub use schema::{Comparison, CriteriaError, CriteriaSet, Criterion};
