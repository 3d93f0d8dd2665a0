pub mod query;
pub mod repositories;
