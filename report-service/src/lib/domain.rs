pub mod chart;
pub mod dashboard;
pub mod dataset;
pub mod datasource;
pub mod tenant;
pub mod user;
