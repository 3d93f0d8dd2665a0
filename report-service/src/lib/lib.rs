pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::chart;
pub use domain::dashboard;
pub use domain::dataset;
pub use domain::datasource;
pub use domain::tenant;
pub use domain::user;
pub use outbound::repositories;
