pub mod http;

pub use http::HttpQueryExecutor;
