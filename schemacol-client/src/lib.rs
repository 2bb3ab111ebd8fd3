//! SCHEMACOL client library exports.

pub mod api_client;
pub mod config;
pub mod error;
pub mod filter;
pub mod notifications;
pub mod page;
pub mod telemetry;

pub use api_client::{ApiClientError, ColumnApi, RestClient};
pub use config::ClientConfig;
pub use filter::ColumnFilter;
pub use page::ColumnsPage;
