//! Aggregation, ranking and spike detection over demographic count tables,
//! plus the loaders and report assembly the dashboard binary draws from.

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod report;

pub use config::DashboardConfig;
pub use data::model::{Dataset, Record, Value};
pub use error::SchemaError;
pub use report::DashboardReport;
