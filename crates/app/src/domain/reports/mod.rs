//! Reports

pub mod errors;
pub mod models;
mod repository;
pub mod service;
pub mod trend;

pub use errors::ReportsServiceError;
pub use service::*;
