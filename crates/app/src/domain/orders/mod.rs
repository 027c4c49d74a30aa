//! Orders

pub mod errors;
pub mod models;
mod repository;
pub mod service;
pub mod status;

pub use errors::OrdersServiceError;
pub use service::*;
pub use status::{OrderStatus, REVENUE_COUNTED_STATUSES, StatusTransitionError};
