//! Payment gateway port and its HTTP adapter.

mod errors;
mod gateway;
mod http;
pub mod models;
mod reference;

pub use errors::PaymentGatewayError;
pub use gateway::*;
pub use http::{GatewaySecretKey, HttpPaymentGateway, HttpPaymentGatewayConfig};
pub use reference::PaymentReference;
