//! Checkout

pub mod attempts;
pub mod errors;
pub mod models;
pub mod policy;
pub mod service;

pub use errors::CheckoutServiceError;
pub use policy::CheckoutPolicy;
pub use service::*;
