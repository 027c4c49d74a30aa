//! Checkout Handlers

pub(crate) mod abandon;
pub(crate) mod cancel;
pub(crate) mod confirm;
pub(crate) mod get;
pub(crate) mod payment;
pub(crate) mod start;
