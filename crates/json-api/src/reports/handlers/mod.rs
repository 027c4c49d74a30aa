//! Report Handlers

pub(crate) mod revenue;
pub(crate) mod summary;
