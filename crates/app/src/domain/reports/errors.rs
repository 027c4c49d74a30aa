//! Reports service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportsServiceError {
    /// The requested range falls outside what calendar arithmetic supports.
    #[error("report range is out of bounds")]
    Range(#[source] jiff::Error),

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
