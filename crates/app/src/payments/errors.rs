//! Payment gateway errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentGatewayError {
    /// The caller gave up before the gateway answered.
    #[error("payment gateway call was cancelled")]
    Cancelled,

    #[error("payment gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered but refused the request.
    #[error("payment gateway rejected the request: {0}")]
    Rejected(String),

    #[error("unexpected response from payment gateway: {0}")]
    UnexpectedResponse(String),
}
