//! Checkout service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    domain::{
        carts::CartsServiceError, checkout::models::CheckoutState, orders::OrdersServiceError,
    },
    payments::{PaymentGatewayError, PaymentReference},
};

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    /// Required shipping fields were blank.
    #[error("missing required shipping fields: {}", fields.join(", "))]
    Validation { fields: Vec<&'static str> },

    #[error("cart is empty")]
    EmptyCart,

    #[error("checkout attempt not found")]
    NotFound,

    #[error("payment reference already in use")]
    AlreadyExists,

    /// The attempt is in a state that doesn't allow the operation.
    #[error("checkout attempt is {0}")]
    InvalidState(CheckoutState),

    /// Another request moved the attempt since it was loaded.
    #[error("checkout attempt changed concurrently")]
    Conflict,

    #[error("payment was not verified: {0}")]
    PaymentNotVerified(String),

    /// The payment is verified, so the attempt can no longer be abandoned.
    #[error("payment has already been received")]
    AlreadyPaid,

    #[error(transparent)]
    Gateway(#[from] PaymentGatewayError),

    /// Payment was verified but the order could not be created yet.
    #[error("payment {reference} received, order confirmation pending")]
    OrderPending { reference: PaymentReference },

    #[error(transparent)]
    Carts(#[from] CartsServiceError),

    #[error(transparent)]
    Orders(#[from] OrdersServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CheckoutServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            _ => Self::Sql(error),
        }
    }
}
