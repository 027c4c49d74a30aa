//! Checkout attempt storage.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::checkout::{
        CheckoutServiceError,
        models::{CheckoutAttempt, CheckoutState},
    },
    payments::PaymentReference,
};

mod memory;
mod postgres;

pub use memory::InMemoryCheckoutAttempts;
pub use postgres::PgCheckoutAttempts;

#[automock]
#[async_trait]
pub trait CheckoutAttempts: Send + Sync {
    /// Record a new attempt. Fails with
    /// [`CheckoutServiceError::AlreadyExists`] if the reference is taken.
    async fn insert(&self, attempt: &CheckoutAttempt) -> Result<(), CheckoutServiceError>;

    async fn get(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<CheckoutAttempt>, CheckoutServiceError>;

    /// Overwrite the mutable fields of an existing attempt, provided it is
    /// still stored in the `expected` state. Fails with
    /// [`CheckoutServiceError::Conflict`] if another request moved it first.
    /// A stored `payment_verified` flag is never cleared.
    async fn save(
        &self,
        attempt: &CheckoutAttempt,
        expected: CheckoutState,
    ) -> Result<(), CheckoutServiceError>;
}
