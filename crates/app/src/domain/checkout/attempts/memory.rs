//! In-process checkout attempt storage.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::{
    domain::checkout::{
        CheckoutServiceError,
        attempts::CheckoutAttempts,
        models::{CheckoutAttempt, CheckoutState},
    },
    payments::PaymentReference,
};

#[derive(Debug, Default)]
pub struct InMemoryCheckoutAttempts {
    attempts: RwLock<FxHashMap<PaymentReference, CheckoutAttempt>>,
}

impl InMemoryCheckoutAttempts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckoutAttempts for InMemoryCheckoutAttempts {
    async fn insert(&self, attempt: &CheckoutAttempt) -> Result<(), CheckoutServiceError> {
        let mut attempts = self.attempts.write().await;

        if attempts.contains_key(&attempt.reference) {
            return Err(CheckoutServiceError::AlreadyExists);
        }

        attempts.insert(attempt.reference.clone(), attempt.clone());

        Ok(())
    }

    async fn get(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<CheckoutAttempt>, CheckoutServiceError> {
        Ok(self.attempts.read().await.get(reference).cloned())
    }

    async fn save(
        &self,
        attempt: &CheckoutAttempt,
        expected: CheckoutState,
    ) -> Result<(), CheckoutServiceError> {
        let mut attempts = self.attempts.write().await;

        let Some(existing) = attempts.get_mut(&attempt.reference) else {
            return Err(CheckoutServiceError::NotFound);
        };

        if existing.state != expected {
            return Err(CheckoutServiceError::Conflict);
        }

        let verified = existing.payment_verified || attempt.payment_verified;

        *existing = attempt.clone();
        existing.payment_verified = verified;

        Ok(())
    }
}
