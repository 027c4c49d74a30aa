//! Payment gateway port.

use async_trait::async_trait;
use mockall::automock;
use tokio_util::sync::CancellationToken;

use crate::payments::{
    PaymentGatewayError, PaymentReference,
    models::{ChargeRequest, ChargeVerification, ClientHandoff},
};

/// The two calls checkout needs from a payment provider.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Start a charge and return the client handoff.
    async fn initiate_charge(
        &self,
        request: ChargeRequest,
        cancel: CancellationToken,
    ) -> Result<ClientHandoff, PaymentGatewayError>;

    /// Ask the gateway whether the charge for `reference` succeeded.
    async fn verify_charge(
        &self,
        reference: &PaymentReference,
        cancel: CancellationToken,
    ) -> Result<ChargeVerification, PaymentGatewayError>;
}
