//! Payment gateway request and response models.

use serde::Serialize;

use crate::payments::PaymentReference;

/// Shopper details forwarded to the gateway alongside a charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargeMetadata {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// A request to start collecting a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    pub reference: PaymentReference,
    /// Amount in minor units.
    pub amount: u64,
    pub currency: String,
    pub email: String,
    pub metadata: ChargeMetadata,
}

/// What the client needs to complete payment with the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientHandoff {
    pub reference: PaymentReference,
    pub authorization_url: String,
    pub access_code: String,
}

/// The gateway's verdict on a charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeVerification {
    pub reference: PaymentReference,
    pub verified: bool,
    /// Amount the gateway collected, in minor units.
    pub amount: u64,
    pub currency: String,
    pub message: Option<String>,
}
