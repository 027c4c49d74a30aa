//! Checkout Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    auth::UserUuid,
    domain::{
        carts::models::CartUuid,
        orders::models::{OrderLineItem, OrderTotals, OrderUuid, ShippingAddress},
    },
    payments::PaymentReference,
};

/// Progress of one checkout attempt.
///
/// `CollectingShipping -> AwaitingPayment -> VerifyingPayment -> CreatingOrder
/// -> Completed`. Failed verification falls back to `AwaitingPayment`;
/// `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    CollectingShipping,
    AwaitingPayment,
    VerifyingPayment,
    CreatingOrder,
    Completed,
    Failed,
}

impl CheckoutState {
    pub const ALL: [Self; 6] = [
        Self::CollectingShipping,
        Self::AwaitingPayment,
        Self::VerifyingPayment,
        Self::CreatingOrder,
        Self::Completed,
        Self::Failed,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CollectingShipping => "collecting_shipping",
            Self::AwaitingPayment => "awaiting_payment",
            Self::VerifyingPayment => "verifying_payment",
            Self::CreatingOrder => "creating_order",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown checkout state: {0}")]
pub struct UnknownCheckoutState(pub String);

impl FromStr for CheckoutState {
    type Err = UnknownCheckoutState;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == value)
            .ok_or_else(|| UnknownCheckoutState(value.to_string()))
    }
}

/// One shopper's attempt to pay for a cart, keyed by its payment reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutAttempt {
    pub reference: PaymentReference,
    pub user_uuid: UserUuid,
    pub cart_uuid: CartUuid,
    pub state: CheckoutState,
    pub shipping_address: ShippingAddress,

    /// Cart lines as they were when checkout started.
    pub items: Vec<OrderLineItem>,

    pub totals: OrderTotals,
    pub payment_verified: bool,
    pub order_uuid: Option<OrderUuid>,

    /// Message from the last failed step, shown to the shopper on resume.
    pub last_error: Option<String>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
