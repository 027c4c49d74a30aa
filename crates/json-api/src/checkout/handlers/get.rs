//! Get Checkout Attempt Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::{
    domain::{checkout::models::CheckoutAttempt, orders::models::OrderUuid},
    payments::PaymentReference,
};

use crate::{
    checkout::errors::into_status_error,
    extensions::*,
    orders::models::{OrderLineResponse, ShippingAddressBody},
    state::State,
};

/// Checkout Attempt Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutAttemptResponse {
    /// Payment reference identifying the attempt
    pub reference: String,

    pub cart_uuid: Uuid,

    /// One of `collecting_shipping`, `awaiting_payment`, `verifying_payment`,
    /// `creating_order`, `completed`, `failed`
    pub state: String,

    pub shipping_address: ShippingAddressBody,

    /// Lines as priced when checkout started
    pub items: Vec<OrderLineResponse>,

    pub subtotal: u64,
    pub shipping_fee: u64,
    pub tax: u64,
    pub total: u64,
    pub currency: String,

    /// Whether the gateway confirmed the charge
    pub payment_verified: bool,

    /// Set once the order exists
    pub order_uuid: Option<Uuid>,

    /// Why the last step failed, if it did
    pub last_error: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

impl From<CheckoutAttempt> for CheckoutAttemptResponse {
    fn from(attempt: CheckoutAttempt) -> Self {
        Self {
            reference: attempt.reference.into_string(),
            cart_uuid: attempt.cart_uuid.into_uuid(),
            state: attempt.state.to_string(),
            shipping_address: attempt.shipping_address.into(),
            items: attempt.items.into_iter().map(Into::into).collect(),
            subtotal: attempt.totals.subtotal,
            shipping_fee: attempt.totals.shipping_fee,
            tax: attempt.totals.tax,
            total: attempt.totals.total,
            currency: attempt.totals.currency,
            payment_verified: attempt.payment_verified,
            order_uuid: attempt.order_uuid.map(OrderUuid::into_uuid),
            last_error: attempt.last_error,
            created_at: attempt.created_at.to_string(),
            updated_at: attempt.updated_at.to_string(),
        }
    }
}

/// Get Checkout Attempt Handler
///
/// Lets a client resume an attempt.
#[endpoint(
    tags("checkout"),
    summary = "Get Checkout Attempt",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Checkout attempt"),
        (status_code = StatusCode::NOT_FOUND, description = "Checkout attempt not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    reference: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<CheckoutAttemptResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let attempt = state
        .app
        .checkout
        .get_attempt(
            principal.user_uuid,
            PaymentReference::from(reference.into_inner()),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(attempt.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::checkout::{
        CheckoutServiceError, MockCheckoutService, models::CheckoutState,
    };

    use crate::test_helpers::{TEST_USER_UUID, TestMocks, customer_service, make_attempt};

    use super::*;

    fn make_service(checkout: MockCheckoutService) -> Service {
        customer_service(
            TestMocks {
                checkout,
                ..TestMocks::default()
            },
            Router::with_path("checkout/{reference}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_returns_attempt_with_quote() -> TestResult {
        let attempt = make_attempt("chk_1_abc", CheckoutState::AwaitingPayment);

        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_get_attempt()
            .once()
            .withf(|user, reference| *user == TEST_USER_UUID && reference.as_str() == "chk_1_abc")
            .return_once(move |_, _| Ok(attempt));

        let mut res = TestClient::get("http://example.com/checkout/chk_1_abc")
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CheckoutAttemptResponse = res.take_json().await?;

        assert_eq!(body.state, "awaiting_payment");
        assert_eq!(body.total, 36_99);
        assert!(!body.payment_verified);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_attempt_is_404() {
        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_get_attempt()
            .once()
            .return_once(|_, _| Err(CheckoutServiceError::NotFound));

        let res = TestClient::get("http://example.com/checkout/chk_missing")
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
