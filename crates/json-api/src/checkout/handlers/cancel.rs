//! Cancel Payment Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use storefront_app::payments::PaymentReference;

use crate::{
    checkout::{errors::into_status_error, get::CheckoutAttemptResponse},
    extensions::*,
    observability::observe_checkout,
    state::State,
};

/// Cancel Payment Handler
///
/// The shopper closed the payment window. The attempt stays open so payment
/// can be retried.
#[endpoint(
    tags("checkout"),
    summary = "Cancel Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Attempt awaiting payment again"),
        (status_code = StatusCode::NOT_FOUND, description = "Checkout attempt not found"),
        (status_code = StatusCode::CONFLICT, description = "Attempt is past payment"),
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
        .cancel_payment(
            principal.user_uuid,
            PaymentReference::from(reference.into_inner()),
        )
        .await
        .map_err(into_status_error)?;

    observe_checkout("payment", "cancelled");

    Ok(Json(attempt.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::checkout::{
        CheckoutServiceError, MockCheckoutService, models::CheckoutState,
    };

    use crate::test_helpers::{TestMocks, customer_service, make_attempt};

    use super::*;

    fn make_service(checkout: MockCheckoutService) -> Service {
        customer_service(
            TestMocks {
                checkout,
                ..TestMocks::default()
            },
            Router::with_path("checkout/{reference}/cancel").post(handler),
        )
    }

    #[tokio::test]
    async fn test_cancel_keeps_attempt_open() -> TestResult {
        let mut attempt = make_attempt("chk_1_abc", CheckoutState::AwaitingPayment);
        attempt.last_error = Some("payment window closed before completion".to_string());

        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_cancel_payment()
            .once()
            .withf(|_, reference| reference.as_str() == "chk_1_abc")
            .return_once(move |_, _| Ok(attempt));

        let mut res = TestClient::post("http://example.com/checkout/chk_1_abc/cancel")
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CheckoutAttemptResponse = res.take_json().await?;

        assert_eq!(body.state, "awaiting_payment");
        assert!(body.last_error.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_after_completion_is_409() {
        let mut checkout = MockCheckoutService::new();

        checkout.expect_cancel_payment().once().return_once(|_, _| {
            Err(CheckoutServiceError::InvalidState(CheckoutState::Completed))
        });

        let res = TestClient::post("http://example.com/checkout/chk_1_abc/cancel")
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }
}
