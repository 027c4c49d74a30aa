//! Abandon Checkout Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use storefront_app::payments::PaymentReference;

use crate::{
    checkout::{errors::into_status_error, get::CheckoutAttemptResponse},
    extensions::*,
    observability::observe_checkout,
    state::State,
};

/// Abandon Checkout Handler
///
/// Fails an unpaid attempt. The cart is left untouched, and a charge that
/// lands later can still be confirmed with the same reference.
#[endpoint(
    tags("checkout"),
    summary = "Abandon Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Failed attempt"),
        (status_code = StatusCode::NOT_FOUND, description = "Checkout attempt not found"),
        (status_code = StatusCode::CONFLICT, description = "Payment already received or attempt changed concurrently"),
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
        .abandon(
            principal.user_uuid,
            PaymentReference::from(reference.into_inner()),
        )
        .await
        .map_err(into_status_error)?;

    observe_checkout("abandon", "failed");

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
            Router::with_path("checkout/{reference}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_abandon_fails_attempt() -> TestResult {
        let attempt = make_attempt("chk_1_abc", CheckoutState::Failed);

        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_abandon()
            .once()
            .return_once(move |_, _| Ok(attempt));

        let mut res = TestClient::delete("http://example.com/checkout/chk_1_abc")
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CheckoutAttemptResponse = res.take_json().await?;

        assert_eq!(body.state, "failed");

        Ok(())
    }

    #[tokio::test]
    async fn test_abandon_after_payment_is_409() {
        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_abandon()
            .once()
            .return_once(|_, _| Err(CheckoutServiceError::AlreadyPaid));

        let res = TestClient::delete("http://example.com/checkout/chk_1_abc")
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }
}
