//! Confirm Payment Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use storefront_app::{domain::checkout::CheckoutServiceError, payments::PaymentReference};

use crate::{
    checkout::errors::into_status_error,
    extensions::*,
    observability::{observe_checkout, observe_order_created},
    orders::models::OrderResponse,
    state::State,
};

fn outcome(error: &CheckoutServiceError) -> &'static str {
    match error {
        CheckoutServiceError::PaymentNotVerified(_) => "not_verified",
        CheckoutServiceError::OrderPending { .. } => "order_pending",
        CheckoutServiceError::Gateway(_) => "gateway_error",
        _ => "rejected",
    }
}

/// Confirm Payment Handler
///
/// Verifies the charge with the gateway and turns the attempt into an order.
/// Confirming a completed attempt again returns the same order.
#[endpoint(
    tags("checkout"),
    summary = "Confirm Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order created from the paid attempt"),
        (status_code = StatusCode::PAYMENT_REQUIRED, description = "Payment was not verified"),
        (status_code = StatusCode::NOT_FOUND, description = "Checkout attempt not found"),
        (status_code = StatusCode::CONFLICT, description = "Attempt cannot be confirmed"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment provider unavailable"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Payment received, order pending"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "checkout.confirm",
    skip(reference, depot),
    fields(
        reference = tracing::field::Empty,
        order_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    reference: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let reference = PaymentReference::from(reference.into_inner());

    let span = tracing::Span::current();

    span.record("reference", reference.as_str());

    let order = match state
        .app
        .checkout
        .confirm_payment(principal.user_uuid, reference, state.request_cancellation())
        .await
    {
        Ok(order) => order,
        Err(error) => {
            observe_checkout("confirm", outcome(&error));

            return Err(into_status_error(error));
        }
    };

    span.record("order_uuid", tracing::field::display(order.uuid));

    observe_checkout("confirm", "completed");
    observe_order_created();

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::{
        checkout::MockCheckoutService,
        orders::{OrderStatus, models::OrderUuid},
    };

    use crate::test_helpers::{TEST_USER_UUID, TestMocks, customer_service, make_order};

    use super::*;

    fn make_service(checkout: MockCheckoutService) -> Service {
        customer_service(
            TestMocks {
                checkout,
                ..TestMocks::default()
            },
            Router::with_path("checkout/{reference}/confirm").post(handler),
        )
    }

    #[tokio::test]
    async fn test_confirm_returns_pending_order() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid, OrderStatus::Pending);

        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_confirm_payment()
            .once()
            .withf(|user, reference, _| {
                *user == TEST_USER_UUID && reference.as_str() == "chk_1_abc"
            })
            .return_once(move |_, _, _| Ok(order));

        let mut res = TestClient::post("http://example.com/checkout/chk_1_abc/confirm")
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.status, "pending");
        assert_eq!(body.total, 36_99);

        Ok(())
    }

    #[tokio::test]
    async fn test_unverified_payment_is_402() {
        let mut checkout = MockCheckoutService::new();

        checkout.expect_confirm_payment().once().return_once(|_, _, _| {
            Err(CheckoutServiceError::PaymentNotVerified(
                "charge was declined".to_string(),
            ))
        });

        let res = TestClient::post("http://example.com/checkout/chk_1_abc/confirm")
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::PAYMENT_REQUIRED));
    }

    #[tokio::test]
    async fn test_pending_order_is_503() {
        let mut checkout = MockCheckoutService::new();

        checkout.expect_confirm_payment().once().return_once(|_, reference, _| {
            Err(CheckoutServiceError::OrderPending { reference })
        });

        let res = TestClient::post("http://example.com/checkout/chk_1_abc/confirm")
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(
            outcome(&CheckoutServiceError::PaymentNotVerified(String::new())),
            "not_verified"
        );
        assert_eq!(outcome(&CheckoutServiceError::EmptyCart), "rejected");
    }
}
