//! Start Checkout Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::models::CartUuid;

use crate::{
    checkout::{errors::into_status_error, get::CheckoutAttemptResponse},
    extensions::*,
    observability::observe_checkout,
    orders::models::ShippingAddressBody,
    state::State,
};

/// Start Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StartCheckoutRequest {
    pub cart_uuid: Uuid,

    #[serde(default)]
    pub shipping_address: ShippingAddressBody,
}

/// Start Checkout Handler
///
/// Validates shipping, prices the cart and opens a payment attempt.
#[endpoint(
    tags("checkout"),
    summary = "Start Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Attempt awaiting payment"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing shipping fields or empty cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "checkout.start",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        cart_uuid = tracing::field::Empty,
        reference = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<StartCheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CheckoutAttemptResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(principal.user_uuid));
    span.record("cart_uuid", tracing::field::display(request.cart_uuid));

    let result = state
        .app
        .checkout
        .start(
            principal.user_uuid,
            CartUuid::from_uuid(request.cart_uuid),
            request.shipping_address.into(),
        )
        .await;

    let attempt = match result {
        Ok(attempt) => {
            observe_checkout("start", "awaiting_payment");
            attempt
        }
        Err(error) => {
            observe_checkout("start", "rejected");
            return Err(into_status_error(error));
        }
    };

    span.record("reference", attempt.reference.as_str());

    res.add_header(LOCATION, format!("/checkout/{}", attempt.reference), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(attempt.into()))
}
