//! Initiate Payment Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::payments::{PaymentReference, models::ClientHandoff};

use crate::{
    checkout::errors::into_status_error, extensions::*, observability::observe_checkout,
    state::State,
};

/// Payment Handoff Response
///
/// Everything the client needs to open the gateway's payment window.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentHandoffResponse {
    pub reference: String,
    pub authorization_url: String,
    pub access_code: String,
}

impl From<ClientHandoff> for PaymentHandoffResponse {
    fn from(handoff: ClientHandoff) -> Self {
        Self {
            reference: handoff.reference.into_string(),
            authorization_url: handoff.authorization_url,
            access_code: handoff.access_code,
        }
    }
}

/// Initiate Payment Handler
#[endpoint(
    tags("checkout"),
    summary = "Initiate Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Gateway handoff"),
        (status_code = StatusCode::NOT_FOUND, description = "Checkout attempt not found"),
        (status_code = StatusCode::CONFLICT, description = "Attempt is not awaiting payment"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment provider unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "checkout.payment",
    skip(reference, depot),
    fields(reference = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    reference: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<PaymentHandoffResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let reference = PaymentReference::from(reference.into_inner());

    tracing::Span::current().record("reference", reference.as_str());

    let result = state
        .app
        .checkout
        .initiate_payment(principal.user_uuid, reference, state.request_cancellation())
        .await;

    match result {
        Ok(handoff) => {
            observe_checkout("payment", "initiated");

            Ok(Json(handoff.into()))
        }
        Err(error) => {
            observe_checkout("payment", "failed");

            Err(into_status_error(error))
        }
    }
}
