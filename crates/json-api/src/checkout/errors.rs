//! Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use storefront_app::{
    domain::checkout::CheckoutServiceError, payments::PaymentGatewayError,
};

use crate::{carts, orders};

pub(crate) fn into_status_error(error: CheckoutServiceError) -> StatusError {
    match error {
        CheckoutServiceError::Validation { fields } => StatusError::bad_request()
            .brief("Missing required shipping fields")
            .detail(fields.join(", ")),
        CheckoutServiceError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        CheckoutServiceError::NotFound => {
            StatusError::not_found().brief("Checkout attempt not found")
        }
        CheckoutServiceError::AlreadyExists => {
            StatusError::conflict().brief("Payment reference already in use")
        }
        CheckoutServiceError::InvalidState(state) => StatusError::conflict()
            .brief("Checkout attempt cannot do that now")
            .detail(format!("checkout attempt is {state}")),
        CheckoutServiceError::Conflict => StatusError::conflict()
            .brief("Checkout attempt changed while processing, please retry"),
        CheckoutServiceError::PaymentNotVerified(message) => StatusError::payment_required()
            .brief("Payment was not verified")
            .detail(message),
        CheckoutServiceError::AlreadyPaid => {
            StatusError::conflict().brief("Payment has already been received")
        }
        CheckoutServiceError::Gateway(PaymentGatewayError::Cancelled) => {
            StatusError::service_unavailable().brief("Request was cancelled, please retry")
        }
        CheckoutServiceError::Gateway(source) => {
            warn!("payment gateway call failed: {source}");

            StatusError::bad_gateway().brief("Payment provider is unavailable, please retry")
        }
        CheckoutServiceError::OrderPending { reference } => StatusError::service_unavailable()
            .brief("Payment received, order confirmation pending")
            .detail(format!("retry confirmation for {reference}")),
        CheckoutServiceError::Carts(source) => carts::errors::into_status_error(source),
        CheckoutServiceError::Orders(source) => orders::errors::into_status_error(source),
        CheckoutServiceError::Sql(source) => {
            error!("failed to access checkout attempts: {source}");

            StatusError::internal_server_error()
        }
    }
}
