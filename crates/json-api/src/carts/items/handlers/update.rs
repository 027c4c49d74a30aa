//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{carts::models::CartUuid, products::models::ProductUuid};

use super::lenient_quantity;
use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New absolute quantity; zero, negative or non-numeric removes the line
    #[serde(deserialize_with = "lenient_quantity")]
    pub quantity: f64,
}

/// Update Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Set Cart Item Quantity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or line not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    product: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let cart = state
        .app
        .carts
        .update_quantity(
            principal.user_uuid,
            CartUuid::from_uuid(cart.into_inner()),
            ProductUuid::from_uuid(product.into_inner()),
            json.into_inner().quantity,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;

    use storefront_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{TEST_USER_UUID, TestMocks, customer_service, make_cart};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        customer_service(
            TestMocks {
                carts,
                ..TestMocks::default()
            },
            Router::with_path("carts/{cart}/items/{product}").put(handler),
        )
    }

    #[tokio::test]
    async fn test_update_sets_absolute_quantity() {
        let uuid = CartUuid::new();
        let product = ProductUuid::new();
        let cart = make_cart(uuid);

        let mut carts = MockCartsService::new();

        carts
            .expect_update_quantity()
            .once()
            .withf(move |user, c, p, quantity| {
                *user == TEST_USER_UUID
                    && *c == uuid
                    && *p == product
                    && (*quantity - 4.0).abs() < f64::EPSILON
            })
            .return_once(move |_, _, _, _| Ok(cart));

        let res = TestClient::put(format!("http://example.com/carts/{uuid}/items/{product}"))
            .json(&json!({ "quantity": 4 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_update_missing_line_returns_404() {
        let uuid = CartUuid::new();
        let product = ProductUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_update_quantity()
            .once()
            .return_once(|_, _, _, _| Err(CartsServiceError::ItemNotFound));

        let res = TestClient::put(format!("http://example.com/carts/{uuid}/items/{product}"))
            .json(&json!({ "quantity": 2 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_update_with_non_numeric_quantity_removes_line() {
        let uuid = CartUuid::new();
        let product = ProductUuid::new();

        for quantity in [json!("abc"), json!(null)] {
            let cart = make_cart(uuid);
            let mut carts = MockCartsService::new();

            carts
                .expect_update_quantity()
                .once()
                .withf(move |_, _, p, quantity| *p == product && quantity.abs() < f64::EPSILON)
                .return_once(move |_, _, _, _| Ok(cart));

            let res = TestClient::put(format!("http://example.com/carts/{uuid}/items/{product}"))
                .json(&json!({ "quantity": quantity }))
                .send(&make_service(carts))
                .await;

            assert_eq!(res.status_code, Some(StatusCode::OK));
        }
    }
}
