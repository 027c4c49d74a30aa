//! Get Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::models::{Cart, CartUuid, LineItem};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// One line per product, in the order they were added
    pub items: Vec<CartLineResponse>,

    /// Sum of line totals in minor units
    pub subtotal: u64,

    /// Sum of quantities
    pub item_count: u64,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let subtotal = cart.subtotal();
        let item_count = cart.item_count();

        CartResponse {
            uuid: cart.uuid.into_uuid(),
            items: cart.items.into_iter().map(CartLineResponse::from).collect(),
            subtotal,
            item_count,
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    pub product_uuid: Uuid,

    /// Product name when it was added
    pub name: String,

    /// Unit price in minor units when it was added
    pub price: u64,

    pub quantity: u32,

    pub image: Option<String>,

    /// Unit price times quantity
    pub line_total: u64,
}

impl From<LineItem> for CartLineResponse {
    fn from(line: LineItem) -> Self {
        Self {
            product_uuid: line.product_uuid.into_uuid(),
            line_total: line.line_total(),
            name: line.name,
            price: line.price,
            quantity: line.quantity,
            image: line.image,
        }
    }
}

/// Get Cart Handler
///
/// Returns the saved cart, or an empty one.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart belongs to another user"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(principal.user_uuid, CartUuid::from_uuid(cart.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{TEST_USER_UUID, TestMocks, customer_service, make_cart};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        customer_service(
            TestMocks {
                carts,
                ..TestMocks::default()
            },
            Router::with_path("carts/{cart}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_returns_lines_and_subtotal() -> TestResult {
        let uuid = CartUuid::new();
        let cart = make_cart(uuid);

        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .withf(move |user, c| *user == TEST_USER_UUID && *c == uuid)
            .return_once(move |_, _| Ok(cart));

        let mut res = TestClient::get(format!("http://example.com/carts/{uuid}"))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.items.len(), 2);
        assert_eq!(body.subtotal, 25_00);
        assert_eq!(body.item_count, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_foreign_cart_returns_404() {
        let uuid = CartUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .return_once(|_, _| Err(CartsServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/carts/{uuid}"))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
