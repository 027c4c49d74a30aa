//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use storefront_app::domain::{carts::models::CartUuid, products::models::ProductUuid};

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Remove Item from Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let cart = state
        .app
        .carts
        .remove_item(
            principal.user_uuid,
            CartUuid::from_uuid(cart.into_inner()),
            ProductUuid::from_uuid(product.into_inner()),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::carts::MockCartsService;

    use crate::test_helpers::{TestMocks, customer_service, make_cart};

    use super::*;

    #[tokio::test]
    async fn test_remove_returns_remaining_lines() -> TestResult {
        let uuid = CartUuid::new();
        let mut cart = make_cart(uuid);
        let removed = cart.items.remove(0).product_uuid;

        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .withf(move |_, c, p| *c == uuid && *p == removed)
            .return_once(move |_, _, _| Ok(cart));

        let service = customer_service(
            TestMocks {
                carts,
                ..TestMocks::default()
            },
            Router::with_path("carts/{cart}/items/{product}").delete(handler),
        );

        let mut res = TestClient::delete(format!("http://example.com/carts/{uuid}/items/{removed}"))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.items.len(), 1);
        assert_eq!(body.subtotal, 5_00);

        Ok(())
    }
}
