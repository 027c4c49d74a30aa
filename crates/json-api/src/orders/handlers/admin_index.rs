//! Admin Order Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::CustomerOrderResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomerOrdersResponse {
    /// Every order, newest first
    pub orders: Vec<CustomerOrderResponse>,
}

/// Admin Order Index Handler
#[endpoint(
    tags("admin"),
    summary = "List All Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CustomerOrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let orders = state
        .app
        .orders
        .list_all()
        .await
        .map_err(into_status_error)?;

    Ok(Json(CustomerOrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::{
        auth::Role,
        domain::orders::{
            MockOrdersService, OrderStatus,
            models::{CustomerOrder, OrderUuid},
        },
    };

    use crate::test_helpers::{TestMocks, make_order, service_as};

    use super::*;

    fn make_service(role: Role, orders: MockOrdersService) -> Service {
        service_as(
            role,
            TestMocks {
                orders,
                ..TestMocks::default()
            },
            Router::with_path("admin/orders").get(handler),
        )
    }

    #[tokio::test]
    async fn test_admin_lists_orders_with_customer_fields() -> TestResult {
        let order = make_order(OrderUuid::new(), OrderStatus::Processing);

        let mut orders = MockOrdersService::new();

        orders.expect_list_all().once().return_once(move || {
            Ok(vec![CustomerOrder {
                order,
                customer_name: "Ada Lovelace".to_string(),
                customer_email: "ada@example.com".to_string(),
            }])
        });

        let mut res = TestClient::get("http://example.com/admin/orders")
            .send(&make_service(Role::Admin, orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CustomerOrdersResponse = res.take_json().await?;

        assert_eq!(body.orders.len(), 1);
        assert_eq!(
            body.orders.first().map(|o| o.customer_name.as_str()),
            Some("Ada Lovelace")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_is_forbidden() {
        let res = TestClient::get("http://example.com/admin/orders")
            .send(&make_service(Role::Customer, MockOrdersService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
    }
}
