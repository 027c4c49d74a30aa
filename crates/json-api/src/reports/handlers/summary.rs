//! Dashboard Summary Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::reports::models::{DashboardSummary, RecentOrder, RecentOrderLine};

use crate::{extensions::*, reports::errors::into_status_error, state::State};

/// Recent Order Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RecentOrderLineResponse {
    pub product_uuid: Uuid,
    pub name: String,
    pub quantity: u32,
    pub price_at_purchase: u64,
}

impl From<RecentOrderLine> for RecentOrderLineResponse {
    fn from(line: RecentOrderLine) -> Self {
        Self {
            product_uuid: line.product_uuid.into_uuid(),
            name: line.name,
            quantity: line.quantity,
            price_at_purchase: line.price_at_purchase,
        }
    }
}

/// Recent Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RecentOrderResponse {
    pub uuid: Uuid,
    pub customer_name: String,
    pub status: String,
    pub total: u64,
    pub currency: String,
    pub created_at: String,
    pub items: Vec<RecentOrderLineResponse>,
}

impl From<RecentOrder> for RecentOrderResponse {
    fn from(order: RecentOrder) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            customer_name: order.customer_name,
            status: order.status.to_string(),
            total: order.total,
            currency: order.currency,
            created_at: order.created_at.to_string(),
            items: order.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Dashboard Summary Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SummaryResponse {
    /// Sum of delivered order totals, in minor units
    pub total_revenue: u64,

    /// Every order regardless of status
    pub total_orders: u64,

    /// Live products with stock below the threshold
    pub low_stock_products: u64,

    pub low_stock_threshold: u32,

    /// Newest first
    pub recent_orders: Vec<RecentOrderResponse>,
}

impl From<DashboardSummary> for SummaryResponse {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            total_revenue: summary.total_revenue,
            total_orders: summary.total_orders,
            low_stock_products: summary.low_stock_products,
            low_stock_threshold: summary.low_stock_threshold,
            recent_orders: summary.recent_orders.into_iter().map(Into::into).collect(),
        }
    }
}

/// Dashboard Summary Handler
#[endpoint(
    tags("reports"),
    summary = "Dashboard Summary",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Dashboard figures"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    low_stock_threshold: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<SummaryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.admin_or_403()?;

    let threshold = low_stock_threshold
        .into_inner()
        .unwrap_or(state.low_stock_threshold);

    let summary = state
        .app
        .reports
        .summary(threshold)
        .await
        .map_err(into_status_error)?;

    Ok(Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::{
        orders::{OrderStatus, models::OrderUuid},
        products::models::ProductUuid,
        reports::MockReportsService,
    };

    use crate::test_helpers::{
        TEST_LOW_STOCK_THRESHOLD, TestMocks, admin_service, customer_service,
    };

    use super::*;

    fn route() -> Router {
        Router::with_path("admin/reports/summary").get(handler)
    }

    fn make_summary(threshold: u32) -> DashboardSummary {
        DashboardSummary {
            total_revenue: 120_00,
            total_orders: 3,
            low_stock_products: 2,
            low_stock_threshold: threshold,
            recent_orders: vec![RecentOrder {
                uuid: OrderUuid::new(),
                customer_name: "Ada Lovelace".to_string(),
                status: OrderStatus::Delivered,
                total: 120_00,
                currency: "USD".to_string(),
                created_at: Timestamp::UNIX_EPOCH,
                items: vec![RecentOrderLine {
                    product_uuid: ProductUuid::new(),
                    name: "Mug".to_string(),
                    quantity: 2,
                    price_at_purchase: 60_00,
                }],
            }],
        }
    }

    #[tokio::test]
    async fn test_summary_uses_configured_threshold_by_default() -> TestResult {
        let mut reports = MockReportsService::new();

        reports
            .expect_summary()
            .once()
            .withf(|threshold| *threshold == TEST_LOW_STOCK_THRESHOLD)
            .return_once(|threshold| Ok(make_summary(threshold)));

        let service = admin_service(
            TestMocks {
                reports,
                ..TestMocks::default()
            },
            route(),
        );

        let mut res = TestClient::get("http://example.com/admin/reports/summary")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: SummaryResponse = res.take_json().await?;

        assert_eq!(body.total_revenue, 120_00);
        assert_eq!(body.total_orders, 3);
        assert_eq!(body.low_stock_threshold, TEST_LOW_STOCK_THRESHOLD);
        assert_eq!(body.recent_orders.len(), 1);
        assert_eq!(body.recent_orders[0].status, "delivered");

        Ok(())
    }

    #[tokio::test]
    async fn test_summary_accepts_threshold_override() {
        let mut reports = MockReportsService::new();

        reports
            .expect_summary()
            .once()
            .withf(|threshold| *threshold == 3)
            .return_once(|threshold| Ok(make_summary(threshold)));

        let service = admin_service(
            TestMocks {
                reports,
                ..TestMocks::default()
            },
            route(),
        );

        let res = TestClient::get("http://example.com/admin/reports/summary?low_stock_threshold=3")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_customer_is_forbidden() {
        let mut reports = MockReportsService::new();

        reports.expect_summary().never();

        let service = customer_service(
            TestMocks {
                reports,
                ..TestMocks::default()
            },
            route(),
        );

        let res = TestClient::get("http://example.com/admin/reports/summary")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
    }
}
