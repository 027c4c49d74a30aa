//! Reports service.

use async_trait::async_trait;
use jiff::{Timestamp, tz::TimeZone};
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        orders::REVENUE_COUNTED_STATUSES,
        reports::{
            errors::ReportsServiceError,
            models::{DashboardSummary, RevenueTrend, revenue_and_count},
            repository::PgReportsRepository,
            trend::{Granularity, bucket_starts, fill_buckets},
        },
    },
};

/// Default stock level below which a product counts as low on stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

const RECENT_ORDER_LIMIT: i64 = 5;

#[derive(Debug, Clone)]
pub struct PgReportsService {
    db: Db,
    repository: PgReportsRepository,
}

impl PgReportsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReportsRepository::new(),
        }
    }
}

#[async_trait]
impl ReportsService for PgReportsService {
    #[tracing::instrument(name = "reports.service.summary", skip(self), err)]
    async fn summary(
        &self,
        low_stock_threshold: u32,
    ) -> Result<DashboardSummary, ReportsServiceError> {
        let pool = self.db.pool();

        let status_totals = self.repository.status_totals(pool).await?;
        let (total_revenue, total_orders) = revenue_and_count(&status_totals);

        let low_stock_products = self
            .repository
            .count_low_stock(pool, low_stock_threshold)
            .await?;

        let recent_orders = self
            .repository
            .recent_orders(pool, RECENT_ORDER_LIMIT)
            .await?;

        Ok(DashboardSummary {
            total_revenue,
            total_orders,
            low_stock_products,
            low_stock_threshold,
            recent_orders,
        })
    }

    #[tracing::instrument(name = "reports.service.revenue_trend", skip(self), err)]
    async fn revenue_trend(
        &self,
        granularity: Granularity,
        periods: u32,
        now: Timestamp,
    ) -> Result<RevenueTrend, ReportsServiceError> {
        let starts = bucket_starts(granularity, periods, now);

        let since = match starts.first() {
            Some(first) => first
                .to_zoned(TimeZone::UTC)
                .map_err(ReportsServiceError::Range)?
                .timestamp(),
            None => now,
        };

        let revenue = self
            .repository
            .revenue_buckets(self.db.pool(), granularity, REVENUE_COUNTED_STATUSES, since)
            .await?;

        Ok(RevenueTrend {
            granularity,
            buckets: fill_buckets(&starts, &revenue),
        })
    }
}

#[automock]
#[async_trait]
pub trait ReportsService: Send + Sync {
    /// Revenue, order count, low-stock count and the latest orders.
    async fn summary(
        &self,
        low_stock_threshold: u32,
    ) -> Result<DashboardSummary, ReportsServiceError>;

    /// Revenue per bucket over the trailing `periods` buckets ending at `now`.
    async fn revenue_trend(
        &self,
        granularity: Granularity,
        periods: u32,
        now: Timestamp,
    ) -> Result<RevenueTrend, ReportsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        auth::Role,
        domain::orders::{OrderStatus, OrdersService},
        test::{
            TestContext,
            helpers::{insert_order, insert_product},
        },
    };

    use super::*;

    #[tokio::test]
    async fn summary_counts_delivered_revenue_and_all_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("report@example.com", Role::Customer).await;

        for total in [100, 200, 300] {
            let order = insert_order(&ctx, user, total).await;

            ctx.orders.update_status(order, OrderStatus::Delivered).await?;
        }

        insert_order(&ctx, user, 50).await;

        insert_product(&ctx, "Scarce", 1_00, 2).await;
        insert_product(&ctx, "Plenty", 1_00, 40).await;

        let summary = ctx.reports.summary(DEFAULT_LOW_STOCK_THRESHOLD).await?;

        assert_eq!(summary.total_revenue, 600);
        assert_eq!(summary.total_orders, 4);
        assert_eq!(summary.low_stock_products, 1);
        assert_eq!(summary.recent_orders.len(), 4);
        assert!(
            summary
                .recent_orders
                .iter()
                .all(|order| order.items.len() == 1),
            "recent orders should carry their lines"
        );

        Ok(())
    }

    #[tokio::test]
    async fn revenue_trend_buckets_todays_delivered_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("trend@example.com", Role::Customer).await;

        let delivered = insert_order(&ctx, user, 700).await;

        ctx.orders
            .update_status(delivered, OrderStatus::Delivered)
            .await?;

        insert_order(&ctx, user, 900).await;

        let trend = ctx
            .reports
            .revenue_trend(Granularity::Day, 7, Timestamp::now())
            .await?;

        let revenue: Vec<u64> = trend.buckets.iter().map(|bucket| bucket.revenue).collect();

        assert_eq!(revenue, vec![0, 0, 0, 0, 0, 0, 700]);

        Ok(())
    }
}
