//! Report Models

use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};

use crate::domain::{
    orders::{OrderStatus, models::OrderUuid},
    products::models::ProductUuid,
    reports::trend::Granularity,
};

/// Per-status totals as aggregated by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTotals {
    pub status: OrderStatus,
    pub order_count: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentOrderLine {
    pub product_uuid: ProductUuid,

    /// Current catalog name, or the purchase-time name if the product is gone.
    pub name: String,

    pub quantity: u32,
    pub price_at_purchase: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentOrder {
    pub uuid: OrderUuid,
    pub customer_name: String,
    pub status: OrderStatus,
    pub total: u64,
    pub currency: String,
    pub created_at: Timestamp,
    pub items: Vec<RecentOrderLine>,
}

/// Admin dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Sum of totals over revenue-counted orders, in minor units.
    pub total_revenue: u64,
    pub total_orders: u64,
    pub low_stock_products: u64,
    pub low_stock_threshold: u32,
    pub recent_orders: Vec<RecentOrder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBucket {
    /// First day of the bucket, UTC.
    pub period_start: Date,
    pub revenue: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueTrend {
    pub granularity: Granularity,
    pub buckets: Vec<RevenueBucket>,
}

/// Fold per-status rows into `(revenue, order count)`.
///
/// Every order counts towards the total; only revenue-counted statuses add to
/// revenue.
#[must_use]
pub fn revenue_and_count(rows: &[StatusTotals]) -> (u64, u64) {
    rows.iter().fold((0, 0), |(revenue, count), row| {
        let revenue = if row.status.counts_as_revenue() {
            revenue.saturating_add(row.total)
        } else {
            revenue
        };

        (revenue, count.saturating_add(row.order_count))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: OrderStatus, order_count: u64, total: u64) -> StatusTotals {
        StatusTotals {
            status,
            order_count,
            total,
        }
    }

    #[test]
    fn revenue_counts_only_delivered_orders() {
        let rows = [
            row(OrderStatus::Delivered, 3, 600),
            row(OrderStatus::Pending, 1, 50),
        ];

        assert_eq!(revenue_and_count(&rows), (600, 4));
    }

    #[test]
    fn each_delivered_order_adds_its_total_and_others_only_count() {
        let rows = [
            row(OrderStatus::Delivered, 1, 100),
            row(OrderStatus::Delivered, 1, 200),
            row(OrderStatus::Delivered, 1, 300),
            row(OrderStatus::Pending, 1, 999),
        ];

        assert_eq!(revenue_and_count(&rows), (600, 4));
    }

    #[test]
    fn cancelled_and_in_flight_orders_add_no_revenue() {
        let rows = [
            row(OrderStatus::Cancelled, 2, 1_000),
            row(OrderStatus::Processing, 1, 300),
            row(OrderStatus::Shipped, 1, 200),
        ];

        assert_eq!(revenue_and_count(&rows), (0, 4));
    }

    #[test]
    fn no_orders_is_zero() {
        assert_eq!(revenue_and_count(&[]), (0, 0));
    }
}
