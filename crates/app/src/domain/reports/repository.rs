//! Reports Repository

use jiff::{Timestamp, civil::Date};
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use rustc_hash::FxHashMap;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::try_get_amount,
    domain::{
        orders::{OrderStatus, models::OrderUuid},
        products::models::ProductUuid,
        reports::{
            models::{RecentOrder, RecentOrderLine, StatusTotals},
            trend::Granularity,
        },
    },
};

const ORDER_STATUS_TOTALS_SQL: &str = include_str!("sql/order_status_totals.sql");
const COUNT_LOW_STOCK_PRODUCTS_SQL: &str = include_str!("sql/count_low_stock_products.sql");
const RECENT_ORDERS_SQL: &str = include_str!("sql/recent_orders.sql");
const RECENT_ORDER_ITEMS_SQL: &str = include_str!("sql/recent_order_items.sql");
const REVENUE_BUCKETS_SQL: &str = include_str!("sql/revenue_buckets.sql");

#[derive(Debug, Clone)]
struct RecentOrderLineRow {
    order_uuid: Uuid,
    line: RecentOrderLine,
}

#[derive(Debug, Clone, Copy)]
struct RevenueBucketRow {
    bucket: Date,
    revenue: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReportsRepository;

impl PgReportsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn status_totals(
        &self,
        pool: &PgPool,
    ) -> Result<Vec<StatusTotals>, sqlx::Error> {
        query_as::<Postgres, StatusTotals>(ORDER_STATUS_TOTALS_SQL)
            .fetch_all(pool)
            .await
    }

    pub(crate) async fn count_low_stock(
        &self,
        pool: &PgPool,
        threshold: u32,
    ) -> Result<u64, sqlx::Error> {
        let threshold = i32::try_from(threshold).unwrap_or(i32::MAX);

        let count = query_scalar::<Postgres, i64>(COUNT_LOW_STOCK_PRODUCTS_SQL)
            .bind(threshold)
            .fetch_one(pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// The most recent orders with their lines, newest first.
    pub(crate) async fn recent_orders(
        &self,
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<RecentOrder>, sqlx::Error> {
        let mut orders = query_as::<Postgres, RecentOrder>(RECENT_ORDERS_SQL)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        if orders.is_empty() {
            return Ok(orders);
        }

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.uuid.into_uuid()).collect();

        let rows = query_as::<Postgres, RecentOrderLineRow>(RECENT_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(pool)
            .await?;

        let mut lines: FxHashMap<Uuid, Vec<RecentOrderLine>> = FxHashMap::default();

        for row in rows {
            lines.entry(row.order_uuid).or_default().push(row.line);
        }

        for order in &mut orders {
            order.items = lines.remove(&order.uuid.into_uuid()).unwrap_or_default();
        }

        Ok(orders)
    }

    /// Revenue per bucket start for orders created at or after `since`.
    pub(crate) async fn revenue_buckets(
        &self,
        pool: &PgPool,
        granularity: Granularity,
        statuses: &[OrderStatus],
        since: Timestamp,
    ) -> Result<Vec<(Date, u64)>, sqlx::Error> {
        let statuses: Vec<&str> = statuses.iter().map(|status| status.as_str()).collect();

        let rows = query_as::<Postgres, RevenueBucketRow>(REVENUE_BUCKETS_SQL)
            .bind(granularity.as_str())
            .bind(statuses)
            .bind(SqlxTimestamp::from(since))
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(|row| (row.bucket, row.revenue)).collect())
    }
}

fn try_get_status(row: &PgRow) -> Result<OrderStatus, sqlx::Error> {
    let status: String = row.try_get("status")?;

    status.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: Box::new(e),
    })
}

fn try_get_count(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let count: i64 = row.try_get(col)?;

    u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for StatusTotals {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            status: try_get_status(row)?,
            order_count: try_get_count(row, "order_count")?,
            total: try_get_amount(row, "total_sum")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for RecentOrder {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer_name: row.try_get("customer_name")?,
            status: try_get_status(row)?,
            total: try_get_amount(row, "total")?,
            currency: row.try_get("currency")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            items: Vec::new(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for RecentOrderLineRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;

        Ok(Self {
            order_uuid: row.try_get("order_uuid")?,
            line: RecentOrderLine {
                product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                name: row.try_get("name")?,
                quantity: u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "quantity".to_string(),
                    source: Box::new(e),
                })?,
                price_at_purchase: try_get_amount(row, "price_at_purchase")?,
            },
        })
    }
}

impl<'r> FromRow<'r, PgRow> for RevenueBucketRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            bucket: row.try_get::<SqlxDate, _>("bucket")?.to_jiff(),
            revenue: try_get_amount(row, "revenue")?,
        })
    }
}
