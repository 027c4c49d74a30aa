//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{
    Executor, FromRow, PgPool, Postgres, Row, Transaction, postgres::PgRow, query, query_as,
    types::Json,
};
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    database::{amount_to_i64, try_get_amount},
    domain::{
        orders::{
            models::{
                CustomerOrder, NewOrder, Order, OrderLineItem, OrderTotals, OrderUuid,
                ShippingAddress,
            },
            status::OrderStatus,
        },
        products::models::ProductUuid,
    },
    payments::PaymentReference,
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_BY_REFERENCE_SQL: &str = include_str!("sql/get_order_by_reference.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");
const LIST_ORDERS_BY_USER_SQL: &str = include_str!("sql/list_orders_by_user.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");

/// An `orders` row before its line items are attached.
#[derive(Debug, Clone)]
pub(crate) struct OrderRow {
    pub(crate) uuid: OrderUuid,
    pub(crate) user_uuid: UserUuid,
    pub(crate) payment_reference: PaymentReference,
    pub(crate) status: OrderStatus,
    pub(crate) totals: OrderTotals,
    pub(crate) shipping_address: ShippingAddress,
    pub(crate) created_at: jiff::Timestamp,
    pub(crate) updated_at: jiff::Timestamp,
}

impl OrderRow {
    pub(crate) fn into_order(self, items: Vec<OrderLineItem>) -> Order {
        Order {
            uuid: self.uuid,
            user_uuid: self.user_uuid,
            items,
            totals: self.totals,
            shipping_address: self.shipping_address,
            payment_reference: self.payment_reference,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CustomerOrderRow {
    pub(crate) order: OrderRow,
    pub(crate) customer_name: String,
    pub(crate) customer_email: String,
}

impl CustomerOrderRow {
    pub(crate) fn into_customer_order(self, items: Vec<OrderLineItem>) -> CustomerOrder {
        CustomerOrder {
            order: self.order.into_order(items),
            customer_name: self.customer_name,
            customer_email: self.customer_email,
        }
    }
}

#[derive(Debug, Clone)]
struct OrderItemRow {
    order_uuid: Uuid,
    item: OrderLineItem,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert the order header. Returns `None` when the payment reference is
    /// already taken.
    pub(crate) async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<Option<OrderRow>, sqlx::Error> {
        query_as::<Postgres, OrderRow>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(order.payment_reference.as_str())
            .bind(amount_to_i64(order.totals.subtotal)?)
            .bind(amount_to_i64(order.totals.shipping_fee)?)
            .bind(amount_to_i64(order.totals.tax)?)
            .bind(amount_to_i64(order.totals.total)?)
            .bind(&order.totals.currency)
            .bind(Json(&order.shipping_address))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn insert_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        items: &[OrderLineItem],
    ) -> Result<(), sqlx::Error> {
        for (position, item) in (0_i32..).zip(items) {
            query(CREATE_ORDER_ITEM_SQL)
                .bind(Uuid::now_v7())
                .bind(order.into_uuid())
                .bind(position)
                .bind(item.product_uuid.into_uuid())
                .bind(&item.name)
                .bind(&item.image)
                .bind(amount_to_i64(item.price_at_purchase)?)
                .bind(i32::try_from(item.quantity).map_err(|e| sqlx::Error::Encode(Box::new(e)))?)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    pub(crate) async fn find_by_reference(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reference: &PaymentReference,
    ) -> Result<OrderRow, sqlx::Error> {
        query_as::<Postgres, OrderRow>(GET_ORDER_BY_REFERENCE_SQL)
            .bind(reference.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        pool: &PgPool,
        order: OrderUuid,
    ) -> Result<OrderRow, sqlx::Error> {
        query_as::<Postgres, OrderRow>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(pool)
            .await
    }

    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRow, sqlx::Error> {
        query_as::<Postgres, OrderRow>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRow, sqlx::Error> {
        query_as::<Postgres, OrderRow>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_by_user(
        &self,
        pool: &PgPool,
        user: UserUuid,
    ) -> Result<Vec<OrderRow>, sqlx::Error> {
        query_as::<Postgres, OrderRow>(LIST_ORDERS_BY_USER_SQL)
            .bind(user.into_uuid())
            .fetch_all(pool)
            .await
    }

    pub(crate) async fn list_all(&self, pool: &PgPool) -> Result<Vec<CustomerOrderRow>, sqlx::Error> {
        query_as::<Postgres, CustomerOrderRow>(LIST_ORDERS_SQL)
            .fetch_all(pool)
            .await
    }

    /// Line items of each order, in purchase order, keyed by order uuid.
    pub(crate) async fn get_items<'e, E>(
        &self,
        executor: E,
        orders: Vec<Uuid>,
    ) -> Result<FxHashMap<Uuid, Vec<OrderLineItem>>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if orders.is_empty() {
            return Ok(FxHashMap::default());
        }

        let rows = query_as::<Postgres, OrderItemRow>(GET_ORDER_ITEMS_SQL)
            .bind(orders)
            .fetch_all(executor)
            .await?;

        let mut grouped: FxHashMap<Uuid, Vec<OrderLineItem>> = FxHashMap::default();

        for row in rows {
            grouped.entry(row.order_uuid).or_default().push(row.item);
        }

        Ok(grouped)
    }
}

fn try_get_status(row: &PgRow) -> Result<OrderStatus, sqlx::Error> {
    let status: String = row.try_get("status")?;

    status.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for OrderRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let payment_reference: String = row.try_get("payment_reference")?;
        let Json(shipping_address) = row.try_get::<Json<ShippingAddress>, _>("shipping_address")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            payment_reference: PaymentReference::from(payment_reference),
            status: try_get_status(row)?,
            totals: OrderTotals {
                subtotal: try_get_amount(row, "subtotal")?,
                shipping_fee: try_get_amount(row, "shipping_fee")?,
                tax: try_get_amount(row, "tax")?,
                total: try_get_amount(row, "total")?,
                currency: row.try_get("currency")?,
            },
            shipping_address,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CustomerOrderRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order: OrderRow::from_row(row)?,
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;

        Ok(Self {
            order_uuid: row.try_get("order_uuid")?,
            item: OrderLineItem {
                product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                name: row.try_get("name")?,
                image: row.try_get("image")?,
                price_at_purchase: try_get_amount(row, "price_at_purchase")?,
                quantity: u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "quantity".to_string(),
                    source: Box::new(e),
                })?,
            },
        })
    }
}
