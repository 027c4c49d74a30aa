//! `PostgreSQL` checkout attempt storage.

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as, types::Json};

use crate::{
    auth::UserUuid,
    database::{Db, amount_to_i64, try_get_amount},
    domain::{
        carts::models::CartUuid,
        checkout::{
            CheckoutServiceError,
            attempts::CheckoutAttempts,
            models::{CheckoutAttempt, CheckoutState},
        },
        orders::models::{OrderLineItem, OrderTotals, OrderUuid, ShippingAddress},
    },
    payments::PaymentReference,
};

const CREATE_CHECKOUT_ATTEMPT_SQL: &str = include_str!("../sql/create_checkout_attempt.sql");
const GET_CHECKOUT_ATTEMPT_SQL: &str = include_str!("../sql/get_checkout_attempt.sql");
const UPDATE_CHECKOUT_ATTEMPT_SQL: &str = include_str!("../sql/update_checkout_attempt.sql");

#[derive(Debug, Clone)]
pub struct PgCheckoutAttempts {
    db: Db,
}

impl PgCheckoutAttempts {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CheckoutAttempts for PgCheckoutAttempts {
    async fn insert(&self, attempt: &CheckoutAttempt) -> Result<(), CheckoutServiceError> {
        query(CREATE_CHECKOUT_ATTEMPT_SQL)
            .bind(attempt.reference.as_str())
            .bind(attempt.user_uuid.into_uuid())
            .bind(attempt.cart_uuid.into_uuid())
            .bind(attempt.state.as_str())
            .bind(Json(&attempt.shipping_address))
            .bind(Json(&attempt.items))
            .bind(amount_to_i64(attempt.totals.subtotal)?)
            .bind(amount_to_i64(attempt.totals.shipping_fee)?)
            .bind(amount_to_i64(attempt.totals.tax)?)
            .bind(amount_to_i64(attempt.totals.total)?)
            .bind(&attempt.totals.currency)
            .bind(attempt.payment_verified)
            .bind(attempt.order_uuid.map(OrderUuid::into_uuid))
            .bind(&attempt.last_error)
            .bind(SqlxTimestamp::from(attempt.created_at))
            .bind(SqlxTimestamp::from(attempt.updated_at))
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    async fn get(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<CheckoutAttempt>, CheckoutServiceError> {
        Ok(
            query_as::<Postgres, CheckoutAttempt>(GET_CHECKOUT_ATTEMPT_SQL)
                .bind(reference.as_str())
                .fetch_optional(self.db.pool())
                .await?,
        )
    }

    async fn save(
        &self,
        attempt: &CheckoutAttempt,
        expected: CheckoutState,
    ) -> Result<(), CheckoutServiceError> {
        let rows_affected = query(UPDATE_CHECKOUT_ATTEMPT_SQL)
            .bind(attempt.reference.as_str())
            .bind(attempt.state.as_str())
            .bind(attempt.payment_verified)
            .bind(attempt.order_uuid.map(OrderUuid::into_uuid))
            .bind(&attempt.last_error)
            .bind(SqlxTimestamp::from(attempt.updated_at))
            .bind(expected.as_str())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        if rows_affected > 0 {
            return Ok(());
        }

        match self.get(&attempt.reference).await? {
            Some(_) => Err(CheckoutServiceError::Conflict),
            None => Err(CheckoutServiceError::NotFound),
        }
    }
}

impl<'r> FromRow<'r, PgRow> for CheckoutAttempt {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let reference: String = row.try_get("reference")?;
        let state: String = row.try_get("state")?;
        let Json(shipping_address) = row.try_get::<Json<ShippingAddress>, _>("shipping_address")?;
        let Json(items) = row.try_get::<Json<Vec<OrderLineItem>>, _>("items")?;

        Ok(Self {
            reference: PaymentReference::from(reference),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            state: state
                .parse::<CheckoutState>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "state".to_string(),
                    source: Box::new(e),
                })?,
            shipping_address,
            items,
            totals: OrderTotals {
                subtotal: try_get_amount(row, "subtotal")?,
                shipping_fee: try_get_amount(row, "shipping_fee")?,
                tax: try_get_amount(row, "tax")?,
                total: try_get_amount(row, "total")?,
                currency: row.try_get("currency")?,
            },
            payment_verified: row.try_get("payment_verified")?,
            order_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("order_uuid")?
                .map(OrderUuid::from_uuid),
            last_error: row.try_get("last_error")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
