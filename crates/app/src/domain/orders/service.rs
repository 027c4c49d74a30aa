//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info};

use crate::{
    auth::UserUuid,
    database::Db,
    domain::orders::{
        errors::OrdersServiceError,
        models::{CustomerOrder, NewOrder, Order, OrderCreation, OrderUuid},
        repository::PgOrdersRepository,
        status::OrderStatus,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }
}

/// Reject orders whose amounts don't add up before they reach storage.
fn validate_new_order(order: &NewOrder) -> Result<(), OrdersServiceError> {
    if order.items.is_empty() {
        return Err(OrdersServiceError::MissingRequiredData);
    }

    let subtotal = order
        .items
        .iter()
        .fold(0_u64, |sum, item| sum.saturating_add(item.line_total()));

    let total = order
        .totals
        .subtotal
        .checked_add(order.totals.shipping_fee)
        .and_then(|sum| sum.checked_add(order.totals.tax));

    if subtotal != order.totals.subtotal || total != Some(order.totals.total) {
        return Err(OrdersServiceError::InvalidData);
    }

    Ok(())
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_for_payment",
        skip(self, order),
        fields(
            payment_reference = %order.payment_reference,
            user_uuid = %order.user_uuid,
            order_uuid = tracing::field::Empty,
            created = tracing::field::Empty
        ),
        err
    )]
    async fn create_for_payment(
        &self,
        order: NewOrder,
    ) -> Result<OrderCreation, OrdersServiceError> {
        validate_new_order(&order)?;

        let mut tx = self.db.begin_transaction().await?;

        let creation = match self.repository.insert_order(&mut tx, &order).await? {
            Some(row) => {
                self.repository
                    .insert_items(&mut tx, row.uuid, &order.items)
                    .await?;

                OrderCreation {
                    order: row.into_order(order.items),
                    created: true,
                }
            }
            None => {
                let row = self
                    .repository
                    .find_by_reference(&mut tx, &order.payment_reference)
                    .await?;

                if row.user_uuid != order.user_uuid {
                    return Err(OrdersServiceError::ReferenceConflict);
                }

                let mut items = self
                    .repository
                    .get_items(&mut *tx, vec![row.uuid.into_uuid()])
                    .await?;

                let items = items.remove(&row.uuid.into_uuid()).unwrap_or_default();

                OrderCreation {
                    order: row.into_order(items),
                    created: false,
                }
            }
        };

        tx.commit().await?;

        let span = Span::current();

        span.record("order_uuid", tracing::field::display(creation.order.uuid));
        span.record("created", creation.created);

        if creation.created {
            info!(total = creation.order.totals.total, "order created");
        } else {
            info!("order already existed for payment reference");
        }

        Ok(creation)
    }

    #[tracing::instrument(name = "orders.service.get_order", skip(self), err)]
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let row = self.repository.get_order(self.db.pool(), order).await?;

        let mut items = self
            .repository
            .get_items(self.db.pool(), vec![order.into_uuid()])
            .await?;

        let items = items.remove(&order.into_uuid()).unwrap_or_default();

        Ok(row.into_order(items))
    }

    #[tracing::instrument(name = "orders.service.list_by_user", skip(self), err)]
    async fn list_by_user(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let rows = self.repository.list_by_user(self.db.pool(), user).await?;

        let uuids = rows.iter().map(|row| row.uuid.into_uuid()).collect();

        let mut items = self.repository.get_items(self.db.pool(), uuids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let lines = items.remove(&row.uuid.into_uuid()).unwrap_or_default();

                row.into_order(lines)
            })
            .collect())
    }

    #[tracing::instrument(name = "orders.service.list_all", skip(self), err)]
    async fn list_all(&self) -> Result<Vec<CustomerOrder>, OrdersServiceError> {
        let rows = self.repository.list_all(self.db.pool()).await?;

        let uuids = rows.iter().map(|row| row.order.uuid.into_uuid()).collect();

        let mut items = self.repository.get_items(self.db.pool(), uuids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let lines = items
                    .remove(&row.order.uuid.into_uuid())
                    .unwrap_or_default();

                row.into_customer_order(lines)
            })
            .collect())
    }

    #[tracing::instrument(name = "orders.service.update_status", skip(self), err)]
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.repository.lock_order(&mut tx, order).await?;

        let next = current.status.transition_to(status)?;

        let row = self.repository.update_status(&mut tx, order, next).await?;

        let mut items = self
            .repository
            .get_items(&mut *tx, vec![order.into_uuid()])
            .await?;

        tx.commit().await?;

        info!(from = %current.status, to = %next, "order status updated");

        let items = items.remove(&order.into_uuid()).unwrap_or_default();

        Ok(row.into_order(items))
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Create the order for a verified payment, or return the one that
    /// already exists for its payment reference.
    async fn create_for_payment(&self, order: NewOrder)
    -> Result<OrderCreation, OrdersServiceError>;

    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Orders placed by `user`, newest first.
    async fn list_by_user(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// Every order, newest first, with the customer's display fields.
    async fn list_all(&self) -> Result<Vec<CustomerOrder>, OrdersServiceError>;

    /// Move an order to `status`, failing if it is already terminal.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;
}
