//! `PostgreSQL` cart snapshot storage.

use async_trait::async_trait;
use sqlx::{Postgres, query, query_scalar, types::Json};

use crate::{
    database::Db,
    domain::carts::{
        CartsServiceError,
        models::{Cart, CartUuid},
        storage::CartStorage,
    },
};

const GET_CART_SNAPSHOT_SQL: &str = include_str!("../sql/get_cart_snapshot.sql");
const SAVE_CART_SNAPSHOT_SQL: &str = include_str!("../sql/save_cart_snapshot.sql");

/// Stores each cart as a single JSONB snapshot row.
#[derive(Debug, Clone)]
pub struct PgCartStorage {
    db: Db,
}

impl PgCartStorage {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartStorage for PgCartStorage {
    async fn load(&self, cart: CartUuid) -> Result<Option<Cart>, CartsServiceError> {
        let snapshot = query_scalar::<Postgres, Json<Cart>>(GET_CART_SNAPSHOT_SQL)
            .bind(cart.into_uuid())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(snapshot.map(|Json(cart)| cart))
    }

    async fn save(&self, cart: &Cart) -> Result<(), CartsServiceError> {
        let rows_affected = query(SAVE_CART_SNAPSHOT_SQL)
            .bind(cart.uuid.into_uuid())
            .bind(cart.user_uuid.into_uuid())
            .bind(Json(cart))
            .execute(self.db.pool())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        auth::Role,
        domain::{carts::models::ProductSnapshot, products::models::ProductUuid},
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn snapshot_round_trips_through_postgres() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("cart@example.com", Role::Customer).await;
        let storage = PgCartStorage::new(ctx.db());

        let mut cart = Cart::new(CartUuid::new(), user);

        cart.add_item(
            ProductSnapshot {
                product_uuid: ProductUuid::new(),
                name: "Mug".to_string(),
                price: 8_00,
                image: Some("mug.png".to_string()),
            },
            2.0,
        );

        storage.save(&cart).await?;
        cart.clear();
        storage.save(&cart).await?;

        let restored = storage.load(cart.uuid).await?;

        assert_eq!(restored, Some(cart));

        Ok(())
    }

    #[tokio::test]
    async fn save_over_another_users_cart_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = ctx.create_user("owner@example.com", Role::Customer).await;
        let other = ctx.create_user("other@example.com", Role::Customer).await;
        let storage = PgCartStorage::new(ctx.db());

        let cart = Cart::new(CartUuid::new(), owner);

        storage.save(&cart).await?;

        let result = storage.save(&Cart::new(cart.uuid, other)).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn load_unknown_cart_returns_none() -> TestResult {
        let ctx = TestContext::new().await;
        let storage = PgCartStorage::new(ctx.db());

        assert_eq!(storage.load(CartUuid::new()).await?, None);

        Ok(())
    }
}
