//! In-process cart storage.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::domain::carts::{
    CartsServiceError,
    models::{Cart, CartUuid},
    storage::CartStorage,
};

/// Cart storage backed by a map; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryCartStorage {
    carts: RwLock<FxHashMap<CartUuid, Cart>>,
}

impl InMemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStorage for InMemoryCartStorage {
    async fn load(&self, cart: CartUuid) -> Result<Option<Cart>, CartsServiceError> {
        Ok(self.carts.read().await.get(&cart).cloned())
    }

    async fn save(&self, cart: &Cart) -> Result<(), CartsServiceError> {
        let mut carts = self.carts.write().await;

        if carts
            .get(&cart.uuid)
            .is_some_and(|existing| existing.user_uuid != cart.user_uuid)
        {
            return Err(CartsServiceError::NotFound);
        }

        carts.insert(cart.uuid, cart.clone());

        Ok(())
    }
}
