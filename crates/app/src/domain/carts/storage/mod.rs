//! Cart snapshot storage.

use async_trait::async_trait;
use mockall::automock;

use crate::domain::carts::{
    CartsServiceError,
    models::{Cart, CartUuid},
};

mod memory;
mod postgres;

pub use memory::InMemoryCartStorage;
pub use postgres::PgCartStorage;

/// Where cart snapshots live between requests.
#[automock]
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Load the last saved snapshot of a cart, if any.
    async fn load(&self, cart: CartUuid) -> Result<Option<Cart>, CartsServiceError>;

    /// Replace the saved snapshot of a cart.
    ///
    /// Saving over a cart owned by a different user fails with
    /// [`CartsServiceError::NotFound`].
    async fn save(&self, cart: &Cart) -> Result<(), CartsServiceError>;
}
