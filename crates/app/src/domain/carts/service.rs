//! Carts service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::debug;

use crate::{
    auth::UserUuid,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{Cart, CartUuid, ProductSnapshot, coerce_quantity},
            storage::CartStorage,
        },
        products::{ProductsService, models::ProductUuid},
    },
};

/// Cart operations over a [`CartStorage`], persisting after every mutation.
#[derive(Clone)]
pub struct CartStore {
    storage: Arc<dyn CartStorage>,
    products: Arc<dyn ProductsService>,
}

impl CartStore {
    #[must_use]
    pub fn new(storage: Arc<dyn CartStorage>, products: Arc<dyn ProductsService>) -> Self {
        Self { storage, products }
    }

    async fn load_owned(&self, user: UserUuid, cart: CartUuid) -> Result<Cart, CartsServiceError> {
        match self.storage.load(cart).await? {
            Some(existing) if existing.user_uuid == user => Ok(existing),
            Some(_) => Err(CartsServiceError::NotFound),
            None => Ok(Cart::new(cart, user)),
        }
    }

    async fn persist(&self, mut cart: Cart) -> Result<Cart, CartsServiceError> {
        cart.updated_at = Timestamp::now();

        self.storage.save(&cart).await?;

        debug!(
            cart_uuid = %cart.uuid,
            lines = cart.items.len(),
            subtotal = cart.subtotal(),
            "saved cart snapshot"
        );

        Ok(cart)
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl CartsService for CartStore {
    async fn get_cart(&self, user: UserUuid, cart: CartUuid) -> Result<Cart, CartsServiceError> {
        self.load_owned(user, cart).await
    }

    async fn add_item(
        &self,
        user: UserUuid,
        cart: CartUuid,
        product: ProductUuid,
        quantity: f64,
    ) -> Result<Cart, CartsServiceError> {
        let mut current = self.load_owned(user, cart).await?;

        if coerce_quantity(quantity) == 0 {
            return Ok(current);
        }

        let product = self.products.get_product(product).await?;

        current.add_item(ProductSnapshot::from(&product), quantity);

        self.persist(current).await
    }

    async fn update_quantity(
        &self,
        user: UserUuid,
        cart: CartUuid,
        product: ProductUuid,
        quantity: f64,
    ) -> Result<Cart, CartsServiceError> {
        let mut current = self.load_owned(user, cart).await?;

        if !current.contains(product) {
            return Err(CartsServiceError::ItemNotFound);
        }

        current.update_quantity(product, quantity);

        self.persist(current).await
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError> {
        let mut current = self.load_owned(user, cart).await?;

        if !current.remove_item(product) {
            return Ok(current);
        }

        self.persist(current).await
    }

    async fn clear_cart(&self, user: UserUuid, cart: CartUuid) -> Result<Cart, CartsServiceError> {
        let mut current = self.load_owned(user, cart).await?;

        current.clear();

        self.persist(current).await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve a cart, or an empty one if nothing was saved yet.
    async fn get_cart(&self, user: UserUuid, cart: CartUuid) -> Result<Cart, CartsServiceError>;

    /// Add a product to the cart, merging with an existing line.
    async fn add_item(
        &self,
        user: UserUuid,
        cart: CartUuid,
        product: ProductUuid,
        quantity: f64,
    ) -> Result<Cart, CartsServiceError>;

    /// Set the quantity of a line; zero or less removes it.
    async fn update_quantity(
        &self,
        user: UserUuid,
        cart: CartUuid,
        product: ProductUuid,
        quantity: f64,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a product's line.
    async fn remove_item(
        &self,
        user: UserUuid,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove every line.
    async fn clear_cart(&self, user: UserUuid, cart: CartUuid) -> Result<Cart, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            carts::storage::{InMemoryCartStorage, MockCartStorage},
            products::{MockProductsService, ProductsServiceError},
        },
        test::helpers::make_product,
    };

    use super::*;

    fn store_with(products: MockProductsService) -> CartStore {
        CartStore::new(Arc::new(InMemoryCartStorage::new()), Arc::new(products))
    }

    #[tokio::test]
    async fn get_cart_without_snapshot_returns_empty_cart() -> TestResult {
        let store = store_with(MockProductsService::new());
        let user = UserUuid::new();
        let uuid = CartUuid::new();

        let cart = store.get_cart(user, uuid).await?;

        assert_eq!(cart.uuid, uuid);
        assert_eq!(cart.user_uuid, user);
        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn add_item_snapshots_product_and_persists() -> TestResult {
        let product = make_product(10_00);
        let product_uuid = product.uuid;

        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .times(2)
            .withf(move |uuid| *uuid == product_uuid)
            .returning(move |_| Ok(product.clone()));

        let store = store_with(products);
        let user = UserUuid::new();
        let cart = CartUuid::new();

        store.add_item(user, cart, product_uuid, 1.0).await?;
        store.add_item(user, cart, product_uuid, 1.0).await?;

        let restored = store.get_cart(user, cart).await?;

        assert_eq!(restored.items.len(), 1);
        assert_eq!(restored.item_count(), 2);
        assert_eq!(restored.subtotal(), 20_00);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_with_zero_quantity_skips_lookup() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_get_product().never();

        let store = store_with(products);

        let cart = store
            .add_item(UserUuid::new(), CartUuid::new(), ProductUuid::new(), 0.0)
            .await?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn add_item_unknown_product_returns_product_not_found() {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        let store = store_with(products);

        let result = store
            .add_item(UserUuid::new(), CartUuid::new(), ProductUuid::new(), 1.0)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn cart_of_another_user_is_not_found() -> TestResult {
        let product = make_product(1_00);
        let product_uuid = product.uuid;

        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .return_once(move |_| Ok(product));

        let store = store_with(products);
        let cart = CartUuid::new();

        store.add_item(UserUuid::new(), cart, product_uuid, 1.0).await?;

        let result = store.get_cart(UserUuid::new(), cart).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound for a foreign cart, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_to_zero_removes_line() -> TestResult {
        let product = make_product(4_00);
        let product_uuid = product.uuid;

        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .return_once(move |_| Ok(product));

        let store = store_with(products);
        let user = UserUuid::new();
        let cart = CartUuid::new();

        store.add_item(user, cart, product_uuid, 3.0).await?;

        let updated = store.update_quantity(user, cart, product_uuid, 0.0).await?;

        assert!(updated.is_empty());
        assert!(store.get_cart(user, cart).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_of_missing_line_returns_item_not_found() {
        let store = store_with(MockProductsService::new());

        let result = store
            .update_quantity(UserUuid::new(), CartUuid::new(), ProductUuid::new(), 2.0)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn remove_missing_line_does_not_write() -> TestResult {
        let mut storage = MockCartStorage::new();

        storage.expect_load().once().return_once(|_| Ok(None));
        storage.expect_save().never();

        let store = CartStore::new(Arc::new(storage), Arc::new(MockProductsService::new()));

        let cart = store
            .remove_item(UserUuid::new(), CartUuid::new(), ProductUuid::new())
            .await?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_persists_empty_snapshot() -> TestResult {
        let user = UserUuid::new();
        let cart = CartUuid::new();

        let mut storage = MockCartStorage::new();

        storage.expect_load().once().return_once(|_| Ok(None));
        storage
            .expect_save()
            .once()
            .withf(move |saved| saved.uuid == cart && saved.user_uuid == user && saved.is_empty())
            .return_once(|_| Ok(()));

        let store = CartStore::new(Arc::new(storage), Arc::new(MockProductsService::new()));

        let cleared = store.clear_cart(user, cart).await?;

        assert!(cleared.is_empty());

        Ok(())
    }
}
