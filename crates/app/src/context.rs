//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, DatabaseSettings, Db},
    domain::{
        carts::{CartStore, CartsService, storage::PgCartStorage},
        checkout::{Checkout, CheckoutPolicy, CheckoutService, attempts::PgCheckoutAttempts},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        reports::{PgReportsService, ReportsService},
    },
    payments::{HttpPaymentGateway, HttpPaymentGatewayConfig, PaymentGatewayError},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to build payment gateway client")]
    PaymentGateway(#[source] PaymentGatewayError),
}

/// Everything needed to wire the services together.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database: DatabaseSettings,
    pub payment_gateway: HttpPaymentGatewayConfig,
    pub checkout: CheckoutPolicy,
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub reports: Arc<dyn ReportsService>,
}

impl AppContext {
    /// Connect to the database and build every service.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails, or
    /// when the payment gateway client cannot be constructed.
    pub async fn from_settings(settings: AppSettings) -> Result<Self, AppInitError> {
        let pool = database::connect(&settings.database)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool.clone());

        let gateway = HttpPaymentGateway::new(settings.payment_gateway)
            .map_err(AppInitError::PaymentGateway)?;

        let products: Arc<dyn ProductsService> = Arc::new(PgProductsService::new(db.clone()));

        let carts: Arc<dyn CartsService> = Arc::new(CartStore::new(
            Arc::new(PgCartStorage::new(db.clone())),
            products.clone(),
        ));

        let orders: Arc<dyn OrdersService> = Arc::new(PgOrdersService::new(db.clone()));

        let checkout = Checkout::new(
            carts.clone(),
            orders.clone(),
            Arc::new(gateway),
            Arc::new(PgCheckoutAttempts::new(db.clone())),
            settings.checkout,
        );

        Ok(Self {
            auth: Arc::new(PgAuthService::new(pool)),
            products,
            carts,
            orders,
            checkout: Arc::new(checkout),
            reports: Arc::new(PgReportsService::new(db)),
        })
    }
}
