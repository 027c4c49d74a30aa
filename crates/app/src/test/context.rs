//! Test context for service-level integration tests.

use crate::{
    auth::{NewUser, PgAuthService, Role, UserUuid},
    database::Db,
    domain::{
        orders::PgOrdersService, products::PgProductsService, reports::PgReportsService,
    },
};

use super::db::TestDb;

pub(crate) struct TestContext {
    pub(crate) db: TestDb,
    pub(crate) auth: PgAuthService,
    pub(crate) products: PgProductsService,
    pub(crate) orders: PgOrdersService,
    pub(crate) reports: PgReportsService,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            auth: PgAuthService::new(db.pool().clone()),
            products: PgProductsService::new(db.clone()),
            orders: PgOrdersService::new(db.clone()),
            reports: PgReportsService::new(db),
            db: test_db,
        }
    }

    pub(crate) fn db(&self) -> Db {
        Db::new(self.db.pool().clone())
    }

    /// Create a user with a name derived from the email.
    pub(crate) async fn create_user(&self, email: &str, role: Role) -> UserUuid {
        let name = email.split('@').next().unwrap_or(email).to_string();

        self.auth
            .create_user(NewUser {
                uuid: UserUuid::new(),
                name,
                email: email.to_string(),
                role,
            })
            .await
            .expect("Failed to create test user")
            .uuid
    }
}
