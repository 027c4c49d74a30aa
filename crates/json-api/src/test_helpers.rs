//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use storefront_app::{
    auth::{MockAuthService, Principal, Role, UserUuid},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{Cart, CartUuid, LineItem},
        },
        checkout::{
            MockCheckoutService,
            models::{CheckoutAttempt, CheckoutState},
        },
        orders::{
            MockOrdersService, OrderStatus,
            models::{Order, OrderLineItem, OrderTotals, OrderUuid, ShippingAddress},
        },
        products::{MockProductsService, models::ProductUuid},
        reports::MockReportsService,
    },
    payments::PaymentReference,
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_LOW_STOCK_THRESHOLD: u32 = 10;

/// Every service mock; an expectation that isn't set fails the test when hit.
#[derive(Default)]
pub(crate) struct TestMocks {
    pub(crate) auth: MockAuthService,
    pub(crate) products: MockProductsService,
    pub(crate) carts: MockCartsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) checkout: MockCheckoutService,
    pub(crate) reports: MockReportsService,
}

pub(crate) fn state_with(mocks: TestMocks) -> Arc<State> {
    let app = AppContext {
        auth: Arc::new(mocks.auth),
        products: Arc::new(mocks.products),
        carts: Arc::new(mocks.carts),
        orders: Arc::new(mocks.orders),
        checkout: Arc::new(mocks.checkout),
        reports: Arc::new(mocks.reports),
    };

    State::from_app_context(app, CancellationToken::new(), TEST_LOW_STOCK_THRESHOLD)
}

/// Stands in for the auth middleware.
pub(crate) struct InjectPrincipal(Principal);

#[handler]
impl InjectPrincipal {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_principal(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

pub(crate) fn inject_principal_with_role(role: Role) -> InjectPrincipal {
    InjectPrincipal(Principal {
        user_uuid: TEST_USER_UUID,
        role,
    })
}

/// A service that routes `route` as the test user with `role`.
pub(crate) fn service_as(role: Role, mocks: TestMocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with(mocks)))
            .hoop(inject_principal_with_role(role))
            .push(route),
    )
}

pub(crate) fn customer_service(mocks: TestMocks, route: Router) -> Service {
    service_as(Role::Customer, mocks, route)
}

pub(crate) fn admin_service(mocks: TestMocks, route: Router) -> Service {
    service_as(Role::Admin, mocks, route)
}

pub(crate) fn make_cart(uuid: CartUuid) -> Cart {
    Cart {
        uuid,
        user_uuid: TEST_USER_UUID,
        items: vec![
            LineItem {
                product_uuid: ProductUuid::from_uuid(Uuid::from_u128(1)),
                name: "Mug".to_string(),
                price: 10_00,
                quantity: 2,
                image: None,
            },
            LineItem {
                product_uuid: ProductUuid::from_uuid(Uuid::from_u128(2)),
                name: "Coaster".to_string(),
                price: 5_00,
                quantity: 1,
                image: Some("coaster.png".to_string()),
            },
        ],
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_address() -> ShippingAddress {
    ShippingAddress {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "555-0100".to_string(),
        street: "1 Analytical Way".to_string(),
        city: "London".to_string(),
        ..ShippingAddress::default()
    }
}

fn make_lines() -> Vec<OrderLineItem> {
    make_cart(CartUuid::new())
        .items
        .iter()
        .map(OrderLineItem::from)
        .collect()
}

fn make_totals() -> OrderTotals {
    OrderTotals {
        subtotal: 25_00,
        shipping_fee: 9_99,
        tax: 2_00,
        total: 36_99,
        currency: "USD".to_string(),
    }
}

pub(crate) fn make_attempt(reference: &str, state: CheckoutState) -> CheckoutAttempt {
    CheckoutAttempt {
        reference: PaymentReference::from(reference),
        user_uuid: TEST_USER_UUID,
        cart_uuid: CartUuid::from_uuid(Uuid::from_u128(7)),
        state,
        shipping_address: make_address(),
        items: make_lines(),
        totals: make_totals(),
        payment_verified: false,
        order_uuid: None,
        last_error: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, status: OrderStatus) -> Order {
    Order {
        uuid,
        user_uuid: TEST_USER_UUID,
        items: make_lines(),
        totals: make_totals(),
        shipping_address: make_address(),
        payment_reference: PaymentReference::from("chk_1_abc"),
        status,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
