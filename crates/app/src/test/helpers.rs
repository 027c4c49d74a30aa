//! Test Helpers

use jiff::Timestamp;
use sqlx::query;

use crate::{
    auth::UserUuid,
    domain::{
        orders::{
            OrdersService,
            models::{NewOrder, OrderLineItem, OrderTotals, OrderUuid, ShippingAddress},
        },
        products::models::{Product, ProductUuid},
    },
    payments::PaymentReference,
    test::TestContext,
};

/// An in-memory catalog product, for tests that mock the products service.
pub(crate) fn make_product(price: u64) -> Product {
    let now = Timestamp::now();

    Product {
        uuid: ProductUuid::new(),
        name: format!("Product {price}"),
        image: Some(format!("product-{price}.png")),
        price,
        stock: 10,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

/// Insert a catalog row directly; the catalog itself is not managed here.
pub(crate) async fn insert_product(
    ctx: &TestContext,
    name: &str,
    price: u64,
    stock: u32,
) -> ProductUuid {
    let uuid = ProductUuid::new();

    query("INSERT INTO products (uuid, name, price, stock) VALUES ($1, $2, $3, $4)")
        .bind(uuid.into_uuid())
        .bind(name)
        .bind(i64::try_from(price).expect("price should fit in BIGINT"))
        .bind(i32::try_from(stock).expect("stock should fit in INTEGER"))
        .execute(ctx.db.pool())
        .await
        .expect("Failed to insert test product");

    uuid
}

/// Create a pending single-line order whose total equals `total`.
pub(crate) async fn insert_order(ctx: &TestContext, user: UserUuid, total: u64) -> OrderUuid {
    let order = NewOrder {
        uuid: OrderUuid::new(),
        user_uuid: user,
        items: vec![OrderLineItem {
            product_uuid: ProductUuid::new(),
            name: format!("Line {total}"),
            image: None,
            price_at_purchase: total,
            quantity: 1,
        }],
        totals: OrderTotals {
            subtotal: total,
            shipping_fee: 0,
            tax: 0,
            total,
            currency: "USD".to_string(),
        },
        shipping_address: ShippingAddress {
            first_name: "Test".to_string(),
            last_name: "Shopper".to_string(),
            email: "shopper@example.com".to_string(),
            street: "1 Test Street".to_string(),
            city: "Testville".to_string(),
            ..ShippingAddress::default()
        },
        payment_reference: PaymentReference::generate(),
    };

    ctx.orders
        .create_for_payment(order)
        .await
        .expect("Failed to create test order")
        .order
        .uuid
}
