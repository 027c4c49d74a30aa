//! Order wire models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::models::{
    CustomerOrder, Order, OrderLineItem, ShippingAddress,
};

/// Shipping details as sent by the shopper and stored on the order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct ShippingAddressBody {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        Self {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            phone: body.phone,
            street: body.street,
            city: body.city,
            state: body.state,
            postal_code: body.postal_code,
        }
    }
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(address: ShippingAddress) -> Self {
        Self {
            first_name: address.first_name,
            last_name: address.last_name,
            email: address.email,
            phone: address.phone,
            street: address.street,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
        }
    }
}

/// Order Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineResponse {
    pub product_uuid: Uuid,
    pub name: String,
    pub quantity: u32,

    /// Unit price in minor units at the time of purchase
    pub price_at_purchase: u64,

    pub image: Option<String>,
}

impl From<OrderLineItem> for OrderLineResponse {
    fn from(line: OrderLineItem) -> Self {
        Self {
            product_uuid: line.product_uuid.into_uuid(),
            name: line.name,
            quantity: line.quantity,
            price_at_purchase: line.price_at_purchase,
            image: line.image,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub user_uuid: Uuid,
    pub items: Vec<OrderLineResponse>,
    pub shipping_address: ShippingAddressBody,
    pub payment_reference: String,

    /// One of `pending`, `processing`, `shipped`, `delivered`, `cancelled`
    pub status: String,

    pub subtotal: u64,
    pub shipping_fee: u64,
    pub tax: u64,
    pub total: u64,
    pub currency: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            user_uuid: order.user_uuid.into_uuid(),
            items: order.items.into_iter().map(Into::into).collect(),
            shipping_address: order.shipping_address.into(),
            payment_reference: order.payment_reference.into_string(),
            status: order.status.to_string(),
            subtotal: order.totals.subtotal,
            shipping_fee: order.totals.shipping_fee,
            tax: order.totals.tax,
            total: order.totals.total,
            currency: order.totals.currency,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order with the owning customer's display fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomerOrderResponse {
    pub order: OrderResponse,
    pub customer_name: String,
    pub customer_email: String,
}

impl From<CustomerOrder> for CustomerOrderResponse {
    fn from(customer_order: CustomerOrder) -> Self {
        Self {
            order: customer_order.order.into(),
            customer_name: customer_order.customer_name,
            customer_email: customer_order.customer_email,
        }
    }
}
