//! Order Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    auth::UserUuid,
    domain::{
        carts::models::LineItem,
        orders::status::OrderStatus,
        products::models::ProductUuid,
    },
    payments::PaymentReference,
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Where an order ships to, as collected during checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl ShippingAddress {
    /// Names of required fields that are blank.
    #[must_use]
    pub fn missing_required_fields(&self) -> SmallVec<[&'static str; 5]> {
        [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("street", &self.street),
            ("city", &self.city),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Non-empty address parts joined with `", "`.
    #[must_use]
    pub fn one_line(&self) -> String {
        [&self.street, &self.city, &self.state, &self.postal_code]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A purchased line, frozen at the price paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub image: Option<String>,
    pub price_at_purchase: u64,
    pub quantity: u32,
}

impl OrderLineItem {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.price_at_purchase
            .saturating_mul(u64::from(self.quantity))
    }
}

impl From<&LineItem> for OrderLineItem {
    fn from(line: &LineItem) -> Self {
        Self {
            product_uuid: line.product_uuid,
            name: line.name.clone(),
            image: line.image.clone(),
            price_at_purchase: line.price,
            quantity: line.quantity,
        }
    }
}

/// Money breakdown of an order, in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: u64,
    pub shipping_fee: u64,
    pub tax: u64,
    pub total: u64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<OrderLineItem>,
    pub totals: OrderTotals,
    pub shipping_address: ShippingAddress,
    pub payment_reference: PaymentReference,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating an order from a verified payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<OrderLineItem>,
    pub totals: OrderTotals,
    pub shipping_address: ShippingAddress,
    pub payment_reference: PaymentReference,
}

/// Result of an idempotent create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCreation {
    pub order: Order,

    /// `false` when an order already existed for the payment reference.
    pub created: bool,
}

/// An order together with the account that placed it, for admin listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerOrder {
    pub order: Order,
    pub customer_name: String,
    pub customer_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            street: "1 Analytical Way".to_string(),
            city: "London".to_string(),
            state: String::new(),
            postal_code: "N1".to_string(),
        }
    }

    #[test]
    fn complete_address_has_no_missing_fields() {
        assert!(address().missing_required_fields().is_empty());
    }

    #[test]
    fn blank_required_fields_are_reported_in_order() {
        let partial = ShippingAddress {
            first_name: "  ".to_string(),
            city: String::new(),
            ..address()
        };

        assert_eq!(
            partial.missing_required_fields().as_slice(),
            &["first_name", "city"]
        );
    }

    #[test]
    fn optional_fields_are_not_required() {
        let minimal = ShippingAddress {
            phone: String::new(),
            state: String::new(),
            postal_code: String::new(),
            ..address()
        };

        assert!(minimal.missing_required_fields().is_empty());
    }

    #[test]
    fn one_line_skips_blank_parts() {
        assert_eq!(address().one_line(), "1 Analytical Way, London, N1");
        assert_eq!(address().full_name(), "Ada Lovelace");
    }

    #[test]
    fn order_line_copies_cart_price() {
        let line = LineItem {
            product_uuid: ProductUuid::new(),
            name: "Desk".to_string(),
            price: 120_00,
            quantity: 2,
            image: None,
        };

        let ordered = OrderLineItem::from(&line);

        assert_eq!(ordered.price_at_purchase, 120_00);
        assert_eq!(ordered.line_total(), 240_00);
    }
}
