//! Cart Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    auth::UserUuid,
    domain::products::models::{Product, ProductUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// The catalog fields copied into a cart line when a product is added.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSnapshot {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub image: Option<String>,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            product_uuid: product.uuid,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}

/// Cart line, one per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_uuid: ProductUuid,
    pub name: String,
    /// Unit price in minor units.
    pub price: u64,
    pub quantity: u32,
    pub image: Option<String>,
}

impl LineItem {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

/// Cart Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<LineItem>,
    pub updated_at: Timestamp,
}

impl Cart {
    /// An empty cart owned by `user`.
    #[must_use]
    pub fn new(uuid: CartUuid, user_uuid: UserUuid) -> Self {
        Self {
            uuid,
            user_uuid,
            items: Vec::new(),
            updated_at: Timestamp::now(),
        }
    }

    /// Add `quantity` of a product, merging into an existing line.
    ///
    /// Quantities are coerced with [`coerce_quantity`]; adding zero never
    /// creates a line.
    pub fn add_item(&mut self, product: ProductSnapshot, quantity: f64) {
        let quantity = coerce_quantity(quantity);

        if quantity == 0 {
            return;
        }

        if let Some(line) = self.line_mut(product.product_uuid) {
            line.quantity = line
                .quantity
                .saturating_add(quantity)
                .min(MAX_LINE_QUANTITY);

            return;
        }

        self.items.push(LineItem {
            product_uuid: product.product_uuid,
            name: product.name,
            price: product.price,
            quantity,
            image: product.image,
        });
    }

    /// Remove a product's line regardless of its quantity.
    ///
    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, product: ProductUuid) -> bool {
        let before = self.items.len();

        self.items.retain(|line| line.product_uuid != product);

        self.items.len() != before
    }

    /// Set the absolute quantity of a line. Anything at or below zero removes it.
    ///
    /// Returns whether the product had a line.
    pub fn update_quantity(&mut self, product: ProductUuid, quantity: f64) -> bool {
        let quantity = coerce_quantity(quantity);

        if quantity == 0 {
            return self.remove_item(product);
        }

        match self.line_mut(product) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn contains(&self, product: ProductUuid) -> bool {
        self.items.iter().any(|line| line.product_uuid == product)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of unit price times quantity over every line, in minor units.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.items
            .iter()
            .fold(0_u64, |total, line| total.saturating_add(line.line_total()))
    }

    /// Total number of units across lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    fn line_mut(&mut self, product: ProductUuid) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|line| line.product_uuid == product)
    }
}

/// Largest quantity a single line can hold; order lines store it as `INTEGER`.
pub const MAX_LINE_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Coerce a client supplied quantity to a whole number of units.
///
/// Non-finite, zero and negative values become `0`; fractions are truncated
/// and anything above [`MAX_LINE_QUANTITY`] is clamped to it.
#[must_use]
pub fn coerce_quantity(raw: f64) -> u32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }

    raw.trunc().min(f64::from(MAX_LINE_QUANTITY)) as u32
}
