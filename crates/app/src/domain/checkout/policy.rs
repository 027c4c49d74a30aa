//! Checkout pricing policy.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::domain::orders::models::OrderTotals;

/// Shipping and tax rules applied to a cart subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPolicy {
    /// Flat shipping fee in minor units.
    pub shipping_fee: u64,

    /// Shipping is free when the subtotal is strictly above this amount.
    pub free_shipping_over: u64,

    /// Fraction of the subtotal charged as tax, between 0 and 1.
    pub tax_rate: Decimal,

    pub currency: String,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            shipping_fee: 9_99,
            free_shipping_over: 50_00,
            tax_rate: Decimal::new(8, 2),
            currency: "USD".to_string(),
        }
    }
}

impl CheckoutPolicy {
    /// Price a subtotal.
    #[must_use]
    pub fn quote(&self, subtotal: u64) -> OrderTotals {
        let shipping_fee = if subtotal > self.free_shipping_over {
            0
        } else {
            self.shipping_fee
        };

        let tax = self.tax_on(subtotal);

        OrderTotals {
            subtotal,
            shipping_fee,
            tax,
            total: subtotal.saturating_add(shipping_fee).saturating_add(tax),
            currency: self.currency.clone(),
        }
    }

    /// Tax in minor units, rounded half-up.
    fn tax_on(&self, subtotal: u64) -> u64 {
        let rate = self.tax_rate.clamp(Decimal::ZERO, Decimal::ONE);

        Decimal::from(subtotal)
            .checked_mul(rate)
            .map(|tax| tax.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|tax| tax.to_u64())
            .unwrap_or_default()
    }
}
