//! Checkout Pricing Config

use clap::Args;
use rust_decimal::Decimal;

use storefront_app::domain::checkout::CheckoutPolicy;

/// Checkout pricing settings, amounts in minor units.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Flat shipping fee
    #[arg(long, env = "SHIPPING_FEE", default_value_t = 9_99_u64)]
    pub shipping_fee: u64,

    /// Subtotal above which shipping is free
    #[arg(long, env = "FREE_SHIPPING_OVER", default_value_t = 50_00_u64)]
    pub free_shipping_over: u64,

    /// Tax rate applied to the subtotal, e.g. 0.08
    #[arg(long, env = "TAX_RATE", default_value = "0.08")]
    pub tax_rate: Decimal,

    /// ISO currency code charged through the gateway
    #[arg(long, env = "CURRENCY", default_value = "USD")]
    pub currency: String,
}

impl CheckoutConfig {
    #[must_use]
    pub fn into_policy(self) -> CheckoutPolicy {
        CheckoutPolicy {
            shipping_fee: self.shipping_fee,
            free_shipping_over: self.free_shipping_over,
            tax_rate: self.tax_rate,
            currency: self.currency,
        }
    }
}
