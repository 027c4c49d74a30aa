//! Payment Gateway Config

use std::time::Duration;

use clap::Args;

use storefront_app::payments::{GatewaySecretKey, HttpPaymentGatewayConfig};

/// Payment gateway settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Payment gateway base URL
    #[arg(long, env = "PAYMENT_GATEWAY_URL", default_value = "https://api.paystack.co")]
    pub payment_gateway_url: String,

    /// Payment gateway secret key
    #[arg(long, env = "PAYMENT_GATEWAY_SECRET_KEY", hide_env_values = true)]
    pub payment_gateway_secret_key: String,

    /// Timeout for each gateway call in seconds
    #[arg(long, env = "PAYMENT_GATEWAY_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub payment_gateway_timeout_seconds: u64,
}

impl PaymentsConfig {
    #[must_use]
    pub fn into_gateway_config(self) -> HttpPaymentGatewayConfig {
        HttpPaymentGatewayConfig {
            base_url: self.payment_gateway_url,
            secret_key: GatewaySecretKey::new(self.payment_gateway_secret_key),
            timeout: Duration::from_secs(self.payment_gateway_timeout_seconds),
        }
    }
}
