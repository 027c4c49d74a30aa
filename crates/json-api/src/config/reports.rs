//! Reports Config

use clap::Args;

use storefront_app::domain::reports::DEFAULT_LOW_STOCK_THRESHOLD;

/// Admin report settings.
#[derive(Debug, Args)]
pub struct ReportsConfig {
    /// Stock level below which a product counts as low stock
    #[arg(long, env = "LOW_STOCK_THRESHOLD", default_value_t = DEFAULT_LOW_STOCK_THRESHOLD)]
    pub low_stock_threshold: u32,
}
