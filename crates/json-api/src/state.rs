//! State

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use storefront_app::context::AppContext;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,

    /// Cancelled on shutdown; requests derive child tokens for gateway calls.
    pub(crate) shutdown: CancellationToken,

    pub(crate) low_stock_threshold: u32,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, shutdown: CancellationToken, low_stock_threshold: u32) -> Self {
        Self {
            app,
            shutdown,
            low_stock_threshold,
        }
    }

    #[must_use]
    pub(crate) fn from_app_context(
        app: AppContext,
        shutdown: CancellationToken,
        low_stock_threshold: u32,
    ) -> Arc<Self> {
        Arc::new(Self::new(app, shutdown, low_stock_threshold))
    }

    /// A token for one request's outbound calls.
    pub(crate) fn request_cancellation(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
