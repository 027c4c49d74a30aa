//! Listener Config

use clap::Args;

/// Where the HTTP listener binds.
#[derive(Debug, Args)]
pub struct ServerRuntimeConfig {
    /// Interface to bind, `0.0.0.0` for all
    #[arg(short = 'H', long = "host", env = "STOREFRONT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(short, long = "port", env = "STOREFRONT_PORT", default_value_t = 8080)]
    pub port: u16,
}

impl ServerRuntimeConfig {
    /// `host:port`, as accepted by the TCP listener.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
