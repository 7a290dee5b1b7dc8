//! Serve command handler
//!
//! Builds the resolution service once (taxonomy, geocoder, cache) and
//! exposes it over HTTP until interrupted.

use crate::cli::init_tracing;
use crate::config::Config;
use crate::error::Result;
use crate::server::{self, state::AppState};
use clap::Args;
use std::sync::Arc;
use tracing::info;

/// Serve command arguments
#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Command-line host/port take precedence over the config file
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    init_tracing("info");

    let mut config = Config::load()?;
    args.apply(&mut config);

    let state = AppState::new(config)?;
    let service = &state.service;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %state.config.server_addr(),
        regions = service.taxonomy().regions().len(),
        neighbourhoods = service.taxonomy().len(),
        geocoder = service.provider_name(),
        country = service.country(),
        min_interval_ms = state.config.geocoder.min_interval_ms,
        cache = service.cache().name(),
        "serving neighbourhood lookups"
    );

    server::serve(Arc::new(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        ServeArgs {
            host: Some("0.0.0.0".to_string()),
            port: None,
        }
        .apply(&mut config);
        assert_eq!(config.server_addr(), "0.0.0.0:7878");

        ServeArgs {
            host: None,
            port: Some(9000),
        }
        .apply(&mut config);
        assert_eq!(config.server_addr(), "0.0.0.0:9000");
    }
}
