//! Server - wires the gateway to the hub.

use crate::config::{self, Config};
use crate::network::{Gateway, Hub};
use std::net::SocketAddr;
use tracing::{error, info};

/// A bound relay server, ready to run.
pub struct Server {
    hub: Hub,
    gateway: Gateway,
}

impl Server {
    /// Validate `config` and bind the listening socket.
    pub async fn bind(config: &Config) -> anyhow::Result<Self> {
        if let Err(errors) = config::validate(config) {
            for e in &errors {
                error!(error = %e, "Invalid configuration");
            }
            let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
            anyhow::bail!("invalid configuration: {}", joined.join("; "));
        }

        let (hub, events) = Hub::new(config.limits.event_queue);
        let gateway = Gateway::bind(config.listen.address, events, config.limits.clone()).await?;
        info!(server = %config.server.name, "server ready");

        Ok(Self { hub, gateway })
    }

    /// The bound listening address.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.gateway.local_addr()
    }

    /// Serve until the listener fails or the hub stops.
    pub async fn run(self) -> anyhow::Result<()> {
        tokio::spawn(self.hub.run());
        self.gateway.run().await
    }
}
