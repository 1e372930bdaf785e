//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds the listening socket, announces each accepted client to
//! the hub and spawns its Connection task.

use super::hub::Event;
use crate::config::LimitsConfig;
use crate::network::Connection;
use crate::state::ConnIdGenerator;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, instrument};

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    events: mpsc::Sender<Event>,
    limits: LimitsConfig,
    ids: ConnIdGenerator,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(
        addr: SocketAddr,
        events: mpsc::Sender<Event>,
        limits: LimitsConfig,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(address = %listener.local_addr()?, "listener bound");
        Ok(Self {
            listener,
            events,
            limits,
            ids: ConnIdGenerator::new(),
        })
    }

    /// The address actually bound, which differs from the configured one
    /// when port 0 was requested.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway, accepting connections until the hub goes away.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            let conn = self.ids.next();
            let (outbound_tx, outbound_rx) = mpsc::channel(self.limits.outbound_queue);
            let (shutdown_tx, shutdown_rx) = oneshot::channel();

            // Announce before spawning so the hub sees Connected ahead of any
            // frame from this socket.
            if self
                .events
                .send(Event::Connected {
                    conn,
                    addr,
                    outbound: outbound_tx,
                    shutdown: shutdown_tx,
                })
                .await
                .is_err()
            {
                anyhow::bail!("hub stopped");
            }

            let connection = Connection::new(
                conn,
                stream,
                addr,
                self.events.clone(),
                outbound_rx,
                shutdown_rx,
                self.limits.idle_timeout(),
            );
            tokio::spawn(connection.run());
        }
    }
}
