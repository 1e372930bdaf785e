//! Hub - the single owner of relay state.
//!
//! Connection tasks never touch the registry or block store. They report what
//! they see as [`Event`]s and the hub applies them one at a time, so every
//! command observes the effects of every command handled before it.
//!
//! ```text
//!   reader ─┐                          ┌─▶ outbound queue ─▶ writer
//!   reader ─┼─▶ events ─▶ [ Hub ] ─────┼─▶ outbound queue ─▶ writer
//!   reader ─┘        Registry + Blocks └─▶ outbound queue ─▶ writer
//! ```

use crate::handlers::{self, Context, Delivery};
use crate::state::{BlockStore, ConnId, Registry};
use relay_proto::ProtocolError;
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tracing::{debug, info, instrument, warn};

/// An entry on a connection's outbound queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Frame and send this text.
    Frame(String),
    /// Flush what is queued ahead of this, then shut the socket down.
    Close,
}

/// Why a connection task gave up on its socket.
#[derive(Debug)]
pub enum CloseReason {
    /// Peer closed the stream at a frame boundary.
    HangUp,
    /// Bad frame or transport error while reading.
    Protocol(ProtocolError),
    /// Writing to the socket failed.
    WriteFailed(ProtocolError),
    /// Nothing arrived within the configured idle timeout.
    IdleTimeout,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HangUp => f.write_str("hang-up"),
            Self::Protocol(e) => write!(f, "protocol error: {e}"),
            Self::WriteFailed(e) => write!(f, "write failed: {e}"),
            Self::IdleTimeout => f.write_str("idle timeout"),
        }
    }
}

/// Input to the hub.
#[derive(Debug)]
pub enum Event {
    /// A socket was accepted; `outbound` feeds its writer.
    ///
    /// Firing `shutdown` makes the connection task drop the socket without
    /// draining its queue.
    Connected {
        conn: ConnId,
        addr: SocketAddr,
        outbound: mpsc::Sender<Outbound>,
        shutdown: oneshot::Sender<()>,
    },
    /// One decoded frame.
    Frame { conn: ConnId, text: String },
    /// The connection task is done reading.
    Closed { conn: ConnId, reason: CloseReason },
}

struct Session {
    addr: SocketAddr,
    outbound: mpsc::Sender<Outbound>,
    shutdown: oneshot::Sender<()>,
}

/// Owns the registry and block store; see the module docs.
pub struct Hub {
    registry: Registry,
    blocks: BlockStore,
    sessions: HashMap<ConnId, Session>,
    events: mpsc::Receiver<Event>,
}

impl Hub {
    /// Create a hub and the sender connection tasks report through.
    pub fn new(event_queue: usize) -> (Self, mpsc::Sender<Event>) {
        let (tx, rx) = mpsc::channel(event_queue);
        let hub = Self {
            registry: Registry::new(),
            blocks: BlockStore::new(),
            sessions: HashMap::new(),
            events: rx,
        };
        (hub, tx)
    }

    /// Process events until every sender is gone.
    #[instrument(skip(self), name = "hub")]
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            self.handle_event(event);
        }
        info!(sessions = self.sessions.len(), "hub stopped");
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Connected {
                conn,
                addr,
                outbound,
                shutdown,
            } => {
                info!(%conn, %addr, "client connected");
                self.sessions.insert(
                    conn,
                    Session {
                        addr,
                        outbound,
                        shutdown,
                    },
                );
            }
            Event::Frame { conn, text } => self.handle_frame(conn, &text),
            Event::Closed { conn, reason } => self.end_session(conn, &reason),
        }
    }

    fn handle_frame(&mut self, conn: ConnId, text: &str) {
        if !self.sessions.contains_key(&conn) {
            debug!(%conn, "frame from closed connection ignored");
            return;
        }

        let dispatch = {
            let mut ctx = Context {
                sender: conn,
                registry: &mut self.registry,
                blocks: &mut self.blocks,
            };
            handlers::dispatch(&mut ctx, text)
        };

        let mut slow = Vec::new();
        for Delivery { to, text } in dispatch.deliveries {
            if slow.contains(&to) {
                continue;
            }
            let Some(session) = self.sessions.get(&to) else {
                continue;
            };
            match session.outbound.try_send(Outbound::Frame(text)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!(conn = %to, "outbound queue full, dropping slow consumer");
                    slow.push(to);
                }
                Err(TrySendError::Closed(_)) => slow.push(to),
            }
        }

        if dispatch.close {
            self.end_session(conn, &"exit");
        }
        for to in slow {
            self.end_session(to, &"slow consumer");
        }
    }

    /// Release everything `conn` holds and tell its writer to finish.
    fn end_session(&mut self, conn: ConnId, reason: &dyn fmt::Display) {
        let Some(session) = self.sessions.remove(&conn) else {
            return;
        };
        let name = handlers::release(&mut self.registry, &mut self.blocks, conn);
        // A queue that cannot take the marker belongs to a peer that is not
        // reading, so its writer may never drain: cut it off instead.
        if session.outbound.try_send(Outbound::Close).is_err() {
            let _ = session.shutdown.send(());
        }
        info!(
            %conn,
            addr = %session.addr,
            name = name.as_deref().unwrap_or("-"),
            %reason,
            "client disconnected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "127.0.0.1:9".parse().unwrap()
    }

    fn connect_with_shutdown(
        hub: &mut Hub,
        conn: u64,
        depth: usize,
    ) -> (mpsc::Receiver<Outbound>, oneshot::Receiver<()>) {
        let (tx, rx) = mpsc::channel(depth);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        hub.handle_event(Event::Connected {
            conn: ConnId::new(conn),
            addr: addr(),
            outbound: tx,
            shutdown: shutdown_tx,
        });
        (rx, shutdown_rx)
    }

    fn connect(hub: &mut Hub, conn: u64, depth: usize) -> mpsc::Receiver<Outbound> {
        connect_with_shutdown(hub, conn, depth).0
    }

    fn frame(hub: &mut Hub, conn: u64, text: &str) {
        hub.handle_event(Event::Frame {
            conn: ConnId::new(conn),
            text: text.to_string(),
        });
    }

    fn sent(text: &str) -> Option<Outbound> {
        Some(Outbound::Frame(text.to_string()))
    }

    #[test]
    fn test_reply_goes_to_sender() {
        let (mut hub, _tx) = Hub::new(8);
        let mut rx = connect(&mut hub, 1, 8);

        frame(&mut hub, 1, "NAME alice");
        assert_eq!(rx.try_recv().ok(), sent("HELLO alice"));
    }

    #[test]
    fn test_deliveries_keep_order_per_destination() {
        let (mut hub, _tx) = Hub::new(8);
        let mut alice = connect(&mut hub, 1, 8);
        let mut bob = connect(&mut hub, 2, 8);
        frame(&mut hub, 1, "NAME alice");
        frame(&mut hub, 2, "NAME bob");
        let _ = alice.try_recv();
        let _ = bob.try_recv();

        frame(&mut hub, 1, "MSG bob one");
        frame(&mut hub, 1, "MSG bob two");
        frame(&mut hub, 1, "MSG broadcast three");

        assert_eq!(bob.try_recv().ok(), sent("alice sent: one"));
        assert_eq!(bob.try_recv().ok(), sent("alice sent: two"));
        assert_eq!(bob.try_recv().ok(), sent("alice broadcasted: three"));
        assert_eq!(alice.try_recv().ok(), sent("Broadcast sent"));
        assert!(alice.try_recv().is_err());
    }

    #[test]
    fn test_exit_closes_and_frees_name() {
        let (mut hub, _tx) = Hub::new(8);
        let (mut alice, mut alice_shutdown) = connect_with_shutdown(&mut hub, 1, 8);
        let mut other = connect(&mut hub, 2, 8);
        frame(&mut hub, 1, "NAME alice");
        frame(&mut hub, 1, "EXIT");

        // The writer drains normally; no forced shutdown.
        assert_eq!(
            alice_shutdown.try_recv(),
            Err(oneshot::error::TryRecvError::Closed)
        );

        assert_eq!(alice.try_recv().ok(), sent("HELLO alice"));
        assert_eq!(alice.try_recv().ok(), Some(Outbound::Close));
        // Session is gone, so its sender was dropped.
        assert!(matches!(
            alice.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));

        frame(&mut hub, 2, "NAME alice");
        assert_eq!(other.try_recv().ok(), sent("HELLO alice"));
    }

    #[test]
    fn test_closed_event_releases_state() {
        let (mut hub, _tx) = Hub::new(8);
        let _alice = connect(&mut hub, 1, 8);
        let mut bob = connect(&mut hub, 2, 8);
        frame(&mut hub, 1, "NAME alice");
        frame(&mut hub, 2, "NAME bob");
        frame(&mut hub, 1, "BLOCK bob");
        let _ = bob.try_recv();

        hub.handle_event(Event::Closed {
            conn: ConnId::new(1),
            reason: CloseReason::HangUp,
        });
        assert!(hub.registry.conn_of("alice").is_none());
        assert_eq!(hub.blocks.blocker_count(), 0);

        frame(&mut hub, 2, "GET_NAMES");
        assert_eq!(bob.try_recv().ok(), sent("bob"));
    }

    #[test]
    fn test_unknown_connection_is_ignored() {
        let (mut hub, _tx) = Hub::new(8);
        frame(&mut hub, 7, "NAME ghost");
        hub.handle_event(Event::Closed {
            conn: ConnId::new(7),
            reason: CloseReason::IdleTimeout,
        });
        assert!(hub.registry.is_empty());
    }

    #[test]
    fn test_slow_consumer_is_dropped() {
        let (mut hub, _tx) = Hub::new(8);
        let mut alice = connect(&mut hub, 1, 8);
        let (mut bob, mut bob_shutdown) = connect_with_shutdown(&mut hub, 2, 1);
        frame(&mut hub, 1, "NAME alice");
        frame(&mut hub, 2, "NAME bob");
        let _ = alice.try_recv();

        // bob never reads: "HELLO bob" fills his queue.
        frame(&mut hub, 1, "MSG bob hi");

        assert!(hub.registry.conn_of("bob").is_none());
        assert_eq!(bob_shutdown.try_recv(), Ok(()));
        assert!(alice.try_recv().is_err());
        assert_eq!(bob.try_recv().ok(), sent("HELLO bob"));
        assert!(bob.try_recv().is_err());

        frame(&mut hub, 1, "GET_NAMES");
        assert_eq!(alice.try_recv().ok(), sent("alice"));
    }

    #[tokio::test]
    async fn test_run_stops_when_senders_drop() {
        let (hub, tx) = Hub::new(8);
        let (out_tx, mut out_rx) = mpsc::channel(8);
        let (shutdown_tx, _shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(hub.run());

        tx.send(Event::Connected {
            conn: ConnId::new(1),
            addr: addr(),
            outbound: out_tx,
            shutdown: shutdown_tx,
        })
        .await
        .unwrap();
        tx.send(Event::Frame {
            conn: ConnId::new(1),
            text: "GET_NAMES".to_string(),
        })
        .await
        .unwrap();

        assert_eq!(out_rx.recv().await, sent("No clients connected"));
        drop(tx);
        handle.await.unwrap();
    }
}
