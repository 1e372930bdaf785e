//! Connection - moves frames between one socket and the hub.
//!
//! Each accepted socket gets two tasks:
//!
//! ```text
//!   socket ──▶ FramedRead ──▶ Event::Frame ──▶ hub
//!   socket ◀── FramedWrite ◀── outbound queue ◀── hub
//! ```
//!
//! The reader reports exactly one [`Event::Closed`] when it stops. The writer
//! runs until the hub sends [`Outbound::Close`] or drops its end of the
//! queue, or until the hub fires the shutdown signal for a peer that stopped
//! reading. Either way the reader is then aborted and the socket dropped.

use super::hub::{CloseReason, Event, Outbound};
use crate::state::ConnId;
use futures_util::{SinkExt, StreamExt};
use relay_proto::{FrameReader, FrameWriter, ProtocolError};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tracing::{Instrument, debug, instrument, warn};

/// A client connection handler.
pub struct Connection {
    conn: ConnId,
    addr: SocketAddr,
    stream: TcpStream,
    events: mpsc::Sender<Event>,
    outbound: mpsc::Receiver<Outbound>,
    shutdown: oneshot::Receiver<()>,
    idle_timeout: Option<Duration>,
}

impl Connection {
    /// Create a new connection handler.
    pub fn new(
        conn: ConnId,
        stream: TcpStream,
        addr: SocketAddr,
        events: mpsc::Sender<Event>,
        outbound: mpsc::Receiver<Outbound>,
        shutdown: oneshot::Receiver<()>,
        idle_timeout: Option<Duration>,
    ) -> Self {
        Self {
            conn,
            addr,
            stream,
            events,
            outbound,
            shutdown,
            idle_timeout,
        }
    }

    /// Run until the hub is done with this connection.
    #[instrument(skip(self), fields(conn = %self.conn, addr = %self.addr), name = "connection")]
    pub async fn run(self) {
        let (reader, writer) = relay_proto::split(self.stream);

        let reader_task = tokio::spawn(
            read_loop(self.conn, reader, self.events.clone(), self.idle_timeout).in_current_span(),
        );

        tokio::select! {
            result = write_loop(writer, self.outbound) => {
                if let Err(e) = result {
                    warn!(error = %e, "write failed");
                    let _ = self
                        .events
                        .send(Event::Closed {
                            conn: self.conn,
                            reason: CloseReason::WriteFailed(e),
                        })
                        .await;
                }
            }
            // Only a fired signal counts; a dropped sender leaves the writer
            // to drain.
            Ok(()) = self.shutdown => debug!("shut down by hub"),
        }

        reader_task.abort();
        debug!("connection task finished");
    }
}

async fn read_loop(
    conn: ConnId,
    mut reader: FrameReader,
    events: mpsc::Sender<Event>,
    idle_timeout: Option<Duration>,
) {
    let reason = loop {
        let next = match idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, reader.next()).await {
                Ok(next) => next,
                Err(_) => break CloseReason::IdleTimeout,
            },
            None => reader.next().await,
        };

        match next {
            Some(Ok(text)) => {
                debug!(len = text.len(), "frame received");
                if events.send(Event::Frame { conn, text }).await.is_err() {
                    // Hub is gone; nobody left to tell.
                    return;
                }
            }
            Some(Err(e)) => break CloseReason::Protocol(e),
            None => break CloseReason::HangUp,
        }
    };

    match &reason {
        CloseReason::Protocol(e) => warn!(error = %e, "bad frame or read error"),
        _ => debug!(%reason, "reader stopped"),
    }
    let _ = events.send(Event::Closed { conn, reason }).await;
}

/// Write queued frames, draining everything available before each flush.
async fn write_loop(
    mut writer: FrameWriter,
    mut outbound: mpsc::Receiver<Outbound>,
) -> Result<(), ProtocolError> {
    'wake: while let Some(first) = outbound.recv().await {
        let mut next = Some(first);
        while let Some(item) = next {
            match item {
                Outbound::Frame(text) => feed_frame(&mut writer, text).await?,
                Outbound::Close => break 'wake,
            }
            next = outbound.try_recv().ok();
        }
        writer.flush().await?;
    }

    writer.close().await
}

async fn feed_frame(writer: &mut FrameWriter, text: String) -> Result<(), ProtocolError> {
    match writer.feed(text).await {
        Err(e) if !e.is_io() => {
            warn!(error = %e, "dropping frame that cannot be encoded");
            Ok(())
        }
        other => other,
    }
}
