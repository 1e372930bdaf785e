//! Framed transport over TCP.
//!
//! [`Transport`] sends and receives whole frames over any async byte stream.
//! For a connection that reads and writes from separate tasks, [`split`]
//! hands back independent framed halves of a `TcpStream`.

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::codec::{Framed, FramedRead, FramedWrite};
use tracing::warn;

use crate::codec::FrameCodec;
use crate::error::Result;

/// Read half of a split connection, yielding one `String` per frame.
pub type FrameReader<R = OwnedReadHalf> = FramedRead<R, FrameCodec>;

/// Write half of a split connection, accepting text to frame.
pub type FrameWriter<W = OwnedWriteHalf> = FramedWrite<W, FrameCodec>;

/// Split a TCP stream into framed read and write halves.
pub fn split(stream: TcpStream) -> (FrameReader, FrameWriter) {
    if let Err(e) = stream.set_nodelay(true) {
        warn!("failed to set TCP_NODELAY: {}", e);
    }
    let (read, write) = stream.into_split();
    (
        FramedRead::new(read, FrameCodec::new()),
        FramedWrite::new(write, FrameCodec::new()),
    )
}

/// Frame transport over a bidirectional stream.
pub struct Transport<S = TcpStream> {
    framed: Framed<S, FrameCodec>,
}

impl Transport<TcpStream> {
    /// Connect to a relay server.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        if let Err(e) = stream.set_nodelay(true) {
            warn!("failed to set TCP_NODELAY: {}", e);
        }
        Ok(Self::new(stream))
    }
}

impl<S> Transport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an established stream.
    pub fn new(stream: S) -> Self {
        Self {
            framed: Framed::new(stream, FrameCodec::new()),
        }
    }

    /// Read the next frame.
    ///
    /// Returns `Ok(None)` when the peer has closed the connection.
    pub async fn read_message(&mut self) -> Result<Option<String>> {
        self.framed.next().await.transpose()
    }

    /// Frame `text` and write it out fully.
    pub async fn write_message(&mut self, text: &str) -> Result<()> {
        self.framed.send(text.to_string()).await
    }

    /// Consume the transport, returning the underlying stream.
    pub fn into_inner(self) -> S {
        self.framed.into_inner()
    }
}
