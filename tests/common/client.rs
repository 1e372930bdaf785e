//! Test relay client.
//!
//! Sends commands as frames and asserts on the frames received back.

use relay_proto::Transport;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// A test relay client.
pub struct TestClient {
    transport: Transport,
}

#[allow(dead_code)]
impl TestClient {
    /// Connect to a test server.
    pub async fn connect(addr: SocketAddr) -> anyhow::Result<Self> {
        let transport = Transport::connect(addr).await?;
        Ok(Self { transport })
    }

    /// Wrap a stream that is already connected.
    pub fn from_stream(stream: tokio::net::TcpStream) -> Self {
        Self {
            transport: Transport::new(stream),
        }
    }

    /// Send one command frame.
    pub async fn send(&mut self, text: &str) -> anyhow::Result<()> {
        self.transport.write_message(text).await?;
        Ok(())
    }

    /// Write bytes straight to the socket, bypassing framing.
    pub async fn send_raw(self, bytes: &[u8]) -> anyhow::Result<tokio::net::TcpStream> {
        let mut stream = self.transport.into_inner();
        stream.write_all(bytes).await?;
        stream.flush().await?;
        Ok(stream)
    }

    /// Receive a single frame.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(RECV_TIMEOUT).await
    }

    /// Receive a frame with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        match timeout(dur, self.transport.read_message()).await?? {
            Some(text) => Ok(text),
            None => anyhow::bail!("connection closed"),
        }
    }

    /// Send a command and return the next frame.
    pub async fn request(&mut self, text: &str) -> anyhow::Result<String> {
        self.send(text).await?;
        self.recv().await
    }

    /// Claim a name, expecting the greeting.
    pub async fn set_name(&mut self, name: &str) -> anyhow::Result<()> {
        let reply = self.request(&format!("NAME {name}")).await?;
        anyhow::ensure!(reply == format!("HELLO {name}"), "unexpected reply: {reply}");
        Ok(())
    }

    /// Wait for the server to close the connection.
    pub async fn expect_closed(&mut self) -> anyhow::Result<()> {
        match timeout(RECV_TIMEOUT, self.transport.read_message()).await? {
            Ok(None) => Ok(()),
            // A reset after close also counts.
            Err(e) if e.is_io() => Ok(()),
            Ok(Some(text)) => anyhow::bail!("expected close, got frame: {text}"),
            Err(e) => Err(e.into()),
        }
    }

    /// Read and discard frames until the server closes the connection,
    /// returning how many arrived.
    pub async fn drain_until_closed(&mut self, dur: Duration) -> anyhow::Result<usize> {
        let drain = async {
            let mut frames = 0;
            loop {
                match self.transport.read_message().await {
                    Ok(Some(_)) => frames += 1,
                    Ok(None) => return Ok(frames),
                    Err(e) if e.is_io() => return Ok(frames),
                    Err(e) => return Err(anyhow::Error::from(e)),
                }
            }
        };
        timeout(dur, drain).await?
    }

    /// Assert nothing arrives within `dur`.
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match timeout(dur, self.transport.read_message()).await {
            Err(_) => Ok(()),
            Ok(result) => anyhow::bail!("expected silence, got {result:?}"),
        }
    }
}
