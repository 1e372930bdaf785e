//! Test server management.
//!
//! Runs relayd inside the test's runtime on an ephemeral port.

use relayd::Server;
use relayd::config::Config;
use std::net::SocketAddr;
use tokio::task::JoinHandle;

/// A test server instance.
pub struct TestServer {
    addr: SocketAddr,
    task: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    /// Spawn a server with default limits.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with(Config::default()).await
    }

    /// Spawn a server with the given configuration, overriding the listen
    /// address with `127.0.0.1:0`.
    pub async fn spawn_with(mut config: Config) -> anyhow::Result<Self> {
        config.listen.address = "127.0.0.1:0".parse()?;
        let server = Server::bind(&config).await?;
        let addr = server.local_addr()?;
        let task = tokio::spawn(server.run());
        Ok(Self { addr, task })
    }

    /// Get the server address.
    #[allow(dead_code)]
    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    /// Create a new test client connected to this server.
    pub async fn connect(&self) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(self.addr).await
    }

    /// Connect and claim `name`, consuming the greeting.
    #[allow(dead_code)]
    pub async fn connect_named(&self, name: &str) -> anyhow::Result<super::client::TestClient> {
        let mut client = self.connect().await?;
        client.set_name(name).await?;
        Ok(client)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
