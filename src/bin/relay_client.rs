//! relay-client - interactive terminal client for relayd.
//!
//! Usage: `relay-client [ADDR]` (default `127.0.0.1:8888`). Each non-empty
//! line typed is sent as one command; frames from the server are printed as
//! they arrive. `EXIT` or end of input leaves.

use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;

const DEFAULT_ADDR: &str = "127.0.0.1:8888";
const EXIT: &str = "EXIT";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());

    let stream = TcpStream::connect(&addr).await?;
    let (mut frames, mut sink) = relay_proto::split(stream);

    println!("Connected to {addr}");
    println!("Enter commands (NAME, GET_NAMES, MSG, BLOCK, EXIT):");

    let mut printer = tokio::spawn(async move {
        while let Some(frame) = frames.next().await {
            match frame {
                Ok(text) => println!("\nServer sent: {text}"),
                Err(e) => {
                    eprintln!("\nConnection error: {e}");
                    break;
                }
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut printer_done = false;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    sink.send(EXIT.to_string()).await?;
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if let Err(e) = sink.send(line.to_string()).await {
                    eprintln!("Failed to send: {e}");
                    break;
                }
                if line == EXIT {
                    break;
                }
            }
            _ = &mut printer => {
                printer_done = true;
                println!("Server closed the connection");
                break;
            }
        }
    }

    if !printer_done {
        let _ = tokio::time::timeout(Duration::from_secs(2), printer).await;
    }
    Ok(())
}
