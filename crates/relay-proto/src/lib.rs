//! # relay-proto
//!
//! Wire protocol for the relayd text-chat relay.
//!
//! ## Features
//!
//! - Length-prefixed frames: four zero-padded decimal digits, then that many
//!   bytes of UTF-8 text (at most 9999)
//! - Typed command grammar (`NAME`, `GET_NAMES`, `MSG`, `BLOCK`, `EXIT`)
//! - Optional Tokio integration: a `tokio_util` codec and a framed transport
//!
//! ## Quick Start
//!
//! ```rust
//! use relay_proto::{frame, Command};
//!
//! let bytes = frame::encode("MSG bob hi there").unwrap();
//! assert_eq!(&bytes[..4], b"0016");
//!
//! let cmd: Command = "MSG bob hi there".parse().unwrap();
//! assert_eq!(
//!     cmd,
//!     Command::Msg { target: "bob".into(), text: "hi there".into() }
//! );
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

#[cfg(feature = "tokio")]
pub mod codec;
pub mod command;
pub mod error;
pub mod frame;
#[cfg(feature = "tokio")]
pub mod transport;

#[cfg(feature = "tokio")]
pub use self::codec::FrameCodec;
pub use self::command::{is_broadcast, Command, CommandError, BROADCAST_TARGET};
pub use self::error::ProtocolError;
pub use self::frame::{HEADER_LEN, MAX_PAYLOAD_LEN};
#[cfg(feature = "tokio")]
pub use self::transport::{split, FrameReader, FrameWriter, Transport};
