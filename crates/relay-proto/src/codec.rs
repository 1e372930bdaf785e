//! Frame codec for tokio.
//!
//! This module provides [`FrameCodec`], a `tokio_util` codec that decodes
//! length-prefixed frames into `String`s and encodes text back into frames,
//! so sockets can be wrapped in `Framed`, `FramedRead` or `FramedWrite`.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{ProtocolError, Result};
use crate::frame::{self, HEADER_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Waiting for a complete length prefix.
    Header,
    /// Prefix consumed, waiting for this many payload bytes.
    Payload(usize),
}

/// Tokio codec for length-prefixed text frames.
#[derive(Debug)]
pub struct FrameCodec {
    state: DecodeState,
}

impl FrameCodec {
    /// Create a codec positioned at a frame boundary.
    pub fn new() -> Self {
        Self {
            state: DecodeState::Header,
        }
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FrameCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        let len = match self.state {
            DecodeState::Header => {
                if src.len() < HEADER_LEN {
                    return Ok(None);
                }
                let mut raw = [0u8; HEADER_LEN];
                raw.copy_from_slice(&src[..HEADER_LEN]);
                let len = frame::parse_header(raw)?;
                src.advance(HEADER_LEN);
                src.reserve(len);
                self.state = DecodeState::Payload(len);
                len
            }
            DecodeState::Payload(len) => len,
        };

        if src.len() < len {
            return Ok(None);
        }

        let payload = src.split_to(len);
        self.state = DecodeState::Header;
        frame::decode_payload(payload.to_vec()).map(Some)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        if let Some(text) = self.decode(src)? {
            return Ok(Some(text));
        }
        match self.state {
            // A hang-up mid-header is an ordinary close.
            DecodeState::Header => {
                src.clear();
                Ok(None)
            }
            DecodeState::Payload(expected) => Err(ProtocolError::Truncated {
                expected,
                actual: src.len(),
            }),
        }
    }
}

impl Encoder<String> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, text: String, dst: &mut BytesMut) -> Result<()> {
        frame::check_payload(&text)?;
        dst.reserve(HEADER_LEN + text.len());
        dst.put_slice(format!("{:04}", text.len()).as_bytes());
        dst.put_slice(text.as_bytes());
        Ok(())
    }
}
