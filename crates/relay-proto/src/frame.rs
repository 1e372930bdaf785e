//! Length-prefixed frame format.
//!
//! A frame is four ASCII decimal digits giving the payload length in bytes,
//! zero-padded, immediately followed by that many bytes of UTF-8 text:
//!
//! ```text
//! 0010NAME alice
//! ```
//!
//! Payloads are between 1 and [`MAX_PAYLOAD_LEN`] bytes. The ceiling is part
//! of the wire contract since the header cannot express anything larger.

use crate::error::{ProtocolError, Result};

/// Size of the decimal length prefix.
pub const HEADER_LEN: usize = 4;

/// Largest payload a single frame can carry.
pub const MAX_PAYLOAD_LEN: usize = 9999;

/// Check that `text` can be carried by one frame.
pub fn check_payload(text: &str) -> Result<()> {
    let len = text.len();
    if len == 0 {
        return Err(ProtocolError::InvalidMessage {
            reason: "message cannot be empty",
            len,
        });
    }
    if len > MAX_PAYLOAD_LEN {
        return Err(ProtocolError::InvalidMessage {
            reason: "message length exceeds 4-digit limit",
            len,
        });
    }
    Ok(())
}

/// Encode `text` as a complete frame.
pub fn encode(text: &str) -> Result<Vec<u8>> {
    check_payload(text)?;
    let mut out = Vec::with_capacity(HEADER_LEN + text.len());
    out.extend_from_slice(format!("{:04}", text.len()).as_bytes());
    out.extend_from_slice(text.as_bytes());
    Ok(out)
}

/// Parse a length prefix into the payload size it announces.
pub fn parse_header(raw: [u8; HEADER_LEN]) -> Result<usize> {
    if !raw.iter().all(u8::is_ascii_digit) {
        return Err(ProtocolError::InvalidLength { raw });
    }
    let len = raw
        .iter()
        .fold(0usize, |acc, digit| acc * 10 + usize::from(digit - b'0'));
    if len == 0 {
        return Err(ProtocolError::EmptyFrame);
    }
    Ok(len)
}

/// Turn payload bytes into text.
pub fn decode_payload(payload: Vec<u8>) -> Result<String> {
    String::from_utf8(payload).map_err(|e| ProtocolError::InvalidUtf8 {
        byte_pos: e.utf8_error().valid_up_to(),
    })
}

/// Read exactly one frame from `reader`.
///
/// Returns `Ok(None)` when the stream ends before a complete length prefix
/// has arrived: the peer closed. A stream that ends inside the payload is a
/// [`ProtocolError::Truncated`] error.
#[cfg(feature = "tokio")]
pub async fn decode<R>(reader: &mut R) -> Result<Option<String>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    use tokio::io::AsyncReadExt;

    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        let n = reader.read(&mut header[filled..]).await?;
        if n == 0 {
            return Ok(None);
        }
        filled += n;
    }

    let expected = parse_header(header)?;
    let mut payload = vec![0u8; expected];
    let mut actual = 0;
    while actual < expected {
        let n = reader.read(&mut payload[actual..]).await?;
        if n == 0 {
            return Err(ProtocolError::Truncated { expected, actual });
        }
        actual += n;
    }

    decode_payload(payload).map(Some)
}
