//! Reading RESP frames off a byte stream.

use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::resp::{RespError, RespValue};

#[derive(Error, Debug, PartialEq)]
pub enum CommandReadError {
    #[error("I/O error: {0}")]
    IoError(String),
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("RESP parse error: {0}")]
    RespParseError(#[from] RespError),
}

impl CommandReadError {
    pub fn to_resp(&self) -> RespValue {
        match self {
            CommandReadError::RespParseError(err) => err.to_resp(),
            other => RespValue::Error(format!("ERR {}", other)),
        }
    }
}

/// Reads once from `stream` into `buffer` and returns every frame that is now
/// complete, in arrival order.
///
/// Bytes of a trailing partial frame stay in `buffer` for the next call, so
/// pipelined commands split across reads are reassembled. The result is empty
/// when the read did not complete a frame.
pub async fn read_and_parse_resp<R>(
    stream: &mut R,
    buffer: &mut BytesMut,
) -> Result<Vec<RespValue>, CommandReadError>
where
    R: AsyncRead + Unpin,
{
    let number_of_bytes = stream
        .read_buf(buffer)
        .await
        .map_err(|e| CommandReadError::IoError(e.to_string()))?;

    if number_of_bytes == 0 {
        return Err(CommandReadError::ConnectionClosed);
    }

    Ok(RespValue::decode_all(buffer)?)
}
