//! Redis Serialization Protocol (RESP2) values.
//!
//! [`RespValue`] is the reply type produced by the engine and the frame type
//! read from clients. Encoding produces the textual wire form; decoding works
//! incrementally over a [`BytesMut`] so that a single socket read may carry
//! several pipelined commands, or only part of one.

use bytes::{Buf, BytesMut};
use thiserror::Error;

const MAX_BULK_LENGTH: i64 = 512 * 1024 * 1024;
const MAX_ARRAY_LENGTH: i64 = 1024 * 1024;
const MAX_NESTING_DEPTH: usize = 8;
const MAX_INLINE_LENGTH: usize = 64 * 1024;

#[derive(Error, Debug, PartialEq)]
pub enum RespError {
    #[error("invalid frame type byte '{0}'")]
    InvalidFrameType(char),
    #[error("invalid length '{0}'")]
    InvalidLength(String),
    #[error("invalid integer '{0}'")]
    InvalidInteger(String),
    #[error("bulk string is not terminated by CRLF")]
    MissingTerminator,
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    #[error("arrays nested deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("inline command longer than {0} bytes")]
    InlineTooLong(usize),
}

impl RespError {
    pub fn to_resp(&self) -> RespValue {
        RespValue::Error(format!("ERR Protocol error: {}", self))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    SimpleString(String),
    Error(String),
    Integer(i64),
    BulkString(String),
    NullBulkString,
    Array(Vec<RespValue>),
    NullArray,
}

impl RespValue {
    pub fn ok() -> Self {
        RespValue::SimpleString("OK".to_string())
    }

    /// Builds an array of bulk strings, the shape of most multi-value replies.
    pub fn bulk_array<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RespValue::Array(
            items
                .into_iter()
                .map(|item| RespValue::BulkString(item.into()))
                .collect(),
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RespValue::Error(_))
    }

    pub fn encode(&self) -> String {
        match self {
            RespValue::SimpleString(s) => format!("+{}\r\n", s),
            RespValue::Error(e) => format!("-{}\r\n", e),
            RespValue::Integer(i) => format!(":{}\r\n", i),
            RespValue::BulkString(s) => format!("${}\r\n{}\r\n", s.len(), s),
            RespValue::NullBulkString => "$-1\r\n".to_string(),
            RespValue::Array(elements) => {
                let mut encoded = format!("*{}\r\n", elements.len());
                for element in elements {
                    encoded.push_str(&element.encode());
                }
                encoded
            }
            RespValue::NullArray => "*-1\r\n".to_string(),
        }
    }

    /// Decodes one frame from the front of `buffer`.
    ///
    /// Returns `Ok(None)` without consuming anything when the buffer does not
    /// hold a complete frame yet. Plain-text inline commands (`PING\r\n`) are
    /// turned into arrays of bulk strings; blank inline lines are skipped.
    pub fn decode(buffer: &mut BytesMut) -> Result<Option<RespValue>, RespError> {
        loop {
            match parse_frame(&buffer[..], 0, 0)? {
                Some((Frame::Blank, consumed)) => buffer.advance(consumed),
                Some((Frame::Value(value), consumed)) => {
                    buffer.advance(consumed);
                    return Ok(Some(value));
                }
                None => return Ok(None),
            }
        }
    }

    /// Decodes every complete frame currently in `buffer`, in order.
    pub fn decode_all(buffer: &mut BytesMut) -> Result<Vec<RespValue>, RespError> {
        let mut values = Vec::new();

        while let Some(value) = RespValue::decode(buffer)? {
            values.push(value);
        }

        Ok(values)
    }
}

enum Frame {
    Value(RespValue),
    Blank,
}

fn read_line(buf: &[u8], start: usize) -> Option<(&[u8], usize)> {
    let window = buf.get(start..)?;
    let end = window.windows(2).position(|w| w == b"\r\n")?;

    Some((&window[..end], start + end + 2))
}

fn line_to_string(line: &[u8]) -> Result<String, RespError> {
    String::from_utf8(line.to_vec()).map_err(|_| RespError::InvalidUtf8)
}

fn parse_integer(line: &[u8]) -> Result<i64, RespError> {
    let text = line_to_string(line)?;
    text.parse::<i64>()
        .map_err(|_| RespError::InvalidInteger(text))
}

fn parse_length(line: &[u8], max: i64) -> Result<i64, RespError> {
    let text = line_to_string(line)?;
    let length = text
        .parse::<i64>()
        .map_err(|_| RespError::InvalidLength(text.clone()))?;

    if length < -1 || length > max {
        return Err(RespError::InvalidLength(text));
    }

    Ok(length)
}

fn is_frame_type(byte: u8) -> bool {
    matches!(byte, b'+' | b'-' | b':' | b'$' | b'*')
}

fn parse_inline(
    buf: &[u8],
    start: usize,
    first: u8,
) -> Result<Option<(Frame, usize)>, RespError> {
    if !(first.is_ascii_graphic() || first.is_ascii_whitespace()) {
        return Err(RespError::InvalidFrameType(first as char));
    }

    let Some((line, next)) = read_line(buf, start) else {
        if buf.len() - start > MAX_INLINE_LENGTH {
            return Err(RespError::InlineTooLong(MAX_INLINE_LENGTH));
        }
        return Ok(None);
    };
    if line.len() > MAX_INLINE_LENGTH {
        return Err(RespError::InlineTooLong(MAX_INLINE_LENGTH));
    }
    let text = line_to_string(line)?;
    let parts: Vec<&str> = text.split_whitespace().collect();

    if parts.is_empty() {
        return Ok(Some((Frame::Blank, next)));
    }

    Ok(Some((Frame::Value(RespValue::bulk_array(parts)), next)))
}

fn parse_frame(
    buf: &[u8],
    start: usize,
    depth: usize,
) -> Result<Option<(Frame, usize)>, RespError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(RespError::NestingTooDeep(MAX_NESTING_DEPTH));
    }

    let Some(&type_byte) = buf.get(start) else {
        return Ok(None);
    };

    if !is_frame_type(type_byte) {
        return parse_inline(buf, start, type_byte);
    }

    let Some((line, next)) = read_line(buf, start + 1) else {
        return Ok(None);
    };

    let value = match type_byte {
        b'+' => RespValue::SimpleString(line_to_string(line)?),
        b'-' => RespValue::Error(line_to_string(line)?),
        b':' => RespValue::Integer(parse_integer(line)?),
        b'$' => {
            let length = parse_length(line, MAX_BULK_LENGTH)?;
            if length == -1 {
                return Ok(Some((Frame::Value(RespValue::NullBulkString), next)));
            }

            let end = next + length as usize;
            if buf.len() < end + 2 {
                return Ok(None);
            }
            if &buf[end..end + 2] != b"\r\n" {
                return Err(RespError::MissingTerminator);
            }

            return Ok(Some((
                Frame::Value(RespValue::BulkString(line_to_string(&buf[next..end])?)),
                end + 2,
            )));
        }
        b'*' => {
            let length = parse_length(line, MAX_ARRAY_LENGTH)?;
            if length == -1 {
                return Ok(Some((Frame::Value(RespValue::NullArray), next)));
            }

            let mut elements = Vec::with_capacity((length as usize).min(64));
            let mut position = next;

            for _ in 0..length {
                if let Some(&element_type) = buf.get(position) {
                    if !is_frame_type(element_type) {
                        return Err(RespError::InvalidFrameType(element_type as char));
                    }
                }

                match parse_frame(buf, position, depth + 1)? {
                    Some((Frame::Value(element), after)) => {
                        elements.push(element);
                        position = after;
                    }
                    Some((Frame::Blank, _)) => {
                        return Err(RespError::InvalidFrameType(' '));
                    }
                    None => return Ok(None),
                }
            }

            return Ok(Some((Frame::Value(RespValue::Array(elements)), position)));
        }
        other => return Err(RespError::InvalidFrameType(other as char)),
    };

    Ok(Some((Frame::Value(value), next)))
}
