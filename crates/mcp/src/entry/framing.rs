#![forbid(unsafe_code)]

//! Message framing for the stdio transport.
//!
//! Clients either write one JSON document per line or use LSP-style
//! `Content-Length` headers. The mode is detected once, from the first
//! non-empty line, and responses are written in the same mode.

use crate::{JsonRpcRequest, json_rpc_error};
use serde_json::Value;
use std::io::{self, BufRead, Write};

const MAX_CONTENT_LENGTH_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransportMode {
    NewlineJson,
    ContentLength,
}

pub(crate) fn detect_mode(line: &str) -> Option<TransportMode> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Some(TransportMode::NewlineJson);
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("content-length:") || lower.starts_with("content-type:") {
        return Some(TransportMode::ContentLength);
    }
    None
}

fn content_length(line: &str) -> Option<usize> {
    let (key, value) = line.trim().split_once(':')?;
    if !key.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse().ok()
}

/// Reads the rest of a header block starting at `first`, then the body.
/// `Ok(None)` means the peer closed the stream mid-frame.
pub(crate) fn read_content_length_frame<R: BufRead>(
    reader: &mut R,
    first: String,
) -> io::Result<Option<Vec<u8>>> {
    let mut header = first;
    let mut length = content_length(&header);
    while !header.trim_end().is_empty() {
        header.clear();
        if reader.read_line(&mut header)? == 0 {
            return Ok(None);
        }
        if length.is_none() {
            length = content_length(&header);
        }
    }

    let Some(len) = length else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Missing Content-Length header",
        ));
    };
    if len > MAX_CONTENT_LENGTH_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Content-Length exceeds max allowed size",
        ));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(Some(body))
}

pub(crate) fn write_frame<W: Write>(
    writer: &mut W,
    mode: TransportMode,
    response: &Value,
) -> io::Result<()> {
    let body = serde_json::to_vec(response)?;
    match mode {
        TransportMode::NewlineJson => {
            writer.write_all(&body)?;
            writer.write_all(b"\n")?;
        }
        TransportMode::ContentLength => {
            write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
            writer.write_all(&body)?;
        }
    }
    writer.flush()
}

/// Decodes one message body. The error is the JSON-RPC error response to send.
pub(crate) fn parse_request(body: &[u8]) -> Result<JsonRpcRequest, Value> {
    let data: Value = serde_json::from_slice(body)
        .map_err(|err| json_rpc_error(None, -32700, &format!("Parse error: {err}")))?;

    let Some(object) = data.as_object() else {
        return Err(json_rpc_error(None, -32600, "Invalid Request"));
    };
    let id = object.get("id").cloned();
    if !object.contains_key("method") {
        return Err(json_rpc_error(id, -32600, "Invalid Request"));
    }

    serde_json::from_value(data)
        .map_err(|err| json_rpc_error(id, -32600, &format!("Invalid Request: {err}")))
}
