//! msgpack-RPC message framing.
//!
//! Messages are msgpack arrays tagged by their first element:
//! `[0, id, method, params]` request, `[1, id, error, result]` response,
//! `[2, method, params]` notification.

use std::io::{self, Read, Write};

use rmpv::Value;

use crate::session::SessionError;

const REQUEST: u64 = 0;
const RESPONSE: u64 = 1;
const NOTIFICATION: u64 = 2;

/// A decoded message sent by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Response {
        id: u64,
        error: Option<Value>,
        result: Value,
    },
    Notification {
        method: String,
        params: Vec<Value>,
    },
    /// The session calling back into us. We never serve these.
    Request { id: u64, method: String },
}

pub fn encode_request(id: u64, method: &str, params: Vec<Value>) -> Value {
    Value::Array(vec![
        Value::from(REQUEST),
        Value::from(id),
        Value::from(method),
        Value::Array(params),
    ])
}

pub fn encode_response(id: u64, error: Option<Value>, result: Value) -> Value {
    Value::Array(vec![
        Value::from(RESPONSE),
        Value::from(id),
        error.unwrap_or(Value::Nil),
        result,
    ])
}

pub fn write_message<W: Write>(writer: &mut W, message: &Value) -> Result<(), SessionError> {
    rmpv::encode::write_value(writer, message)
        .map_err(|err| SessionError::Unavailable(format!("write failed: {err}")))?;
    writer
        .flush()
        .map_err(|err| SessionError::Unavailable(format!("flush failed: {err}")))
}

/// Read one message. `Ok(None)` means the stream closed cleanly between
/// messages.
pub fn read_message<R: Read>(reader: &mut R) -> Result<Option<Incoming>, SessionError> {
    let value = match rmpv::decode::read_value(reader) {
        Ok(value) => value,
        Err(rmpv::decode::Error::InvalidMarkerRead(err))
            if err.kind() == io::ErrorKind::UnexpectedEof =>
        {
            return Ok(None);
        }
        Err(
            rmpv::decode::Error::InvalidMarkerRead(err)
            | rmpv::decode::Error::InvalidDataRead(err),
        ) => {
            return Err(SessionError::Unavailable(format!("read failed: {err}")));
        }
        Err(err) => return Err(SessionError::Protocol(err.to_string())),
    };
    decode_message(value).map(Some)
}

pub fn decode_message(value: Value) -> Result<Incoming, SessionError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(SessionError::Protocol(format!(
                "expected message array, got {other}"
            )));
        }
    };
    let mut items = items.into_iter();
    let kind = items.next().and_then(|v| v.as_u64());
    match kind {
        Some(RESPONSE) => {
            let (Some(id), Some(error), Some(result)) = (items.next(), items.next(), items.next())
            else {
                return Err(SessionError::Protocol("short response".to_string()));
            };
            let id = id
                .as_u64()
                .ok_or_else(|| SessionError::Protocol(format!("bad response id {id}")))?;
            let error = if error.is_nil() { None } else { Some(error) };
            Ok(Incoming::Response { id, error, result })
        }
        Some(NOTIFICATION) => {
            let method = items.next().and_then(value_into_string).ok_or_else(|| {
                SessionError::Protocol("notification without method".to_string())
            })?;
            let params = match items.next() {
                Some(Value::Array(params)) => params,
                _ => Vec::new(),
            };
            Ok(Incoming::Notification { method, params })
        }
        Some(REQUEST) => {
            let id = items
                .next()
                .and_then(|v| v.as_u64())
                .ok_or_else(|| SessionError::Protocol("request without id".to_string()))?;
            let method = items.next().and_then(value_into_string).unwrap_or_default();
            Ok(Incoming::Request { id, method })
        }
        _ => Err(SessionError::Protocol("unknown message type".to_string())),
    }
}

/// Human-readable text for an error object. Neovim sends `[type, message]`.
pub fn describe_error(error: &Value) -> String {
    match error {
        Value::Array(parts) => parts
            .iter()
            .rev()
            .find_map(|part| part.as_str().map(ToOwned::to_owned))
            .unwrap_or_else(|| error.to_string()),
        Value::String(s) => String::from_utf8_lossy(s.as_bytes()).into_owned(),
        other => other.to_string(),
    }
}

/// Take a string value, replacing invalid UTF-8 rather than failing.
pub fn value_into_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(String::from_utf8_lossy(s.as_bytes()).into_owned()),
        Value::Binary(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        _ => None,
    }
}
