//! The server wraps every JSON body in one envelope:
//!
//! ```json
//! {"status": "...", "data": ..., "message": ..., "warning": ..., "errors": ..., "meta": ...}
//! ```
//!
//! Decoding tolerates bodies without the wrapper and treats the whole body as
//! the payload, so the client keeps working against endpoints (or proxies)
//! that bypass the renderer.

use crate::error::{Error, FieldErrors, Result};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A decoded success body: the payload plus the envelope's side channels.
#[derive(Debug, Clone)]
pub struct Payload<T> {
    pub data: T,
    pub message: Option<String>,
    pub warning: Option<String>,
}

/// Standard paginated collection shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Decodes a response into the typed payload or the matching [`Error`].
///
/// A 401 always maps to [`Error::Unauthorized`]; the caller decides whether a
/// refresh is worth attempting.
pub(crate) async fn decode<T>(endpoint: &str, response: Response) -> Result<Payload<T>>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let bytes = response.bytes().await?;

    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized);
    }
    if !status.is_success() {
        // Error bodies from proxies may not even be JSON. Keep whatever
        // detail is there and fall back to the status line.
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        return Err(coerce_error(status, endpoint, &body));
    }

    let body: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .map_err(|error| Error::UnexpectedResponse(format!("{endpoint}: {error}")))?
    };
    unwrap_success(endpoint, body)
}

fn unwrap_success<T>(endpoint: &str, body: Value) -> Result<Payload<T>>
where
    T: DeserializeOwned,
{
    let (data, message, warning) = match body {
        Value::Object(mut map) if map.contains_key("data") => {
            let message = take_string(&mut map, "message");
            let warning = take_string(&mut map, "warning");
            (map.remove("data").unwrap_or(Value::Null), message, warning)
        }
        other => (other, None, None),
    };
    let data = serde_json::from_value(data)
        .map_err(|error| Error::UnexpectedResponse(format!("{endpoint}: {error}")))?;
    Ok(Payload { data, message, warning })
}

fn take_string(map: &mut serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

const ENVELOPE_KEYS: [&str; 6] = ["status", "data", "message", "warning", "errors", "meta"];

fn coerce_error(status: StatusCode, endpoint: &str, body: &Value) -> Error {
    let message = extract_message(body).unwrap_or_else(|| {
        status.canonical_reason().unwrap_or("request failed").to_owned()
    });
    Error::Status {
        status: status.as_u16(),
        endpoint: endpoint.to_owned(),
        message,
        fields: extract_fields(body),
    }
}

fn message_in(value: &Value) -> Option<String> {
    ["message", "detail"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_owned)
}

fn extract_message(body: &Value) -> Option<String> {
    message_in(body).or_else(|| {
        body.get("errors").and_then(|errors| match errors {
            Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_owned),
            nested => message_in(nested),
        })
    })
}

/// Pulls `field -> [messages]` out of the error body. Exceptions raised
/// server-side arrive wrapped twice, so the field map may sit at `errors` or
/// one level further down at `errors.errors`.
fn extract_fields(body: &Value) -> FieldErrors {
    let mut fields = FieldErrors::new();
    let Some(outer) = body.get("errors") else {
        return fields;
    };
    let target = match outer.get("errors") {
        Some(inner) if inner.is_object() => inner,
        _ => outer,
    };
    if let Some(map) = target.as_object() {
        for (key, value) in map {
            if ENVELOPE_KEYS.contains(&key.as_str()) {
                continue;
            }
            let messages = match value {
                Value::String(text) => vec![text.clone()],
                Value::Array(items) => items
                    .iter()
                    .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_owned))
                    .collect(),
                other => vec![other.to_string()],
            };
            fields.insert(key.clone(), messages);
        }
    }
    fields
}
