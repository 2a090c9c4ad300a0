//! Pure reply helpers: result marker and field extraction (no HTTP).

use serde_json::Value;

use super::types::Endpoint;
use crate::error::{WalkError, WalkResult};

const RESULT_OK: &str = "ok";

/// Parse a reply body as a JSON object.
pub(crate) fn parse_reply(endpoint: Endpoint, body: &str) -> WalkResult<Value> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        WalkError::protocol(
            endpoint,
            format!("malformed JSON reply: {e}: {}", truncate(body)),
        )
    })?;
    if !value.is_object() {
        return Err(WalkError::protocol(
            endpoint,
            format!("expected a JSON object, got {}", truncate(body)),
        ));
    }
    Ok(value)
}

/// Whether the reply carries `"result":"ok"`.
pub(crate) fn is_ok(reply: &Value) -> bool {
    reply.get("result").and_then(Value::as_str) == Some(RESULT_OK)
}

pub(crate) fn ensure_ok(endpoint: Endpoint, reply: &Value) -> WalkResult<()> {
    if is_ok(reply) {
        Ok(())
    } else {
        Err(WalkError::protocol(
            endpoint,
            format!("did not return a result of \"ok\": {reply}"),
        ))
    }
}

/// `edgeCoverage` as a percentage; accepts integer, float or numeric string.
pub(crate) fn coverage_field(endpoint: Endpoint, reply: &Value) -> WalkResult<u8> {
    let raw = field(endpoint, reply, "edgeCoverage")?;
    let pct = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| WalkError::protocol(endpoint, format!("edgeCoverage is not a number: {raw}")))?;

    Ok(pct.clamp(0.0, 100.0).trunc() as u8)
}

/// `hasNext`; the engine sends `"true"`/`"false"` strings, booleans are accepted too.
pub(crate) fn has_next_field(endpoint: Endpoint, reply: &Value) -> WalkResult<bool> {
    match field(endpoint, reply, "hasNext")? {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        other => Err(WalkError::protocol(
            endpoint,
            format!("hasNext is not a boolean: {other}"),
        )),
    }
}

/// `currentElementName`; must fit on one walk file line.
pub(crate) fn element_name_field(endpoint: Endpoint, reply: &Value) -> WalkResult<String> {
    match field(endpoint, reply, "currentElementName")? {
        Value::String(s) if !s.is_empty() && !s.contains(['\n', '\r']) => Ok(s.clone()),
        other => Err(WalkError::protocol(
            endpoint,
            format!("currentElementName is not a step name: {other}"),
        )),
    }
}

fn field<'a>(endpoint: Endpoint, reply: &'a Value, key: &str) -> WalkResult<&'a Value> {
    reply
        .get(key)
        .ok_or_else(|| WalkError::protocol(endpoint, format!("reply has no {key} field")))
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}
