//! # gesture_wire
//!
//! Gets [`GestureEvent`]s from the tracking thread to every connected client.
//!
//! * [`encode_line`] / [`decode_line`]: one event per line of JSON, wrapped
//!   in a versioned envelope: `{"v":1,"type":"PRINT","char":"M"}`.
//! * [`hub`]: bounded, non-blocking hand-off from the producer plus fan-out
//!   to subscribers on a dedicated thread.
//! * [`server`]: TCP listener that registers each connection as a
//!   subscriber.
//!
//! Delivery is fire-and-forget: no acknowledgements, no retries, and a
//! subscriber that cannot keep up is dropped rather than waited for.

pub mod hub;
pub mod server;

pub use hub::{event_queue, spawn_hub, EventQueue, Publisher, Subscribers};
pub use server::EventServer;

use gesture_fsm::GestureEvent;
use serde_json::Value;
use thiserror::Error;

/// Envelope version written in the `v` field of every line.
pub const WIRE_VERSION: u64 = 1;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported wire version {0:?}")]
    Version(Option<u64>),
    #[error("event is not a JSON object")]
    NotAnObject,
}

/// Serialize one event as a newline-terminated JSON envelope.
pub fn encode_line(event: &GestureEvent) -> Result<String, WireError> {
    let mut value = serde_json::to_value(event)?;
    let obj = value.as_object_mut().ok_or(WireError::NotAnObject)?;
    obj.insert("v".to_string(), Value::from(WIRE_VERSION));
    let mut line = serde_json::to_string(&value)?;
    line.push('\n');
    Ok(line)
}

/// Parse one envelope line (trailing newline optional).
pub fn decode_line(line: &str) -> Result<GestureEvent, WireError> {
    let mut value: Value = serde_json::from_str(line.trim_end())?;
    let obj = value.as_object_mut().ok_or(WireError::NotAnObject)?;
    match obj.remove("v").and_then(|v| v.as_u64()) {
        Some(WIRE_VERSION) => {}
        other => return Err(WireError::Version(other)),
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_fsm::Mode;

    #[test]
    fn envelope_carries_version_and_type() {
        let line = encode_line(&GestureEvent::ModeChange { mode: Mode::Fonts }).unwrap();
        assert!(line.ends_with('\n'));
        let v: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["v"], 1);
        assert_eq!(v["type"], "MODE_CHANGE");
        assert_eq!(v["mode"], "fonts");
    }

    #[test]
    fn delete_has_no_payload() {
        let line = encode_line(&GestureEvent::Delete).unwrap();
        let v: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v.as_object().unwrap().len(), 2);
    }

    #[test]
    fn decode_reads_back_space() {
        let e = decode_line("{\"v\":1,\"type\":\"PRINT\",\"char\":\" \"}\n").unwrap();
        assert_eq!(e, GestureEvent::Print { ch: ' ' });
    }

    #[test]
    fn decode_rejects_other_versions() {
        let err = decode_line(r#"{"v":2,"type":"DELETE"}"#).unwrap_err();
        assert!(matches!(err, WireError::Version(Some(2))));
        let err = decode_line(r#"{"type":"DELETE"}"#).unwrap_err();
        assert!(matches!(err, WireError::Version(None)));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode_line("[1,2]"), Err(WireError::NotAnObject)));
        assert!(matches!(decode_line("not json"), Err(WireError::Json(_))));
    }
}
