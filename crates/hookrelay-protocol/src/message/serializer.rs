//! JSON codec for wire messages.

use serde_json::Value;

use hookrelay_core::error::AppError;

use super::types::SocketMessage;
use super::validator::{validate_frame, validate_message};

/// Serialize a message to a JSON frame.
pub fn encode(msg: &SocketMessage) -> Result<String, AppError> {
    Ok(serde_json::to_string(msg)?)
}

/// Validate and deserialize a JSON frame.
pub fn decode(text: &str, max_size: usize) -> Result<SocketMessage, AppError> {
    validate_frame(text, max_size)?;
    let msg: SocketMessage = serde_json::from_str(text)?;
    validate_message(&msg)?;
    Ok(msg)
}

/// Reads the correlation id of a response frame that failed to decode.
///
/// Returns the message type and id when the frame is JSON with a string
/// `value.id`, so the waiting request can be failed instead of stranded.
pub fn peek_response_id(text: &str) -> Option<(String, String)> {
    let frame: Value = serde_json::from_str(text).ok()?;
    let kind = frame.get("type")?.as_str()?;
    let id = frame.get("value")?.get("id")?.as_str()?;
    if id.is_empty() {
        return None;
    }
    Some((kind.to_string(), id.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use hookrelay_core::ErrorKind;

    const MAX: usize = 65_536;

    #[test]
    fn test_args_keep_count_and_order() {
        let args = vec![json!(0), json!(null), json!({"browserName": "chrome"}), json!([1, 2])];
        let frame = encode(&SocketMessage::hook_trigger("3", "0-0", "before", args.clone())).unwrap();

        match decode(&frame, MAX).unwrap() {
            SocketMessage::HookTriggerMessage(trigger) => assert_eq!(trigger.args, args),
            other => panic!("unexpected message {other}"),
        }
    }

    #[test]
    fn test_garbage_is_serialization_error() {
        let err = decode("not json", MAX).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialization);
    }

    #[test]
    fn test_invalid_shape_is_validation_error() {
        let err = decode(r#"{"type":"hookResultMessage","value":{"id":""}}"#, MAX).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_peek_response_id() {
        let frame = r#"{"type":"hookResultMessage","value":{"id":"7","error":42}}"#;
        assert!(decode(frame, MAX).is_err());
        assert_eq!(
            peek_response_id(frame),
            Some(("hookResultMessage".to_string(), "7".to_string()))
        );

        assert_eq!(peek_response_id("not json"), None);
        assert_eq!(peek_response_id(r#"{"type":"hookResultMessage","value":{"id":""}}"#), None);
        assert_eq!(peek_response_id(r#"{"type":"hookResultMessage","value":{"id":7}}"#), None);
    }
}
