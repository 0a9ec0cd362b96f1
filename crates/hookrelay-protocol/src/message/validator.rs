//! Message validation rules.

use hookrelay_core::error::AppError;

use super::types::SocketMessage;

/// Validates a raw frame before decoding.
pub fn validate_frame(raw: &str, max_size: usize) -> Result<(), AppError> {
    if raw.len() > max_size {
        return Err(AppError::validation(format!(
            "Message exceeds maximum size of {} bytes",
            max_size
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty message"));
    }

    Ok(())
}

/// Validates the shape of a decoded message.
pub fn validate_message(msg: &SocketMessage) -> Result<(), AppError> {
    match msg {
        SocketMessage::ConsoleMessage(event) => require("cid", &event.cid),
        SocketMessage::CommandRequestMessage(req) => {
            require("id", &req.id)?;
            require("cid", &req.cid)?;
            require("commandName", &req.command_name)
        }
        SocketMessage::CommandResponseMessage(res) => {
            require("id", &res.id)?;
            if res.result.is_some() && res.error.is_some() {
                return Err(AppError::validation(format!(
                    "Command response '{}' carries both a result and an error",
                    res.id
                )));
            }
            Ok(())
        }
        SocketMessage::HookTriggerMessage(trigger) => {
            require("id", &trigger.id)?;
            require("cid", &trigger.cid)?;
            require("name", &trigger.name)
        }
        SocketMessage::HookResultMessage(result) => require("id", &result.id),
    }
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::validation(format!("Field '{field}' must not be empty")));
    }
    Ok(())
}
