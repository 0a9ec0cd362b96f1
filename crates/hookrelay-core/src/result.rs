//! Convenience result type alias for hookrelay.

use crate::error::AppError;

/// A specialized `Result` type for hookrelay operations.
pub type AppResult<T> = Result<T, AppError>;
