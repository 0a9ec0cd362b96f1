//! # hookrelay-core
//!
//! Core crate for hookrelay. Contains the unified error system, the
//! severity tag shared by every error that crosses a hook boundary,
//! configuration schemas and the logging bootstrap.
//!
//! This crate has **no** internal dependencies on other hookrelay crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use types::Severity;
