//! Core type definitions used across the hookrelay workspace.

pub mod severity;

pub use severity::Severity;
