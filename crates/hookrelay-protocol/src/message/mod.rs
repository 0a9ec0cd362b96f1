//! Wire message types, serialization, and validation.

pub mod error;
pub mod serializer;
pub mod types;
pub mod validator;

pub use error::SerializedError;
pub use serializer::{decode, encode, peek_response_id};
pub use types::{Direction, SocketMessage};
