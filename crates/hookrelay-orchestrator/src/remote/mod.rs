//! Remote participants: channel, service adapter, console relay and transport seam.

pub mod channel;
pub mod console;
pub mod service;
pub mod transport;

pub use channel::RemoteChannel;
pub use console::ConsoleRelay;
pub use service::RemoteService;
pub use transport::MessageSink;
