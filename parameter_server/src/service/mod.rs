mod connection;
mod listener;
mod pserver;

pub use connection::{Exchange, serve_connection};
pub use listener::Service;
pub use pserver::ParameterServer;
