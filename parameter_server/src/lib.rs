pub mod config;
pub mod error;
pub mod optimization;
pub mod service;
pub mod storage;


pub use config::ServerConfig;
pub use error::{Result, ServerErr};
