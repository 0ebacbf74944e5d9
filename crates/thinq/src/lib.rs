pub mod client;
pub mod config;
pub mod error;

pub use client::ThinqClient;
pub use config::{ConfigError, ThinqConfig};
pub use error::ThinqError;
