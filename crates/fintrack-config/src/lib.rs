//! fintrack-config
//!
//! Persistent user preferences: the `Config` model and its on-disk manager.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, ConfigKey};
