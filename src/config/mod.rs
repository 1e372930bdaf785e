//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig)
//! - [`listen`]: Network listener configuration (ListenConfig)
//! - [`limits`]: Queue depths and idle timeout (LimitsConfig)
//! - [`validation`]: Startup checks

mod defaults;
mod limits;
mod listen;
mod types;
mod validation;

pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use types::{Config, ConfigError, DEFAULT_CONFIG_PATH, ServerConfig};
pub use validation::{ValidationError, validate};
