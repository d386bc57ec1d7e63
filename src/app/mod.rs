//! Application glue
//!
//! Configuration and host-facing utilities.

mod config;

pub use config::{Config, ConfigError};
