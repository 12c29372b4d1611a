//! Shared utilities: the error taxonomy, logging setup, configuration and
//! on-disk persistence helpers.

pub mod config;
pub mod errors;
pub mod file_handler;
pub mod logger;
pub mod paths;

pub use config::{process_config, EngineConfig};
pub use errors::{
    CapabilityError, ConfigError, DispatchError, RegistryError, UnknownCapabilityError,
    ValidationError,
};
pub use file_handler::FileHandler;
pub use logger::init_logging;
