//! Infrastructure layer
//!
//! Configuration and logging for the operator binary.

mod config;
mod logging;

pub use config::{Config, OutputFormat};
pub use logging::init_logging;
