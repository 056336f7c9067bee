pub mod commands;
pub mod config;
pub mod logging;
pub mod properties_loader;
pub mod report;
pub mod utils;

pub use commands::{Command, CommandError, CommandOutput, OutputFormat, execute};
pub use config::{AppConfig, LoggingConfig};
