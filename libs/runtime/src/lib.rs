//! Process-level plumbing shared by the server binary: layered configuration,
//! logging bootstrap, home directory resolution and signal handling.

pub mod config;
pub mod logging;
pub mod paths;
pub mod shutdown;

pub use config::{AppConfig, CliArgs, IngressConfig, LoggingConfig, Section, ServerConfig};
pub use logging::init_logging_from_config;
pub use shutdown::wait_for_shutdown;
