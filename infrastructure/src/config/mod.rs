//! Configuration file loading for startup-dojo
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DOJO_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./dojo.toml`
//! 4. Global: `$XDG_CONFIG_HOME/startup-dojo/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigurationError, FileChatConfig, FileConfig, FileRetrievalConfig, FileSessionConfig,
    FileToolsConfig, MAX_TOP_K, optional_credential, require_credential,
};
pub use loader::{ConfigLoader, PROJECT_CONFIG_FILE};
