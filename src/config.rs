//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - clausedb.toml (default configuration)
//! - clausedb.local.toml (git-ignored local overrides)
//! - Environment variables (CLAUSEDB_* prefix)
//!
//! ## Example
//!
//! ```toml
//! # clausedb.toml
//! [compiler]
//! initial_capacity = 4096
//! var_prefix = "V"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! CLAUSEDB_COMPILER__VAR_PREFIX=_G
//! CLAUSEDB_LOGGING__LEVEL=trace
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compiler: CompilerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Compiler and decompiler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Number of node slots reserved up front
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,

    /// Prefix for variables synthesized during decompilation (`V` gives V0, V1, ...)
    #[serde(default = "default_var_prefix")]
    pub var_prefix: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_initial_capacity() -> usize {
    1024
}
fn default_var_prefix() -> String {
    crate::decompiler::DEFAULT_VAR_PREFIX.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Merges in order:
    /// 1. clausedb.toml (base configuration)
    /// 2. clausedb.local.toml (local overrides, git-ignored)
    /// 3. Environment variables (CLAUSEDB_* prefix)
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("clausedb.toml"))
            .merge(Toml::file("clausedb.local.toml"))
            .merge(Env::prefixed("CLAUSEDB_").split("__"))
            .extract()
    }

    /// Load configuration from specific file path
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("CLAUSEDB_").split("__"))
            .extract()
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            initial_capacity: default_initial_capacity(),
            var_prefix: default_var_prefix(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
