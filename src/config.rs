//! Runtime configuration from environment variables.

use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::data::{CountryTable, TableError};

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `MILSTAT_BIND`
    pub bind_addr: String,
    /// `MILSTAT_TABLE`; the built-in table is used when unset.
    pub table_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            table_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("MILSTAT_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
            table_path: env::var_os("MILSTAT_TABLE")
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn load_table(&self) -> Result<CountryTable, TableError> {
        match &self.table_path {
            Some(path) => CountryTable::from_file(path),
            None => CountryTable::builtin(),
        }
    }
}

/// Installs the fmt subscriber, filtered by `RUST_LOG` (default `info`). Logs go to stderr so
/// command output on stdout stays machine-readable.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
