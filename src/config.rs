//! Configuration
//!
//! Resolves where the case store lives and how chatty logging is.
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Command-line flag (`--data`)
//! 2. Environment variables (`CASETREE_DATA`, `CASETREE_LOG`)
//! 3. Platform data directory (`~/.local/share/casetree/store.json` on Linux)
//! 4. `./casetree.json`

use std::path::PathBuf;

/// Env var overriding the store path
pub const DATA_ENV: &str = "CASETREE_DATA";

/// Env var holding a tracing filter directive
pub const LOG_ENV: &str = "CASETREE_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseTreeConfig {
    /// JSON file backing the key-value store
    pub data_path: PathBuf,

    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,

    /// Set when the filter came from `CASETREE_LOG` rather than the default
    pub log_filter_explicit: bool,

    /// Insert the sample case when the store is empty
    pub seed_sample: bool,
}

impl Default for CaseTreeConfig {
    fn default() -> Self {
        Self {
            data_path: Self::default_data_path(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_filter_explicit: false,
            seed_sample: true,
        }
    }
}

impl CaseTreeConfig {
    /// Platform data dir, falling back to the working directory
    pub fn default_data_path() -> PathBuf {
        match dirs::data_dir() {
            Some(dir) => dir.join("casetree").join("store.json"),
            None => PathBuf::from("casetree.json"),
        }
    }

    /// Defaults overlaid with environment variables
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Environment variables take precedence over defaults
    pub fn with_env(mut self) -> Self {
        if let Ok(path) = std::env::var(DATA_ENV) {
            if !path.is_empty() {
                self.data_path = PathBuf::from(path);
            }
        }

        self.with_log_filter(std::env::var(LOG_ENV).ok())
    }

    /// Use `filter` when it is present and non-empty
    pub fn with_log_filter(mut self, filter: Option<String>) -> Self {
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            self.log_filter = filter;
            self.log_filter_explicit = true;
        }
        self
    }

    /// Command-line overrides win over everything else
    pub fn with_overrides(mut self, data_path: Option<PathBuf>, no_seed: bool) -> Self {
        if let Some(path) = data_path {
            self.data_path = path;
        }
        if no_seed {
            self.seed_sample = false;
        }
        self
    }

    /// Whether the user asked for a log filter explicitly
    pub fn log_filter_is_default(&self) -> bool {
        !self.log_filter_explicit
    }
}
