//! Runner configuration
//!
//! Defaults are overridden by an optional TOML file, which is in turn
//! overridden by command-line flags and environment variables.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{E2eError, E2eResult};

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// URL of the running development server
    pub base_url: String,

    /// Upper bound on the reachability probe, in milliseconds
    pub probe_timeout_ms: u64,

    /// Test engine invocation
    pub engine: EngineConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            probe_timeout_ms: 5000,
            engine: EngineConfig::default(),
        }
    }
}

/// How to invoke the test engine and where it leaves its artifacts
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Executable to spawn
    pub program: String,

    /// Arguments placed before the generated ones
    pub args: Vec<String>,

    /// Reporter passed as `--reporter=<name>`
    pub reporter: String,

    /// HTML report written by the reporter
    pub report_path: PathBuf,

    /// Directory holding screenshots and traces
    pub artifacts_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            args: vec!["playwright".to_string(), "test".to_string()],
            reporter: "html".to_string(),
            report_path: PathBuf::from("playwright-report/index.html"),
            artifacts_dir: PathBuf::from("test-results"),
        }
    }
}

impl RunnerConfig {
    /// Parse a config from a TOML string
    pub fn from_toml(content: &str) -> E2eResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| E2eError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load `path` if given, otherwise start from defaults
    pub fn load(path: Option<&Path>) -> E2eResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn validate(&self) -> E2eResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(E2eError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.probe_timeout_ms == 0 {
            return Err(E2eError::Config("probe_timeout_ms must be greater than zero".to_string()));
        }
        if self.engine.program.trim().is_empty() {
            return Err(E2eError::Config("engine.program must not be empty".to_string()));
        }
        Ok(())
    }
}
