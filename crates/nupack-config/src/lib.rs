//! Configuration loading for nupack-serve.
//! Reads nupack-serve.toml from the current directory or the path in NUPACK_SERVE_CONFIG.
//! Every field has a default, so a missing file yields the default configuration.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "NUPACK_SERVE_CONFIG";
pub const BIND_ENV: &str = "NUPACK_SERVE_BIND";
pub const LICENSE_PATH_ENV: &str = "NUPACK_LICENSE_PATH";
pub const BIN_DIR_ENV: &str = "NUPACK_BIN_DIR";

const DEFAULT_CONFIG_FILE: &str = "nupack-serve.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub license: LicenseConfig,
    #[serde(default)]
    pub about: AboutConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
}

fn default_bind() -> SocketAddr { SocketAddr::from(([0, 0, 0, 0], 8000)) }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    #[serde(default = "default_license_path")]
    pub path: PathBuf,
}

fn default_license_path() -> PathBuf { PathBuf::from("/tmp/nupack3.2.2/LICENSE") }

impl Default for LicenseConfig {
    fn default() -> Self {
        Self { path: default_license_path() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutConfig {
    #[serde(default = "default_usage")]
    pub usage: String,
    #[serde(default = "default_homepage")]
    pub homepage: String,
}

fn default_usage() -> String {
    "Nupack-serve is a wrapper for NUPACK: a software suite for the analysis and design of \
     nucleic acid structures, devices, and systems (Wolfe et al. 2017)."
        .to_string()
}
fn default_homepage() -> String { "https://github.com/sbi-rostock/nupack-serve".to_string() }

impl Default for AboutConfig {
    fn default() -> Self {
        Self { usage: default_usage(), homepage: default_homepage() }
    }
}

/// How tool processes are launched and how long each phase may take.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Command prefix placed before every tool invocation. The default disables
    /// stdout buffering so prompts reach the pipe without a trailing newline.
    #[serde(default = "default_launcher")]
    pub launcher: Vec<String>,
    #[serde(default = "default_prompt_timeout")]
    pub prompt_timeout_secs: u64,
    #[serde(default = "default_harvest_timeout")]
    pub harvest_timeout_secs: u64,
    #[serde(default = "default_exit_timeout")]
    pub exit_timeout_secs: u64,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Upper bound on the output collected from one tool run.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

fn default_launcher()        -> Vec<String> { vec!["stdbuf".to_string(), "-o0".to_string()] }
fn default_prompt_timeout()  -> u64   { 30 }
fn default_harvest_timeout() -> u64   { 300 }
fn default_exit_timeout()    -> u64   { 5 }
fn default_max_concurrent()  -> usize { 8 }
fn default_max_output_bytes() -> usize { 16 * 1024 * 1024 }

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            launcher: default_launcher(),
            prompt_timeout_secs: default_prompt_timeout(),
            harvest_timeout_secs: default_harvest_timeout(),
            exit_timeout_secs: default_exit_timeout(),
            max_concurrent: default_max_concurrent(),
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

impl RunnerConfig {
    pub fn prompt_timeout(&self) -> Duration { Duration::from_secs(self.prompt_timeout_secs) }
    pub fn harvest_timeout(&self) -> Duration { Duration::from_secs(self.harvest_timeout_secs) }
    pub fn exit_timeout(&self) -> Duration { Duration::from_secs(self.exit_timeout_secs) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ToolConfig {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_mfe_tool")]
    pub mfe: ToolConfig,
    #[serde(default = "default_complexes_tool")]
    pub complexes: ToolConfig,
    #[serde(default = "default_concentrations_tool")]
    pub concentrations: ToolConfig,
}

fn default_mfe_tool()            -> ToolConfig { ToolConfig::new("mfe", &["-multi"]) }
fn default_complexes_tool()      -> ToolConfig { ToolConfig::new("complexes", &[]) }
fn default_concentrations_tool() -> ToolConfig { ToolConfig::new("concentrations", &[]) }

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            mfe: default_mfe_tool(),
            complexes: default_complexes_tool(),
            concentrations: default_concentrations_tool(),
        }
    }
}

impl ToolsConfig {
    fn all_mut(&mut self) -> [&mut ToolConfig; 3] {
        [&mut self.mfe, &mut self.complexes, &mut self.concentrations]
    }
}


impl Config {
    /// Load configuration from nupack-serve.toml.
    /// Checks NUPACK_SERVE_CONFIG env var first, then current directory.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&path).exists() {
            Self::load_from(Path::new(&path))?
        } else {
            tracing::info!("Config file {} not found, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply NUPACK_SERVE_BIND, NUPACK_LICENSE_PATH and NUPACK_BIN_DIR.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(BIND_ENV) {
            self.server.bind = bind
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("{}={}: {}", BIND_ENV, bind, e)))?;
        }
        if let Some(path) = lookup(LICENSE_PATH_ENV) {
            self.license.path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(BIN_DIR_ENV) {
            let dir = PathBuf::from(dir);
            for tool in self.tools.all_mut() {
                // Only bare program names are resolved against the bin dir
                if !tool.program.contains('/') {
                    tool.program = dir.join(&tool.program).to_string_lossy().into_owned();
                }
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let runner = &self.runner;
        if runner.prompt_timeout_secs == 0
            || runner.harvest_timeout_secs == 0
            || runner.exit_timeout_secs == 0
        {
            return Err(ConfigError::Invalid("runner timeouts must be greater than zero".into()));
        }
        if runner.max_concurrent == 0 {
            return Err(ConfigError::Invalid("runner.max_concurrent must be at least 1".into()));
        }
        if runner.max_output_bytes == 0 {
            return Err(ConfigError::Invalid("runner.max_output_bytes must be at least 1".into()));
        }
        if runner.launcher.iter().any(|part| part.trim().is_empty()) {
            return Err(ConfigError::Invalid("runner.launcher entries must not be empty".into()));
        }
        let tools = [
            ("mfe", &self.tools.mfe),
            ("complexes", &self.tools.complexes),
            ("concentrations", &self.tools.concentrations),
        ];
        for (name, tool) in tools {
            if tool.program.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("tools.{}.program must not be empty", name)));
            }
        }
        Ok(())
    }
}
