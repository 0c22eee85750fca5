use std::path::PathBuf;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

use crate::cli::Cli;

/// Configuration for the application
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the client registry service, including the `/cliente` prefix
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// File the tracing output is written to; the terminal belongs to the UI
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    /// Filter directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Search term applied to the first fetch
    #[serde(default)]
    pub initial_search: Option<String>,
}

fn default_api_base_url() -> String {
    "http://localhost:32831/cliente".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("client_manager.log")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Command-line flags win over the environment.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.api_url {
            self.api_base_url = url.clone();
        }
        if let Some(path) = &cli.log_file {
            self.log_file = path.clone();
        }
        if let Some(level) = &cli.log_level {
            self.log_level = level.clone();
        }
        if let Some(search) = &cli.search {
            self.initial_search = Some(search.clone());
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

/// Initialize environment variables and load configuration
pub fn init(cli: &Cli) -> Result<Config> {
    let mut config = Config::load()?;
    config.apply_cli(cli);

    Ok(config)
}
