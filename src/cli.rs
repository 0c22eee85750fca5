use std::path::PathBuf;

use clap::Parser;

/// Terminal front-end for the PetLovers client registry.
#[derive(Parser, Debug, Default)]
#[command(name = "client_manager", version, about)]
pub struct Cli {
    /// Registry base URL, e.g. http://localhost:32831/cliente [env: API_BASE_URL]
    #[arg(long)]
    pub api_url: Option<String>,

    /// Search term for the first fetch
    #[arg(long)]
    pub search: Option<String>,

    /// Where to write logs [env: LOG_FILE]
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter such as `debug` or `client_manager=trace` [env: LOG_LEVEL]
    #[arg(long)]
    pub log_level: Option<String>,
}
