use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "mindline",
    version,
    about = "A terminal client for the Mental Health Assistant",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Backend base URL.
    #[arg(long, env = "MINDLINE_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Do not remember the signed-in user.
    #[arg(long)]
    pub no_persist: bool,
}
