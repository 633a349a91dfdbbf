pub mod toml_config;

pub use toml_config::{
    BasketConfig, CatalogConfig, LoaderConfig, LoggingConfig, RepositoryConfig, SessionConfig,
};

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "basket-loader")]
#[command(about = "Load and rehydrate the shopping basket stored in a session")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "basket-loader.toml")]
    pub config: String,

    /// Session whose basket should be loaded
    #[arg(short, long)]
    pub session: String,

    /// Override the session directory from the config file
    #[arg(long)]
    pub session_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}
