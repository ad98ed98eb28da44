use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/finance_miniapp.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    /// Key for the settings endpoints; read from file or environment only.
    pub api_key: Option<String>,
    pub timezone: String,
    pub currency_symbol: String,
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api/v1".to_string(),
            api_key: None,
            timezone: "Asia/Kolkata".to_string(),
            currency_symbol: "₹".to_string(),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Page {
    /// Edit the transaction a launch URL was issued for.
    Edit {
        #[arg(long)]
        launch_url: String,
    },
    /// Show a transaction and its link candidates.
    Detail {
        /// Launch URL carrying `token` and `hash`.
        #[arg(long)]
        launch_url: String,
    },
    /// Budget, account and category settings.
    Settings {
        /// Budget month as YYYY-MM; defaults to the current month.
        #[arg(long)]
        month: Option<String>,
    },
}

#[derive(Debug, Parser)]
#[command(name = "finance_miniapp", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override API base URL (e.g. http://127.0.0.1:8000/api/v1).
    #[arg(long)]
    api_base_url: Option<String>,
    /// Override display timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override log level.
    #[arg(long)]
    level: Option<String>,
    #[command(subcommand)]
    page: Page,
}

pub fn load() -> Result<(Settings, Page)> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("FINANCE_MINIAPP"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(api_base_url) = args.api_base_url {
        settings.api_base_url = api_base_url;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(level) = args.level {
        settings.level = level;
    }

    Ok((settings, args.page))
}
