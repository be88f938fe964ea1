//! Settings of the export service.
//!
//! Values come from an optional TOML file (`config/settings.toml` unless
//! `--config` says otherwise), then from `TX_EXPORT_*` environment variables
//! (`TX_EXPORT_SERVER__PORT=9000`), then from command line flags.
use std::{path::PathBuf, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use engine::ExportSettings;
use serde::Deserialize;
use server::ExportConfig;
use url::Url;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/settings.toml";
const ENV_PREFIX: &str = "TX_EXPORT";
const DEFAULT_DATABASE_PATH: &str = "transactions.db";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
    pub public_url: Option<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
            database: Database::Sqlite(DEFAULT_DATABASE_PATH.to_string()),
            public_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Export {
    pub chunk_limit_bytes: u64,
    pub page_size: u64,
    pub timeout_secs: u64,
    pub strict_date_filters: bool,
}

impl Default for Export {
    fn default() -> Self {
        let settings = ExportSettings::default();
        Self {
            chunk_limit_bytes: settings.chunk_limit_bytes,
            page_size: settings.page_size,
            timeout_secs: server::DEFAULT_EXPORT_TIMEOUT.as_secs(),
            strict_date_filters: settings.strict_date_filters,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub export: Export,
    /// CSV file to load into the store before serving.
    #[serde(skip)]
    pub import: Option<PathBuf>,
}

#[derive(Debug, Parser)]
#[command(name = "tx_export", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the listen address.
    #[arg(long)]
    bind: Option<String>,
    /// Override the listen port.
    #[arg(long)]
    port: Option<u16>,
    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    level: Option<String>,
    /// Load transactions from a CSV file in export format before serving.
    #[arg(long, value_name = "PATH")]
    import: Option<PathBuf>,
}

impl Settings {
    /// Read settings from the file, the environment and the command line.
    pub fn load() -> Result<Self> {
        let args = Args::parse();

        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings = Self::from_file(path)?;

        if let Some(bind) = args.bind {
            settings.server.bind = bind;
        }
        if let Some(port) = args.port {
            settings.server.port = port;
        }
        if let Some(level) = args.level {
            settings.app.level = level;
        }
        settings.import = args.import;

        Ok(settings)
    }

    /// File at `path` (if it exists) overlaid with the environment.
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }

    pub fn export_config(&self) -> Result<ExportConfig> {
        let public_url = match self.server.public_url.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(Url::parse(raw)?),
            _ => None,
        };

        Ok(ExportConfig {
            settings: ExportSettings {
                chunk_limit_bytes: self.export.chunk_limit_bytes,
                page_size: self.export.page_size,
                strict_date_filters: self.export.strict_date_filters,
            },
            timeout: Duration::from_secs(self.export.timeout_secs),
            public_url,
        })
    }
}
