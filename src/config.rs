use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{ConsoleError, Result};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE", global = true)]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT", global = true)]
    pub port: Option<u16>,

    /// Remote API credential
    #[arg(long, env = "APIFY_API_KEY", hide_env_values = true, global = true)]
    pub api_token: Option<String>,

    /// Actor catalog file
    #[arg(long, env = "CATALOG_PATH", global = true)]
    pub catalog: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the web console (default)
    Serve,
    /// Start a run, wait for it to finish and print the outcome
    Run {
        /// Actor id in `username~name` form
        #[arg(long)]
        actor: String,
        /// Run input as inline JSON
        #[arg(long, conflicts_with = "input_file")]
        input: Option<String>,
        /// Run input read from a JSON file
        #[arg(long)]
        input_file: Option<PathBuf>,
    },
    /// Search the local actor catalog
    Actors {
        /// Case-insensitive filter on title, description and categories
        #[arg(short, long)]
        query: Option<String>,
        /// Maximum number of entries to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub remote: RemoteConfig,
    pub catalog: CatalogConfig,
    pub polling: PollingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub static_dir: String,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Deserialize, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
}

// Keep the credential out of logs.
impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl RemoteConfig {
    /// Whether a non-empty credential is configured.
    pub fn has_credential(&self) -> bool {
        self.api_token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub path: String,
    pub max_listed: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    pub interval_ms: u64,
    pub max_polls: u32,
    pub deadline_secs: u64,
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

impl AppConfig {
    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| ConsoleError::Cli(e.to_string()))?;
        Self::from_cli(&cli)
    }

    /// Priority: CLI flag / CLI env var > `CONSOLE_` env vars > config file > defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.static_dir", "static")?
            .set_default("server.request_timeout_secs", 60)?
            .set_default("remote.base_url", "https://api.apify.com")?
            .set_default("remote.request_timeout_secs", 30)?
            .set_default("catalog.path", "apify_actors.json")?
            .set_default("catalog.max_listed", 500)?
            .set_default("polling.interval_ms", 3000)?
            .set_default("polling.max_polls", 200)?
            .set_default("polling.deadline_secs", 900)?;

        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("console").required(false)),
        };

        // E.g. CONSOLE_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("CONSOLE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(token) = cli.api_token.as_deref().filter(|t| !t.trim().is_empty()) {
            builder = builder.set_override("remote.api_token", token)?;
        }
        if let Some(catalog) = &cli.catalog {
            builder = builder.set_override("catalog.path", catalog.as_str())?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
