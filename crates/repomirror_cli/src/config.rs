//! Configuration file support for repomirror.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `REPOMIRROR_`, e.g., `REPOMIRROR_DATABASE_URL`)
//! 3. Config file (~/.config/repomirror/config.toml or ./repomirror.toml)
//! 4. Legacy environment variables (`GITHUB_PAT`, `GH_PAT`, `DSN`)
//! 5. Built-in defaults
//!
//! The database URL defaults to `sqlite://~/.local/state/repomirror/repomirror.db`
//! on Linux (using the XDG state directory) if not explicitly configured.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "postgres://localhost/repomirror"
//!
//! [github]
//! token = "ghp_..."  # or use REPOMIRROR_GITHUB_TOKEN / GITHUB_PAT
//! owner = "permalik"
//! organization = false
//!
//! [sync]
//! backend = "relational"  # or "kv"
//! strategy = "wipe-all"   # or "diff" (kv backend only)
//! remote_timeout_secs = 30
//! store_timeout_secs = 5
//!
//! [server]
//! port = 5555
//! env = "development"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use repomirror::ReconcileStrategy;
use repomirror::api::{DEFAULT_PORT, ServerConfig};
use repomirror::store::{DEFAULT_OPERATION_TIMEOUT, StoreTimeouts};
use serde::Deserialize;

/// Legacy variables holding a GitHub token, in lookup order.
const LEGACY_TOKEN_VARS: [&str; 2] = ["GITHUB_PAT", "GH_PAT"];

/// Legacy variable holding the database URL.
const LEGACY_DSN_VAR: &str = "DSN";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub github: GitHubConfig,
    pub sync: SyncConfig,
    pub server: ServerSection,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL (`sqlite://` or `postgres://`).
    pub url: Option<String>,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Personal access token. Anonymous requests are made without one.
    pub token: Option<String>,
    /// Default owner to mirror.
    pub owner: Option<String>,
    /// Whether the owner is an organization.
    pub organization: bool,
}

/// Which store a sync pass writes into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Drop, recreate and refill the `repos` table.
    #[default]
    Relational,
    /// Reconcile the `repo_cache` key space.
    Kv,
}

/// Default sync options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub backend: Backend,
    /// Key-value reconciliation strategy.
    pub strategy: ReconcileStrategy,
    /// Deadline for the remote listing call, in seconds.
    pub remote_timeout_secs: u64,
    /// Deadline for each store operation, in seconds.
    pub store_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            strategy: ReconcileStrategy::default(),
            remote_timeout_secs: repomirror::source::DEFAULT_REMOTE_TIMEOUT.as_secs(),
            store_timeout_secs: DEFAULT_OPERATION_TIMEOUT.as_secs(),
        }
    }
}

impl SyncConfig {
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    pub fn store_timeouts(&self) -> StoreTimeouts {
        StoreTimeouts::default().with_operation(Duration::from_secs(self.store_timeout_secs))
    }
}

/// Read API configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub port: u16,
    /// Environment label (development, staging, production).
    pub env: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            env: "development".to_string(),
        }
    }
}

impl ServerSection {
    pub fn to_server_config(&self) -> ServerConfig {
        ServerConfig {
            env: self.env.clone(),
            port: self.port,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/repomirror/config.toml)
    /// 3. Local config file (./repomirror.toml)
    /// 4. Environment variables with REPOMIRROR_ prefix
    ///
    /// Legacy environment variables then fill whatever is still unset.
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "repomirror") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("repomirror.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./repomirror.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // REPOMIRROR_DATABASE_URL -> database.url
        builder = builder.add_source(
            Environment::with_prefix("REPOMIRROR")
                .separator("_")
                .try_parsing(true),
        );

        let mut config = match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        };

        config.apply_legacy_env(|key| std::env::var(key).ok());
        config
    }

    /// Fill the token and database URL from legacy variables when unset.
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if self.github.token.is_none() {
            self.github.token = LEGACY_TOKEN_VARS.iter().find_map(|key| non_empty(*key));
        }
        if self.database.url.is_none() {
            self.database.url = non_empty(LEGACY_DSN_VAR);
        }
    }

    /// Get the database URL, falling back to the default state directory path.
    ///
    /// The `mode=rwc` parameter creates the SQLite file if it doesn't exist.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| {
                let db_path = state_dir.join("repomirror.db");
                format!("sqlite://{}?mode=rwc", db_path.display())
            })
        })
    }

    /// Get the GitHub token.
    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone()
    }

    /// Get the default state directory path.
    ///
    /// On Linux, this is `$XDG_STATE_HOME/repomirror` or `~/.local/state/repomirror`.
    /// On macOS/Windows, falls back to the data directory.
    pub fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "repomirror").map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}
