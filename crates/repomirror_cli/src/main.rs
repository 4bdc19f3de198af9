//! Repomirror CLI - mirror GitHub repository metadata and serve it back.

mod commands;
mod config;
mod progress;
mod shutdown;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::sync::SyncArgs;

#[derive(Parser)]
#[command(name = "repomirror")]
#[command(version)]
#[command(about = "Mirror GitHub repository metadata into a local store")]
#[command(
    long_about = "Repomirror lists a GitHub user's or organization's public repositories and \
mirrors their metadata into a relational table (rebuilt on every pass) or a key-value \
cache. The relational copy can be served read-only as JSON."
)]
#[command(after_long_help = r#"EXAMPLES
    Mirror a user's repositories into the relational table:
        $ repomirror sync permalik

    Mirror an organization into the key-value cache, deleting only stale keys:
        $ repomirror sync my-org --org --backend kv --strategy diff

    Serve the mirrored table on port 5555:
        $ repomirror serve --port 5555

CONFIGURATION
    Repomirror reads configuration from:
      1. ~/.config/repomirror/config.toml (or $XDG_CONFIG_HOME/repomirror/config.toml)
      2. ./repomirror.toml
      3. Environment variables (REPOMIRROR_* prefix, e.g., REPOMIRROR_GITHUB_TOKEN)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    REPOMIRROR_DATABASE_URL   Database connection string (default: ~/.local/state/repomirror/repomirror.db)
    REPOMIRROR_GITHUB_TOKEN   GitHub personal access token
    REPOMIRROR_GITHUB_OWNER   Default owner to mirror
    GITHUB_PAT, GH_PAT        Legacy token variables, used when no token is configured
    DSN                       Legacy database URL, used when none is configured
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch repositories and reconcile them into the store
    Sync(SyncArgs),
    /// Print the repositories held in the relational store
    List {
        /// Print JSON instead of one line per repository
        #[arg(long)]
        json: bool,
    },
    /// Serve the relational store as JSON on GET /repos
    Serve {
        /// Port to listen on (default from config or 5555)
        #[arg(short, long)]
        port: Option<u16>,

        /// Environment label (development|staging|production)
        #[arg(short, long)]
        env: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("repomirror=info,repomirror_cli=info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Config file -> env vars -> legacy env vars -> defaults
    let mut config = config::Config::load();

    let cli = Cli::parse();

    let database_url = config
        .database_url()
        .ok_or("Could not determine a database URL; set database.url or REPOMIRROR_DATABASE_URL")?;

    if database_url.starts_with("sqlite://") {
        ensure_sqlite_dir(&database_url)?;
    }

    let result = match cli.command {
        Commands::Sync(args) => commands::sync::handle_sync(args, &mut config, &database_url).await,
        Commands::List { json } => commands::list::handle_list(json, &config, &database_url).await,
        Commands::Serve { port, env } => {
            commands::serve::handle_serve(port, env, &config, &database_url).await
        }
    };

    if let Err(e) = &result {
        tracing::error!("{}", e);
    }
    result
}

/// Create the parent directory of a SQLite database file.
fn ensure_sqlite_dir(database_url: &str) -> std::io::Result<()> {
    let db_path = database_url.trim_start_matches("sqlite://");
    // Strip query parameters (e.g., ?mode=rwc) before path operations
    let db_path = db_path.split('?').next().unwrap_or(db_path);
    let db_path = std::path::Path::new(db_path);

    if db_path.is_relative() && !db_path.as_os_str().is_empty() {
        tracing::warn!(
            "Database path '{}' is relative - behavior depends on current directory. \
             Consider using an absolute path.",
            db_path.display()
        );
    }

    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use repomirror::ReconcileStrategy;

    use super::*;
    use crate::config::Backend;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sync_flags() {
        let cli = Cli::parse_from([
            "repomirror",
            "sync",
            "permalik",
            "--org",
            "--backend",
            "kv",
            "--strategy",
            "diff",
            "--remote-timeout-secs",
            "12",
        ]);

        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.owner.as_deref(), Some("permalik"));
                assert!(args.org);
                assert_eq!(args.backend, Some(Backend::Kv));
                assert_eq!(args.strategy, Some(ReconcileStrategy::Diff));
                assert_eq!(args.remote_timeout_secs, Some(12));
                assert_eq!(args.store_timeout_secs, None);
            }
            _ => panic!("expected sync"),
        }
    }

    #[test]
    fn test_parse_sync_without_owner() {
        let cli = Cli::parse_from(["repomirror", "sync"]);
        match cli.command {
            Commands::Sync(args) => {
                assert!(args.owner.is_none());
                assert!(args.backend.is_none());
            }
            _ => panic!("expected sync"),
        }
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["repomirror", "serve", "--port", "8080", "--env", "production"]);
        match cli.command {
            Commands::Serve { port, env } => {
                assert_eq!(port, Some(8080));
                assert_eq!(env.as_deref(), Some("production"));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_rejects_unknown_strategy() {
        let result = Cli::try_parse_from(["repomirror", "sync", "--strategy", "minimal"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_ensure_sqlite_dir_creates_parent() {
        let dir = std::env::temp_dir().join(format!("repomirror-test-{}", std::process::id()));
        let url = format!("sqlite://{}/nested/repomirror.db?mode=rwc", dir.display());

        ensure_sqlite_dir(&url).unwrap();
        assert!(dir.join("nested").is_dir());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
