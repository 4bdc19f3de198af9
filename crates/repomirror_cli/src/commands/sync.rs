//! `repomirror sync`: run one sync pass into the configured backend.

use console::{Term, style};
use repomirror::source::GitHubSource;
use repomirror::{
    KvTarget, ReconcileStrategy, RelationalStore, SqlKeyValueStore, SyncEngine, SyncOptions,
    SyncReport, db,
};

use crate::config::{Backend, Config};
use crate::progress::LoggingReporter;

/// Options for a sync pass. Unset values fall back to the config file.
#[derive(Debug, Clone, clap::Args)]
pub struct SyncArgs {
    /// User or organization to mirror (default from config)
    pub owner: Option<String>,

    /// Treat the owner as an organization
    #[arg(short = 'o', long)]
    pub org: bool,

    /// Store to write into
    #[arg(short = 'b', long, value_enum)]
    pub backend: Option<Backend>,

    /// How existing keys are handled by the kv backend (wipe-all or diff)
    #[arg(short = 's', long)]
    pub strategy: Option<ReconcileStrategy>,

    /// Deadline for the GitHub listing call, in seconds
    #[arg(long)]
    pub remote_timeout_secs: Option<u64>,

    /// Deadline for each store operation, in seconds
    #[arg(long)]
    pub store_timeout_secs: Option<u64>,
}

/// Handle the sync command.
pub(crate) async fn handle_sync(
    args: SyncArgs,
    config: &mut Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let owner = args
        .owner
        .or_else(|| config.github.owner.clone())
        .ok_or("No owner given. Pass one as an argument or set github.owner in the config.")?;
    let organization = args.org || config.github.organization;
    let backend = args.backend.unwrap_or(config.sync.backend);
    let strategy = args.strategy.unwrap_or(config.sync.strategy);

    if let Some(secs) = args.remote_timeout_secs {
        config.sync.remote_timeout_secs = secs;
    }
    if let Some(secs) = args.store_timeout_secs {
        config.sync.store_timeout_secs = secs;
    }

    let token = config.github_token();
    if token.is_none() {
        tracing::warn!("No GitHub token configured, using anonymous requests");
    }
    let source = GitHubSource::new(token.as_deref())?;

    let options = SyncOptions::new(owner)
        .organization(organization)
        .remote_timeout(config.sync.remote_timeout());
    let engine = SyncEngine::new(source, options);
    let timeouts = config.sync.store_timeouts();
    let callback = LoggingReporter::new().into_callback();

    let db = db::connect(database_url).await?;

    let report = match backend {
        Backend::Relational => {
            let store = RelationalStore::new(db).with_timeouts(timeouts);
            engine.run(&store, Some(&callback)).await?
        }
        Backend::Kv => {
            let store = SqlKeyValueStore::open(db, timeouts).await?;
            let target = KvTarget::new(store, strategy);
            engine.run(&target, Some(&callback)).await?
        }
    };

    display_report(&report, backend);
    Ok(())
}

/// Under wipe-all this counts every key removed, not only stale ones.
fn deleted_summary(deleted: usize) -> Option<String> {
    match deleted {
        0 => None,
        1 => Some("1 key deleted".to_string()),
        n => Some(format!("{} keys deleted", n)),
    }
}

fn display_report(report: &SyncReport, backend: Backend) {
    let backend = match backend {
        Backend::Relational => "relational",
        Backend::Kv => "kv",
    };

    if Term::stdout().is_term() {
        println!(
            "{} Synced {} of {} repositories for {} into the {} store",
            style("✓").green().bold(),
            style(report.applied).cyan(),
            report.fetched,
            style(&report.owner).bold(),
            backend,
        );
        if let Some(line) = deleted_summary(report.deleted) {
            println!("  {}", style(line).yellow());
        }
    } else {
        tracing::info!(
            owner = %report.owner,
            backend,
            fetched = report.fetched,
            applied = report.applied,
            deleted = report.deleted,
            "Sync finished"
        );
    }
}
