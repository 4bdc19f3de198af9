//! `repomirror list`: print what the relational store currently holds.

use console::{Term, style};
use repomirror::{RelationalStore, RepoView, db};

use crate::config::Config;

/// Handle the list command.
pub(crate) async fn handle_list(
    json: bool,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;
    let store = RelationalStore::new(db).with_timeouts(config.sync.store_timeouts());
    let repos = store.select_all().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&repos)?);
        return Ok(());
    }

    if repos.is_empty() {
        println!("No repositories synced yet.");
        return Ok(());
    }

    let is_tty = Term::stdout().is_term();
    for repo in &repos {
        println!("{}", format_line(repo, is_tty));
    }
    Ok(())
}

fn format_line(repo: &RepoView, styled: bool) -> String {
    let category = if repo.category.is_empty() {
        String::new()
    } else {
        format!("[{}] ", repo.category)
    };

    if styled {
        format!(
            "{:<30} {}{} {}",
            style(&repo.name).bold(),
            style(category).dim(),
            repo.description,
            style(&repo.created_at).dim(),
        )
    } else {
        format!(
            "{:<30} {}{} {}",
            repo.name, category, repo.description, repo.created_at
        )
    }
}
