//! `repomirror serve`: run the read API.

use repomirror::api::serve;
use repomirror::{RelationalStore, db};

use crate::config::Config;
use crate::shutdown::shutdown_signal;

/// Handle the serve command.
pub(crate) async fn handle_serve(
    port: Option<u16>,
    env: Option<String>,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut server = config.server.to_server_config();
    if let Some(port) = port {
        server.port = port;
    }
    if let Some(env) = env {
        server.env = env;
    }

    let db = db::connect(database_url).await?;
    let store = RelationalStore::new(db).with_timeouts(config.sync.store_timeouts());
    store.ping().await?;

    let listener = server.bind().await.map_err(|e| {
        format!("Failed to bind to {}: {}", server.addr(), e)
    })?;

    serve(listener, store, &server.env, shutdown_signal()).await?;
    Ok(())
}
