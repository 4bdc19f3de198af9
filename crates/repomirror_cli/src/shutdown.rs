use console::Term;

/// Resolve on the first Ctrl+C so the server can drain and exit.
///
/// A second Ctrl+C while draining forces the process to quit.
pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }

    let is_tty = Term::stdout().is_term();
    if is_tty {
        eprintln!("\n\nShutdown requested, draining connections...");
        eprintln!("Press Ctrl+C again to force quit.");
    } else {
        tracing::warn!("Shutdown requested, draining connections");
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            if is_tty {
                eprintln!("Force quit!");
            }
            std::process::exit(130);
        }
    });
}
