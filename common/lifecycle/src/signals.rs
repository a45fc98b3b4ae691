use tokio::signal::unix::SignalKind;

/// Resolves when SIGINT or SIGTERM is received; returns the signal name for logs.
pub(crate) async fn wait_for_shutdown_signal() -> &'static str {
    let ctrl_c = tokio::signal::ctrl_c();
    let mut sigterm = tokio::signal::unix::signal(SignalKind::terminate())
        .expect("failed to install SIGTERM handler");

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
    }
}
