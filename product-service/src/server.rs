//! HTTP server wrapper exposing the uniform shutdown capability the lifecycle
//! orchestrator consumes.

use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A bound, running HTTP server.
///
/// [`shutdown`](Server::shutdown) stops the listener from accepting new
/// connections and waits for in-flight requests to drain; the caller (the
/// orchestrator) bounds that wait with its own deadline.
pub struct Server {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    handle: JoinHandle<Result<(), std::io::Error>>,
}

impl Server {
    /// Bind `addr` and start serving `app` in a background task.
    pub async fn bind(addr: SocketAddr, app: Router) -> std::io::Result<Server> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();

        let signal = {
            let token = shutdown.clone();
            async move { token.cancelled().await }
        };
        let handle = tokio::spawn(async move {
            axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(signal)
                .await
        });

        Ok(Server {
            local_addr,
            shutdown,
            handle,
        })
    }

    /// The address actually bound; differs from the configured one when
    /// binding port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting new connections and wait for in-flight requests to
    /// complete.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        self.shutdown.cancel();
        self.handle
            .await
            .context("server task panicked")?
            .context("server terminated with an error")?;
        Ok(())
    }
}
