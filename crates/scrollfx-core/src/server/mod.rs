//! Static asset server
//!
//! Serves the built site from a fixed asset root over HTTP/1.1 with
//! `tiny_http`. Any path that does not name a file falls back to the index
//! entry point so client-side routes resolve.

mod assets;
mod http;
mod mime;

pub use assets::{error_code, AssetRoot};
pub use http::{Response, ALLOWED_METHODS};
pub use mime::{content_type_for, DEFAULT_CONTENT_TYPE};

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;

use tiny_http::{Method, Request, Server};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::{Error, Result};

/// Requests queued between the accept thread and the async handlers
const REQUEST_QUEUE: usize = 64;

/// HTTP server for the built site
pub struct AssetServer {
    assets: Arc<AssetRoot>,
    host: String,
    port: u16,
}

impl AssetServer {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            assets: Arc::new(AssetRoot::new(
                config.asset_root(),
                config.server.index_file.clone(),
            )),
            host: config.server.host.clone(),
            port: config.server.port,
        }
    }

    pub fn with_assets(assets: AssetRoot, host: impl Into<String>, port: u16) -> Self {
        Self {
            assets: Arc::new(assets),
            host: host.into(),
            port,
        }
    }

    /// Bind the configured address and serve until shutdown
    pub async fn run(&self, shutdown_rx: watch::Receiver<bool>) -> Result<()> {
        let server = Server::http((self.host.as_str(), self.port)).map_err(|e| {
            Error::Server(format!("Failed to bind {}:{}: {}", self.host, self.port, e))
        })?;
        self.serve(server, shutdown_rx).await
    }

    /// Serve requests from an already bound server until shutdown
    ///
    /// Request parsing happens on `tiny_http`'s connection threads. A
    /// blocking thread forwards parsed requests to this task, which
    /// resolves each one on the runtime.
    pub async fn serve(
        &self,
        server: Server,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<()> {
        let server = Arc::new(server);
        if let Some(addr) = server.server_addr().to_ip() {
            log_reachable_urls(addr);
        }
        info!("Serving assets from: {}", self.assets.path().display());

        let (tx, mut rx) = mpsc::channel::<Request>(REQUEST_QUEUE);
        let acceptor = server.clone();
        thread::spawn(move || {
            while let Ok(request) = acceptor.recv() {
                if tx.blocking_send(request).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                maybe_request = rx.recv() => {
                    let Some(request) = maybe_request else {
                        warn!("Asset server stopped accepting requests");
                        break;
                    };
                    tokio::spawn(handle_request(request, self.assets.clone()));
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Asset server shutting down");
                        break;
                    }
                }
            }
        }

        server.unblock();
        Ok(())
    }
}

fn log_reachable_urls(addr: SocketAddr) {
    if addr.ip().is_unspecified() {
        info!("Asset server listening on all interfaces, port {}", addr.port());
        info!("  http://localhost:{}/", addr.port());
    } else {
        info!("Asset server listening on http://{}/", addr);
    }
}

async fn handle_request(request: Request, assets: Arc<AssetRoot>) {
    let url = request.url().to_string();
    let readable = matches!(request.method(), Method::Get | Method::Head);
    debug!("{} {}", request.method(), url);
    let response = if readable {
        assets.respond(&url).await
    } else {
        Response::method_not_allowed()
    };

    let sent = tokio::task::spawn_blocking(move || request.respond(response.into_http())).await;
    match sent {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!("Client went away before the response was written: {}", e),
        Err(e) => warn!("Response task failed: {}", e),
    }
}
