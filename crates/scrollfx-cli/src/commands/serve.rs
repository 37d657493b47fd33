use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{info, warn};

use scrollfx_core::{AppConfig, AssetServer};

pub async fn run(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
    root: Option<PathBuf>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(root) = root {
        config.server.asset_root = root;
    }

    let asset_root = config.asset_root();
    if !asset_root.is_dir() {
        warn!(
            "Asset root {} is not a directory; requests will fail until the site is built",
            asset_root.display()
        );
    }

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    let server = AssetServer::new(&config);
    server.run(shutdown_rx).await?;

    println!("Server stopped.");
    Ok(())
}
