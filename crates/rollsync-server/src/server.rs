use std::sync::Arc;

use tokio::net::TcpListener;

use rollsync_store::{DataDir, FsDocumentStore};
use rollsync_sync::SyncGateway;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::AppState;
use crate::router::build_router;

/// Rollsync HTTP server.
pub struct RollsyncServer {
    config: ServerConfig,
    gateway: Arc<SyncGateway>,
}

impl RollsyncServer {
    pub fn new(config: ServerConfig, gateway: Arc<SyncGateway>) -> Self {
        Self { config, gateway }
    }

    /// Serve the data directory named in `config`, which must already be
    /// initialized.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let dir = DataDir::open(&config.data_dir)?;
        let store = Arc::new(FsDocumentStore::open(dir));
        Ok(Self::new(config, Arc::new(SyncGateway::new(store))))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(Arc::clone(&self.gateway)), self.config.max_body_bytes)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            data_dir = %self.config.data_dir.display(),
            "rollsync server listening"
        );
        axum::serve(listener, app).await?;
        Ok(())
    }
}
