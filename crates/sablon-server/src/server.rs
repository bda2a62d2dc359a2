use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// Sablon HTTP server.
pub struct SablonServer {
    config: ServerConfig,
}

impl SablonServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router over a freshly opened store (useful for testing).
    pub fn router(&self) -> ServerResult<axum::Router> {
        Ok(build_router(AppState::from_config(&self.config)?))
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router()?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            database = %self.config.database,
            collection = %self.config.collection,
            "Sablon server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        tracing::info!("Sablon server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Server is shutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;

    #[test]
    fn server_construction() {
        let server = SablonServer::new(ServerConfig::default());
        assert_eq!(server.config().bind_addr, "127.0.0.1:8000".parse().unwrap());
    }

    #[test]
    fn router_builds() {
        let server = SablonServer::new(ServerConfig::default());
        assert!(server.router().is_ok());
    }

    #[test]
    fn router_fails_on_bad_namespace() {
        let server = SablonServer::new(ServerConfig {
            database: String::new(),
            storage: StorageConfig::Memory,
            ..Default::default()
        });
        assert!(server.router().is_err());
    }
}
