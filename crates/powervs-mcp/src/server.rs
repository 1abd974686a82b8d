//! HTTP server implementation using Axum.

use crate::handlers::{handle_health, PowerVsTools};
use axum::{routing::get, Router};
use powervs_core::PowerVsClient;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Build the router serving `/mcp` and `/health`.
pub fn build_router(client: Arc<PowerVsClient>) -> Router {
    // Each MCP session gets its own handler; the client is shared
    let mcp = StreamableHttpService::new(
        move || Ok(PowerVsTools::new(client.clone())),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .nest_service("/mcp", mcp)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the MCP HTTP server.
///
/// Returns the actual address the server is bound to (useful when port=0).
pub async fn start_server(
    client: PowerVsClient,
    host: &str,
    port: u16,
) -> anyhow::Result<SocketAddr> {
    let app = build_router(Arc::new(client));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);

    // Spawn the server in the background
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use powervs_core::PowerVsConfig;

    fn test_client() -> PowerVsClient {
        let config = PowerVsConfig {
            account_id: "acct".into(),
            api_key: "key".into(),
            base_url: "http://127.0.0.1:9".into(),
            ..Default::default()
        }
        .validated()
        .unwrap();
        PowerVsClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_server_starts() {
        let addr = start_server(test_client(), "127.0.0.1", 0).await.unwrap();
        assert!(addr.port() > 0);
    }

    #[tokio::test]
    async fn test_invalid_host_rejected() {
        assert!(start_server(test_client(), "not a host", 0).await.is_err());
    }
}
