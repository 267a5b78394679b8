//! Local preview server for the built site.

use std::path::{Path, PathBuf};

use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::SiteError;

pub const DEFAULT_PORT: u16 = 8000;

/// Router serving `dir` as static files, `index.html` for directories.
pub fn router(dir: impl Into<PathBuf>) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(dir.into()).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
}

/// Serves `dir` on `0.0.0.0:port` until Ctrl-C.
pub async fn serve(dir: &Path, port: u16) -> Result<(), SiteError> {
    let bind_addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, dir = %dir.display(), "Serving site");

    serve_on(listener, dir).await
}

/// Serves `dir` on an already-bound listener until Ctrl-C.
pub async fn serve_on(listener: TcpListener, dir: &Path) -> Result<(), SiteError> {
    axum::serve(listener, router(dir))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            }
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_serves_index_for_directories() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let page_dir = dir.path().join("articles/en-lemon-heritage-20260401-123");
        std::fs::create_dir_all(&page_dir).expect("page dir");
        std::fs::write(page_dir.join("index.html"), "<h1>Lemon</h1>").expect("write page");

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let root = dir.path().to_path_buf();
        let server = tokio::spawn(async move { serve_on(listener, &root).await });

        let client = reqwest::Client::new();
        let body = client
            .get(format!("http://{}/articles/en-lemon-heritage-20260401-123/", addr))
            .send()
            .await
            .expect("request")
            .text()
            .await
            .expect("body");
        assert_eq!(body, "<h1>Lemon</h1>");

        let missing = client
            .get(format!("http://{}/nope.html", addr))
            .send()
            .await
            .expect("request");
        assert_eq!(missing.status().as_u16(), 404);

        server.abort();
    }
}
