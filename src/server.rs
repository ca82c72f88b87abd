use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, Method};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::fetcher::Fetcher;
use crate::prices::{self, PriceTable};

/// Build the axum Router: the JSON price API plus the static frontend.
///
/// Static files answer every path the API does not claim, so `index.html`
/// serves the root. CORS is wide open for GET, matching what the frontend
/// needs when hosted elsewhere.
pub fn router(fetcher: Fetcher, static_dir: PathBuf) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/prices", get(api_prices))
        .layer(cors)
        .fallback_service(ServeDir::new(static_dir))
        .with_state(Arc::new(fetcher))
}

/// Serve the app on the given port until the process is stopped.
pub async fn start(port: u16, fetcher: Fetcher, static_dir: PathBuf) -> Result<()> {
    let app = router(fetcher, static_dir);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Serving prices on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// One fetch + one extraction per request; always answers 200 with a
/// non-empty table, degraded to fallback data when the upstream is down.
async fn api_prices(State(fetcher): State<Arc<Fetcher>>) -> Json<PriceTable> {
    Json(prices::current_prices(&fetcher).await)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Serve the router on an ephemeral port, backed by a mock upstream
    /// answering with the given page text.
    async fn spawn_app(upstream_body: &str) -> std::net::SocketAddr {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(upstream_body))
            .mount(&upstream)
            .await;

        let fetcher = Fetcher::with_url(upstream.uri()).unwrap();
        // MockServer shuts down on drop; keep it alive for the test process
        std::mem::forget(upstream);

        let app = router(fetcher, PathBuf::from("static"));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn api_returns_json_with_cors() {
        let addr = spawn_app("Хлеб белый - 40 руб").await;

        let client = reqwest::Client::new();
        let resp = client
            .get(format!("http://{}/api/prices", addr))
            .header("Origin", "http://example.com")
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        let table: PriceTable = resp.json().await.unwrap();
        assert_eq!(table["Хлеб белый"], 40.0);
    }

    #[tokio::test]
    async fn root_serves_frontend_index() {
        let addr = spawn_app("").await;

        let body = reqwest::get(format!("http://{}/", addr))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("Список покупок"));
    }
}
