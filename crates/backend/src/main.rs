mod config;

use std::path::Path;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{extract::State, response::Html, routing::get, Json, Router};
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::EnvFilter;

use config::ServerConfig;

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Build the full application router.
fn build_app(config: Arc<ServerConfig>) -> Router {
    // Static file routers are stateless, merge them before adding app state
    let static_files = Router::new()
        .nest(
            "/static",
            cached_static_router(&config.assets_dir, CACHE_1DAY),
        )
        .nest(
            "/dist",
            cached_static_router(&config.dist_dir, CACHE_IMMUTABLE),
        )
        .nest(
            "/assets",
            cached_static_router(&config.dist_dir.join("assets"), CACHE_IMMUTABLE),
        );

    Router::new()
        .route("/", get(serve_index))
        .route("/health", get(health))
        .with_state(config)
        .merge(static_files)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(ServerConfig::from_env());
    let app = build_app(config.clone());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, "failed to bind: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        assets = %config.assets_dir.display(),
        dist = %config.dist_dir.display(),
        "Server running at http://localhost:{}",
        config.port
    );

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

const FALLBACK_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>homemap</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.3/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.3/dist/leaflet.js"></script>
<script src="https://unpkg.com/htmx.org@1.9.0"></script>
</head>
<body>
<div id="map" class="map"></div>
<p>Frontend not built yet. Build the web app into the dist directory and reload.</p>
</body>
</html>"#;

async fn serve_index(State(config): State<Arc<ServerConfig>>) -> Html<String> {
    // Try to serve the built frontend, fall back to a bare shell
    match tokio::fs::read_to_string(config.index_path()).await {
        Ok(html) => Html(html),
        Err(e) => {
            tracing::debug!("no built index ({}), serving fallback shell", e);
            Html(FALLBACK_INDEX.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::path::PathBuf;
    use tower::ServiceExt;

    /// Build a test app that serves files from the given temp directories.
    fn test_app(assets_dir: &Path, dist_dir: &Path) -> Router {
        build_app(Arc::new(ServerConfig {
            port: 0,
            assets_dir: assets_dir.to_path_buf(),
            dist_dir: dist_dir.to_path_buf(),
        }))
    }

    /// Create a temp dir with a test file and return the dir path.
    fn temp_dir_with_file(file_name: &str, content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
        dir
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_static_assets_have_1day_cache() {
        let assets_dir = temp_dir_with_file("app.css", "body{}");
        let dist_dir = temp_dir_with_file("index.html", "<html></html>");

        let resp = get(test_app(assets_dir.path(), dist_dir.path()), "/static/app.css").await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "public, max-age=86400, must-revalidate"
        );
    }

    #[tokio::test]
    async fn test_dist_bundles_have_immutable_cache() {
        let assets_dir = temp_dir_with_file("app.css", "body{}");
        let dist_dir = temp_dir_with_file("homemap-abc123.wasm", "wasm");

        let resp = get(
            test_app(assets_dir.path(), dist_dir.path()),
            "/dist/homemap-abc123.wasm",
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "public, max-age=31536000, immutable"
        );
    }

    #[tokio::test]
    async fn test_dist_assets_have_immutable_cache() {
        let assets_dir = temp_dir_with_file("app.css", "body{}");
        let dist_dir = temp_dir_with_file("assets/main-xyz.css", "body{}");

        let resp = get(
            test_app(assets_dir.path(), dist_dir.path()),
            "/assets/main-xyz.css",
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "public, max-age=31536000, immutable"
        );
    }

    #[tokio::test]
    async fn test_missing_static_file_returns_404() {
        let assets_dir = temp_dir_with_file("app.css", "");
        let dist_dir = temp_dir_with_file("index.html", "<html></html>");

        let resp = get(
            test_app(assets_dir.path(), dist_dir.path()),
            "/static/nonexistent.txt",
        )
        .await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_serves_built_frontend() {
        let assets_dir = temp_dir_with_file("app.css", "");
        let dist_dir = temp_dir_with_file("index.html", "<html>built</html>");

        let resp = get(test_app(assets_dir.path(), dist_dir.path()), "/").await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "<html>built</html>");
    }

    #[tokio::test]
    async fn test_index_falls_back_to_shell() {
        let assets_dir = temp_dir_with_file("app.css", "");
        let missing = PathBuf::from("/nonexistent/homemap/dist");

        let resp = get(test_app(assets_dir.path(), &missing), "/").await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_string(resp).await;
        assert!(body.contains(r#"<div id="map""#));
        assert!(body.contains("leaflet.js"));
        assert!(body.contains("htmx.org"));
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let assets_dir = temp_dir_with_file("app.css", "");
        let dist_dir = temp_dir_with_file("index.html", "");

        let resp = get(test_app(assets_dir.path(), dist_dir.path()), "/health").await;

        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }
}
