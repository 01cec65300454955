//! HTTP server for the sermon catalog.
//!
//! Read-only query surface over the loaded catalog, plus a reload hook.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                            |
//! |--------|-------------------|----------------------------------------|
//! | GET    | `/health`         | Health check                           |
//! | GET    | `/api/recordings` | Search, filter, sort and limit         |
//! | GET    | `/api/stats`      | Aggregate statistics                   |
//! | GET    | `/api/themes`     | Themes with counts, most used first    |
//! | GET    | `/api/taxonomy`   | Active taxonomy                        |
//! | POST   | `/api/reload`     | Re-read and re-tag the catalog file    |
//! | GET    | `/api/logs`       | SSE stream of pipeline logs            |

use axum::{
    extract::State,
    http::{header, Method},
    response::{sse::Event, sse::KeepAlive, Json, Sse},
    routing::{get, post},
    Router,
};
use axum_extra::extract::{Query, QueryRejection};
use futures::stream::Stream;
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::logs::{log_success, LOG_BROADCASTER};
use super::state::AppState;
use super::types::{HealthResponse, RecordingView, RecordingsResponse, ThemesResponse};
use crate::catalog::pipeline::RetagReport;
use crate::catalog::query::{evaluate, QueryParams, QuerySpec};
use crate::catalog::stats::theme_listing;
use crate::config::AppConfig;
use crate::error::{ServerError, ServerResult};
use crate::models::CatalogStats;
use crate::taxonomy::Taxonomy;

/// Assemble the router with CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/recordings", get(list_recordings))
        .route("/api/stats", get(stats))
        .route("/api/themes", get(themes))
        .route("/api/taxonomy", get(taxonomy))
        .route("/api/reload", post(reload))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load state from `config` and serve until the process is stopped.
pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::load(&config)?;
    let recordings = state.catalog().await.recordings.len();
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, recordings, "sermondex server listening");
    eprintln!("🚀 Sermondex server running on http://localhost:{}", config.port);
    eprintln!("   GET  /api/recordings - Search and filter");
    eprintln!("   GET  /api/stats      - Catalog statistics");
    eprintln!("   GET  /api/themes     - Theme counts");
    eprintln!("   POST /api/reload     - Reload catalog");
    eprintln!("   GET  /api/logs       - SSE log stream");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "sermondex",
        version: env!("CARGO_PKG_VERSION"),
        recordings: state.catalog().await.recordings.len(),
    })
}

async fn list_recordings(
    State(state): State<AppState>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> ServerResult<Json<RecordingsResponse>> {
    let Query(params) = params.map_err(|e| ServerError::BadRequest(e.to_string()))?;
    let spec = QuerySpec::try_from(&params)?;

    let catalog = state.catalog().await;
    let recordings: Vec<RecordingView> = evaluate(&catalog.recordings, &spec)
        .into_iter()
        .map(|r| RecordingView::new(r, state.resolver()))
        .collect();

    Ok(Json(RecordingsResponse {
        total: recordings.len(),
        recordings,
        filters: spec,
    }))
}

async fn stats(State(state): State<AppState>) -> Json<CatalogStats> {
    Json(state.catalog().await.stats.clone())
}

async fn themes(State(state): State<AppState>) -> Json<ThemesResponse> {
    let catalog = state.catalog().await;
    Json(ThemesResponse {
        themes: theme_listing(&catalog.stats, state.taxonomy()),
    })
}

async fn taxonomy(State(state): State<AppState>) -> Json<Taxonomy> {
    Json(state.taxonomy().clone())
}

async fn reload(State(state): State<AppState>) -> ServerResult<Json<RetagReport>> {
    let report = state.reload().await?;
    log_success(format!("Catalog reloaded: {} recordings", report.total));
    Ok(Json(report))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // lagged receivers drop entries rather than the connection
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::CatalogSnapshot;
    use crate::catalog::pipeline::{ingest_identifiers, IngestOptions};
    use crate::location::{BaseUrlResolver, PassthroughResolver};
    use crate::store::CatalogStore;
    use crate::taxonomy::{presets, ThemeClassifier};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tempfile::tempdir;
    use tower::ServiceExt;

    const IDS: [&str; 4] = [
        "2023-01-01_Grace_and_Faith.mp3",
        "2024-06-15_Healing_Power.mp3",
        "2022-03-10_Faith_that_Heals.mp3",
        "2021-12-25_Zzz.mp3",
    ];

    fn legacy() -> ThemeClassifier {
        ThemeClassifier::new(Arc::new(presets::legacy()))
    }

    fn test_state() -> AppState {
        let classifier = legacy();
        let report = ingest_identifiers(IDS, &classifier, &IngestOptions::default());
        AppState::new(
            CatalogSnapshot::new(report.recordings),
            classifier,
            Arc::new(BaseUrlResolver::new("https://cdn.test")),
            "unused.json",
        )
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(build_router(test_state()), request).await
    }

    fn titles(body: &Value) -> Vec<&str> {
        body["recordings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["title"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["recordings"], 4);
    }

    #[tokio::test]
    async fn test_recordings_default_newest_first() {
        let (status, body) = get_json("/api/recordings").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            titles(&body),
            vec!["Healing Power", "Grace and Faith", "Faith that Heals", "Zzz"]
        );
        assert_eq!(body["total"], 4);
        assert_eq!(body["filters"]["sort"], "newest");
        assert_eq!(
            body["recordings"][0]["url"],
            "https://cdn.test/recordings/2024-06-15_Healing_Power.mp3"
        );
    }

    #[tokio::test]
    async fn test_recordings_repeated_themes() {
        let (status, body) = get_json("/api/recordings?themes=Faith&themes=Healing").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), vec!["Faith that Heals"]);
        assert_eq!(body["filters"]["themes"], serde_json::json!(["Faith", "Healing"]));
    }

    #[tokio::test]
    async fn test_recordings_search_sort_limit() {
        let (status, body) = get_json("/api/recordings?search=faith&sort=oldest&limit=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), vec!["Faith that Heals"]);
        assert_eq!(body["filters"]["limit"], 1);
        assert_eq!(body["filters"]["search"], "faith");
    }

    #[tokio::test]
    async fn test_recordings_bogus_sort() {
        let (status, body) = get_json("/api/recordings?sort=bogus").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("bogus"));
    }

    #[tokio::test]
    async fn test_recordings_bad_limit() {
        let (status, _) = get_json("/api/recordings?limit=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = get_json("/api/recordings?limit=many").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats() {
        let (status, body) = get_json("/api/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalCount"], 4);
        assert_eq!(body["themeCounts"]["Faith"], 2);
        assert_eq!(body["yearCounts"]["2023"], 1);
        assert_eq!(body["dateRange"]["earliest"], "2021-12-25");
    }

    #[tokio::test]
    async fn test_stats_empty_catalog() {
        let state = AppState::new(
            CatalogSnapshot::default(),
            legacy(),
            Arc::new(PassthroughResolver),
            "unused.json",
        );
        let request = Request::builder().uri("/api/stats").body(Body::empty()).unwrap();
        let (_, body) = send(build_router(state), request).await;
        assert_eq!(body["totalCount"], 0);
        assert!(body["dateRange"].is_null());
    }

    #[tokio::test]
    async fn test_themes_sorted_by_count() {
        let (status, body) = get_json("/api/themes").await;
        assert_eq!(status, StatusCode::OK);
        let themes = body["themes"].as_array().unwrap();
        assert_eq!(themes[0]["name"], "Faith");
        assert_eq!(themes[0]["count"], 2);
        assert_eq!(themes.len(), 20);
        let counts: Vec<u64> = themes.iter().map(|t| t["count"].as_u64().unwrap()).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_taxonomy() {
        let (_, body) = get_json("/api/taxonomy").await;
        assert_eq!(body["name"], "legacy");
        assert_eq!(body["themes"][0]["name"], "Grace");
    }

    #[tokio::test]
    async fn test_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let classifier = legacy();

        let report =
            ingest_identifiers(["2020-01-01_Joy.mp3"], &classifier, &IngestOptions::default());
        let mut store = CatalogStore::open(&path).unwrap();
        store.replace_all(report.recordings, "legacy").unwrap();
        store.save().unwrap();

        let state = AppState::new(
            CatalogSnapshot::default(),
            classifier,
            Arc::new(PassthroughResolver),
            path,
        );
        let app = build_router(state.clone());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/reload")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(state.catalog().await.recordings.len(), 1);
    }

    #[tokio::test]
    async fn test_reload_corrupt_file_is_500() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "{ not json").unwrap();

        let state = AppState::new(
            CatalogSnapshot::default(),
            legacy(),
            Arc::new(PassthroughResolver),
            path,
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/reload")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(build_router(state), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(body["errorId"].is_string());
    }
}
