// Ultraskate Stats - Web Server
// REST API with Axum over the in-memory dataset

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use ultraskate_stats::query::{self, DatasetInfo};
use ultraskate_stats::{init_tracing, Config, DatasetHandle, StatsError, StatsResult};

/// Shared application state
#[derive(Clone)]
struct AppState {
    data: DatasetHandle,
    config: Arc<Config>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Map a query result onto a status code + JSON body
fn respond<T: Serialize>(result: StatsResult<T>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
        Err(e) => {
            let status = match &e {
                StatsError::NotFound(_) => StatusCode::NOT_FOUND,
                StatsError::InvalidInput(_) | StatsError::ParseFailure(_) => StatusCode::BAD_REQUEST,
                StatsError::LoadFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(ApiResponse::<T>::err(e.to_string()))).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct PerformanceFilter {
    sport: Option<String>,
    top: Option<usize>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

/// GET /api/info - Which dataset is being served
async fn get_info(State(state): State<AppState>) -> Response {
    respond(Ok(query::dataset_info(&state.data.current())))
}

/// GET /api/events - All events, metadata only
async fn get_events(State(state): State<AppState>) -> Response {
    respond(Ok(query::list_events(&state.data.current())))
}

/// GET /api/events/by-name/:name
async fn get_events_by_name(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    respond(query::events_by_name(&state.data.current(), &name))
}

/// GET /api/events/year/:year
async fn get_event_by_year(State(state): State<AppState>, Path(year): Path<i32>) -> Response {
    respond(query::event_by_year(&state.data.current(), year))
}

/// GET /api/events/:name/:year
async fn get_event(State(state): State<AppState>, Path((name, year)): Path<(String, i32)>) -> Response {
    respond(query::event_detail(&state.data.current(), &name, year))
}

/// GET /api/events/:name/:year/graph - Cumulative miles over time
async fn get_event_graph(
    State(state): State<AppState>,
    Path((name, year)): Path<(String, i32)>,
) -> Response {
    respond(query::event_graph(&state.data.current(), &name, year))
}

/// GET /api/events/:name/:year/performances?sport=&top=
async fn get_event_performances(
    State(state): State<AppState>,
    Path((name, year)): Path<(String, i32)>,
    Query(filter): Query<PerformanceFilter>,
) -> Response {
    respond(query::event_performances(
        &state.data.current(),
        &name,
        year,
        filter.sport.as_deref(),
        filter.top,
    ))
}

/// GET /api/athletes - Roster with career stats
async fn get_athletes(State(state): State<AppState>) -> Response {
    respond(Ok(query::athlete_roster(&state.data.current())))
}

/// GET /api/athletes/:name - One athlete, per-event breakdown
async fn get_athlete(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    respond(query::athlete_detail(&state.data.current(), &name))
}

/// POST /api/reload - Rebuild from the snapshot directory and swap it in
async fn reload(State(state): State<AppState>) -> Response {
    match load_in_background(&state).await {
        Ok(info) => respond(Ok(info)),
        Err(e) => {
            error!("Reload failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<DatasetInfo>::err(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Run the blocking loader off the async workers
async fn load_in_background(state: &AppState) -> Result<DatasetInfo> {
    let handle = state.data.clone();
    let dir = state.config.snapshot_dir.clone();

    let dataset = tokio::task::spawn_blocking(move || handle.reload_from(&dir))
        .await
        .context("Loader task panicked")?;

    Ok(query::dataset_info(&dataset))
}

// ============================================================================
// Main Server
// ============================================================================

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/info", get(get_info))
        .route("/events", get(get_events))
        .route("/events/by-name/:name", get(get_events_by_name))
        .route("/events/year/:year", get(get_event_by_year))
        .route("/events/:name/:year", get(get_event))
        .route("/events/:name/:year/graph", get(get_event_graph))
        .route("/events/:name/:year/performances", get(get_event_performances))
        .route("/athletes", get(get_athletes))
        .route("/athletes/:name", get(get_athlete))
        .route("/reload", post(reload))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("🌐 Ultraskate Stats {} - Web Server", ultraskate_stats::VERSION);
    let config = Config::from_env()?;

    let state = AppState {
        data: DatasetHandle::empty(),
        config: Arc::new(config.clone()),
    };

    // Serve (empty) right away; the first dataset is swapped in when ready
    let startup = state.clone();
    tokio::spawn(async move {
        match load_in_background(&startup).await {
            Ok(info) => info!(
                "Startup: {} event(s), {} athlete(s) loaded",
                info.event_count, info.athlete_count
            ),
            Err(e) => error!("Startup: failed to load events: {:#}", e),
        }
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!("🚀 Server running on http://{}", config.bind_addr);
    info!("   API: http://{}/api/events", config.bind_addr);

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}
