use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use typeahead_core::{Boosts, EntryType, Hit, QueryRequest, SharedEngine};

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Required in the `X-ADMIN-TOKEN` header for mutations.
    pub admin_token: Option<String>,
    /// Comma-separated origins; any origin is allowed when unset.
    pub cors_allow_origin: Option<String>,
}

impl ServerConfig {
    /// Reads `ADMIN_TOKEN` and `CORS_ALLOW_ORIGIN`.
    pub fn from_env() -> Self {
        Self {
            admin_token: std::env::var("ADMIN_TOKEN").ok(),
            cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN").ok(),
        }
    }
}

#[derive(Deserialize)]
pub struct QueryParams {
    pub q: String,
    #[serde(default = "default_n")]
    pub n: usize,
}

#[derive(Deserialize)]
pub struct WeightedQueryBody {
    pub q: String,
    #[serde(default = "default_n")]
    pub n: usize,
    #[serde(default)]
    pub boosts: Boosts,
}

fn default_n() -> usize { 10 }

#[derive(Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<Hit>,
}

#[derive(Deserialize)]
pub struct AddEntryBody {
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub entries: usize,
    pub tokens: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: SharedEngine,
    pub admin_token: Option<String>,
}

pub fn build_app(engine: SharedEngine, config: ServerConfig) -> Router {
    let cors = match config.cors_allow_origin.as_deref() {
        Some(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        None => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let state = AppState { engine, admin_token: config.admin_token };
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/query", get(query_handler).post(weighted_query_handler))
        .route("/entries", post(add_handler))
        .route("/entries/:id", delete(delete_handler))
        .route("/stats", get(stats_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn query_handler(State(state): State<AppState>, Query(params): Query<QueryParams>) -> Json<QueryResponse> {
    Json(run_query(&state, QueryRequest::new(params.n, params.q)))
}

pub async fn weighted_query_handler(State(state): State<AppState>, Json(body): Json<WeightedQueryBody>) -> Json<QueryResponse> {
    Json(run_query(&state, QueryRequest::new(body.n, body.q).with_boosts(body.boosts)))
}

fn run_query(state: &AppState, request: QueryRequest) -> QueryResponse {
    let start = std::time::Instant::now();
    let result = state.engine.search(&request);
    QueryResponse {
        query: request.text,
        took_s: start.elapsed().as_secs_f64(),
        total_hits: result.total_matches,
        results: result.hits,
    }
}

async fn add_handler(State(state): State<AppState>, headers: HeaderMap, Json(body): Json<AddEntryBody>) -> Result<StatusCode, (StatusCode, String)> {
    authorize(&state, &headers)?;
    state.engine.add(body.kind, &body.id, body.score, &body.text);
    tracing::info!(id = %body.id, kind = %body.kind, "entry added");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_handler(State(state): State<AppState>, headers: HeaderMap, Path(id): Path<String>) -> Result<StatusCode, (StatusCode, String)> {
    authorize(&state, &headers)?;
    state.engine.delete(&id);
    tracing::info!(%id, "entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let (entries, tokens) = state.engine.stats();
    Json(StatsResponse { entries, tokens })
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
