use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    project,
    proposal::{Proposal, ProposalInput},
    report::KeyFigures,
    store::{ProposalStore, StoreError},
    summary::ProjectionSummary,
};

struct AppState {
    store: Mutex<ProposalStore>,
}

pub struct WebServerConfig {
    pub store: ProposalStore,
    pub host: String,
    pub port: u16,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::UnknownProposal(_) => ApiError::NotFound(value.to_string()),
            StoreError::BlankName => ApiError::BadRequest(value.to_string()),
            StoreError::LastProposal => ApiError::Conflict(value.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(err) => {
                error!("request failed: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}"))
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
pub struct ProposalList {
    pub active: Option<String>,
    pub proposals: Vec<Proposal>,
}

#[derive(Serialize)]
pub struct ProjectionResponse {
    pub proposal_id: String,
    pub key_figures: KeyFigures,
    pub summary: ProjectionSummary,
}

#[derive(Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

pub fn router(store: ProposalStore) -> Router {
    let state = Arc::new(AppState {
        store: Mutex::new(store),
    });
    Router::new()
        .route("/api/proposals", get(list_proposals).post(create_proposal))
        .route(
            "/api/proposals/:id",
            get(get_proposal).put(update_proposal).delete(delete_proposal),
        )
        .route("/api/proposals/:id/rename", post(rename_proposal))
        .route("/api/proposals/:id/select", post(select_proposal))
        .route("/api/proposals/:id/projection", get(proposal_projection))
        .route("/api/project", post(project_adhoc))
        .with_state(state)
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig { store, host, port } = config;

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let app = router(store);

    info!("studplan API listening on http://{addr} (Ctrl+C to stop)");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down API server");
}

fn persist(store: &ProposalStore) -> Result<(), ApiError> {
    store.save().map_err(ApiError::Internal)
}

fn normalized_input(body: &Value) -> Result<ProposalInput, ApiError> {
    if !body.is_object() {
        return Err(ApiError::BadRequest("expected a JSON object".into()));
    }
    let input = ProposalInput::from_loose_json(body);
    input
        .validate()
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    Ok(input)
}

async fn list_proposals(State(state): State<Arc<AppState>>) -> Json<ProposalList> {
    let store = state.store.lock().expect("store lock poisoned");
    Json(ProposalList {
        active: store.active_id().map(str::to_string),
        proposals: store.list().to_vec(),
    })
}

async fn create_proposal(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<Proposal>), ApiError> {
    let mut store = state.store.lock().expect("store lock poisoned");
    let proposal = store.create().clone();
    persist(&store)?;
    Ok((StatusCode::CREATED, Json(proposal)))
}

async fn get_proposal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Proposal>, ApiError> {
    let store = state.store.lock().expect("store lock poisoned");
    store
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| StoreError::UnknownProposal(id).into())
}

async fn update_proposal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Proposal>, ApiError> {
    let input = normalized_input(&body)?;
    let mut store = state.store.lock().expect("store lock poisoned");
    let proposal = store.update(&id, input)?.clone();
    persist(&store)?;
    Ok(Json(proposal))
}

async fn delete_proposal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.lock().expect("store lock poisoned");
    store.delete(&id)?;
    persist(&store)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn rename_proposal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<RenameRequest>,
) -> Result<Json<Proposal>, ApiError> {
    let mut store = state.store.lock().expect("store lock poisoned");
    store.rename(&id, &body.name)?;
    persist(&store)?;
    let proposal = store
        .get(&id)
        .cloned()
        .ok_or_else(|| ApiError::from(StoreError::UnknownProposal(id)))?;
    Ok(Json(proposal))
}

async fn select_proposal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.lock().expect("store lock poisoned");
    store.select(&id)?;
    persist(&store)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn proposal_projection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProjectionResponse>, ApiError> {
    let proposal = {
        let store = state.store.lock().expect("store lock poisoned");
        store
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::from(StoreError::UnknownProposal(id)))?
    };
    proposal
        .input
        .validate()
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let summary = project(&proposal.input);
    Ok(Json(ProjectionResponse {
        proposal_id: proposal.id.clone(),
        key_figures: KeyFigures::new(&proposal, &summary),
        summary,
    }))
}

async fn project_adhoc(Json(body): Json<Value>) -> Result<Json<ProjectionSummary>, ApiError> {
    let input = normalized_input(&body)?;
    Ok(Json(project(&input)))
}
