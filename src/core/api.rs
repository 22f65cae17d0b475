//! HTTP + WebSocket inspection API
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /session/new - Create a simulation session
//! - GET /session/{id} - Interaction states of a session
//! - POST /session/{id}/command - Run one script command
//! - WS /ws/{id} - Live tick reports

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

use crate::core::assets::AssetBundle;
use crate::core::interaction::InteractionSnapshot;
use crate::core::script::parse_line;
use crate::core::simulation::Simulation;
use crate::types::{CouplerType, CouplingError, HookConfig, TickReport};

/// Session state
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub coupler_type: CouplerType,
    pub sim: Simulation,
    pub update_tx: broadcast::Sender<TickReport>,
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, Session>>,
    pub config: HookConfig,
    pub bundle: AssetBundle,
    next_session: AtomicU64,
}

/// Create new session request
#[derive(Debug, Deserialize)]
pub struct NewSessionRequest {
    pub coupler_type: Option<CouplerType>,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub coupler_type: CouplerType,
    pub tick: u64,
    pub cars: usize,
    pub interactions: Vec<InteractionSnapshot>,
}

/// Command request, one script line
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

/// Command response
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub tick: u64,
    pub reports: Vec<TickReport>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Create the API router with the built-in hook assets
pub fn create_router(config: HookConfig) -> Router {
    create_router_with_assets(config, AssetBundle::builtin())
}

pub fn create_router_with_assets(config: HookConfig, bundle: AssetBundle) -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        config,
        bundle,
        next_session: AtomicU64::new(1),
    });

    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session))
        .route("/session/:id/command", post(run_command))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

/// Create new session
async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewSessionRequest>,
) -> Result<Json<NewSessionResponse>, ApiError> {
    let mut config = state.config.clone();
    if let Some(coupler_type) = req.coupler_type {
        config.coupler_type = coupler_type;
    }
    let coupler_type = config.coupler_type;
    let sim = Simulation::with_assets(config, &state.bundle)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let seq = state.next_session.fetch_add(1, Ordering::Relaxed);
    let session_id = format!("session_{:x}", seq);
    let (tx, _) = broadcast::channel(100);

    let session = Session {
        id: session_id.clone(),
        coupler_type,
        sim,
        update_tx: tx,
    };

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), session);
    info!("created {} ({:?})", session_id, coupler_type);

    Ok(Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
    }))
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("no session {}", id)))?;

    Ok(Json(SessionStatusResponse {
        session_id: session.id.clone(),
        coupler_type: session.coupler_type,
        tick: session.sim.tick_count(),
        cars: session.sim.yard().cars().count(),
        interactions: session.sim.registry().snapshots(),
    }))
}

/// Run one command against a session
async fn run_command(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("no session {}", id)))?;

    let command = parse_line(1, &req.command)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "empty command"))?;

    let reports = session.sim.apply(&command).map_err(|e| {
        let status = if e.is_input_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        };
        api_error(status, e.to_string())
    })?;

    for report in &reports {
        // No subscribers is fine
        let _ = session.update_tx.send(report.clone());
    }

    Ok(Json(CommandResponse {
        tick: session.sim.tick_count(),
        reports,
    }))
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let rx = session.update_tx.subscribe();
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| handle_websocket(socket, rx)))
}

/// Forward tick reports until either side goes away
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<TickReport>) {
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(report) => {
                    let json = serde_json::to_string(&report).unwrap_or_default();
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("websocket lagged, skipped {} reports", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            if matches!(message, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

/// Run the API server
pub async fn run_server(addr: &str, config: HookConfig, bundle: AssetBundle) -> Result<(), CouplingError> {
    let router = create_router_with_assets(config, bundle);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| CouplingError::Serve {
            addr: addr.to_string(),
            source,
        })?;
    info!("couplehook API running on {}", addr);
    axum::serve(listener, router)
        .await
        .map_err(|source| CouplingError::Serve {
            addr: addr.to_string(),
            source,
        })?;
    Ok(())
}
