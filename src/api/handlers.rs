//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{info, warn};

use crate::{
    state::{AppState, PRESET_MINUTES},
    utils::{format_clock, format_elapsed},
};
use super::responses::{
    ApiResponse, ErrorResponse, FocusMinutesRequest, HealthResponse, SessionsResponse,
    StatusResponse,
};

/// Handle POST /start - Begin a focus run
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let started = state.timer.start().await;
    let timer = state.timer.view();

    if started {
        info!("Start endpoint called - focus run started");
        Json(ApiResponse::running(
            format!("Focus session started for {} minutes", timer.focus_minutes),
            timer,
        ))
    } else {
        Json(ApiResponse::new(
            "already-running",
            "A focus session is already running".to_string(),
            timer,
        ))
    }
}

/// Handle POST /stop - End the current run early
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    match state.timer.stop().await {
        Some(session) => {
            info!("Stop endpoint called - session {} saved", session.id);
            let message = format!("Session saved, duration {}", format_elapsed(session.duration_sec));
            Json(ApiResponse::idle(message, state.timer.view()).with_session(session))
        }
        None => Json(ApiResponse::idle(
            "No focus session is running".to_string(),
            state.timer.view(),
        )),
    }
}

/// Handle PUT /focus-minutes - Change the session length while idle
pub async fn focus_minutes_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FocusMinutesRequest>,
) -> Response {
    match state.timer.set_focus_minutes(request.minutes).await {
        Ok(true) => Json(ApiResponse::idle(
            format!("Focus length set to {} minutes", request.minutes),
            state.timer.view(),
        ))
        .into_response(),
        Ok(false) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new(
                "Focus length cannot change while a session is running",
            )),
        )
            .into_response(),
        Err(e) => {
            warn!("Rejected focus length: {}", e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = state.timer.view();
    let session_count = state.timer.sessions().await.len();

    Json(StatusResponse {
        timer,
        display: format_clock(timer.seconds_left),
        focused_today_seconds: state.timer.total_focused_today().await,
        session_count,
        presets: PRESET_MINUTES.to_vec(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
    })
}

/// Handle GET /sessions - Session history, most recent first
pub async fn sessions_handler(State(state): State<Arc<AppState>>) -> Json<SessionsResponse> {
    let sessions = state.timer.sessions().await;
    Json(SessionsResponse {
        count: sessions.len(),
        sessions,
    })
}

/// Handle DELETE /sessions - Clear the session history
pub async fn clear_sessions_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.timer.clear_sessions().await;
    info!("Session history cleared");
    StatusCode::NO_CONTENT
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
