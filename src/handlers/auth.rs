use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Principal;
use crate::services::gate::{self, GateDecision};
use crate::state::AppState;

pub(crate) fn bearer_token(headers: &HeaderMap) -> &str {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("")
}

/// Runs the session gate for the request's bearer token.
pub(crate) fn gate_request(state: &AppState, headers: &HeaderMap) -> GateDecision {
    gate::evaluate(&state.sessions.resolve(bearer_token(headers)))
}

pub(crate) fn require_principal(state: &AppState, headers: &HeaderMap) -> Result<Principal, AppError> {
    match gate_request(state, headers) {
        GateDecision::Render(principal) => Ok(principal),
        GateDecision::Loading | GateDecision::Redirect(_) => Err(AppError::Unauthorized),
    }
}

// POST /api/login
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    token: String,
    principal: Principal,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let principal = state.identity.sign_in(&body.email, &body.password).await?;
    let token = state.sessions.issue(principal.clone());
    Ok(Json(LoginResponse { token, principal }))
}

// POST /api/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let revoked = state.sessions.revoke(bearer_token(&headers));
    Json(serde_json::json!({ "ok": true, "revoked": revoked }))
}

// GET /api/session
#[derive(Serialize)]
pub struct SessionResponse {
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    principal: Option<Principal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'static str>,
}

pub async fn session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    let decision = gate_request(&state, &headers);
    let label = decision.label();
    let (principal, redirect) = match decision {
        GateDecision::Render(principal) => (Some(principal), None),
        GateDecision::Redirect(to) => (None, Some(to)),
        GateDecision::Loading => (None, None),
    };
    Json(SessionResponse {
        state: label,
        principal,
        redirect,
    })
}
