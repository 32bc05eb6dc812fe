use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

use super::auth::require_principal;
use crate::controllers::view::{self, BookingRow, EMPTY_MESSAGE};
use crate::errors::AppError;
use crate::models::{Booking, BookingDraft};
use crate::state::AppState;

// GET /api/bookings
#[derive(Serialize)]
pub struct BookingListResponse {
    bookings: Vec<BookingRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BookingListResponse>, AppError> {
    require_principal(&state, &headers)?;

    let bookings = state.repository.list_all().await?;
    let message = bookings.is_empty().then_some(EMPTY_MESSAGE);
    Ok(Json(BookingListResponse {
        bookings: view::rows(&bookings),
        message,
    }))
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(draft): Json<BookingDraft>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    require_principal(&state, &headers)?;
    draft.validate()?;

    let booking = state.repository.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

// PUT /api/bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(draft): Json<BookingDraft>,
) -> Result<Json<Booking>, AppError> {
    require_principal(&state, &headers)?;
    draft.validate()?;

    let booking = state.repository.update(&id, &draft).await?;
    Ok(Json(booking))
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_principal(&state, &headers)?;

    state.repository.delete(&id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
