use crate::core::error::SpotError;
use crate::core::state::AppState;
use crate::models::requests::{SpotRequest, SpotResponse};
use crate::models::spot::SpotId;
use crate::utils::cookie::read_flash;
use crate::views::pages;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::warn;

/// Spot overview. Polls the controller first; if it cannot be read the
/// page shows the last known state.
///
/// GET /
pub async fn index_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    match state.device.poll_spots().await {
        Ok(report) => state.spots.refresh(&report).await,
        Err(e) => warn!(error = %e, "Failed to read spot status from device, keeping current state"),
    }

    let spots = state.spots.snapshot().await;
    pages::index(&spots, read_flash(&headers).as_ref())
}

/// POST /reservar
pub async fn reserve_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SpotRequest>, JsonRejection>,
) -> Result<Response, SpotError> {
    let id = spot_from_payload(payload)?;

    state
        .spots
        .reserve(id, &state.device)
        .await
        .inspect_err(|e| warn!(spot = %id, error = %e, "Reservation failed"))?;

    Ok(success(format!("{} reserved successfully!", id)))
}

/// POST /liberar
pub async fn release_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SpotRequest>, JsonRejection>,
) -> Result<Response, SpotError> {
    let id = spot_from_payload(payload)?;

    state
        .spots
        .release(id, &state.device)
        .await
        .inspect_err(|e| warn!(spot = %id, error = %e, "Release failed"))?;

    Ok(success(format!("{} released successfully!", id)))
}

fn spot_from_payload(payload: Result<Json<SpotRequest>, JsonRejection>) -> Result<SpotId, SpotError> {
    let Json(request) = payload.map_err(|e| SpotError::InvalidSpotId(e.body_text()))?;
    SpotId::parse(&request.spot_id).ok_or(SpotError::InvalidSpotId(request.spot_id))
}

fn success(message: String) -> Response {
    (
        StatusCode::OK,
        Json(SpotResponse {
            success: true,
            message,
        }),
    )
        .into_response()
}
