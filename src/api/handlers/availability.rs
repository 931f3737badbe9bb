//! Availability handler: slot enumeration for one amenity-day.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{AvailabilityParams, AvailabilityResponse, SlotDto};
use crate::app_state::AppState;
use crate::domain::AmenityId;
use crate::error::{EngineError, ErrorResponse};

/// `GET /amenities/{id}/availability?date=YYYY-MM-DD` — Bookable slots.
///
/// # Errors
///
/// Returns [`EngineError::AmenityNotFound`] for an unknown amenity.
#[utoipa::path(
    get,
    path = "/api/v1/amenities/{id}/availability",
    tag = "Availability",
    summary = "List bookable slots",
    description = "Enumerates every slot-aligned interval inside operating hours on the given amenity-local date that still has capacity, annotated with the remaining headroom. Pure read; no lock is taken.",
    params(
        ("id" = String, Path, description = "Amenity slug"),
        AvailabilityParams,
    ),
    responses(
        (status = 200, description = "Slot sequence", body = AvailabilityResponse),
        (status = 404, description = "Amenity not found", body = ErrorResponse),
    )
)]
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<AvailabilityParams>,
) -> Result<impl IntoResponse, EngineError> {
    let amenity_id = AmenityId::new(id);
    let slots = state
        .reservation_service
        .availability(&amenity_id, params.date)
        .await?;

    Ok(Json(AvailabilityResponse {
        amenity_id: amenity_id.to_string(),
        date: params.date,
        slots: slots.into_iter().map(SlotDto::from).collect(),
    }))
}

/// Availability routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/amenities/{id}/availability", get(get_availability))
}
