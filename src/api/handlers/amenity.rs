//! Amenity catalog handlers: admin upsert and read endpoints.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::actor_from_headers;
use crate::api::dto::{AmenityResponse, UpsertAmenityRequest};
use crate::app_state::AppState;
use crate::domain::{Amenity, AmenityId};
use crate::error::{EngineError, ErrorResponse};

/// `POST /amenities` — Create or replace a catalog entry (admin only).
///
/// # Errors
///
/// Returns [`EngineError::NotOwner`] for non-admins and
/// [`EngineError::Validation`] on an invalid entry.
#[utoipa::path(
    post,
    path = "/api/v1/amenities",
    tag = "Amenities",
    summary = "Upsert an amenity",
    description = "Creates or replaces a bookable amenity. In-flight reservations keep the snapshot they already hold; new requests see the updated rules.",
    request_body = UpsertAmenityRequest,
    responses(
        (status = 201, description = "Amenity stored", body = AmenityResponse),
        (status = 400, description = "Invalid amenity definition", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
    )
)]
pub async fn upsert_amenity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UpsertAmenityRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let actor = actor_from_headers(&headers)?;
    if !actor.is_admin() {
        return Err(EngineError::NotOwner);
    }

    let amenity = Amenity::from(req);
    let stored = state.reservation_service.catalog().upsert(amenity).await?;

    tracing::info!(amenity_id = %stored.id, capacity = stored.capacity, "amenity upserted");
    Ok((StatusCode::CREATED, Json(AmenityResponse::from(stored.as_ref()))))
}

/// `GET /amenities` — List the catalog.
#[utoipa::path(
    get,
    path = "/api/v1/amenities",
    tag = "Amenities",
    summary = "List amenities",
    responses(
        (status = 200, description = "Catalog entries sorted by slug", body = Vec<AmenityResponse>),
    )
)]
pub async fn list_amenities(State(state): State<AppState>) -> impl IntoResponse {
    let amenities = state.reservation_service.catalog().list().await;
    let data: Vec<AmenityResponse> = amenities.iter().map(|a| AmenityResponse::from(a.as_ref())).collect();
    Json(data)
}

/// `GET /amenities/{id}` — Get one catalog entry.
///
/// # Errors
///
/// Returns [`EngineError::AmenityNotFound`] if the amenity does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/amenities/{id}",
    tag = "Amenities",
    summary = "Get amenity details",
    params(
        ("id" = String, Path, description = "Amenity slug"),
    ),
    responses(
        (status = 200, description = "Amenity details", body = AmenityResponse),
        (status = 404, description = "Amenity not found", body = ErrorResponse),
    )
)]
pub async fn get_amenity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, EngineError> {
    let amenity = state
        .reservation_service
        .catalog()
        .get(&AmenityId::new(id))
        .await?;
    Ok(Json(AmenityResponse::from(amenity.as_ref())))
}

/// Amenity catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/amenities", post(upsert_amenity).get(list_amenities))
        .route("/amenities/{id}", get(get_amenity))
}
