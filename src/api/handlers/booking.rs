//! Booking handlers: create, status update, check-in, list, history.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use super::actor_from_headers;
use crate::api::dto::{
    BookingListResponse, BookingResponse, CreateBookingRequest, PaginationMeta, PaginationParams,
    UpdateBookingRequest,
};
use crate::app_state::AppState;
use crate::domain::{AmenityId, BookingId, BookingStatus, ResidentId};
use crate::error::{EngineError, ErrorResponse};

/// Optional owner filter for `GET /bookings`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct BookingListParams {
    /// Resident whose bookings to list. Defaults to the caller; only
    /// admins may list another resident's bookings.
    pub resident_id: Option<uuid::Uuid>,
}

/// `POST /amenities/{id}/bookings` — Reserve a slot.
///
/// # Errors
///
/// Returns [`EngineError`] on an unknown amenity, invalid range, full
/// slot, self-overlap, or lock contention.
#[utoipa::path(
    post,
    path = "/api/v1/amenities/{id}/bookings",
    tag = "Bookings",
    summary = "Create a booking",
    description = "Atomically reserves a slot on the amenity. The initial status follows the amenity's approval policy. Caller identity comes from the x-resident-id / x-circle-id headers.",
    params(
        ("id" = String, Path, description = "Amenity slug"),
    ),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid range or malformed request", body = ErrorResponse),
        (status = 404, description = "Amenity not found", body = ErrorResponse),
        (status = 409, description = "Slot full, self-overlap, or contention", body = ErrorResponse),
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let actor = actor_from_headers(&headers)?;
    let amenity_id = AmenityId::new(id);

    let booking = state
        .reservation_service
        .create_booking(&actor, &amenity_id, req.start_at, req.end_at, req.purpose)
        .await?;

    let response = BookingResponse::from_booking(&booking, Utc::now());
    Ok((StatusCode::CREATED, Json(response)))
}

/// `PATCH /bookings/{id}` — Approve, reject, or cancel a booking.
///
/// # Errors
///
/// Returns [`EngineError`] on an unknown booking, an illegal edge, or
/// insufficient rights.
#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    summary = "Update booking status",
    description = "Applies a state-machine edge. Admins approve/reject pending bookings and may force-cancel; residents may cancel their own booking before it starts.",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Updated booking", body = BookingResponse),
        (status = 403, description = "Caller lacks rights", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Illegal transition or capacity overshoot", body = ErrorResponse),
    )
)]
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let actor = actor_from_headers(&headers)?;
    let new_status = match req.status.as_str() {
        "approved" => BookingStatus::Approved,
        "rejected" => BookingStatus::Rejected,
        "canceled" => BookingStatus::Canceled,
        other => {
            return Err(EngineError::Validation(format!(
                "status must be approved, rejected, or canceled (got {other})"
            )));
        }
    };

    let booking = state
        .reservation_service
        .update_status(&actor, BookingId::from_uuid(id), new_status)
        .await?;

    Ok(Json(BookingResponse::from_booking(&booking, Utc::now())))
}

/// `POST /bookings/{id}/check-in` — Record attendance.
///
/// # Errors
///
/// Returns [`EngineError`] if the window is missed, the booking is
/// already checked in, or the caller lacks rights.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/check-in",
    tag = "Bookings",
    summary = "Check in to a booking",
    description = "Records the one-shot check-in while inside the grace window around the booked interval.",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    responses(
        (status = 200, description = "Updated booking", body = BookingResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Already checked in", body = ErrorResponse),
        (status = 422, description = "Outside the check-in window", body = ErrorResponse),
    )
)]
pub async fn check_in(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, EngineError> {
    let actor = actor_from_headers(&headers)?;
    let booking = state
        .reservation_service
        .check_in(&actor, BookingId::from_uuid(id))
        .await?;
    Ok(Json(BookingResponse::from_booking(&booking, Utc::now())))
}

/// `GET /bookings` — List bookings for the "My Bookings" view.
///
/// # Errors
///
/// Returns [`EngineError::NotOwner`] if a non-admin queries another
/// resident's bookings.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "List bookings",
    description = "Returns a paginated list of the caller's bookings, newest start first. Admins may pass resident_id to inspect another resident.",
    params(BookingListParams, PaginationParams),
    responses(
        (status = 200, description = "Paginated booking list", body = BookingListResponse),
        (status = 403, description = "Caller lacks rights", body = ErrorResponse),
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(filter): Query<BookingListParams>,
    Query(pagination): Query<PaginationParams>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, EngineError> {
    let actor = actor_from_headers(&headers)?;
    let resident_id = match filter.resident_id {
        Some(id) => {
            let id = ResidentId::from_uuid(id);
            if id != actor.resident_id && !actor.is_admin() {
                return Err(EngineError::NotOwner);
            }
            id
        }
        None => actor.resident_id,
    };

    let pagination = pagination.clamped();
    let bookings = state
        .reservation_service
        .bookings_for_resident(resident_id)
        .await;

    let now = Utc::now();
    let total = u32::try_from(bookings.len()).unwrap_or(u32::MAX);
    let per_page = pagination.per_page;
    let page = pagination.page;
    let total_pages = if total == 0 { 0 } else { total.div_ceil(per_page) };

    // Widen before multiplying; a hostile page number must not overflow.
    let start = usize::try_from(u64::from(page - 1) * u64::from(per_page)).unwrap_or(usize::MAX);
    let data: Vec<BookingResponse> = bookings
        .iter()
        .skip(start)
        .take(per_page as usize)
        .map(|b| BookingResponse::from_booking(b, now))
        .collect();

    Ok(Json(BookingListResponse {
        data,
        pagination: PaginationMeta {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

/// `GET /bookings/{id}` — Get a single booking.
///
/// # Errors
///
/// Returns [`EngineError::BookingNotFound`] if the booking does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    summary = "Get booking details",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, EngineError> {
    let booking = state
        .reservation_service
        .get_booking(BookingId::from_uuid(id))
        .await?;
    Ok(Json(BookingResponse::from_booking(&booking, Utc::now())))
}

/// `GET /bookings/{id}/history` — Audit trail from the event archive.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] when the archive is disabled and
/// [`EngineError::Persistence`] on archive failures.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}/history",
    tag = "Bookings",
    summary = "Get booking audit history",
    description = "Returns the archived event rows for a booking, oldest first. Requires the persistence layer to be enabled.",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    responses(
        (status = 200, description = "Archived events", body = serde_json::Value),
        (status = 400, description = "Archive disabled", body = ErrorResponse),
    )
)]
pub async fn booking_history(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, EngineError> {
    let archive = state
        .archive
        .as_ref()
        .ok_or_else(|| EngineError::Validation("event archive is disabled".to_string()))?;
    let events = archive.events_for_booking(id).await?;
    Ok(Json(events))
}

/// Booking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/amenities/{id}/bookings", post(create_booking))
        .route("/bookings", get(list_bookings))
        .route("/bookings/{id}", patch(update_booking).get(get_booking))
        .route("/bookings/{id}/check-in", post(check_in))
        .route("/bookings/{id}/history", get(booking_history))
}
