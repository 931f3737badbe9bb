//! Booking-related DTOs for create, update, check-in, and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{Booking, BookingId};

/// Request body for `POST /amenities/{id}/bookings`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    /// Interval start (inclusive), UTC.
    pub start_at: DateTime<Utc>,
    /// Interval end (exclusive), UTC.
    pub end_at: DateTime<Utc>,
    /// Optional free-text purpose (e.g. `"birthday party"`).
    #[serde(default)]
    pub purpose: Option<String>,
}

/// Request body for `PATCH /bookings/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookingRequest {
    /// Target status: `approved`, `rejected`, or `canceled`.
    pub status: String,
}

/// Booking representation returned by every booking endpoint.
///
/// `status` is the client-facing effective status, which derives
/// `completed` for finished, checked-in bookings.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    /// Booking identifier.
    pub id: BookingId,
    /// Amenity slug.
    pub amenity_id: String,
    /// Owning resident.
    pub resident_id: String,
    /// Circle the booking belongs to.
    pub circle_id: String,
    /// Interval start, UTC.
    pub start_at: DateTime<Utc>,
    /// Interval end, UTC.
    pub end_at: DateTime<Utc>,
    /// Optional purpose text.
    pub purpose: Option<String>,
    /// Effective status string.
    pub status: &'static str,
    /// Check-in timestamp, if recorded.
    pub checked_in_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Admin decision timestamp, if any.
    pub decided_at: Option<DateTime<Utc>>,
    /// Cancellation timestamp, if any.
    pub canceled_at: Option<DateTime<Utc>>,
}

impl BookingResponse {
    /// Builds the response view of a booking at the given instant.
    #[must_use]
    pub fn from_booking(booking: &Booking, now: DateTime<Utc>) -> Self {
        Self {
            id: booking.id,
            amenity_id: booking.amenity_id.to_string(),
            resident_id: booking.resident_id.to_string(),
            circle_id: booking.circle_id.to_string(),
            start_at: booking.start_at,
            end_at: booking.end_at,
            purpose: booking.purpose.clone(),
            status: booking.effective_status(now).as_str(),
            checked_in_at: booking.checked_in_at,
            created_at: booking.created_at,
            decided_at: booking.decided_at,
            canceled_at: booking.canceled_at,
        }
    }
}

/// Paginated list response for `GET /bookings`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingListResponse {
    /// Booking views.
    pub data: Vec<BookingResponse>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{AmenityId, BookingStatus, CircleId, ResidentId};
    use chrono::TimeZone;

    #[test]
    fn completed_is_surfaced_in_response() {
        let start = Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).single().unwrap_or_default();
        let booking = Booking {
            id: BookingId::new(),
            amenity_id: AmenityId::from("gym"),
            resident_id: ResidentId::new(),
            circle_id: CircleId::new(),
            start_at: start,
            end_at: start + chrono::Duration::hours(1),
            purpose: None,
            status: BookingStatus::Approved,
            checked_in_at: Some(start),
            created_at: start,
            decided_at: None,
            canceled_at: None,
        };
        let view = BookingResponse::from_booking(&booking, start + chrono::Duration::hours(2));
        assert_eq!(view.status, "completed");
    }
}
