//! Amenity catalog DTOs and the availability response shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::availability::Slot;
use crate::domain::{Amenity, AmenityId, OperatingHours};

/// Request body for `POST /amenities` (admin upsert).
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertAmenityRequest {
    /// Stable slug identifier (e.g. `"gym"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Maximum simultaneous non-terminal bookings per overlapping instant.
    pub capacity: u32,
    /// Granularity of bookable intervals, in minutes.
    pub slot_minutes: u32,
    /// Per-weekday open/close in the amenity's local time.
    #[schema(value_type = Object)]
    pub operating_hours: OperatingHours,
    /// Whether new bookings await an admin decision.
    pub requires_approval: bool,
    /// Offset of local time from UTC, in minutes.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl From<UpsertAmenityRequest> for Amenity {
    fn from(req: UpsertAmenityRequest) -> Self {
        Self {
            id: AmenityId::new(req.id),
            name: req.name,
            capacity: req.capacity,
            slot_minutes: req.slot_minutes,
            operating_hours: req.operating_hours,
            requires_approval: req.requires_approval,
            utc_offset_minutes: req.utc_offset_minutes,
        }
    }
}

/// Amenity representation for catalog endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct AmenityResponse {
    /// Stable slug identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Capacity per overlapping instant.
    pub capacity: u32,
    /// Slot granularity in minutes.
    pub slot_minutes: u32,
    /// Per-weekday operating hours.
    #[schema(value_type = Object)]
    pub operating_hours: OperatingHours,
    /// Whether bookings start pending.
    pub requires_approval: bool,
    /// Local-time offset from UTC, in minutes.
    pub utc_offset_minutes: i32,
}

impl From<&Amenity> for AmenityResponse {
    fn from(amenity: &Amenity) -> Self {
        Self {
            id: amenity.id.to_string(),
            name: amenity.name.clone(),
            capacity: amenity.capacity,
            slot_minutes: amenity.slot_minutes,
            operating_hours: amenity.operating_hours.clone(),
            requires_approval: amenity.requires_approval,
            utc_offset_minutes: amenity.utc_offset_minutes,
        }
    }
}

/// Query parameters for `GET /amenities/{id}/availability`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityParams {
    /// Amenity-local calendar date, `YYYY-MM-DD`.
    pub date: NaiveDate,
}

/// One bookable slot in an availability response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SlotDto {
    /// Slot start, UTC.
    pub start_at: DateTime<Utc>,
    /// Slot end, UTC.
    pub end_at: DateTime<Utc>,
    /// Capacity left in this slot.
    pub remaining_capacity: u32,
}

impl From<Slot> for SlotDto {
    fn from(slot: Slot) -> Self {
        Self {
            start_at: slot.start_at,
            end_at: slot.end_at,
            remaining_capacity: slot.remaining_capacity,
        }
    }
}

/// Response body for `GET /amenities/{id}/availability`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    /// Amenity slug.
    pub amenity_id: String,
    /// Queried local date.
    pub date: NaiveDate,
    /// Bookable slots with remaining capacity, in ascending order.
    pub slots: Vec<SlotDto>,
}
