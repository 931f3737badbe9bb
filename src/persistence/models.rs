//! Database models for the booking event archive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored event row from the `booking_events` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredBookingEvent {
    /// Auto-increment row ID.
    pub id: i64,
    /// Booking that generated the event.
    pub booking_id: Uuid,
    /// Event type discriminator (e.g. `"booking_created"`).
    pub event_type: String,
    /// JSONB payload with event-specific data.
    pub payload: serde_json::Value,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}
