//! Domain events reflecting booking state mutations.
//!
//! Every ledger mutation emits a [`BookingEvent`] through the
//! [`super::EventBus`]. Events feed the optional PostgreSQL audit
//! archive and any in-process subscriber (tests, metrics).

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::booking::BookingStatus;
use super::ids::{AmenityId, BookingId, ResidentId};

/// How a booking left the active set.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelKind {
    /// The owning resident canceled before the start time.
    ByOwner,
    /// An admin force-canceled.
    Forced,
}

/// Domain event emitted after every booking mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum BookingEvent {
    /// Emitted when the ledger commits a new reservation.
    BookingCreated {
        /// Booking identifier.
        booking_id: BookingId,
        /// Amenity the slot belongs to.
        amenity_id: AmenityId,
        /// Resident who requested the slot.
        resident_id: ResidentId,
        /// Interval start.
        start_at: DateTime<Utc>,
        /// Interval end.
        end_at: DateTime<Utc>,
        /// Initial status (`pending` or `approved` per amenity policy).
        status: BookingStatus,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an admin approves or rejects a pending booking.
    BookingDecided {
        /// Booking identifier.
        booking_id: BookingId,
        /// Amenity the slot belongs to.
        amenity_id: AmenityId,
        /// Admin who decided.
        decided_by: ResidentId,
        /// Resulting status (`approved` or `rejected`).
        status: BookingStatus,
        /// Decision timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a booking is canceled.
    BookingCanceled {
        /// Booking identifier.
        booking_id: BookingId,
        /// Amenity the slot belongs to.
        amenity_id: AmenityId,
        /// Who triggered the cancellation.
        canceled_by: ResidentId,
        /// Owner cancel vs. admin force-cancel.
        kind: CancelKind,
        /// Cancellation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when attendance is recorded against a booking.
    CheckedIn {
        /// Booking identifier.
        booking_id: BookingId,
        /// Amenity the slot belongs to.
        amenity_id: AmenityId,
        /// Wall-clock instant of the check-in.
        checked_in_at: DateTime<Utc>,
        /// Emission timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl BookingEvent {
    /// Returns the booking ID associated with this event.
    #[must_use]
    pub const fn booking_id(&self) -> BookingId {
        match self {
            Self::BookingCreated { booking_id, .. }
            | Self::BookingDecided { booking_id, .. }
            | Self::BookingCanceled { booking_id, .. }
            | Self::CheckedIn { booking_id, .. } => *booking_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::BookingCreated { .. } => "booking_created",
            Self::BookingDecided { .. } => "booking_decided",
            Self::BookingCanceled { .. } => "booking_canceled",
            Self::CheckedIn { .. } => "checked_in",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn created_event_type() {
        let event = BookingEvent::BookingCreated {
            booking_id: BookingId::new(),
            amenity_id: AmenityId::from("gym"),
            resident_id: ResidentId::new(),
            start_at: Utc::now(),
            end_at: Utc::now(),
            status: BookingStatus::Approved,
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "booking_created");
    }

    #[test]
    fn canceled_event_serializes_kind() {
        let event = BookingEvent::BookingCanceled {
            booking_id: BookingId::new(),
            amenity_id: AmenityId::from("gym"),
            canceled_by: ResidentId::new(),
            kind: CancelKind::Forced,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("booking_canceled"));
        assert!(json.contains("forced"));
    }

    #[test]
    fn booking_id_accessor() {
        let id = BookingId::new();
        let event = BookingEvent::CheckedIn {
            booking_id: id,
            amenity_id: AmenityId::from("pool"),
            checked_in_at: Utc::now(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.booking_id(), id);
    }
}
