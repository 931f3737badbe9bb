//! Booking records and the booking state machine.
//!
//! A [`Booking`] is created by the ledger in `Pending` or `Approved`
//! status and then only mutated through the state-machine edges checked
//! here. Terminal bookings are never deleted; cancellation and rejection
//! preserve the audit history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AmenityId, BookingId, CircleId, ResidentId};

/// Stored booking status.
///
/// `Completed` is deliberately absent: it is a derived read-only view
/// computed from `end_at` and `checked_in_at` (see
/// [`Booking::effective_status`]), not a stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting an admin decision.
    Pending,
    /// Confirmed; counts against capacity and allows check-in.
    Approved,
    /// Admin declined the request. Terminal.
    Rejected,
    /// Canceled by the resident or force-canceled by an admin. Terminal.
    Canceled,
}

impl BookingStatus {
    /// Returns `true` for states from which no transition is permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Canceled)
    }

    /// Returns `true` for states that count against slot capacity.
    #[must_use]
    pub const fn occupies_capacity(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Returns the status as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Canceled => "canceled",
        }
    }
}

/// Status presented to clients, including the derived `Completed` view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveStatus {
    /// Awaiting an admin decision.
    Pending,
    /// Confirmed and not yet finished.
    Approved,
    /// Admin declined the request.
    Rejected,
    /// Canceled before use.
    Canceled,
    /// Approved, checked in, and the booked interval has passed.
    Completed,
}

impl EffectiveStatus {
    /// Returns the status as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Canceled => "canceled",
            Self::Completed => "completed",
        }
    }
}

/// A reservation of one amenity slot by one resident.
///
/// Invariants are enforced by the [`crate::domain::BookingLedger`], never
/// here: this type only knows how to answer questions about a single
/// record (overlap, frozen, derived status).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier (immutable after creation).
    pub id: BookingId,
    /// Amenity the slot belongs to.
    pub amenity_id: AmenityId,
    /// Resident who requested the slot.
    pub resident_id: ResidentId,
    /// Circle the resident belongs to.
    pub circle_id: CircleId,
    /// Interval start (inclusive).
    pub start_at: DateTime<Utc>,
    /// Interval end (exclusive).
    pub end_at: DateTime<Utc>,
    /// Optional free-text purpose.
    pub purpose: Option<String>,
    /// Current stored status.
    pub status: BookingStatus,
    /// Timestamp of the one-shot check-in, if recorded.
    pub checked_in_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// When an admin approved or rejected the request.
    pub decided_at: Option<DateTime<Utc>>,
    /// When the booking was canceled.
    pub canceled_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Returns `true` if `[start_at, end_at)` intersects `[start, end)`.
    #[must_use]
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_at < end && start < self.end_at
    }

    /// Returns `true` once no further mutation is legal: the status is
    /// terminal or the booked interval already ended.
    #[must_use]
    pub fn is_frozen(&self, now: DateTime<Utc>) -> bool {
        self.status.is_terminal() || self.end_at <= now
    }

    /// Returns the client-facing status, deriving `Completed` for an
    /// approved, checked-in booking whose interval has passed.
    #[must_use]
    pub fn effective_status(&self, now: DateTime<Utc>) -> EffectiveStatus {
        match self.status {
            BookingStatus::Pending => EffectiveStatus::Pending,
            BookingStatus::Approved => {
                if self.end_at <= now && self.checked_in_at.is_some() {
                    EffectiveStatus::Completed
                } else {
                    EffectiveStatus::Approved
                }
            }
            BookingStatus::Rejected => EffectiveStatus::Rejected,
            BookingStatus::Canceled => EffectiveStatus::Canceled,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, h, 0, 0).single().unwrap_or_default()
    }

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: BookingId::new(),
            amenity_id: AmenityId::from("gym"),
            resident_id: ResidentId::new(),
            circle_id: CircleId::new(),
            start_at: at(9),
            end_at: at(10),
            purpose: None,
            status,
            checked_in_at: None,
            created_at: at(8),
            decided_at: None,
            canceled_at: None,
        }
    }

    #[test]
    fn half_open_intervals_do_not_overlap_at_boundary() {
        let b = booking(BookingStatus::Approved);
        assert!(!b.overlaps(at(10), at(11)));
        assert!(!b.overlaps(at(8), at(9)));
        assert!(b.overlaps(at(9), at(10)));
    }

    #[test]
    fn partial_overlap_is_detected() {
        let b = booking(BookingStatus::Approved);
        let half = chrono::Duration::minutes(30);
        assert!(b.overlaps(at(9) + half, at(10) + half));
        assert!(b.overlaps(at(8), at(12)));
    }

    #[test]
    fn terminal_states_are_frozen() {
        assert!(booking(BookingStatus::Rejected).is_frozen(at(8)));
        assert!(booking(BookingStatus::Canceled).is_frozen(at(8)));
        assert!(!booking(BookingStatus::Approved).is_frozen(at(8)));
    }

    #[test]
    fn passed_end_freezes_booking() {
        let b = booking(BookingStatus::Approved);
        assert!(b.is_frozen(at(10)));
        assert!(b.is_frozen(at(11)));
        assert!(!b.is_frozen(at(9)));
    }

    #[test]
    fn completed_is_derived_not_stored() {
        let mut b = booking(BookingStatus::Approved);
        b.checked_in_at = Some(at(9));

        assert_eq!(b.effective_status(at(9)), EffectiveStatus::Approved);
        assert_eq!(b.effective_status(at(11)), EffectiveStatus::Completed);
        assert_eq!(b.status, BookingStatus::Approved);
    }

    #[test]
    fn approved_without_check_in_never_completes() {
        let b = booking(BookingStatus::Approved);
        assert_eq!(b.effective_status(at(11)), EffectiveStatus::Approved);
    }

    #[test]
    fn only_pending_and_approved_occupy_capacity() {
        assert!(BookingStatus::Pending.occupies_capacity());
        assert!(BookingStatus::Approved.occupies_capacity());
        assert!(!BookingStatus::Rejected.occupies_capacity());
        assert!(!BookingStatus::Canceled.occupies_capacity());
    }

    #[test]
    fn status_round_trips_through_serde() {
        let json = serde_json::to_string(&BookingStatus::Approved).unwrap_or_default();
        assert_eq!(json, "\"approved\"");
        let parsed: Result<BookingStatus, _> = serde_json::from_str("\"canceled\"");
        assert_eq!(parsed.ok(), Some(BookingStatus::Canceled));
    }
}
