//! Availability calculator: pure slot enumeration over a ledger snapshot.
//!
//! Everything here is side-effect-free. The ledger (or a test) hands in a
//! snapshot of bookings and the functions answer which slot-aligned
//! intervals are still bookable. The write path reuses
//! [`validate_range`] so a request can never be accepted for an interval
//! the calculator would not enumerate.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

use super::amenity::Amenity;
use super::booking::Booking;
use crate::error::EngineError;

/// One bookable interval with its remaining headroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    /// Slot start (inclusive), UTC.
    pub start_at: DateTime<Utc>,
    /// Slot end (exclusive), UTC.
    pub end_at: DateTime<Utc>,
    /// Capacity left after counting overlapping pending/approved bookings.
    pub remaining_capacity: u32,
}

/// Validates a requested interval against the amenity's rules and
/// returns the amenity-local date the interval falls on (the ledger's
/// lock key for the reservation).
///
/// Checks, in order: ordering (`end_at > start_at`), whole-minute
/// duration that is a positive multiple of `slot_minutes`, start and end
/// on the same amenity-local date, an open window on that weekday, the
/// interval inside the window, and slot alignment relative to opening.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] for `end_at <= start_at` and
/// [`EngineError::InvalidRange`] for every other violation.
pub fn validate_range(
    amenity: &Amenity,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
) -> Result<NaiveDate, EngineError> {
    if end_at <= start_at {
        return Err(EngineError::Validation("end_at must be after start_at".to_string()));
    }

    let duration = end_at - start_at;
    if duration.num_seconds() % 60 != 0
        || duration.num_minutes() % i64::from(amenity.slot_minutes) != 0
    {
        return Err(EngineError::InvalidRange(format!(
            "duration must be a positive multiple of {} minutes",
            amenity.slot_minutes
        )));
    }

    let offset = amenity.offset()?;
    let local_start = start_at.with_timezone(&offset);
    let local_end = end_at.with_timezone(&offset);
    let date = local_start.date_naive();
    if local_end.date_naive() != date {
        return Err(EngineError::InvalidRange(
            "booking must not cross midnight in the amenity's local time".to_string(),
        ));
    }

    let window = amenity
        .operating_hours
        .window_for(date.weekday())
        .ok_or_else(|| {
            EngineError::InvalidRange(format!("amenity is closed on {}", date.weekday()))
        })?;

    let start_time = local_start.time();
    let end_time = local_end.time();
    if start_time < window.open || end_time > window.close {
        return Err(EngineError::InvalidRange(format!(
            "interval must lie within operating hours {}–{}",
            window.open, window.close
        )));
    }

    let since_open = (start_time - window.open).num_minutes();
    if since_open % i64::from(amenity.slot_minutes) != 0 {
        return Err(EngineError::InvalidRange(format!(
            "start must align to a {}-minute slot boundary from opening",
            amenity.slot_minutes
        )));
    }

    Ok(date)
}

/// Enumerates every slot-aligned interval inside operating hours for the
/// given amenity-local date that still has capacity left.
///
/// `bookings` is a snapshot; only records in `{pending, approved}` that
/// overlap a slot count against it. Slots at zero remaining capacity are
/// omitted. A closed day yields an empty sequence.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if the amenity carries an invalid
/// UTC offset (rejected earlier by catalog validation).
pub fn day_slots(
    amenity: &Amenity,
    date: NaiveDate,
    bookings: &[Booking],
) -> Result<Vec<Slot>, EngineError> {
    let Some(window) = amenity.operating_hours.window_for(date.weekday()) else {
        return Ok(Vec::new());
    };

    let offset = amenity.offset()?;
    let offset_seconds = i64::from(offset.local_minus_utc());
    let slot_len = Duration::minutes(i64::from(amenity.slot_minutes));

    let mut slots = Vec::new();
    let mut local = date.and_time(window.open);
    let close = date.and_time(window.close);

    while local + slot_len <= close {
        let start_at = (local - Duration::seconds(offset_seconds)).and_utc();
        let end_at = start_at + slot_len;

        let occupied = bookings
            .iter()
            .filter(|b| {
                b.amenity_id == amenity.id
                    && b.status.occupies_capacity()
                    && b.overlaps(start_at, end_at)
            })
            .count();
        let occupied = u32::try_from(occupied).unwrap_or(u32::MAX);

        let remaining = amenity.capacity.saturating_sub(occupied);
        if remaining > 0 {
            slots.push(Slot {
                start_at,
                end_at,
                remaining_capacity: remaining,
            });
        }

        local += slot_len;
    }

    Ok(slots)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::amenity::OperatingHours;
    use crate::domain::booking::BookingStatus;
    use crate::domain::ids::{AmenityId, BookingId, CircleId, ResidentId};
    use chrono::{NaiveTime, TimeZone};

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default()
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, h, m, 0).single().unwrap_or_default()
    }

    fn gym(capacity: u32) -> Amenity {
        Amenity {
            id: AmenityId::from("gym"),
            name: "Gym".to_string(),
            capacity,
            slot_minutes: 60,
            operating_hours: OperatingHours::every_day(time(9, 0), time(17, 0)),
            requires_approval: false,
            utc_offset_minutes: 0,
        }
    }

    fn booking(start: DateTime<Utc>, end: DateTime<Utc>, status: BookingStatus) -> Booking {
        Booking {
            id: BookingId::new(),
            amenity_id: AmenityId::from("gym"),
            resident_id: ResidentId::new(),
            circle_id: CircleId::new(),
            start_at: start,
            end_at: end,
            purpose: None,
            status,
            checked_in_at: None,
            created_at: start,
            decided_at: None,
            canceled_at: None,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap_or_default()
    }

    #[test]
    fn open_day_yields_all_slots() {
        let slots = day_slots(&gym(1), date(), &[]).unwrap_or_default();
        assert_eq!(slots.len(), 8); // 09:00..17:00, hourly
        let first = slots.first();
        let Some(first) = first else {
            panic!("expected at least one slot");
        };
        assert_eq!(first.start_at, at(9, 0));
        assert_eq!(first.remaining_capacity, 1);
    }

    #[test]
    fn full_slot_is_omitted() {
        let taken = booking(at(9, 0), at(10, 0), BookingStatus::Approved);
        let slots = day_slots(&gym(1), date(), &[taken]).unwrap_or_default();
        assert_eq!(slots.len(), 7);
        assert!(slots.iter().all(|s| s.start_at != at(9, 0)));
    }

    #[test]
    fn pending_bookings_consume_capacity() {
        let taken = booking(at(9, 0), at(10, 0), BookingStatus::Pending);
        let slots = day_slots(&gym(2), date(), &[taken]).unwrap_or_default();
        let first = slots.first();
        let Some(first) = first else {
            panic!("expected slots");
        };
        assert_eq!(first.remaining_capacity, 1);
    }

    #[test]
    fn terminal_bookings_free_capacity() {
        let canceled = booking(at(9, 0), at(10, 0), BookingStatus::Canceled);
        let rejected = booking(at(9, 0), at(10, 0), BookingStatus::Rejected);
        let slots = day_slots(&gym(1), date(), &[canceled, rejected]).unwrap_or_default();
        assert_eq!(slots.len(), 8);
    }

    #[test]
    fn spanning_booking_consumes_every_touched_slot() {
        let long = booking(at(10, 0), at(13, 0), BookingStatus::Approved);
        let slots = day_slots(&gym(1), date(), &[long]).unwrap_or_default();
        assert_eq!(slots.len(), 5);
        assert!(slots.iter().all(|s| s.start_at < at(10, 0) || s.start_at >= at(13, 0)));
    }

    #[test]
    fn closed_day_yields_no_slots() {
        let mut amenity = gym(1);
        amenity.operating_hours = OperatingHours::default();
        let slots = day_slots(&amenity, date(), &[]).unwrap_or_default();
        assert!(slots.is_empty());
    }

    #[test]
    fn slots_respect_amenity_offset() {
        let mut amenity = gym(1);
        amenity.utc_offset_minutes = 120; // UTC+2
        let slots = day_slots(&amenity, date(), &[]).unwrap_or_default();
        let first = slots.first();
        let Some(first) = first else {
            panic!("expected slots");
        };
        // 09:00 local is 07:00 UTC
        assert_eq!(first.start_at, at(7, 0));
    }

    #[test]
    fn repeated_call_is_identical() {
        let taken = booking(at(11, 0), at(12, 0), BookingStatus::Approved);
        let bookings = vec![taken];
        let a = day_slots(&gym(1), date(), &bookings).unwrap_or_default();
        let b = day_slots(&gym(1), date(), &bookings).unwrap_or_default();
        assert_eq!(a, b);
    }

    #[test]
    fn validate_range_accepts_aligned_slot() {
        let result = validate_range(&gym(1), at(9, 0), at(11, 0));
        assert_eq!(result.ok(), Some(date()));
    }

    #[test]
    fn validate_range_rejects_inverted_interval() {
        let result = validate_range(&gym(1), at(11, 0), at(10, 0));
        assert!(matches!(result, Err(EngineError::Validation(_))));

        let equal = validate_range(&gym(1), at(10, 0), at(10, 0));
        assert!(matches!(equal, Err(EngineError::Validation(_))));
    }

    #[test]
    fn validate_range_rejects_non_multiple_duration() {
        let result = validate_range(&gym(1), at(9, 0), at(9, 30));
        assert!(matches!(result, Err(EngineError::InvalidRange(_))));
    }

    #[test]
    fn validate_range_rejects_outside_hours() {
        let early = validate_range(&gym(1), at(8, 0), at(9, 0));
        assert!(matches!(early, Err(EngineError::InvalidRange(_))));

        let late = validate_range(&gym(1), at(16, 0), at(18, 0));
        assert!(matches!(late, Err(EngineError::InvalidRange(_))));
    }

    #[test]
    fn validate_range_rejects_unaligned_start() {
        let mut amenity = gym(1);
        amenity.operating_hours = OperatingHours::every_day(time(9, 30), time(17, 30));
        // 10:00 is 30 minutes past opening, not a 60-minute boundary
        let result = validate_range(&amenity, at(10, 0), at(11, 0));
        assert!(matches!(result, Err(EngineError::InvalidRange(_))));

        let aligned = validate_range(&amenity, at(10, 30), at(11, 30));
        assert!(aligned.is_ok());
    }

    #[test]
    fn validate_range_end_at_close_is_legal() {
        let result = validate_range(&gym(1), at(16, 0), at(17, 0));
        assert!(result.is_ok());
    }

    #[test]
    fn validate_range_uses_local_date_for_lock_key() {
        let mut amenity = gym(1);
        amenity.utc_offset_minutes = -300; // UTC-5
        amenity.operating_hours = OperatingHours::every_day(time(18, 0), time(23, 0));
        // 23:00 UTC on Sep 1 is 18:00 local the same local date
        let result = validate_range(&amenity, at(23, 0), Utc
            .with_ymd_and_hms(2026, 9, 2, 0, 0, 0)
            .single()
            .unwrap_or_default());
        assert_eq!(result.ok(), Some(date()));
    }
}
