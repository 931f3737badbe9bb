//! Booking ledger: the authoritative store and sole mutator of bookings.
//!
//! All capacity and overlap checks are serialized per `(amenity, local
//! day)` behind a [`tokio::sync::Mutex`], so two concurrent reservations
//! for the same slot can never both observe capacity as available. Reads
//! take only the outer map lock and may be slightly stale; the write path
//! always re-validates against committed state inside the day lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::{Mutex, RwLock};

use super::amenity::Amenity;
use super::availability::validate_range;
use super::booking::{Booking, BookingStatus};
use super::ids::{Actor, AmenityId, BookingId, ResidentId};
use crate::error::EngineError;

/// Ledger tuning knobs, passed in explicitly so tests can instantiate
/// multiple ledgers with different timings.
#[derive(Debug, Clone, Copy)]
pub struct LedgerConfig {
    /// Bound on waiting for a day lock before failing with `Contention`.
    pub lock_wait: StdDuration,
    /// Check-in allowed this long before `start_at`.
    pub grace_before: Duration,
    /// Check-in allowed this long after `end_at`.
    pub grace_after: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            lock_wait: StdDuration::from_millis(250),
            grace_before: Duration::minutes(15),
            grace_after: Duration::zero(),
        }
    }
}

/// Authoritative booking store with per-day write serialization.
///
/// # Concurrency
///
/// - Writes touching the same `(amenity, local day)` are serialized.
/// - Writes on different amenities or days proceed concurrently.
/// - Reads never take a day lock and tolerate slight staleness.
/// - Lock acquisition is bounded; a timeout surfaces the retryable
///   [`EngineError::Contention`].
#[derive(Debug)]
pub struct BookingLedger {
    bookings: RwLock<HashMap<BookingId, Booking>>,
    day_locks: RwLock<HashMap<(AmenityId, NaiveDate), Arc<Mutex<()>>>>,
    config: LedgerConfig,
}

impl BookingLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            bookings: RwLock::new(HashMap::new()),
            day_locks: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Returns the ledger configuration.
    #[must_use]
    pub const fn config(&self) -> &LedgerConfig {
        &self.config
    }

    async fn day_lock(&self, key: (AmenityId, NaiveDate)) -> Arc<Mutex<()>> {
        {
            let locks = self.day_locks.read().await;
            if let Some(lock) = locks.get(&key) {
                return Arc::clone(lock);
            }
        }
        let mut locks = self.day_locks.write().await;
        Arc::clone(locks.entry(key).or_default())
    }

    /// Acquires the serialization lock for one amenity-day, bounded by
    /// the configured wait.
    async fn lock_day(
        &self,
        amenity_id: &AmenityId,
        date: NaiveDate,
    ) -> Result<tokio::sync::OwnedMutexGuard<()>, EngineError> {
        let lock = self.day_lock((amenity_id.clone(), date)).await;
        tokio::time::timeout(self.config.lock_wait, lock.lock_owned())
            .await
            .map_err(|_| EngineError::Contention {
                retry_after_ms: u64::try_from(self.config.lock_wait.as_millis())
                    .unwrap_or(u64::MAX),
            })
    }

    /// Atomically validates and inserts a new booking.
    ///
    /// Inside the day lock, re-validates against committed state: the
    /// interval itself, the resident's own non-terminal bookings on this
    /// amenity, and the capacity of every overlapped instant. The new
    /// record starts `Pending` when the amenity requires approval, else
    /// `Approved`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Validation`] / [`EngineError::InvalidRange`] on a
    ///   malformed or out-of-hours interval.
    /// - [`EngineError::Overlap`] if the resident already holds an
    ///   overlapping non-terminal booking here.
    /// - [`EngineError::SlotFull`] if any overlapped instant is at
    ///   capacity.
    /// - [`EngineError::Contention`] if the day lock was not acquired in
    ///   time (retryable).
    #[allow(clippy::too_many_arguments)]
    pub async fn reserve_slot(
        &self,
        amenity: &Amenity,
        actor: &Actor,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        purpose: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Booking, EngineError> {
        let date = validate_range(amenity, start_at, end_at)?;
        let _guard = self.lock_day(&amenity.id, date).await?;

        let mut map = self.bookings.write().await;

        let mut concurrent: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::new();
        for existing in map.values() {
            if existing.amenity_id != amenity.id
                || !existing.status.occupies_capacity()
                || !existing.overlaps(start_at, end_at)
            {
                continue;
            }
            if existing.resident_id == actor.resident_id {
                return Err(EngineError::Overlap);
            }
            concurrent.push((existing.start_at, existing.end_at));
        }
        // Peak concurrency over [start_at, end_at) can only change at an
        // interval start, so sampling those instants is exact.
        let mut instants: Vec<DateTime<Utc>> = vec![start_at];
        instants.extend(concurrent.iter().map(|(s, _)| *s).filter(|s| *s > start_at));
        for t in instants {
            let at_instant = concurrent.iter().filter(|(s, e)| *s <= t && t < *e).count();
            let at_instant = u32::try_from(at_instant).unwrap_or(u32::MAX);
            if at_instant >= amenity.capacity {
                return Err(EngineError::SlotFull);
            }
        }

        let status = if amenity.requires_approval {
            BookingStatus::Pending
        } else {
            BookingStatus::Approved
        };

        let booking = Booking {
            id: BookingId::new(),
            amenity_id: amenity.id.clone(),
            resident_id: actor.resident_id,
            circle_id: actor.circle_id,
            start_at,
            end_at,
            purpose,
            status,
            checked_in_at: None,
            created_at: now,
            decided_at: None,
            canceled_at: None,
        };
        map.insert(booking.id, booking.clone());
        Ok(booking)
    }

    /// Applies a state-machine edge to a booking.
    ///
    /// Legal edges: `Pending -> Approved | Rejected` (admin, approval
    /// re-checks capacity against overlapping approved bookings),
    /// `Pending | Approved -> Canceled` (owner before `start_at`, admin
    /// any time before the booking is frozen). Terminal or expired
    /// bookings accept no edge.
    ///
    /// # Errors
    ///
    /// - [`EngineError::BookingNotFound`] for an unknown ID.
    /// - [`EngineError::IllegalTransition`] for a non-permitted edge.
    /// - [`EngineError::NotOwner`] if the actor lacks rights.
    /// - [`EngineError::SlotFull`] if approval would overshoot capacity.
    /// - [`EngineError::Contention`] on day-lock timeout (retryable).
    pub async fn transition(
        &self,
        booking_id: BookingId,
        actor: &Actor,
        new_status: BookingStatus,
        amenity: &Amenity,
        now: DateTime<Utc>,
    ) -> Result<Booking, EngineError> {
        let (start_at, end_at) = {
            let map = self.bookings.read().await;
            let booking = map
                .get(&booking_id)
                .ok_or(EngineError::BookingNotFound(booking_id))?;
            (booking.start_at, booking.end_at)
        };
        let date = start_at.with_timezone(&amenity.offset()?).date_naive();
        let _guard = self.lock_day(&amenity.id, date).await?;

        let mut map = self.bookings.write().await;

        // Legality first: a full slot must not mask an authorization or
        // state-machine error.
        {
            let booking = map
                .get(&booking_id)
                .ok_or(EngineError::BookingNotFound(booking_id))?;

            if booking.is_frozen(now) {
                return Err(EngineError::IllegalTransition(format!(
                    "booking is {} and frozen",
                    booking.status.as_str()
                )));
            }

            match new_status {
                BookingStatus::Approved | BookingStatus::Rejected => {
                    if !actor.is_admin() {
                        return Err(EngineError::NotOwner);
                    }
                    if booking.status != BookingStatus::Pending {
                        return Err(EngineError::IllegalTransition(format!(
                            "{} -> {} is not permitted",
                            booking.status.as_str(),
                            new_status.as_str()
                        )));
                    }
                }
                BookingStatus::Canceled => {
                    if !actor.is_admin() {
                        if booking.resident_id != actor.resident_id {
                            return Err(EngineError::NotOwner);
                        }
                        if now >= booking.start_at {
                            return Err(EngineError::IllegalTransition(
                                "residents may only cancel before the booking starts".to_string(),
                            ));
                        }
                    }
                }
                BookingStatus::Pending => {
                    return Err(EngineError::IllegalTransition(
                        "no edge leads back to pending".to_string(),
                    ));
                }
            }
        }

        if new_status == BookingStatus::Approved {
            let approved_overlap = map
                .values()
                .filter(|b| {
                    b.id != booking_id
                        && b.amenity_id == amenity.id
                        && b.status == BookingStatus::Approved
                        && b.overlaps(start_at, end_at)
                })
                .count();
            let approved_overlap = u32::try_from(approved_overlap).unwrap_or(u32::MAX);
            if approved_overlap >= amenity.capacity {
                return Err(EngineError::SlotFull);
            }
        }

        let booking = map
            .get_mut(&booking_id)
            .ok_or(EngineError::BookingNotFound(booking_id))?;

        match new_status {
            BookingStatus::Approved | BookingStatus::Rejected => {
                booking.status = new_status;
                booking.decided_at = Some(now);
            }
            BookingStatus::Canceled => {
                booking.status = BookingStatus::Canceled;
                booking.canceled_at = Some(now);
            }
            BookingStatus::Pending => {
                return Err(EngineError::IllegalTransition(
                    "no edge leads back to pending".to_string(),
                ));
            }
        }

        Ok(booking.clone())
    }

    /// Records the one-shot check-in on a booking.
    ///
    /// Legal only while the booking is `Approved` (or still `Pending` on
    /// an amenity that never requires approval) and only inside
    /// `[start_at - grace_before, end_at + grace_after]`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::BookingNotFound`] for an unknown ID.
    /// - [`EngineError::NotOwner`] if the actor is neither the owner nor
    ///   an admin.
    /// - [`EngineError::AlreadyCheckedIn`] on a second attempt.
    /// - [`EngineError::OutsideWindow`] outside the grace window.
    /// - [`EngineError::IllegalTransition`] on a terminal booking.
    /// - [`EngineError::Contention`] on day-lock timeout (retryable).
    pub async fn record_check_in(
        &self,
        booking_id: BookingId,
        actor: &Actor,
        amenity: &Amenity,
        at: DateTime<Utc>,
    ) -> Result<Booking, EngineError> {
        let start_at = {
            let map = self.bookings.read().await;
            map.get(&booking_id)
                .ok_or(EngineError::BookingNotFound(booking_id))?
                .start_at
        };
        let date = start_at.with_timezone(&amenity.offset()?).date_naive();
        let _guard = self.lock_day(&amenity.id, date).await?;

        let mut map = self.bookings.write().await;
        let booking = map
            .get_mut(&booking_id)
            .ok_or(EngineError::BookingNotFound(booking_id))?;

        if !actor.is_admin() && booking.resident_id != actor.resident_id {
            return Err(EngineError::NotOwner);
        }
        if booking.status.is_terminal() {
            return Err(EngineError::IllegalTransition(format!(
                "cannot check in a {} booking",
                booking.status.as_str()
            )));
        }
        let pending_allowed = !amenity.requires_approval;
        if booking.status == BookingStatus::Pending && !pending_allowed {
            return Err(EngineError::IllegalTransition(
                "booking is awaiting approval".to_string(),
            ));
        }
        if booking.checked_in_at.is_some() {
            return Err(EngineError::AlreadyCheckedIn);
        }

        let window_open = booking.start_at - self.config.grace_before;
        let window_close = booking.end_at + self.config.grace_after;
        if at < window_open || at > window_close {
            return Err(EngineError::OutsideWindow);
        }

        booking.checked_in_at = Some(at);
        Ok(booking.clone())
    }

    /// Returns a copy of the booking.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BookingNotFound`] for an unknown ID.
    pub async fn get(&self, booking_id: BookingId) -> Result<Booking, EngineError> {
        let map = self.bookings.read().await;
        map.get(&booking_id)
            .cloned()
            .ok_or(EngineError::BookingNotFound(booking_id))
    }

    /// Returns the resident's bookings, newest start first.
    pub async fn list_by_resident(&self, resident_id: ResidentId) -> Vec<Booking> {
        let map = self.bookings.read().await;
        let mut bookings: Vec<Booking> = map
            .values()
            .filter(|b| b.resident_id == resident_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.start_at.cmp(&a.start_at));
        bookings
    }

    /// Snapshot of all bookings on the amenity overlapping `[start, end)`.
    ///
    /// Taken without the day lock; the availability calculator tolerates
    /// slight staleness because the write path re-validates.
    pub async fn bookings_overlapping(
        &self,
        amenity_id: &AmenityId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Booking> {
        let map = self.bookings.read().await;
        map.values()
            .filter(|b| b.amenity_id == *amenity_id && b.overlaps(start, end))
            .cloned()
            .collect()
    }

    /// Returns the number of bookings ever committed.
    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }

    /// Returns `true` if no booking was ever committed.
    pub async fn is_empty(&self) -> bool {
        self.bookings.read().await.is_empty()
    }
}

impl Default for BookingLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}
