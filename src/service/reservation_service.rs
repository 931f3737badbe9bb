//! Reservation service: orchestrates booking operations and emits events.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::domain::availability::{self, Slot};
use crate::domain::booking_event::CancelKind;
use crate::domain::{
    Actor, Amenity, AmenityCatalog, AmenityId, Booking, BookingId, BookingLedger, BookingStatus,
    BookingEvent, EventBus, ResidentId,
};
use crate::error::EngineError;

/// Orchestration layer for all booking operations.
///
/// Stateless coordinator: owns references to the [`AmenityCatalog`] for
/// amenity snapshots, the [`BookingLedger`] for authoritative state, and
/// the [`EventBus`] for event emission. Every mutation method follows the
/// pattern: snapshot amenity → call ledger → emit event → return record.
/// All collaborators are passed in explicitly so tests can instantiate
/// several isolated engines.
#[derive(Debug, Clone)]
pub struct ReservationService {
    catalog: Arc<AmenityCatalog>,
    ledger: Arc<BookingLedger>,
    event_bus: EventBus,
}

impl ReservationService {
    /// Creates a new `ReservationService`.
    #[must_use]
    pub fn new(catalog: Arc<AmenityCatalog>, ledger: Arc<BookingLedger>, event_bus: EventBus) -> Self {
        Self {
            catalog,
            ledger,
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`AmenityCatalog`].
    #[must_use]
    pub fn catalog(&self) -> &Arc<AmenityCatalog> {
        &self.catalog
    }

    /// Returns a reference to the inner [`BookingLedger`].
    #[must_use]
    pub fn ledger(&self) -> &Arc<BookingLedger> {
        &self.ledger
    }

    /// Creates a booking for the caller on the given amenity.
    ///
    /// The initial status follows the amenity's approval policy.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the amenity is unknown, the range is
    /// invalid, the slot is full, the caller self-overlaps, or the day
    /// lock times out.
    pub async fn create_booking(
        &self,
        actor: &Actor,
        amenity_id: &AmenityId,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        purpose: Option<String>,
    ) -> Result<Booking, EngineError> {
        let amenity = self.catalog.get(amenity_id).await?;
        let now = Utc::now();
        let booking = self
            .ledger
            .reserve_slot(&amenity, actor, start_at, end_at, purpose, now)
            .await?;

        let _ = self.event_bus.publish(BookingEvent::BookingCreated {
            booking_id: booking.id,
            amenity_id: booking.amenity_id.clone(),
            resident_id: booking.resident_id,
            start_at: booking.start_at,
            end_at: booking.end_at,
            status: booking.status,
            timestamp: now,
        });

        tracing::info!(
            booking_id = %booking.id,
            amenity_id = %booking.amenity_id,
            status = booking.status.as_str(),
            "booking created"
        );
        Ok(booking)
    }

    /// Applies an admin decision or a cancellation to a booking.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the booking or its amenity is
    /// unknown, the edge is illegal, the caller lacks rights, approval
    /// would overshoot capacity, or the day lock times out.
    pub async fn update_status(
        &self,
        actor: &Actor,
        booking_id: BookingId,
        new_status: BookingStatus,
    ) -> Result<Booking, EngineError> {
        let current = self.ledger.get(booking_id).await?;
        let amenity = self.catalog.get(&current.amenity_id).await?;
        let now = Utc::now();

        let booking = self
            .ledger
            .transition(booking_id, actor, new_status, &amenity, now)
            .await?;

        let event = match booking.status {
            BookingStatus::Approved | BookingStatus::Rejected => BookingEvent::BookingDecided {
                booking_id: booking.id,
                amenity_id: booking.amenity_id.clone(),
                decided_by: actor.resident_id,
                status: booking.status,
                timestamp: now,
            },
            BookingStatus::Canceled => BookingEvent::BookingCanceled {
                booking_id: booking.id,
                amenity_id: booking.amenity_id.clone(),
                canceled_by: actor.resident_id,
                kind: if actor.is_admin() && actor.resident_id != booking.resident_id {
                    CancelKind::Forced
                } else {
                    CancelKind::ByOwner
                },
                timestamp: now,
            },
            BookingStatus::Pending => {
                return Err(EngineError::Internal(
                    "transition cannot produce a pending booking".to_string(),
                ));
            }
        };
        let _ = self.event_bus.publish(event);

        tracing::info!(
            booking_id = %booking.id,
            status = booking.status.as_str(),
            "booking status updated"
        );
        Ok(booking)
    }

    /// Records attendance against a booking within its check-in window.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the booking or its amenity is
    /// unknown, the window is missed, the booking is already checked in,
    /// the caller lacks rights, or the day lock times out.
    pub async fn check_in(&self, actor: &Actor, booking_id: BookingId) -> Result<Booking, EngineError> {
        let current = self.ledger.get(booking_id).await?;
        let amenity = self.catalog.get(&current.amenity_id).await?;
        let now = Utc::now();

        let booking = self
            .ledger
            .record_check_in(booking_id, actor, &amenity, now)
            .await?;

        let _ = self.event_bus.publish(BookingEvent::CheckedIn {
            booking_id: booking.id,
            amenity_id: booking.amenity_id.clone(),
            checked_in_at: now,
            timestamp: now,
        });

        tracing::info!(booking_id = %booking.id, "check-in recorded");
        Ok(booking)
    }

    /// Enumerates bookable slots for an amenity on the given local date.
    ///
    /// Works on a ledger snapshot; slightly stale reads are acceptable
    /// because the write path re-validates under the day lock.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AmenityNotFound`] for an unknown amenity.
    pub async fn availability(
        &self,
        amenity_id: &AmenityId,
        date: NaiveDate,
    ) -> Result<Vec<Slot>, EngineError> {
        let amenity = self.catalog.get(amenity_id).await?;
        let (day_start, day_end) = day_bounds(&amenity, date)?;
        let snapshot = self
            .ledger
            .bookings_overlapping(amenity_id, day_start, day_end)
            .await;
        availability::day_slots(&amenity, date, &snapshot)
    }

    /// Returns the resident's bookings, newest start first.
    pub async fn bookings_for_resident(&self, resident_id: ResidentId) -> Vec<Booking> {
        self.ledger.list_by_resident(resident_id).await
    }

    /// Returns a single booking.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BookingNotFound`] for an unknown ID.
    pub async fn get_booking(&self, booking_id: BookingId) -> Result<Booking, EngineError> {
        self.ledger.get(booking_id).await
    }
}

/// UTC bounds of one amenity-local calendar day.
fn day_bounds(
    amenity: &Amenity,
    date: NaiveDate,
) -> Result<(DateTime<Utc>, DateTime<Utc>), EngineError> {
    let offset = amenity.offset()?;
    let offset_seconds = i64::from(offset.local_minus_utc());
    let start = (date.and_time(chrono::NaiveTime::MIN) - Duration::seconds(offset_seconds)).and_utc();
    Ok((start, start + Duration::days(1)))
}
