//! Domain layer: identifiers, amenity catalog, booking ledger, events.
//!
//! This module contains the reservation engine proper: the amenity
//! catalog, the booking record and its state machine, the pure
//! availability calculator, the ledger that enforces the capacity and
//! overlap invariants, and the event bus that broadcasts mutations.

pub mod amenity;
pub mod availability;
pub mod booking;
pub mod booking_event;
pub mod event_bus;
pub mod ids;
pub mod ledger;

pub use amenity::{Amenity, AmenityCatalog, OperatingHours};
pub use availability::Slot;
pub use booking::{Booking, BookingStatus, EffectiveStatus};
pub use booking_event::BookingEvent;
pub use event_bus::EventBus;
pub use ids::{Actor, ActorRole, AmenityId, BookingId, CircleId, ResidentId};
pub use ledger::{BookingLedger, LedgerConfig};
