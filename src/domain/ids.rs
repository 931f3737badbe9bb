//! Type-safe identifiers and caller identity.
//!
//! [`BookingId`], [`ResidentId`] and [`CircleId`] wrap [`uuid::Uuid`] (v4)
//! so the different identifier spaces cannot be confused. [`AmenityId`] is
//! a slug assigned by circle administrators (e.g. `"gym"`, `"pool"`).

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for a booking record.
///
/// Wraps a UUID v4. Generated once when the ledger commits a reservation
/// and immutable thereafter. Used as the dictionary key in the
/// [`crate::domain::BookingLedger`] and as the event discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct BookingId(uuid::Uuid);

impl BookingId {
    /// Creates a new random `BookingId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `BookingId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for BookingId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

/// Identifier of the resident who owns a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResidentId(uuid::Uuid);

impl ResidentId {
    /// Creates a new random `ResidentId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `ResidentId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ResidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the circle (community) a booking belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircleId(uuid::Uuid);

impl CircleId {
    /// Creates a new random `CircleId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `CircleId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for CircleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable slug identifying a bookable amenity (e.g. `"gym"`).
///
/// Assigned by circle administrators when the amenity is created and used
/// as the catalog key and the first half of the ledger's per-day lock key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmenityId(String);

impl AmenityId {
    /// Creates an `AmenityId` from a slug.
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AmenityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AmenityId {
    fn from(slug: &str) -> Self {
        Self(slug.to_string())
    }
}

/// Role the caller acts under, taken from the application's auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Regular resident: may create bookings, cancel their own, check in.
    Resident,
    /// Circle administrator: may approve/reject and force-cancel.
    Admin,
}

/// Authenticated caller identity attached to every mutation.
///
/// The surrounding application performs authentication; the engine only
/// enforces authorization (owner vs. admin rights).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Resident performing the request.
    pub resident_id: ResidentId,
    /// Circle the resident belongs to.
    pub circle_id: CircleId,
    /// Role the request is made under.
    pub role: ActorRole,
}

impl Actor {
    /// Returns `true` if the actor holds administrator rights.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, ActorRole::Admin)
    }
}
