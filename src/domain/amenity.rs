//! Amenity catalog: bookable resources and their operating rules.
//!
//! Amenities are read-mostly configuration owned by circle administrators.
//! During a booking transaction the ledger works against an immutable
//! [`Arc<Amenity>`] snapshot, so a concurrent catalog update never changes
//! the rules mid-reservation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::ids::AmenityId;
use crate::error::EngineError;

/// Open/close pair for a single weekday, in the amenity's local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    /// Local opening time (inclusive).
    pub open: NaiveTime,
    /// Local closing time (exclusive; bookings must end at or before it).
    pub close: NaiveTime,
}

/// Per-weekday operating hours. A `None` day is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    /// Monday window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mon: Option<DayWindow>,
    /// Tuesday window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tue: Option<DayWindow>,
    /// Wednesday window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wed: Option<DayWindow>,
    /// Thursday window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thu: Option<DayWindow>,
    /// Friday window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fri: Option<DayWindow>,
    /// Saturday window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sat: Option<DayWindow>,
    /// Sunday window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sun: Option<DayWindow>,
}

impl OperatingHours {
    /// Returns the window for the given weekday, if the amenity is open.
    #[must_use]
    pub const fn window_for(&self, weekday: Weekday) -> Option<&DayWindow> {
        match weekday {
            Weekday::Mon => self.mon.as_ref(),
            Weekday::Tue => self.tue.as_ref(),
            Weekday::Wed => self.wed.as_ref(),
            Weekday::Thu => self.thu.as_ref(),
            Weekday::Fri => self.fri.as_ref(),
            Weekday::Sat => self.sat.as_ref(),
            Weekday::Sun => self.sun.as_ref(),
        }
    }

    /// Builds hours with the same window on all seven days.
    #[must_use]
    pub const fn every_day(open: NaiveTime, close: NaiveTime) -> Self {
        let window = Some(DayWindow { open, close });
        Self {
            mon: window,
            tue: window,
            wed: window,
            thu: window,
            fri: window,
            sat: window,
            sun: window,
        }
    }

    fn windows(&self) -> [Option<&DayWindow>; 7] {
        [
            self.mon.as_ref(),
            self.tue.as_ref(),
            self.wed.as_ref(),
            self.thu.as_ref(),
            self.fri.as_ref(),
            self.sat.as_ref(),
            self.sun.as_ref(),
        ]
    }
}

/// A bookable shared resource (gym, pool, community room).
///
/// Immutable during a booking transaction: the ledger reads an
/// [`Arc<Amenity>`] snapshot from the catalog before taking the day lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    /// Stable slug identifier.
    pub id: AmenityId,
    /// Human-readable name.
    pub name: String,
    /// Maximum simultaneous non-terminal bookings per overlapping instant.
    pub capacity: u32,
    /// Granularity of bookable intervals, in minutes.
    pub slot_minutes: u32,
    /// Per-weekday open/close in the amenity's local time.
    pub operating_hours: OperatingHours,
    /// Whether new bookings start `Pending` awaiting an admin decision.
    pub requires_approval: bool,
    /// Offset of the amenity's local time from UTC, in minutes.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Amenity {
    /// Returns the amenity's fixed UTC offset.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if `utc_offset_minutes` is out
    /// of the representable range (±24h exclusive).
    pub fn offset(&self) -> Result<FixedOffset, EngineError> {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).ok_or_else(|| {
            EngineError::Validation(format!(
                "invalid utc_offset_minutes: {}",
                self.utc_offset_minutes
            ))
        })
    }

    /// Validates the catalog entry before it is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] on a non-positive capacity, a
    /// slot length outside `1..=1440` minutes, an invalid UTC offset, or
    /// any day window whose open time is not strictly before its close.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.id.as_str().is_empty() {
            return Err(EngineError::Validation("amenity id must not be empty".to_string()));
        }
        if self.capacity == 0 {
            return Err(EngineError::Validation("capacity must be positive".to_string()));
        }
        if self.slot_minutes == 0 || self.slot_minutes > 1440 {
            return Err(EngineError::Validation(
                "slot_minutes must be between 1 and 1440".to_string(),
            ));
        }
        self.offset()?;
        for window in self.operating_hours.windows().into_iter().flatten() {
            if window.open >= window.close {
                return Err(EngineError::Validation(
                    "operating hours open must be before close".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Read-mostly catalog of bookable amenities.
///
/// Backed by a `RwLock<HashMap<...>>` with `Arc`-wrapped entries so that
/// lookups hand out cheap immutable snapshots. Admin upserts replace the
/// whole entry; in-flight reservations keep working against the snapshot
/// they already hold.
#[derive(Debug, Default)]
pub struct AmenityCatalog {
    amenities: RwLock<HashMap<AmenityId, Arc<Amenity>>>,
}

impl AmenityCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            amenities: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts or replaces an amenity after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if the entry fails
    /// [`Amenity::validate`].
    pub async fn upsert(&self, amenity: Amenity) -> Result<Arc<Amenity>, EngineError> {
        amenity.validate()?;
        let entry = Arc::new(amenity);
        let mut map = self.amenities.write().await;
        map.insert(entry.id.clone(), Arc::clone(&entry));
        Ok(entry)
    }

    /// Returns an immutable snapshot of the amenity.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AmenityNotFound`] if no amenity with the
    /// given ID exists.
    pub async fn get(&self, id: &AmenityId) -> Result<Arc<Amenity>, EngineError> {
        let map = self.amenities.read().await;
        map.get(id)
            .cloned()
            .ok_or_else(|| EngineError::AmenityNotFound(id.clone()))
    }

    /// Returns snapshots of all amenities, sorted by ID.
    pub async fn list(&self) -> Vec<Arc<Amenity>> {
        let map = self.amenities.read().await;
        let mut entries: Vec<Arc<Amenity>> = map.values().cloned().collect();
        entries.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        entries
    }

    /// Seeds the catalog from a JSON array of amenities.
    ///
    /// Used at startup with the file named by `AMENITY_CATALOG_PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if the JSON is malformed or any
    /// entry fails validation. Entries seeded before the failure remain.
    pub async fn seed_from_json(&self, json: &str) -> Result<usize, EngineError> {
        let amenities: Vec<Amenity> = serde_json::from_str(json)
            .map_err(|e| EngineError::Validation(format!("invalid amenity catalog: {e}")))?;
        let count = amenities.len();
        for amenity in amenities {
            self.upsert(amenity).await?;
        }
        Ok(count)
    }

    /// Returns the number of amenities in the catalog.
    pub async fn len(&self) -> usize {
        self.amenities.read().await.len()
    }

    /// Returns `true` if the catalog is empty.
    pub async fn is_empty(&self) -> bool {
        self.amenities.read().await.is_empty()
    }
}
