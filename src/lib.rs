//! # amenity-gateway
//!
//! REST API for a shared-amenity reservation engine.
//!
//! Residents book time slots on capacity-limited amenities (gyms, courts,
//! party rooms). The engine enforces capacity and overlap invariants, drives
//! the booking lifecycle state machine, and exposes day availability. All
//! booking state lives in an in-memory ledger; PostgreSQL is an optional
//! append-only audit archive of lifecycle events.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── ReservationService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── AmenityCatalog (domain/)
//!     ├── BookingLedger (domain/)
//!     │
//!     └── PostgreSQL Audit Archive (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
