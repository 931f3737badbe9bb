//! Service layer: orchestration of catalog, ledger, and events.

pub mod reservation_service;

pub use reservation_service::ReservationService;
