//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::persistence::PostgresArchive;
use crate::service::ReservationService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Reservation service for all business logic.
    pub reservation_service: Arc<ReservationService>,
    /// Event bus carrying booking events.
    pub event_bus: EventBus,
    /// Audit archive, present when persistence is enabled.
    pub archive: Option<Arc<PostgresArchive>>,
}
