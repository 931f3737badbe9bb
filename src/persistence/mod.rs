//! Persistence layer: PostgreSQL audit archive for booking events.
//!
//! The in-memory ledger stays authoritative; the archive is an
//! append-only sidecar fed by the event bus. A lagging or failing
//! archive degrades audit granularity but never blocks a reservation.

pub mod models;
pub mod postgres;

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::domain::BookingEvent;
pub use models::StoredBookingEvent;
pub use postgres::PostgresArchive;

/// Consumes booking events from the bus and appends them to the archive.
///
/// Runs until the sending side of the channel is dropped. Archive
/// failures and lag are logged and skipped.
pub async fn run_archiver(
    archive: Arc<PostgresArchive>,
    mut receiver: broadcast::Receiver<BookingEvent>,
) {
    loop {
        match receiver.recv().await {
            Ok(event) => {
                if let Err(e) = archive.save_event(&event).await {
                    tracing::warn!(
                        event_type = event.event_type_str(),
                        booking_id = %event.booking_id(),
                        error = %e,
                        "failed to archive booking event"
                    );
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "archiver lagged behind the event bus");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
