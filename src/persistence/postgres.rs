//! PostgreSQL implementation of the booking event archive.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::models::StoredBookingEvent;
use crate::domain::BookingEvent;
use crate::error::EngineError;

/// PostgreSQL-backed event archive using `sqlx::PgPool`.
///
/// Append-only: bookings are never deleted and neither are their events,
/// so the table doubles as the audit trail required for terminal
/// (canceled/rejected) bookings.
#[derive(Debug, Clone)]
pub struct PostgresArchive {
    pool: PgPool,
}

impl PostgresArchive {
    /// Connects to the database and runs pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] if the pool cannot be built
    /// or a migration fails.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, EngineError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| EngineError::Persistence(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| EngineError::Persistence(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Wraps an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends a booking event to the archive.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] on database failure.
    pub async fn save_event(&self, event: &BookingEvent) -> Result<i64, EngineError> {
        let payload = serde_json::to_value(event)
            .map_err(|e| EngineError::Persistence(e.to_string()))?;
        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO booking_events (booking_id, event_type, payload) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(*event.booking_id().as_uuid())
        .bind(event.event_type_str())
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| EngineError::Persistence(e.to_string()))?;

        Ok(row)
    }

    /// Loads all archived events for a booking, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Persistence`] on database failure.
    pub async fn events_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Vec<StoredBookingEvent>, EngineError> {
        let rows = sqlx::query_as::<_, (i64, Uuid, String, serde_json::Value, DateTime<Utc>)>(
            "SELECT id, booking_id, event_type, payload, created_at \
             FROM booking_events WHERE booking_id = $1 ORDER BY id",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EngineError::Persistence(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, booking_id, event_type, payload, created_at)| StoredBookingEvent {
                id,
                booking_id,
                event_type,
                payload,
                created_at,
            })
            .collect())
    }
}
