//! Engine error types with HTTP status code mapping.
//!
//! [`EngineError`] is the central error type for the reservation engine.
//! Each variant maps to a machine-readable kind string, a numeric code,
//! and a structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ids::{AmenityId, BookingId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "kind": "slot_full",
///     "code": 2102,
///     "message": "slot is at capacity",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with kind string, numeric code, and message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Machine-readable kind. `"contention"` is the only kind a
    /// client should retry automatically.
    pub kind: &'static str,
    /// Numeric error code (see code ranges on [`EngineError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category            | HTTP Status                  |
/// |-----------|---------------------|------------------------------|
/// | 1000–1999 | Validation          | 400 Bad Request              |
/// | 2000–2099 | Not Found           | 404 Not Found                |
/// | 2100–2199 | Booking Conflict    | 409 Conflict                 |
/// | 2200–2299 | Authorization       | 403 Forbidden                |
/// | 2300–2399 | Check-in            | 409 / 422                    |
/// | 2900–2999 | Contention (retry)  | 409 Conflict                 |
/// | 3000–3999 | Server              | 500 Internal Server Error    |
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Amenity with the given ID was not found in the catalog.
    #[error("amenity not found: {0}")]
    AmenityNotFound(AmenityId),

    /// Booking with the given ID was not found in the ledger.
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    /// Malformed input, e.g. `end_at <= start_at` or an unparseable header.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Requested interval violates slot alignment or operating hours.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Resident already holds an overlapping booking on the same amenity.
    #[error("resident already holds an overlapping booking for this amenity")]
    Overlap,

    /// The slot has reached its capacity of concurrent bookings.
    #[error("slot is at capacity")]
    SlotFull,

    /// The requested status change is not a legal state-machine edge.
    #[error("illegal transition: {0}")]
    IllegalTransition(String),

    /// Caller lacks the rights to perform this mutation.
    #[error("caller is not permitted to modify this booking")]
    NotOwner,

    /// Check-in attempted outside the allowed time window.
    #[error("check-in is outside the allowed window")]
    OutsideWindow,

    /// Booking already has a recorded check-in.
    #[error("booking is already checked in")]
    AlreadyCheckedIn,

    /// The per-day serialization lock could not be acquired promptly.
    /// Retryable; callers should back off with jitter.
    #[error("reservation lock busy; retry after {retry_after_ms} ms")]
    Contention {
        /// Milliseconds the client should wait before retrying.
        retry_after_ms: u64,
    },

    /// Audit archive failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Returns the machine-readable kind string for this variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AmenityNotFound(_) | Self::BookingNotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::InvalidRange(_) => "invalid_range",
            Self::Overlap => "overlap",
            Self::SlotFull => "slot_full",
            Self::IllegalTransition(_) => "illegal_transition",
            Self::NotOwner => "not_owner",
            Self::OutsideWindow => "outside_window",
            Self::AlreadyCheckedIn => "already_checked_in",
            Self::Contention { .. } => "contention",
            Self::Persistence(_) => "persistence",
            Self::Internal(_) => "internal",
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::InvalidRange(_) => 1002,
            Self::AmenityNotFound(_) => 2001,
            Self::BookingNotFound(_) => 2002,
            Self::Overlap => 2101,
            Self::SlotFull => 2102,
            Self::IllegalTransition(_) => 2103,
            Self::NotOwner => 2201,
            Self::OutsideWindow => 2301,
            Self::AlreadyCheckedIn => 2302,
            Self::Contention { .. } => 2901,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidRange(_) => StatusCode::BAD_REQUEST,
            Self::AmenityNotFound(_) | Self::BookingNotFound(_) => StatusCode::NOT_FOUND,
            Self::Overlap
            | Self::SlotFull
            | Self::IllegalTransition(_)
            | Self::AlreadyCheckedIn
            | Self::Contention { .. } => StatusCode::CONFLICT,
            Self::NotOwner => StatusCode::FORBIDDEN,
            Self::OutsideWindow => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match self {
            Self::Contention { retry_after_ms } => {
                Some(format!("retry with jitter after {retry_after_ms} ms"))
            }
            _ => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                kind: self.kind(),
                code: self.error_code(),
                message: self.to_string(),
                details,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn contention_is_conflict_and_retryable() {
        let err = EngineError::Contention { retry_after_ms: 250 };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.kind(), "contention");
        assert_eq!(err.error_code(), 2901);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = EngineError::BookingNotFound(BookingId::new());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn conflict_kinds_map_to_409() {
        for err in [
            EngineError::Overlap,
            EngineError::SlotFull,
            EngineError::AlreadyCheckedIn,
            EngineError::IllegalTransition("canceled is terminal".to_string()),
        ] {
            assert_eq!(err.status_code(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn not_owner_maps_to_403() {
        assert_eq!(EngineError::NotOwner.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn error_response_is_schema_documented() {
        // Response bodies referenced from path annotations must carry a
        // registered schema.
        assert_eq!(ErrorResponse::name(), "ErrorResponse");
        assert_eq!(ErrorBody::name(), "ErrorBody");
    }

    #[test]
    fn error_body_serializes_kind() {
        let err = EngineError::SlotFull;
        let body = ErrorResponse {
            error: ErrorBody {
                kind: err.kind(),
                code: err.error_code(),
                message: err.to_string(),
                details: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap_or_default();
        assert!(json.contains("slot_full"));
        assert!(json.contains("2102"));
        assert!(!json.contains("details"));
    }
}
