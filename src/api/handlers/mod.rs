//! REST endpoint handlers organized by resource.

pub mod amenity;
pub mod availability;
pub mod booking;
pub mod system;

use axum::Router;
use axum::http::HeaderMap;

use crate::app_state::AppState;
use crate::domain::{Actor, ActorRole, CircleId, ResidentId};
use crate::error::EngineError;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(amenity::routes())
        .merge(availability::routes())
        .merge(booking::routes())
}

/// Extracts the caller identity from the `x-resident-id`, `x-circle-id`,
/// and `x-resident-role` headers set by the application's auth layer.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] on missing or malformed headers.
pub(crate) fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, EngineError> {
    let resident_id = ResidentId::from_uuid(parse_uuid_header(headers, "x-resident-id")?);
    let circle_id = CircleId::from_uuid(parse_uuid_header(headers, "x-circle-id")?);
    let role = match headers.get("x-resident-role").map(|v| v.to_str()) {
        None => ActorRole::Resident,
        Some(Ok("resident")) => ActorRole::Resident,
        Some(Ok("admin")) => ActorRole::Admin,
        Some(_) => {
            return Err(EngineError::Validation(
                "x-resident-role must be \"resident\" or \"admin\"".to_string(),
            ));
        }
    };
    Ok(Actor {
        resident_id,
        circle_id,
        role,
    })
}

fn parse_uuid_header(headers: &HeaderMap, name: &str) -> Result<uuid::Uuid, EngineError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| EngineError::Validation(format!("missing or invalid {name} header")))
}
