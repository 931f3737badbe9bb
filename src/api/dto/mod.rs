//! Data Transfer Objects for REST request/response serialization.

pub mod amenity_dto;
pub mod booking_dto;
pub mod common_dto;

pub use amenity_dto::*;
pub use booking_dto::*;
pub use common_dto::*;
