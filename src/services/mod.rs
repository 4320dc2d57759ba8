//! # Domain Services
//!
//! Typed façades over [`ApiClient`](crate::api::ApiClient). Each method maps
//! to exactly one backend call and hands back the [`ApiResponse`](crate::api::ApiResponse)
//! untouched.

pub mod property;
pub mod rent_request;

pub use property::{PropertyService, PropertyUpdate};
pub use rent_request::RentRequestService;
