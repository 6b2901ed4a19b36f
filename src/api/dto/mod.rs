//! Data Transfer Objects for REST request/response serialization.
//!
//! Identifiers are exposed as plain UUID strings; timestamps as RFC 3339.

pub mod code_dto;
pub mod common_dto;
pub mod scan_dto;

pub use code_dto::*;
pub use common_dto::*;
pub use scan_dto::*;
