//! Service layer: business logic orchestration.
//!
//! [`CodeService`] mints, encodes and persists codes, [`ScanService`]
//! records scans against existing codes, and [`MapService`] renders a
//! code's located records. All three share one [`crate::persistence::Store`].

pub mod code_service;
pub mod map_service;
pub mod scan_service;

pub use code_service::CodeService;
pub use map_service::MapService;
pub use scan_service::ScanService;
