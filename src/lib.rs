//! # scanmap
//!
//! REST service that issues QR codes, records the scans made against them,
//! and renders the scans as pin, heat or cluster maps.
//!
//! Each code gets an opaque identifier at creation. Depending on the
//! configured [`domain::EmbeddingPolicy`] the identifier is appended to the
//! encoded URL as a query parameter, or kept only in the stored record.
//! Scan reports reference the identifier, and the map endpoints plot every
//! located scan of a code inside an optional time window.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── CodeService / ScanService / MapService (service/)
//!     ├── Symbol encoder (encoder/)   Map renderer (map/)
//!     │
//!     └── Store (persistence/): MemoryStore | PostgresStore
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod encoder;
pub mod error;
pub mod map;
pub mod persistence;
pub mod service;
