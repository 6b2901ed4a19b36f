//! Domain layer: codes, scan events, identifiers, and time windows.
//!
//! This module contains the core data model: code identity and the
//! generators that mint it, the identifier embedding policy, the immutable
//! `Code` and `ScanEvent` records, the `Locatable` capability used by the
//! map renderer, and the `TimeWindow` temporal filter.

pub mod code;
pub mod embedding;
pub mod identifier;
pub mod locatable;
pub mod location;
pub mod scan_event;
pub mod time_window;

pub use code::{Code, CodeRequest, EncodingParams, MAX_VERSION, MIN_VERSION, NewCode};
pub use embedding::EmbeddingPolicy;
pub use identifier::{CodeIdentifier, IdentifierGenerator, RandomIdentifierGenerator};
pub use locatable::{Annotation, Locatable};
pub use location::Coordinates;
pub use scan_event::{NewScanEvent, ScanEvent, ScanReport};
pub use time_window::{TimeWindow, Timestamped};
