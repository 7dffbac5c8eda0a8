//! Stats data model.
//!
//! Typed records with optional members, and the report that holds them:
//! - `record` - record variants and the `RtcStats` sum type
//! - `member` - named member view used for reflection/serialization
//! - `report` - keyed container with merge and typed filtering

pub mod member;
pub mod record;
pub mod report;

pub use member::*;
pub use record::*;
pub use report::*;
