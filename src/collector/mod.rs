//! Stats collection orchestration.
//!
//! Coordinates one aggregation cycle across the execution domains:
//! - `domain` - signaling/worker/network task queues
//! - `producers` - per-domain partial report producers
//! - `orchestrator` - caching, single-flight dispatch, merge and delivery

pub mod domain;
pub mod orchestrator;
pub mod producers;

pub use domain::{Domain, DomainSet, ExecutionDomain};
pub use orchestrator::*;
pub use producers::{EmptyProducer, PartialProducer, SessionProducer};
