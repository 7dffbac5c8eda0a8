//! PeerStats Core - concurrent stats aggregation for live peer connections
//!
//! This crate collects stats about a live session from several execution
//! domains, merges the partial results into one report, caches it for a short
//! lifetime, and hands the same report to every concurrent requester. The
//! implementation prioritizes:
//!
//! 1. **Consistency** - One cycle in flight, one report instance per cycle
//! 2. **Logging** - Every cycle logged with its cycle id and domain
//! 3. **Fidelity** - Undefined stats stay undefined, never defaulted
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `collector` - Cycle orchestrator, execution domains, producers
//! - `stats` - Typed records and the report container
//! - `session` - Interface to the session/transport collaborator
//! - `clock` - Monotonic and wall clock sources
//! - `config` - Collector configuration
//! - `error` - Error types
//! - `logging` - Structured logging with cycle context

pub mod clock;
pub mod collector;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod stats;

pub use collector::{Domain, PartialProducer, StatsCollector, StatsCollectorBuilder};
pub use config::CollectorConfig;
pub use stats::{RtcStats, StatsReport};

/// Initialize the process-wide logger.
///
/// Safe to call more than once; only the first call installs the logger.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
