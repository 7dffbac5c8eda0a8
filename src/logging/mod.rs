//! Structured logging with cycle context.
//!
//! Every collector log line is prefixed with the cycle id (and domain, where
//! relevant) so one aggregation can be followed across threads.

pub mod structured;

pub use structured::*;
