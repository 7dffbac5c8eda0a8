//! Partial report producers.
//!
//! A [`PartialProducer`] fills one domain's partial report for a cycle. The
//! signaling domain owns the session data and runs [`SessionProducer`]; the
//! worker and network domains currently contribute nothing.

pub mod candidate;
pub mod certificate;
pub mod peer_connection;

use std::sync::Arc;

use crate::logging::structured::LogContext;
use crate::session::SessionInfo;
use crate::stats::StatsReport;

pub use candidate::*;
pub use certificate::*;
pub use peer_connection::*;

/// Produces one domain's contribution to a report.
///
/// Called on the domain's own thread. Ids must not overlap with any other
/// domain's contribution.
pub trait PartialProducer: Send + Sync {
    fn produce(&self, timestamp_us: i64, report: &mut StatsReport, ctx: &LogContext);
}

/// Certificates, candidates, candidate pairs and the peer connection summary.
pub struct SessionProducer {
    session: Arc<dyn SessionInfo>,
}

impl SessionProducer {
    pub fn new(session: Arc<dyn SessionInfo>) -> Self {
        Self { session }
    }
}

impl PartialProducer for SessionProducer {
    fn produce(&self, timestamp_us: i64, report: &mut StatsReport, ctx: &LogContext) {
        match self.session.transport_stats() {
            Some(session_stats) => {
                produce_certificate_stats(
                    timestamp_us,
                    self.session.as_ref(),
                    &session_stats,
                    report,
                    ctx,
                );
                produce_ice_candidate_and_pair_stats(timestamp_us, &session_stats, report, ctx);
            }
            None => log::debug!("{} TRANSPORT_STATS_ABSENT", ctx),
        }

        produce_peer_connection_stats(timestamp_us, &self.session.data_channel_states(), report);
    }
}

/// Contributes an empty partial.
#[derive(Debug, Default)]
pub struct EmptyProducer;

impl PartialProducer for EmptyProducer {
    fn produce(&self, _timestamp_us: i64, _report: &mut StatsReport, _ctx: &LogContext) {}
}
