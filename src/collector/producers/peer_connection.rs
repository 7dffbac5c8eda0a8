//! Peer connection summary stats.

use crate::session::DataChannelState;
use crate::stats::{PeerConnectionStats, RtcStats, StatsReport};

/// There is only one peer connection record per report.
pub const PEER_CONNECTION_STATS_ID: &str = "PeerConnection";

/// Count open and not-open data channels.
///
/// Both counts describe the channels that exist right now. A channel removed
/// from the session is no longer counted as closed.
pub fn produce_peer_connection_stats(
    timestamp_us: i64,
    data_channels: &[DataChannelState],
    report: &mut StatsReport,
) {
    let opened = data_channels
        .iter()
        .filter(|state| **state == DataChannelState::Open)
        .count() as u32;

    let mut stats = PeerConnectionStats::new(PEER_CONNECTION_STATS_ID, timestamp_us);
    stats.data_channels_opened = Some(opened);
    stats.data_channels_closed = Some(data_channels.len() as u32 - opened);

    report.add_stats(RtcStats::PeerConnection(stats));
}
