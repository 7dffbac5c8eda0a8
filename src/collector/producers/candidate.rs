//! ICE candidate and candidate pair stats.
//!
//! Every connection of every channel of every transport yields one pair
//! record linking to a local and a remote candidate record. Candidates shared
//! by several pairs are produced once.

use crate::logging::structured::LogContext;
use crate::session::{
    Candidate, ConnectionInfo, SessionStats, LOCAL_PORT_TYPE, PRFLX_PORT_TYPE, RELAY_PORT_TYPE,
    STUN_PORT_TYPE,
};
use crate::stats::{
    IceCandidatePairStats, IceCandidateStats, IceCandidateType, RtcStats, StatsReport,
};

/// Map a transport candidate tag to its stats type.
///
/// # Panics
/// On a tag the transport is not allowed to produce.
pub fn candidate_type_to_stats_type(candidate_type: &str) -> IceCandidateType {
    match candidate_type {
        LOCAL_PORT_TYPE => IceCandidateType::Host,
        STUN_PORT_TYPE => IceCandidateType::Srflx,
        PRFLX_PORT_TYPE => IceCandidateType::Prflx,
        RELAY_PORT_TYPE => IceCandidateType::Relay,
        other => unreachable!("unknown candidate type: {}", other),
    }
}

pub fn candidate_stats_id(candidate: &Candidate) -> String {
    format!("Candidate_{}", candidate.id)
}

pub fn candidate_pair_stats_id(info: &ConnectionInfo) -> String {
    format!(
        "CandidatePair_{}_{}",
        info.local_candidate.id, info.remote_candidate.id
    )
}

pub fn produce_ice_candidate_and_pair_stats(
    timestamp_us: i64,
    session_stats: &SessionStats,
    report: &mut StatsReport,
    ctx: &LogContext,
) {
    for transport in session_stats.transport_stats.values() {
        for channel in &transport.channel_stats {
            for info in &channel.connection_infos {
                let id = candidate_pair_stats_id(info);
                if report.contains(&id) {
                    log::warn!(
                        "{} CANDIDATE_PAIR_DUPLICATE id={} transport={} component={}",
                        ctx,
                        id,
                        transport.transport_name,
                        channel.component
                    );
                    continue;
                }

                let pair = produce_ice_candidate_pair_stats(timestamp_us, id, info, report);
                report.add_stats(RtcStats::IceCandidatePair(pair));
            }
        }
    }
}

fn produce_ice_candidate_pair_stats(
    timestamp_us: i64,
    id: String,
    info: &ConnectionInfo,
    report: &mut StatsReport,
) -> IceCandidatePairStats {
    let mut pair = IceCandidatePairStats::new(id, timestamp_us);

    pair.local_candidate_id = Some(produce_ice_candidate_stats(
        timestamp_us,
        &info.local_candidate,
        true,
        report,
    ));
    pair.remote_candidate_id = Some(produce_ice_candidate_stats(
        timestamp_us,
        &info.remote_candidate,
        false,
        report,
    ));

    // Not exposed by the transport yet: transport_id, state, priority,
    // nominated, readable, total_rtt, available bitrates, requests_received,
    // retransmission and consent counters.
    pair.writable = Some(info.writable);
    pair.bytes_sent = Some(info.sent_total_bytes);
    pair.bytes_received = Some(info.recv_total_bytes);
    // Smoothed, in seconds.
    pair.current_rtt = Some(info.rtt_ms as f64 / 1000.0);
    pair.requests_sent = Some(info.sent_ping_requests_total);
    pair.responses_received = Some(info.recv_ping_responses);
    pair.responses_sent = Some(info.sent_ping_responses);

    pair
}

/// Produce the record for `candidate` unless the report already has it.
/// Returns the record id either way.
fn produce_ice_candidate_stats(
    timestamp_us: i64,
    candidate: &Candidate,
    is_local: bool,
    report: &mut StatsReport,
) -> String {
    let id = candidate_stats_id(candidate);

    if let Some(existing) = report.get(&id) {
        debug_assert_eq!(
            existing.stats_type(),
            if is_local {
                IceCandidateStats::LOCAL_TYPE
            } else {
                IceCandidateStats::REMOTE_TYPE
            },
            "candidate {} reused on the other side of a pair",
            id
        );
        return id;
    }

    let mut stats = IceCandidateStats::new(id.clone(), timestamp_us);
    stats.ip = Some(candidate.address.ip().to_string());
    stats.port = Some(i32::from(candidate.address.port()));
    stats.protocol = Some(candidate.protocol.clone());
    stats.candidate_type = Some(candidate_type_to_stats_type(&candidate.candidate_type));
    stats.priority = Some(candidate.priority as i32);

    report.add_stats(if is_local {
        RtcStats::LocalIceCandidate(stats)
    } else {
        RtcStats::RemoteIceCandidate(stats)
    });
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{TransportChannelStats, TransportStats};

    fn candidate(id: &str, addr: &str, candidate_type: &str, priority: u32) -> Candidate {
        Candidate::new(addr.parse().unwrap(), "udp", candidate_type, priority).with_id(id)
    }

    fn session_with(infos: Vec<ConnectionInfo>) -> SessionStats {
        let mut transport = TransportStats::new("transport");
        transport.channel_stats.push(TransportChannelStats {
            component: 1,
            connection_infos: infos,
        });
        let mut stats = SessionStats::new();
        stats.add_transport(transport);
        stats
    }

    #[test]
    fn test_candidate_type_mapping() {
        assert_eq!(candidate_type_to_stats_type("local"), IceCandidateType::Host);
        assert_eq!(candidate_type_to_stats_type("stun"), IceCandidateType::Srflx);
        assert_eq!(candidate_type_to_stats_type("prflx"), IceCandidateType::Prflx);
        assert_eq!(candidate_type_to_stats_type("relay"), IceCandidateType::Relay);
    }

    #[test]
    #[should_panic(expected = "unknown candidate type")]
    fn test_unknown_candidate_type_is_fatal() {
        candidate_type_to_stats_type("turn-tcp");
    }

    #[test]
    fn test_pair_members() {
        let mut info = ConnectionInfo::new(
            candidate("local", "1.2.3.4:5", "local", 42),
            candidate("remote", "6.7.8.9:10", "relay", 7),
        );
        info.writable = true;
        info.sent_total_bytes = 42;
        info.recv_total_bytes = 1234;
        info.rtt_ms = 1337;
        info.sent_ping_requests_total = 3;
        info.recv_ping_responses = 2;
        info.sent_ping_responses = 1;

        let mut report = StatsReport::new();
        produce_ice_candidate_and_pair_stats(
            5,
            &session_with(vec![info]),
            &mut report,
            &LogContext::new("t"),
        );

        let pair = report
            .get("CandidatePair_local_remote")
            .and_then(|s| s.cast_to::<IceCandidatePairStats>())
            .unwrap();
        assert_eq!(pair.local_candidate_id.as_deref(), Some("Candidate_local"));
        assert_eq!(pair.remote_candidate_id.as_deref(), Some("Candidate_remote"));
        assert_eq!(pair.writable, Some(true));
        assert_eq!(pair.bytes_sent, Some(42));
        assert_eq!(pair.bytes_received, Some(1234));
        assert_eq!(pair.current_rtt, Some(1.337));
        assert_eq!(pair.requests_sent, Some(3));
        assert_eq!(pair.responses_received, Some(2));
        assert_eq!(pair.responses_sent, Some(1));
        assert!(pair.transport_id.is_none());
        assert!(pair.state.is_none());
        assert!(pair.priority.is_none());
        assert!(pair.nominated.is_none());
        assert!(pair.readable.is_none());
        assert!(pair.total_rtt.is_none());
        assert!(pair.requests_received.is_none());

        let local = report.get("Candidate_local").unwrap();
        assert_eq!(local.stats_type(), "local-candidate");
        let local = local.cast_to::<IceCandidateStats>().unwrap();
        assert_eq!(local.ip.as_deref(), Some("1.2.3.4"));
        assert_eq!(local.port, Some(5));
        assert_eq!(local.protocol.as_deref(), Some("udp"));
        assert_eq!(local.candidate_type, Some(IceCandidateType::Host));
        assert_eq!(local.priority, Some(42));
        assert!(local.url.is_none());

        let remote = report.get("Candidate_remote").unwrap();
        assert_eq!(remote.stats_type(), "remote-candidate");
        assert_eq!(
            remote.cast_to::<IceCandidateStats>().unwrap().candidate_type,
            Some(IceCandidateType::Relay)
        );
    }

    #[test]
    fn test_shared_candidate_is_deduplicated() {
        let shared = candidate("shared", "10.0.0.1:1000", "local", 1);
        let a = ConnectionInfo::new(shared.clone(), candidate("a", "10.0.0.2:2000", "stun", 2));
        let b = ConnectionInfo::new(shared, candidate("b", "10.0.0.3:3000", "prflx", 3));

        let mut report = StatsReport::new();
        produce_ice_candidate_and_pair_stats(
            0,
            &session_with(vec![a, b]),
            &mut report,
            &LogContext::new("t"),
        );

        assert_eq!(report.get_stats_of_type::<IceCandidatePairStats>().len(), 2);
        assert_eq!(report.get_stats_of_type::<IceCandidateStats>().len(), 3);
        for pair in report.get_stats_of_type::<IceCandidatePairStats>() {
            assert_eq!(pair.local_candidate_id.as_deref(), Some("Candidate_shared"));
        }
    }

    #[test]
    fn test_duplicate_pair_is_skipped() {
        let info = ConnectionInfo::new(
            candidate("l", "10.0.0.1:1", "local", 1),
            candidate("r", "10.0.0.2:2", "stun", 1),
        );

        let mut report = StatsReport::new();
        produce_ice_candidate_and_pair_stats(
            0,
            &session_with(vec![info.clone(), info]),
            &mut report,
            &LogContext::new("t"),
        );

        assert_eq!(report.len(), 3);
    }
}
