//! Transport-level inputs handed to the collector by the session.
//!
//! These are plain values: the collector never measures anything itself, it
//! only shapes what the transport reports here.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use uuid::Uuid;

/// Transport tag for a host candidate.
pub const LOCAL_PORT_TYPE: &str = "local";
/// Transport tag for a server-reflexive candidate.
pub const STUN_PORT_TYPE: &str = "stun";
/// Transport tag for a peer-reflexive candidate.
pub const PRFLX_PORT_TYPE: &str = "prflx";
/// Transport tag for a relayed candidate.
pub const RELAY_PORT_TYPE: &str = "relay";

/// An ICE candidate as the transport sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub address: SocketAddr,
    pub protocol: String,
    /// One of the `*_PORT_TYPE` tags.
    pub candidate_type: String,
    pub priority: u32,
}

impl Candidate {
    /// Create a candidate with a fresh random id.
    pub fn new(address: SocketAddr, protocol: &str, candidate_type: &str, priority: u32) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string()[..8].to_string(),
            address,
            protocol: protocol.to_string(),
            candidate_type: candidate_type.to_string(),
            priority,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }
}

/// Liveness and throughput counters for one local/remote candidate pairing.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionInfo {
    pub local_candidate: Candidate,
    pub remote_candidate: Candidate,
    pub writable: bool,
    pub sent_total_bytes: u64,
    pub recv_total_bytes: u64,
    /// Smoothed round trip time in milliseconds.
    pub rtt_ms: u64,
    pub sent_ping_requests_total: u64,
    pub recv_ping_responses: u64,
    pub sent_ping_responses: u64,
}

impl ConnectionInfo {
    pub fn new(local_candidate: Candidate, remote_candidate: Candidate) -> Self {
        Self {
            local_candidate,
            remote_candidate,
            writable: false,
            sent_total_bytes: 0,
            recv_total_bytes: 0,
            rtt_ms: 0,
            sent_ping_requests_total: 0,
            recv_ping_responses: 0,
            sent_ping_responses: 0,
        }
    }
}

/// Connections of one transport channel (component).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportChannelStats {
    pub component: i32,
    pub connection_infos: Vec<ConnectionInfo>,
}

/// All channels of one named transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportStats {
    pub transport_name: String,
    pub channel_stats: Vec<TransportChannelStats>,
}

impl TransportStats {
    pub fn new(transport_name: &str) -> Self {
        Self {
            transport_name: transport_name.to_string(),
            channel_stats: Vec::new(),
        }
    }
}

/// Per-transport stats for the whole session, keyed by transport name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub transport_stats: BTreeMap<String, TransportStats>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transport(&mut self, stats: TransportStats) {
        self.transport_stats.insert(stats.transport_name.clone(), stats);
    }
}

/// Data channel state as reported by the channel inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataChannelState {
    Connecting,
    Open,
    Closing,
    Closed,
}
