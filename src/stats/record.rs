//! Typed stats records.
//!
//! Every record carries an id (unique within its report), a timestamp in
//! microseconds since the UNIX epoch, a type tag, and an ordered list of
//! optional members. Undefined members are `None`, never a zero or empty
//! placeholder.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::member::StatsMember;

/// Candidate type as reported in stats, mapped from the transport's own tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IceCandidateType {
    Host,
    Srflx,
    Prflx,
    Relay,
}

impl IceCandidateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IceCandidateType::Host => "host",
            IceCandidateType::Srflx => "srflx",
            IceCandidateType::Prflx => "prflx",
            IceCandidateType::Relay => "relay",
        }
    }
}

/// One certificate in a (possibly single-element) issuer chain.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateStats {
    pub id: String,
    pub timestamp_us: i64,
    pub fingerprint: Option<String>,
    pub fingerprint_algorithm: Option<String>,
    pub base64_certificate: Option<String>,
    pub issuer_certificate_id: Option<String>,
}

impl CertificateStats {
    pub const TYPE: &'static str = "certificate";

    pub fn new(id: impl Into<String>, timestamp_us: i64) -> Self {
        Self {
            id: id.into(),
            timestamp_us,
            fingerprint: None,
            fingerprint_algorithm: None,
            base64_certificate: None,
            issuer_certificate_id: None,
        }
    }

    fn members(&self) -> Vec<StatsMember> {
        vec![
            StatsMember::new("fingerprint", &self.fingerprint),
            StatsMember::new("fingerprintAlgorithm", &self.fingerprint_algorithm),
            StatsMember::new("base64Certificate", &self.base64_certificate),
            StatsMember::new("issuerCertificateId", &self.issuer_certificate_id),
        ]
    }
}

/// An ICE candidate. Whether it is local or remote is decided by the
/// [`RtcStats`] variant it is wrapped in.
#[derive(Debug, Clone, PartialEq)]
pub struct IceCandidateStats {
    pub id: String,
    pub timestamp_us: i64,
    pub ip: Option<String>,
    pub port: Option<i32>,
    pub protocol: Option<String>,
    pub candidate_type: Option<IceCandidateType>,
    pub priority: Option<i32>,
    pub url: Option<String>,
}

impl IceCandidateStats {
    pub const LOCAL_TYPE: &'static str = "local-candidate";
    pub const REMOTE_TYPE: &'static str = "remote-candidate";

    pub fn new(id: impl Into<String>, timestamp_us: i64) -> Self {
        Self {
            id: id.into(),
            timestamp_us,
            ip: None,
            port: None,
            protocol: None,
            candidate_type: None,
            priority: None,
            url: None,
        }
    }

    fn members(&self) -> Vec<StatsMember> {
        let candidate_type = self.candidate_type.map(|t| t.as_str().to_string());
        vec![
            StatsMember::new("ip", &self.ip),
            StatsMember::new("port", &self.port),
            StatsMember::new("protocol", &self.protocol),
            StatsMember::new("candidateType", &candidate_type),
            StatsMember::new("priority", &self.priority),
            StatsMember::new("url", &self.url),
        ]
    }
}

/// A local/remote candidate pairing with its liveness and throughput counters.
///
/// Only a subset of members is populated today; the rest stay undefined until
/// the transport exposes the underlying values.
#[derive(Debug, Clone, PartialEq)]
pub struct IceCandidatePairStats {
    pub id: String,
    pub timestamp_us: i64,
    pub transport_id: Option<String>,
    pub local_candidate_id: Option<String>,
    pub remote_candidate_id: Option<String>,
    pub state: Option<String>,
    pub priority: Option<u64>,
    pub nominated: Option<bool>,
    pub writable: Option<bool>,
    pub readable: Option<bool>,
    pub bytes_sent: Option<u64>,
    pub bytes_received: Option<u64>,
    pub total_rtt: Option<f64>,
    pub current_rtt: Option<f64>,
    pub available_outgoing_bitrate: Option<f64>,
    pub available_incoming_bitrate: Option<f64>,
    pub requests_received: Option<u64>,
    pub requests_sent: Option<u64>,
    pub responses_received: Option<u64>,
    pub responses_sent: Option<u64>,
    pub retransmissions_received: Option<u64>,
    pub retransmissions_sent: Option<u64>,
    pub consent_requests_received: Option<u64>,
    pub consent_requests_sent: Option<u64>,
    pub consent_responses_received: Option<u64>,
    pub consent_responses_sent: Option<u64>,
}

impl IceCandidatePairStats {
    pub const TYPE: &'static str = "candidate-pair";

    pub fn new(id: impl Into<String>, timestamp_us: i64) -> Self {
        Self {
            id: id.into(),
            timestamp_us,
            transport_id: None,
            local_candidate_id: None,
            remote_candidate_id: None,
            state: None,
            priority: None,
            nominated: None,
            writable: None,
            readable: None,
            bytes_sent: None,
            bytes_received: None,
            total_rtt: None,
            current_rtt: None,
            available_outgoing_bitrate: None,
            available_incoming_bitrate: None,
            requests_received: None,
            requests_sent: None,
            responses_received: None,
            responses_sent: None,
            retransmissions_received: None,
            retransmissions_sent: None,
            consent_requests_received: None,
            consent_requests_sent: None,
            consent_responses_received: None,
            consent_responses_sent: None,
        }
    }

    fn members(&self) -> Vec<StatsMember> {
        vec![
            StatsMember::new("transportId", &self.transport_id),
            StatsMember::new("localCandidateId", &self.local_candidate_id),
            StatsMember::new("remoteCandidateId", &self.remote_candidate_id),
            StatsMember::new("state", &self.state),
            StatsMember::new("priority", &self.priority),
            StatsMember::new("nominated", &self.nominated),
            StatsMember::new("writable", &self.writable),
            StatsMember::new("readable", &self.readable),
            StatsMember::new("bytesSent", &self.bytes_sent),
            StatsMember::new("bytesReceived", &self.bytes_received),
            StatsMember::new("totalRtt", &self.total_rtt),
            StatsMember::new("currentRtt", &self.current_rtt),
            StatsMember::new("availableOutgoingBitrate", &self.available_outgoing_bitrate),
            StatsMember::new("availableIncomingBitrate", &self.available_incoming_bitrate),
            StatsMember::new("requestsReceived", &self.requests_received),
            StatsMember::new("requestsSent", &self.requests_sent),
            StatsMember::new("responsesReceived", &self.responses_received),
            StatsMember::new("responsesSent", &self.responses_sent),
            StatsMember::new("retransmissionsReceived", &self.retransmissions_received),
            StatsMember::new("retransmissionsSent", &self.retransmissions_sent),
            StatsMember::new("consentRequestsReceived", &self.consent_requests_received),
            StatsMember::new("consentRequestsSent", &self.consent_requests_sent),
            StatsMember::new("consentResponsesReceived", &self.consent_responses_received),
            StatsMember::new("consentResponsesSent", &self.consent_responses_sent),
        ]
    }
}

/// Session-wide summary. There is only ever one per report.
///
/// The data channel counts describe the channels that exist right now, not
/// lifetime totals: a channel that was removed from the session is counted
/// nowhere.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerConnectionStats {
    pub id: String,
    pub timestamp_us: i64,
    pub data_channels_opened: Option<u32>,
    pub data_channels_closed: Option<u32>,
}

impl PeerConnectionStats {
    pub const TYPE: &'static str = "peer-connection";

    pub fn new(id: impl Into<String>, timestamp_us: i64) -> Self {
        Self {
            id: id.into(),
            timestamp_us,
            data_channels_opened: None,
            data_channels_closed: None,
        }
    }

    fn members(&self) -> Vec<StatsMember> {
        vec![
            StatsMember::new("dataChannelsOpened", &self.data_channels_opened),
            StatsMember::new("dataChannelsClosed", &self.data_channels_closed),
        ]
    }
}

/// A record stored in a [`StatsReport`](super::report::StatsReport).
#[derive(Debug, Clone, PartialEq)]
pub enum RtcStats {
    Certificate(CertificateStats),
    LocalIceCandidate(IceCandidateStats),
    RemoteIceCandidate(IceCandidateStats),
    IceCandidatePair(IceCandidatePairStats),
    PeerConnection(PeerConnectionStats),
}

impl RtcStats {
    pub fn id(&self) -> &str {
        match self {
            RtcStats::Certificate(s) => &s.id,
            RtcStats::LocalIceCandidate(s) | RtcStats::RemoteIceCandidate(s) => &s.id,
            RtcStats::IceCandidatePair(s) => &s.id,
            RtcStats::PeerConnection(s) => &s.id,
        }
    }

    pub fn timestamp_us(&self) -> i64 {
        match self {
            RtcStats::Certificate(s) => s.timestamp_us,
            RtcStats::LocalIceCandidate(s) | RtcStats::RemoteIceCandidate(s) => s.timestamp_us,
            RtcStats::IceCandidatePair(s) => s.timestamp_us,
            RtcStats::PeerConnection(s) => s.timestamp_us,
        }
    }

    /// The type tag, e.g. `"candidate-pair"`.
    pub fn stats_type(&self) -> &'static str {
        match self {
            RtcStats::Certificate(_) => CertificateStats::TYPE,
            RtcStats::LocalIceCandidate(_) => IceCandidateStats::LOCAL_TYPE,
            RtcStats::RemoteIceCandidate(_) => IceCandidateStats::REMOTE_TYPE,
            RtcStats::IceCandidatePair(_) => IceCandidatePairStats::TYPE,
            RtcStats::PeerConnection(_) => PeerConnectionStats::TYPE,
        }
    }

    /// Members in declaration order, defined or not.
    pub fn members(&self) -> Vec<StatsMember> {
        match self {
            RtcStats::Certificate(s) => s.members(),
            RtcStats::LocalIceCandidate(s) | RtcStats::RemoteIceCandidate(s) => s.members(),
            RtcStats::IceCandidatePair(s) => s.members(),
            RtcStats::PeerConnection(s) => s.members(),
        }
    }

    /// Downcast to a concrete record type.
    pub fn cast_to<T: StatsType>(&self) -> Option<&T> {
        T::from_stats(self)
    }
}

impl Serialize for RtcStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let defined: Vec<StatsMember> = self
            .members()
            .into_iter()
            .filter(StatsMember::is_defined)
            .collect();
        let mut map = serializer.serialize_map(Some(defined.len() + 3))?;
        map.serialize_entry("id", self.id())?;
        map.serialize_entry("timestamp", &self.timestamp_us())?;
        map.serialize_entry("type", self.stats_type())?;
        for member in &defined {
            map.serialize_entry(member.name, &member.value)?;
        }
        map.end()
    }
}

/// Concrete record types that can be filtered out of a report.
pub trait StatsType: Sized {
    fn from_stats(stats: &RtcStats) -> Option<&Self>;
}

impl StatsType for CertificateStats {
    fn from_stats(stats: &RtcStats) -> Option<&Self> {
        match stats {
            RtcStats::Certificate(s) => Some(s),
            _ => None,
        }
    }
}

/// Matches both local and remote candidates.
impl StatsType for IceCandidateStats {
    fn from_stats(stats: &RtcStats) -> Option<&Self> {
        match stats {
            RtcStats::LocalIceCandidate(s) | RtcStats::RemoteIceCandidate(s) => Some(s),
            _ => None,
        }
    }
}

impl StatsType for IceCandidatePairStats {
    fn from_stats(stats: &RtcStats) -> Option<&Self> {
        match stats {
            RtcStats::IceCandidatePair(s) => Some(s),
            _ => None,
        }
    }
}

impl StatsType for PeerConnectionStats {
    fn from_stats(stats: &RtcStats) -> Option<&Self> {
        match stats {
            RtcStats::PeerConnection(s) => Some(s),
            _ => None,
        }
    }
}
