//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use peerstats_core::clock::FakeClock;
use peerstats_core::collector::StatsCollector;
use peerstats_core::session::{
    Candidate, ConnectionInfo, DataChannelState, SessionInfo, SessionStats, SslCertificate,
    TransportChannelStats, TransportStats,
};
use peerstats_core::stats::StatsReport;

pub const REPORT_TIMEOUT: Duration = Duration::from_secs(1);

/// Session whose answers are set by the test.
#[derive(Debug, Default)]
pub struct FakeSession {
    pub transport_stats: Mutex<Option<SessionStats>>,
    pub local_certificates: Mutex<HashMap<String, SslCertificate>>,
    pub remote_certificates: Mutex<HashMap<String, SslCertificate>>,
    pub data_channels: Mutex<Vec<DataChannelState>>,
}

impl FakeSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_transports(&self, transports: Vec<TransportStats>) {
        let mut stats = SessionStats::new();
        for transport in transports {
            stats.add_transport(transport);
        }
        *self.transport_stats.lock() = Some(stats);
    }
}

impl SessionInfo for FakeSession {
    fn transport_stats(&self) -> Option<SessionStats> {
        self.transport_stats.lock().clone()
    }

    fn local_certificate(&self, transport_name: &str) -> Option<SslCertificate> {
        self.local_certificates.lock().get(transport_name).cloned()
    }

    fn remote_certificate(&self, transport_name: &str) -> Option<SslCertificate> {
        self.remote_certificates.lock().get(transport_name).cloned()
    }

    fn data_channel_states(&self) -> Vec<DataChannelState> {
        self.data_channels.lock().clone()
    }
}

pub fn fake_certificate(ders: &[&str]) -> SslCertificate {
    SslCertificate::from_der_chain(ders.iter().map(|d| d.as_bytes().to_vec()).collect())
        .expect("non-empty chain")
}

pub fn fake_candidate(
    id: &str,
    hostname: &str,
    port: u16,
    protocol: &str,
    candidate_type: &str,
    priority: u32,
) -> Candidate {
    let address: SocketAddr = format!("{}:{}", hostname, port).parse().expect("valid address");
    Candidate::new(address, protocol, candidate_type, priority).with_id(id)
}

pub fn transport_with_connections(name: &str, infos: Vec<ConnectionInfo>) -> TransportStats {
    let mut transport = TransportStats::new(name);
    transport.channel_stats.push(TransportChannelStats {
        component: 1,
        connection_infos: infos,
    });
    transport
}

pub fn collector_with_fake_clock(
    session: Arc<FakeSession>,
) -> (Arc<StatsCollector>, Arc<FakeClock>) {
    let clock = Arc::new(FakeClock::new());
    let collector = StatsCollector::builder(session)
        .clock(clock.clone())
        .build()
        .expect("domains start");
    (collector, clock)
}

/// Request a report and wait for it.
pub fn get_stats_report(collector: &Arc<StatsCollector>) -> Arc<StatsReport> {
    collector
        .request_report()
        .recv_timeout(REPORT_TIMEOUT)
        .expect("report delivered")
}
