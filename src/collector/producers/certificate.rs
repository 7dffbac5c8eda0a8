//! Certificate stats.
//!
//! Each local and remote certificate of every transport is walked from leaf
//! to root, producing one linked `CertificateStats` per chain element.

use crate::logging::structured::LogContext;
use crate::session::{SessionInfo, SessionStats, SslCertificate};
use crate::stats::{CertificateStats, RtcStats, StatsReport};

/// Id of the record describing the certificate with `fingerprint`.
pub fn certificate_stats_id(fingerprint: &str) -> String {
    format!("Certificate_{}", fingerprint)
}

/// Produce certificate stats for the local and remote chain of every transport.
pub fn produce_certificate_stats(
    timestamp_us: i64,
    session: &dyn SessionInfo,
    session_stats: &SessionStats,
    report: &mut StatsReport,
    ctx: &LogContext,
) {
    for transport in session_stats.transport_stats.values() {
        let name = &transport.transport_name;

        if let Some(local) = session.local_certificate(name) {
            produce_certificate_stats_from_chain(timestamp_us, &local, report);
        } else {
            log::debug!("{} CERTIFICATE_ABSENT transport={} side=local", ctx, name);
        }

        if let Some(remote) = session.remote_certificate(name) {
            produce_certificate_stats_from_chain(timestamp_us, &remote, report);
        } else {
            log::debug!("{} CERTIFICATE_ABSENT transport={} side=remote", ctx, name);
        }
    }
}

/// Produce one record per certificate in `certificate`'s chain.
///
/// Record `i` links to record `i + 1` through `issuer_certificate_id`; the
/// root has no link. Ids are derived from fingerprints, so a certificate
/// already present in the report (e.g. shared between transports) is kept as
/// is.
pub fn produce_certificate_stats_from_chain(
    timestamp_us: i64,
    certificate: &SslCertificate,
    report: &mut StatsReport,
) {
    let mut chain: Vec<CertificateStats> = Vec::with_capacity(certificate.chain_len());

    for cert in certificate.chain() {
        let fingerprint = cert.fingerprint();
        let mut stats = CertificateStats::new(certificate_stats_id(&fingerprint), timestamp_us);
        stats.fingerprint_algorithm = Some(cert.fingerprint_algorithm().to_string());
        stats.base64_certificate = Some(cert.base64_certificate());
        stats.fingerprint = Some(fingerprint);

        if let Some(prev) = chain.last_mut() {
            prev.issuer_certificate_id = Some(stats.id.clone());
        }
        chain.push(stats);
    }

    for stats in chain {
        if !report.contains(&stats.id) {
            report.add_stats(RtcStats::Certificate(stats));
        }
    }
}
