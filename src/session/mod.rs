//! Session collaborator interface.
//!
//! The collector reads everything it reports through [`SessionInfo`]:
//! transport stats, local/remote certificates per transport, and the current
//! data channel states. Absence of data is `None`/empty, never an error.

pub mod certificate;
pub mod transport;

pub use certificate::*;
pub use transport::*;

/// Read-only view of a live session, queried from the signaling domain.
pub trait SessionInfo: Send + Sync {
    /// Stats for every transport, or `None` if the session has none to offer.
    fn transport_stats(&self) -> Option<SessionStats>;

    /// The local certificate used by `transport_name`, if any.
    fn local_certificate(&self, transport_name: &str) -> Option<SslCertificate>;

    /// The certificate presented by the remote peer on `transport_name`, if any.
    fn remote_certificate(&self, transport_name: &str) -> Option<SslCertificate>;

    /// States of the data channels that currently exist.
    fn data_channel_states(&self) -> Vec<DataChannelState>;
}
