//! Transport abstraction for the telemetry relay
//!
//! Defines the abstract channel interface that both the simulated
//! in-process link and future real transports conform to. The channel is
//! treated as externally synchronized: session establishment, peer
//! discovery, and reachability negotiation all happen behind this seam.

pub mod simulated;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Transport is not supported on this peer")]
    Unsupported,

    #[error("Channel has not been activated")]
    NotActivated,

    #[error("Peer endpoint has gone away")]
    Disconnected,

    #[error("Send error: {0}")]
    SendError(String),
}

/// One endpoint of a bidirectional peer-to-peer channel.
///
/// Both peers hold their own endpoint. Reachability is a point-in-time
/// signal sampled at dispatch time, not subscribed to; it may change
/// asynchronously underneath the caller.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Activate this endpoint. Idempotent: calling it again once active
    /// is a no-op, and inbound-handler registration happens exactly once.
    async fn activate(&self) -> Result<(), ChannelError>;

    /// Whether the opposite peer can currently receive immediate messages.
    fn is_reachable(&self) -> bool;

    /// Best-effort real-time delivery. No delivery or ordering guarantee;
    /// a payload that cannot be delivered right now is dropped.
    async fn send_immediate(&self, payload: Vec<u8>) -> Result<(), ChannelError>;

    /// Store-and-forward delivery. Queued payloads arrive once the peer
    /// becomes reachable again, FIFO relative to other deferred payloads
    /// but unordered relative to immediate sends in between.
    async fn send_deferred(&self, payload: Vec<u8>) -> Result<(), ChannelError>;

    /// Receive the next inbound payload. Immediate and deferred payloads
    /// are indistinguishable on this side.
    async fn recv(&self) -> Result<Vec<u8>, ChannelError>;
}
