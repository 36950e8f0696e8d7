//! In-process channel simulator
//!
//! Provides a simulated two-endpoint link where a wearable peer and a
//! companion peer exchange payloads entirely in-process. Used for unit
//! and integration testing without a real platform connectivity service.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use super::{Channel, ChannelError};

const INBOX_CAPACITY: usize = 64;

/// One direction of the link: a delivery pipe into the opposite
/// endpoint's inbox plus the store-and-forward queue feeding it.
struct Lane {
    to_peer: mpsc::Sender<Vec<u8>>,
    deferred: Mutex<VecDeque<Vec<u8>>>,
}

/// The shared medium between the two endpoints.
///
/// Reachability is a single link-wide flag; tests and the demo binary
/// toggle it through either endpoint. Restoring reachability flushes the
/// deferred queues of both directions in FIFO order — flushing is a
/// property of the link, not of the peers.
pub struct SimLink {
    reachable: AtomicBool,
    lanes: [Lane; 2],
}

impl SimLink {
    /// Create a simulated link and its two endpoints.
    pub fn pair() -> (SimChannel, SimChannel) {
        let (tx_ab, rx_ab) = mpsc::channel(INBOX_CAPACITY);
        let (tx_ba, rx_ba) = mpsc::channel(INBOX_CAPACITY);

        let link = Arc::new(SimLink {
            reachable: AtomicBool::new(true),
            lanes: [
                Lane {
                    to_peer: tx_ab,
                    deferred: Mutex::new(VecDeque::new()),
                },
                Lane {
                    to_peer: tx_ba,
                    deferred: Mutex::new(VecDeque::new()),
                },
            ],
        });

        let end_a = SimChannel {
            link: Arc::clone(&link),
            side: 0,
            address: Uuid::new_v4(),
            inbox: Mutex::new(rx_ba),
            active: AtomicBool::new(false),
            supported: true,
        };
        let end_b = SimChannel {
            link,
            side: 1,
            address: Uuid::new_v4(),
            inbox: Mutex::new(rx_ab),
            active: AtomicBool::new(false),
            supported: true,
        };
        (end_a, end_b)
    }

    fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    /// Drain one direction's deferred queue into the peer's inbox.
    async fn flush(&self, side: usize) {
        let lane = &self.lanes[side];
        let mut queue = lane.deferred.lock().await;
        while let Some(payload) = queue.pop_front() {
            if lane.to_peer.send(payload).await.is_err() {
                // Peer inbox gone; remaining queued payloads are undeliverable.
                queue.clear();
                break;
            }
        }
    }
}

/// One endpoint of a [`SimLink`].
pub struct SimChannel {
    link: Arc<SimLink>,
    /// Which lane this endpoint transmits on.
    side: usize,
    address: Uuid,
    inbox: Mutex<mpsc::Receiver<Vec<u8>>>,
    active: AtomicBool,
    supported: bool,
}

impl SimChannel {
    /// This endpoint's simulated address.
    pub fn address(&self) -> Uuid {
        self.address
    }

    /// Mark this endpoint as lacking transport support, so `activate()`
    /// fails the way an unsupported platform session would.
    pub fn set_supported(&mut self, supported: bool) {
        self.supported = supported;
    }

    /// Change link reachability. Restoring reachability flushes both
    /// directions' deferred queues.
    pub async fn set_reachable(&self, reachable: bool) {
        self.link.reachable.store(reachable, Ordering::SeqCst);
        if reachable {
            self.link.flush(0).await;
            self.link.flush(1).await;
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn outbound(&self) -> &Lane {
        &self.link.lanes[self.side]
    }
}

#[async_trait]
impl Channel for SimChannel {
    async fn activate(&self) -> Result<(), ChannelError> {
        if !self.supported {
            return Err(ChannelError::Unsupported);
        }
        // swap keeps registration exactly-once under repeated calls
        if !self.active.swap(true, Ordering::SeqCst) {
            debug!("[SimChannel {}] activated", self.address);
        }
        Ok(())
    }

    fn is_reachable(&self) -> bool {
        self.link.is_reachable()
    }

    async fn send_immediate(&self, payload: Vec<u8>) -> Result<(), ChannelError> {
        if !self.is_active() {
            return Err(ChannelError::NotActivated);
        }
        if !self.link.is_reachable() {
            // Best-effort contract: an immediate payload with no reachable
            // peer is dropped, not queued.
            debug!("[SimChannel {}] peer unreachable, payload dropped", self.address);
            return Ok(());
        }
        if self.outbound().to_peer.send(payload).await.is_err() {
            debug!("[SimChannel {}] peer inbox closed, payload dropped", self.address);
        }
        Ok(())
    }

    async fn send_deferred(&self, payload: Vec<u8>) -> Result<(), ChannelError> {
        if !self.is_active() {
            return Err(ChannelError::NotActivated);
        }
        {
            let mut queue = self.outbound().deferred.lock().await;
            queue.push_back(payload);
        }
        if self.link.is_reachable() {
            self.link.flush(self.side).await;
        }
        Ok(())
    }

    async fn recv(&self) -> Result<Vec<u8>, ChannelError> {
        if !self.is_active() {
            return Err(ChannelError::NotActivated);
        }
        let mut inbox = self.inbox.lock().await;
        match inbox.recv().await {
            Some(payload) => Ok(payload),
            None => Err(ChannelError::Disconnected),
        }
    }
}
