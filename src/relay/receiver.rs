//! relay/receiver.rs
//!
//! Companion-side peer: a receive loop over the channel endpoint that
//! lenient-decodes each inbound payload and replaces the held latest
//! sample wholesale. Superseded samples are discarded; there is no
//! history and no merge.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::{debug, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::channel::{Channel, ChannelError};

use super::payload::HealthPayload;
use super::sample::HealthSample;

/// Companion-side peer. Holds `None` until the first valid payload
/// arrives ("no data yet").
pub struct Receiver {
    inner: Arc<ReceiverInner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct ReceiverInner {
    channel: Arc<dyn Channel>,
    latest: watch::Sender<Option<HealthSample>>,
}

impl ReceiverInner {
    /// Apply one inbound payload. Anything that is not a well-formed
    /// `"health"` message is dropped without partial processing.
    fn ingest(&self, bytes: &[u8]) {
        match HealthPayload::decode(bytes) {
            Ok(payload) => {
                let sample = payload.into_sample(Utc::now());
                self.latest.send_replace(Some(sample));
            }
            Err(e) => {
                debug!("[Receiver] discarding payload: {}", e);
            }
        }
    }
}

impl Receiver {
    pub fn new(channel: Arc<dyn Channel>) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            inner: Arc::new(ReceiverInner { channel, latest }),
            task: Mutex::new(None),
        }
    }

    /// Activate the underlying channel. An unsupported transport is
    /// skipped without retry.
    pub async fn activate(&self) {
        match self.inner.channel.activate().await {
            Ok(()) => {}
            Err(ChannelError::Unsupported) => {
                debug!("[Receiver] transport unsupported, activation skipped")
            }
            Err(e) => warn!("[Receiver] activation failed: {}", e),
        }
    }

    /// Spawn the receive loop. A no-op while already listening.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap_or_else(|p| p.into_inner());
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        let inner = Arc::clone(&self.inner);
        *task = Some(tokio::spawn(async move {
            loop {
                match inner.channel.recv().await {
                    Ok(bytes) => inner.ingest(&bytes),
                    Err(e) => {
                        debug!("[Receiver] receive loop ended: {}", e);
                        break;
                    }
                }
            }
        }));
    }

    /// Stop the receive loop.
    pub fn stop(&self) {
        let mut task = self.task.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }

    /// The latest decoded sample, if any has arrived.
    pub fn latest(&self) -> Option<HealthSample> {
        self.inner.latest.borrow().clone()
    }

    /// Watch the latest sample, e.g. from a presentation layer.
    pub fn subscribe(&self) -> watch::Receiver<Option<HealthSample>> {
        self.inner.latest.subscribe()
    }
}
