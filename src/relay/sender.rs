//! relay/sender.rs
//!
//! Wearable-side peer: owns the sample generator and a channel endpoint,
//! and runs the Idle/Running dispatch schedule. One spawned task per
//! running sender; the tick loop is the only writer of the latest-sample
//! watch channel.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::channel::{Channel, ChannelError};

use super::payload::HealthPayload;
use super::sample::{HealthSample, SampleGenerator};

/// Fixed tick period of the sample schedule.
pub const DEFAULT_SAMPLE_PERIOD: Duration = Duration::from_secs(5);

/// Wearable-side peer. Generates one sample per tick while running and
/// dispatches each through the channel, immediate when the peer is
/// reachable and deferred otherwise.
pub struct Sender {
    inner: Arc<SenderInner>,
    period: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

struct SenderInner {
    channel: Arc<dyn Channel>,
    generator: Mutex<SampleGenerator>,
    latest: watch::Sender<Option<HealthSample>>,
}

impl SenderInner {
    /// Generate a sample and publish it as the latest before dispatch;
    /// dispatch outcome never affects local state.
    fn next_sample(&self) -> HealthSample {
        let sample = {
            let mut generator = self.generator.lock().unwrap_or_else(|p| p.into_inner());
            generator.generate()
        };
        self.latest.send_replace(Some(sample.clone()));
        sample
    }

    async fn dispatch(&self, sample: &HealthSample) {
        let bytes = match HealthPayload::from_sample(sample).encode() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("[Sender] failed to encode sample: {}", e);
                return;
            }
        };
        let result = if self.channel.is_reachable() {
            self.channel.send_immediate(bytes).await
        } else {
            self.channel.send_deferred(bytes).await
        };
        // Fire-and-forget: delivery failure is not surfaced or retried.
        if let Err(e) = result {
            debug!("[Sender] send failed: {}", e);
        }
    }
}

impl Sender {
    pub fn new(channel: Arc<dyn Channel>) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            inner: Arc::new(SenderInner {
                channel,
                generator: Mutex::new(SampleGenerator::new()),
                latest,
            }),
            period: DEFAULT_SAMPLE_PERIOD,
            timer: Mutex::new(None),
        }
    }

    /// Override the tick period (demo and tests).
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Replace the generator, e.g. with a seeded one.
    pub fn with_generator(self, generator: SampleGenerator) -> Self {
        {
            let mut guard = self
                .inner
                .generator
                .lock()
                .unwrap_or_else(|p| p.into_inner());
            *guard = generator;
        }
        self
    }

    /// Activate the underlying channel. An unsupported transport is
    /// skipped without retry.
    pub async fn activate(&self) {
        match self.inner.channel.activate().await {
            Ok(()) => {}
            Err(ChannelError::Unsupported) => {
                debug!("[Sender] transport unsupported, activation skipped")
            }
            Err(e) => warn!("[Sender] activation failed: {}", e),
        }
    }

    /// Idle → Running. Dispatches one sample immediately, then one per
    /// period. A no-op while already running.
    pub fn start(&self) {
        let mut timer = self.timer.lock().unwrap_or_else(|p| p.into_inner());
        if timer.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        let inner = Arc::clone(&self.inner);
        let period = self.period;
        *timer = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                // First tick completes immediately.
                ticker.tick().await;
                let sample = inner.next_sample();
                inner.dispatch(&sample).await;
            }
        }));
    }

    /// Running → Idle. Cancels the tick task; an in-flight payload
    /// already handed to the channel is not recalled. A no-op while idle.
    pub fn stop(&self) {
        let mut timer = self.timer.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        let timer = self.timer.lock().unwrap_or_else(|p| p.into_inner());
        timer.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Re-dispatch the last generated sample without generating a new
    /// one. Has no effect before the first sample exists.
    pub async fn send_current_sample(&self) {
        let current = self.inner.latest.borrow().clone();
        if let Some(sample) = current {
            self.inner.dispatch(&sample).await;
        }
    }

    /// The last generated sample, if any.
    pub fn latest(&self) -> Option<HealthSample> {
        self.inner.latest.borrow().clone()
    }

    /// Watch the latest sample, e.g. from a presentation layer.
    pub fn subscribe(&self) -> watch::Receiver<Option<HealthSample>> {
        self.inner.latest.subscribe()
    }
}
