//! Telemetry relay between the wearable and companion peers
//!
//! The wearable side generates synthetic vital-sign samples on a fixed
//! period and dispatches them over a [`Channel`](crate::channel::Channel),
//! choosing immediate or deferred delivery from the reachability signal.
//! The companion side decodes inbound payloads leniently and keeps only
//! the latest sample.

mod payload;
mod receiver;
mod sample;
mod sender;

pub use payload::{HealthPayload, PayloadError, HEALTH_PAYLOAD_TYPE};
pub use receiver::Receiver;
pub use sample::{HealthSample, SampleGenerator};
pub use sender::{Sender, DEFAULT_SAMPLE_PERIOD};
