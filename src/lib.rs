// Vitalink - wearable-to-companion vital sign relay

pub mod channel;
pub mod relay;
pub mod tracker;

pub use channel::{Channel, ChannelError};
pub use relay::{HealthSample, Receiver, SampleGenerator, Sender};
