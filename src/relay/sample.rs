//! relay/sample.rs
//!
//! Defines the HealthSample value type and the SampleGenerator that
//! fabricates one synthetic reading per tick on the wearable side.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One vital-sign reading. Immutable once created.
///
/// On the generating side every field is populated; the optional vitals
/// exist so a partial inbound payload decodes to "absent" instead of
/// failing the whole message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    /// Beats per minute.
    pub heart_rate: u32,
    /// Step count since the previous tick.
    pub steps: u32,
    /// Blood-oxygen percentage.
    pub spo2: Option<u32>,
    /// Systolic blood pressure, mmHg.
    pub systolic: Option<u32>,
    /// Diastolic blood pressure, mmHg.
    pub diastolic: Option<u32>,
    /// When the sample was generated.
    pub timestamp: DateTime<Utc>,
}

/// Fabricates vital-sign readings, each field drawn uniformly from a
/// fixed physiological range.
pub struct SampleGenerator {
    rng: StdRng,
}

impl SampleGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Produce one reading. Pure apart from consuming randomness.
    pub fn generate(&mut self) -> HealthSample {
        HealthSample {
            heart_rate: self.rng.gen_range(60..=140),
            steps: self.rng.gen_range(0..=50),
            spo2: Some(self.rng.gen_range(95..=100)),
            systolic: Some(self.rng.gen_range(100..=135)),
            diastolic: Some(self.rng.gen_range(60..=85)),
            timestamp: Utc::now(),
        }
    }
}

impl Default for SampleGenerator {
    fn default() -> Self {
        Self::new()
    }
}
