use serde::{Deserialize, Serialize};

use crate::engine::error::{RouterError, RouterResult};
use crate::engine::normaliser::NormalizedMetrics;

pub const W_PRICE: f64 = 0.5;
pub const W_LATENCY: f64 = 0.3;
pub const W_VOLUME: f64 = 0.2;

/// Weights of the composite venue score.
///
/// Intended to sum to 1.0 so scores stay in [0, 1]; this is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub price: f64,
    pub latency: f64,
    pub volume: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self { price: W_PRICE, latency: W_LATENCY, volume: W_VOLUME }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.price + self.latency + self.volume
    }

    pub fn is_normalised(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-9
    }

    /// Weights may be any finite value; NaN or infinity would poison every score.
    pub fn validate(&self) -> RouterResult<()> {
        for (name, w) in [("price", self.price), ("latency", self.latency), ("volume", self.volume)] {
            if !w.is_finite() {
                return Err(RouterError::Config(format!("weight `{}` must be finite, got {}", name, w)));
            }
        }
        Ok(())
    }

    pub fn score(&self, m: &NormalizedMetrics) -> f64 {
        self.price * m.price + self.latency * m.latency + self.volume * m.volume
    }
}
