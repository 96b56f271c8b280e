// Simulated venues spread around a base price.
// Falls back to the fixture snapshot when no usable base price is given.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use super::fixture::{default_venues, VENUE_NAMES};
use super::VenueSource;
use crate::engine::error::RouterResult;
use crate::engine::types::{Venue, VenueSet};

#[derive(Debug, Clone, Default)]
pub struct SimulatedSource {
    pub base_price: Option<f64>,
    pub seed: Option<u64>,
}

impl SimulatedSource {
    pub fn new(base_price: Option<f64>, seed: Option<u64>) -> Self {
        Self { base_price, seed }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn generate(&self, base_price: f64) -> Vec<Venue> {
        let mut rng = self.rng();
        VENUE_NAMES
            .iter()
            .map(|name| {
                // ±5% in 0.1% steps
                let drift = (rng.gen_range(0..100) - 50) as f64 / 1000.0;
                let price = base_price * (1.0 + drift);
                let latency = rng.gen_range(0..100) as f64;
                let volume = rng.gen_range(100..1100);
                Venue::new(name, price, latency, volume)
            })
            .collect()
    }
}

#[async_trait]
impl VenueSource for SimulatedSource {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn snapshot(&self, symbol: &str) -> RouterResult<VenueSet> {
        let venues = match self.base_price {
            Some(base) if base.is_finite() && base > 0.0 => {
                info!(symbol, base, "Simulating venues around base price");
                self.generate(base)
            }
            other => {
                warn!(symbol, base = ?other, "No usable base price, using default venue data");
                default_venues()
            }
        };
        VenueSet::new(venues)
    }
}
