use async_trait::async_trait;
use tracing::debug;

use super::VenueSource;
use crate::engine::error::RouterResult;
use crate::engine::types::{Venue, VenueSet};

pub const VENUE_NAMES: [&str; 3] = ["SGX", "HKEX", "TSE"];

/// Static reference snapshot, also the fallback when no base price is known.
pub fn default_venues() -> Vec<Venue> {
    vec![
        Venue::new("SGX", 101.5, 5.2, 700),
        Venue::new("HKEX", 100.2, 6.5, 800),
        Venue::new("TSE", 99.9, 8.0, 400),
    ]
}

#[derive(Debug, Clone, Default)]
pub struct FixtureSource;

#[async_trait]
impl VenueSource for FixtureSource {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn snapshot(&self, symbol: &str) -> RouterResult<VenueSet> {
        debug!(symbol, "Serving fixture snapshot");
        VenueSet::new(default_venues())
    }
}
