use serde::{Deserialize, Serialize};

use crate::engine::error::{Metric, RouterError, RouterResult};

// Venue as delivered by a snapshot source (score is owned by the evaluator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub identifier: String,
    pub price: f64,   // ask
    pub latency: f64, // milliseconds
    pub volume: u64,  // shares available
    #[serde(default)]
    pub score: f64,
}

impl Venue {
    pub fn new(identifier: &str, price: f64, latency: f64, volume: u64) -> Self {
        Self { identifier: identifier.to_string(), price, latency, volume, score: 0.0 }
    }

    fn validate(&self) -> RouterResult<()> {
        let invalid = |metric, value| RouterError::InvalidMetric {
            venue: self.identifier.clone(),
            metric,
            value,
        };
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(invalid(Metric::Price, self.price));
        }
        if !self.latency.is_finite() || self.latency < 0.0 {
            return Err(invalid(Metric::Latency, self.latency));
        }
        Ok(())
    }
}

/// Ordered, fixed-size snapshot of venues for one routing decision.
///
/// The set is validated on construction: it is never empty and every venue
/// carries a positive finite price and a non-negative finite latency. Its
/// length cannot change afterwards, only the order (ranking) and the scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VenueSet {
    venues: Vec<Venue>,
}

impl VenueSet {
    pub fn new(venues: Vec<Venue>) -> RouterResult<Self> {
        if venues.is_empty() {
            return Err(RouterError::EmptyVenueSet);
        }
        for venue in &venues {
            venue.validate()?;
        }
        Ok(Self { venues })
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    /// Always false, kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Venue> {
        self.venues.iter()
    }

    pub fn as_slice(&self) -> &[Venue] {
        &self.venues
    }

    pub fn get(&self, index: usize) -> Option<&Venue> {
        self.venues.get(index)
    }

    pub fn find(&self, identifier: &str) -> Option<&Venue> {
        self.venues.iter().find(|v| v.identifier == identifier)
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.venues.iter().map(|v| v.identifier.as_str()).collect()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.venues.iter().map(|v| v.score).collect()
    }

    pub fn total_volume(&self) -> u64 {
        self.venues.iter().map(|v| v.volume).sum()
    }

    pub fn reset_scores(&mut self) {
        for venue in &mut self.venues {
            venue.score = 0.0;
        }
    }

    pub fn into_vec(self) -> Vec<Venue> {
        self.venues
    }

    // Mutable access stays inside the crate so the length invariant holds.
    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Venue> {
        self.venues.iter_mut()
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Venue] {
        &mut self.venues
    }
}

impl<'a> IntoIterator for &'a VenueSet {
    type Item = &'a Venue;
    type IntoIter = std::slice::Iter<'a, Venue>;

    fn into_iter(self) -> Self::IntoIter {
        self.venues.iter()
    }
}

// One line of the allocation report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub venue: String,
    pub quantity: u64,
    pub score: f64,
}

/// Result of greedily filling a requested quantity across ranked venues.
///
/// `allocated() + remaining_unfilled == requested` always holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationPlan {
    pub requested: u64,
    pub allocations: Vec<Allocation>,
    pub remaining_unfilled: u64,
}

impl AllocationPlan {
    pub fn allocated(&self) -> u64 {
        self.allocations.iter().map(|a| a.quantity).sum()
    }

    pub fn is_fully_filled(&self) -> bool {
        self.remaining_unfilled == 0
    }

    pub fn quantity_for(&self, venue: &str) -> Option<u64> {
        self.allocations.iter().find(|a| a.venue == venue).map(|a| a.quantity)
    }
}
