// Rescale raw venue metrics (price, latency, volume) into [0, 1].
// Bounds are derived once per pass and shared read-only by every scorer.

use crate::engine::error::{RouterError, RouterResult};
use crate::engine::types::{Venue, VenueSet};

/// Added to every denominator so identical metrics do not divide by zero.
pub const EPSILON: f64 = 1e-6;

/// Anything but a finite positive epsilon lets a flat metric divide 0 by 0.
pub fn check_epsilon(epsilon: f64) -> RouterResult<f64> {
    if epsilon.is_finite() && epsilon > 0.0 {
        Ok(epsilon)
    } else {
        Err(RouterError::Config(format!("epsilon must be finite and > 0, got {}", epsilon)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    fn of(value: f64) -> Self {
        Self { min: value, max: value }
    }

    fn widen(&mut self, value: f64) {
        if value < self.min { self.min = value; }
        if value > self.max { self.max = value; }
    }

    // Position of `value` inside the range, 0 at min and just under 1 at max.
    fn position(&self, value: f64, epsilon: f64) -> f64 {
        (value - self.min) / (self.max - self.min + epsilon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedMetrics {
    pub price: f64,
    pub latency: f64,
    pub volume: f64,
}

/// Per-metric min/max across one `VenueSet`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationBounds {
    pub price: MetricRange,
    pub latency: MetricRange,
    pub volume: MetricRange,
    pub epsilon: f64,
}

impl NormalizationBounds {
    /// Single linear pass over the set.
    pub fn from_venues(venues: &VenueSet, epsilon: f64) -> Self {
        let slice = venues.as_slice();
        let first = &slice[0];
        let mut bounds = Self {
            price: MetricRange::of(first.price),
            latency: MetricRange::of(first.latency),
            volume: MetricRange::of(first.volume as f64),
            epsilon,
        };
        for venue in &slice[1..] {
            bounds.price.widen(venue.price);
            bounds.latency.widen(venue.latency);
            bounds.volume.widen(venue.volume as f64);
        }
        bounds
    }

    /// Lower price and latency are better, so both are inverted.
    /// Higher volume is better and is kept as is.
    pub fn normalise(&self, venue: &Venue) -> NormalizedMetrics {
        NormalizedMetrics {
            price: 1.0 - self.price.position(venue.price, self.epsilon),
            latency: 1.0 - self.latency.position(venue.latency, self.epsilon),
            volume: self.volume.position(venue.volume as f64, self.epsilon),
        }
    }
}
