// Router orchestrates evaluator + ranker + allocator for one decision
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::RouterConfig;
use crate::engine::allocator::allocate;
use crate::engine::error::{RouterError, RouterResult};
use crate::engine::evaluator::Evaluator;
use crate::engine::ranker::{Ranker, RankingStrategy};
use crate::engine::types::{AllocationPlan, VenueSet};

#[derive(Debug, Clone, Serialize)]
pub struct RouteDecision {
    pub strategy: RankingStrategy,
    pub ranked: VenueSet,
    pub plan: AllocationPlan,
    #[serde(skip)]
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct SmartOrderRouter {
    evaluator: Evaluator,
    strategy: RankingStrategy,
}

impl SmartOrderRouter {
    pub fn new(evaluator: Evaluator, strategy: RankingStrategy) -> Self {
        Self { evaluator, strategy }
    }

    pub fn from_config(config: &RouterConfig) -> RouterResult<Self> {
        config.validate()?;
        let evaluator = Evaluator::new(config.weights)
            .with_epsilon(config.epsilon)?
            .with_mode(config.evaluation);
        Ok(Self::new(evaluator, config.strategy))
    }

    pub fn strategy(&self) -> RankingStrategy {
        self.strategy
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Scoring entry point: scores populated, snapshot order kept.
    pub fn score(&self, mut venues: VenueSet) -> RouterResult<VenueSet> {
        self.evaluator.score(&mut venues)?;
        Ok(venues)
    }

    /// Ranking entry point over an already scored set.
    pub fn rank(&self, scored: VenueSet) -> VenueSet {
        self.strategy.rank(scored)
    }

    /// Allocation entry point over an already ranked set.
    pub fn allocate(&self, ranked: &VenueSet, requested: i64) -> RouterResult<AllocationPlan> {
        allocate(ranked, requested)
    }

    /// Full pass: evaluate, rank, allocate.
    #[instrument(skip(self, venues), fields(venues = venues.len(), strategy = self.strategy.name()))]
    pub fn route(&self, venues: VenueSet, requested: i64) -> RouterResult<RouteDecision> {
        let start = Instant::now();
        // reject a bad quantity before spending a fan-out on it
        if requested <= 0 {
            let e = RouterError::InvalidQuantity { quantity: requested };
            record_failure(&e);
            return Err(e);
        }

        let ranked = self
            .evaluator
            .evaluate(venues, &self.strategy)
            .inspect_err(record_failure)?;
        metrics::histogram!("sorx_evaluation_seconds").record(start.elapsed().as_secs_f64());

        let plan = allocate(&ranked, requested).inspect_err(record_failure)?;
        let elapsed = start.elapsed();

        metrics::counter!("sorx_routes_total").increment(1);
        metrics::gauge!("sorx_unfilled_shares").set(plan.remaining_unfilled as f64);
        info!(
            ranking = ?ranked.identifiers(),
            allocated = plan.allocated(),
            unfilled = plan.remaining_unfilled,
            elapsed_us = elapsed.as_micros() as u64,
            "Routing decision complete"
        );

        Ok(RouteDecision { strategy: self.strategy, ranked, plan, elapsed })
    }
}

fn record_failure(e: &RouterError) {
    warn!(stage = %e.stage(), error = %e, "Routing stage failed");
    metrics::counter!("sorx_route_failures_total", "stage" => e.stage().as_str()).increment(1);
}
