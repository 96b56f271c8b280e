//! Per-venue score evaluation.
//!
//! Bounds are computed once, sequentially, then every venue is scored against
//! them. In [`EvaluationMode::Concurrent`] each venue gets its own scoped
//! thread (fork-join): a task owns exactly one `&mut Venue` and reads the
//! shared bounds, so no locking is involved. All spawned tasks are joined
//! before `score` returns, on the failure path too, and a failed pass leaves
//! every score reset to zero.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use crate::engine::error::{RouterError, RouterResult};
use crate::engine::normaliser::{check_epsilon, NormalizationBounds, EPSILON};
use crate::engine::ranker::Ranker;
use crate::engine::scorer::ScoringWeights;
use crate::engine::types::{Venue, VenueSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    #[default]
    Concurrent,
    Sequential,
}

#[derive(Debug, Clone)]
pub struct Evaluator {
    weights: ScoringWeights,
    epsilon: f64,
    mode: EvaluationMode,
    stack_size: Option<usize>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

impl Evaluator {
    pub fn new(weights: ScoringWeights) -> Self {
        if !weights.is_normalised() {
            warn!(sum = weights.sum(), "Scoring weights do not sum to 1.0");
        }
        Self { weights, epsilon: EPSILON, mode: EvaluationMode::default(), stack_size: None }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> RouterResult<Self> {
        self.epsilon = check_epsilon(epsilon)?;
        Ok(self)
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Stack size for each evaluation thread (concurrent mode only).
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Populate every venue's score. Returns the bounds used for the pass.
    #[instrument(skip_all, fields(venues = venues.len(), mode = ?self.mode))]
    pub fn score(&self, venues: &mut VenueSet) -> RouterResult<NormalizationBounds> {
        let weights = self.weights;
        self.score_with(venues, move |bounds, venue| score_venue(&weights, bounds, venue))
    }

    fn score_with<F>(&self, venues: &mut VenueSet, scorer: F) -> RouterResult<NormalizationBounds>
    where
        F: Fn(&NormalizationBounds, &mut Venue) + Sync,
    {
        venues.reset_scores();
        let bounds = NormalizationBounds::from_venues(venues, self.epsilon);

        let outcome = match self.mode {
            EvaluationMode::Sequential => {
                for venue in venues.iter_mut() {
                    scorer(&bounds, venue);
                }
                Ok(())
            }
            EvaluationMode::Concurrent => self.score_concurrent(venues, &bounds, &scorer),
        };

        if let Err(e) = outcome {
            error!(error = %e, "Evaluation pass failed, discarding scores");
            venues.reset_scores();
            return Err(e);
        }

        for venue in venues.iter() {
            debug!(venue = %venue.identifier, score = venue.score, "Scored venue");
        }
        Ok(bounds)
    }

    /// Score then rank. The set is consumed so a failed pass exposes nothing.
    pub fn evaluate(&self, mut venues: VenueSet, ranker: &dyn Ranker) -> RouterResult<VenueSet> {
        self.score(&mut venues)?;
        Ok(ranker.rank(venues))
    }

    fn score_concurrent<F>(&self, venues: &mut VenueSet, bounds: &NormalizationBounds, scorer: &F) -> RouterResult<()>
    where
        F: Fn(&NormalizationBounds, &mut Venue) + Sync,
    {
        let stack_size = self.stack_size;

        let joined = crossbeam::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(venues.len());
            let mut launch_error = None;

            for venue in venues.iter_mut() {
                let identifier = venue.identifier.clone();
                let mut builder = scope.builder().name(format!("score-{}", identifier));
                if let Some(bytes) = stack_size {
                    builder = builder.stack_size(bytes);
                }
                match builder.spawn(move |_| scorer(bounds, venue)) {
                    Ok(handle) => handles.push((identifier, handle)),
                    Err(source) => {
                        launch_error = Some(RouterError::LaunchFailure { venue: identifier, source });
                        break;
                    }
                }
            }

            // join everything that did start before reporting anything
            let mut panicked = None;
            for (identifier, handle) in handles {
                if handle.join().is_err() && panicked.is_none() {
                    panicked = Some(identifier);
                }
            }

            match (launch_error, panicked) {
                (Some(e), _) => Err(e),
                (None, Some(venue)) => Err(RouterError::TaskPanicked { venue }),
                (None, None) => Ok(()),
            }
        });

        // Every handle was joined above, so the scope itself cannot report a panic.
        joined.unwrap_or_else(|_| Err(RouterError::TaskPanicked { venue: "<unjoined>".to_string() }))
    }
}

fn score_venue(weights: &ScoringWeights, bounds: &NormalizationBounds, venue: &mut Venue) {
    let normalized = bounds.normalise(venue);
    venue.score = weights.score(&normalized);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ranker::RankingStrategy;

    fn sample() -> VenueSet {
        VenueSet::new(vec![
            Venue::new("SGX", 101.5, 5.2, 700),
            Venue::new("HKEX", 100.2, 6.5, 800),
            Venue::new("TSE", 99.9, 8.0, 400),
        ])
        .unwrap()
    }

    #[test]
    fn test_concurrent_matches_sequential() {
        let mut concurrent = sample();
        let mut sequential = sample();
        Evaluator::default().score(&mut concurrent).unwrap();
        Evaluator::default().with_mode(EvaluationMode::Sequential).score(&mut sequential).unwrap();
        assert_eq!(concurrent.scores(), sequential.scores());
    }

    #[test]
    fn test_scores_in_unit_range() {
        let mut set = sample();
        Evaluator::default().score(&mut set).unwrap();
        for v in set.iter() {
            assert!(v.score >= 0.0 && v.score <= 1.0, "{} out of range: {}", v.identifier, v.score);
        }
    }

    #[test]
    fn test_rescoring_overwrites_previous_scores() {
        let mut set = sample();
        let evaluator = Evaluator::default();
        evaluator.score(&mut set).unwrap();
        let first = set.scores();
        evaluator.score(&mut set).unwrap();
        assert_eq!(first, set.scores());
    }

    #[test]
    fn test_evaluate_ranks() {
        let ranked = Evaluator::default().evaluate(sample(), &RankingStrategy::Heap).unwrap();
        let scores = ranked.scores();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_launch_failure_discards_scores() {
        // no address space can hold a 1 EiB stack, so the first spawn fails
        let evaluator = Evaluator::default().with_stack_size(1 << 60);
        let mut set = sample();
        set.iter_mut().for_each(|v| v.score = 0.42);

        let err = evaluator.score(&mut set).unwrap_err();
        assert!(matches!(err, RouterError::LaunchFailure { ref venue, .. } if venue == "SGX"));
        assert_eq!(set.scores(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_panicked_task_discards_scores() {
        let evaluator = Evaluator::default();
        let mut set = sample();
        let err = evaluator
            .score_with(&mut set, |bounds, venue| {
                if venue.identifier == "HKEX" {
                    panic!("scorer blew up");
                }
                score_venue(&evaluator.weights(), bounds, venue);
            })
            .unwrap_err();

        assert!(matches!(err, RouterError::TaskPanicked { ref venue } if venue == "HKEX"));
        assert_eq!(set.scores(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_with_epsilon_rejects_non_positive() {
        assert!(Evaluator::default().with_epsilon(1e-9).is_ok());
        for bad in [0.0, -0.5, f64::NAN] {
            assert!(matches!(Evaluator::default().with_epsilon(bad), Err(RouterError::Config(_))));
        }
    }
}
