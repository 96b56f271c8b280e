pub mod types;
pub mod error;
pub mod normaliser;   // metric rescaling into [0, 1]
pub mod scorer;       // weighted composite score
pub mod evaluator;    // fork-join per-venue scoring
pub mod ranker;       // partition / heap ranking strategies
pub mod allocator;    // greedy fill across ranked venues
pub mod router;       // pipeline facade

pub use error::{RouterError, RouterResult, Stage};
pub use evaluator::{EvaluationMode, Evaluator};
pub use ranker::{Ranker, RankingStrategy};
pub use router::{RouteDecision, SmartOrderRouter};
pub use scorer::ScoringWeights;
pub use types::{Allocation, AllocationPlan, Venue, VenueSet};
