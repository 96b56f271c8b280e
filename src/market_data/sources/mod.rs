// Shared trait for venue snapshot sources

use async_trait::async_trait;

use crate::engine::error::RouterResult;
use crate::engine::types::VenueSet;

/// Anything that can produce one static venue snapshot per routing decision.
#[async_trait]
pub trait VenueSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn snapshot(&self, symbol: &str) -> RouterResult<VenueSet>;
}

pub mod fixture;
pub mod simulated;
pub mod file;

pub use file::FileSource;
pub use fixture::FixtureSource;
pub use simulated::SimulatedSource;
