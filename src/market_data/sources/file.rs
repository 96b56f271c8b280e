// Venue snapshot read from disk: a JSON array or CSV with a header row
// (identifier,price,latency,volume).

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::VenueSource;
use crate::engine::error::{RouterError, RouterResult};
use crate::engine::types::{Venue, VenueSet};

#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_csv(&self) -> bool {
        self.path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }
}

pub fn parse_json(raw: &str) -> RouterResult<Vec<Venue>> {
    serde_json::from_str(raw).map_err(|e| RouterError::Source(format!("invalid JSON snapshot: {}", e)))
}

pub fn parse_csv(raw: &str) -> RouterResult<Vec<Venue>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(raw.as_bytes());
    reader
        .deserialize::<Venue>()
        .map(|row| row.map_err(|e| RouterError::Source(format!("invalid CSV snapshot: {}", e))))
        .collect()
}

#[async_trait]
impl VenueSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn snapshot(&self, symbol: &str) -> RouterResult<VenueSet> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| RouterError::Source(format!("{}: {}", self.path.display(), e)))?;
        let venues = if self.is_csv() { parse_csv(&raw)? } else { parse_json(&raw)? };
        debug!(symbol, path = %self.path.display(), venues = venues.len(), "Loaded snapshot file");
        VenueSet::new(venues)
    }
}
