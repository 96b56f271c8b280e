//! Runtime configuration.
//!
//! Layers, lowest priority first: built-in defaults, an optional config file
//! (TOML / JSON / YAML by extension), then `SORX_*` environment variables with
//! `__` as the nesting separator, e.g. `SORX_WEIGHTS__PRICE=0.6`.

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::engine::error::RouterResult;
use crate::engine::evaluator::EvaluationMode;
use crate::engine::normaliser::{check_epsilon, EPSILON};
use crate::engine::ranker::RankingStrategy;
use crate::engine::scorer::{ScoringWeights, W_LATENCY, W_PRICE, W_VOLUME};

pub const ENV_PREFIX: &str = "SORX";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    pub weights: ScoringWeights,
    pub epsilon: f64,
    pub strategy: RankingStrategy,
    pub evaluation: EvaluationMode,
    pub log_filter: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            epsilon: EPSILON,
            strategy: RankingStrategy::default(),
            evaluation: EvaluationMode::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl RouterConfig {
    pub fn load(path: Option<&Path>) -> RouterResult<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> RouterResult<Self> {
        let mut builder = Config::builder()
            .set_default("weights.price", W_PRICE)?
            .set_default("weights.latency", W_LATENCY)?
            .set_default("weights.volume", W_VOLUME)?
            .set_default("epsilon", EPSILON)?
            .set_default("strategy", "partition")?
            .set_default("evaluation", "concurrent")?
            .set_default("log_filter", "info")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Numeric settings that would turn scores into NaN are refused up front.
    pub fn validate(&self) -> RouterResult<()> {
        check_epsilon(self.epsilon)?;
        self.weights.validate()
    }
}
