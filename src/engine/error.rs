use std::fmt;

use thiserror::Error;

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validation,
    Evaluation,
    Allocation,
    Acquisition,
    Configuration,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validation => "validation",
            Stage::Evaluation => "evaluation",
            Stage::Allocation => "allocation",
            Stage::Acquisition => "acquisition",
            Stage::Configuration => "configuration",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Price,
    Latency,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Price => write!(f, "price"),
            Metric::Latency => write!(f, "latency"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("venue set is empty")]
    EmptyVenueSet,

    #[error("requested quantity must be positive, got {quantity}")]
    InvalidQuantity { quantity: i64 },

    #[error("invalid {metric} for venue {venue}: {value}")]
    InvalidMetric { venue: String, metric: Metric, value: f64 },

    #[error("failed to launch evaluation task for venue {venue}: {source}")]
    LaunchFailure {
        venue: String,
        #[source]
        source: std::io::Error,
    },

    #[error("evaluation task for venue {venue} panicked before joining")]
    TaskPanicked { venue: String },

    #[error("snapshot source error: {0}")]
    Source(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl RouterError {
    pub fn stage(&self) -> Stage {
        match self {
            RouterError::EmptyVenueSet | RouterError::InvalidMetric { .. } => Stage::Validation,
            RouterError::InvalidQuantity { .. } => Stage::Allocation,
            RouterError::LaunchFailure { .. } | RouterError::TaskPanicked { .. } => Stage::Evaluation,
            RouterError::Source(_) => Stage::Acquisition,
            RouterError::Config(_) => Stage::Configuration,
        }
    }

    /// Caller errors: never worth retrying with the same input.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            RouterError::EmptyVenueSet | RouterError::InvalidQuantity { .. } | RouterError::InvalidMetric { .. }
        )
    }
}

impl From<config::ConfigError> for RouterError {
    fn from(e: config::ConfigError) -> Self {
        RouterError::Config(e.to_string())
    }
}

pub type RouterResult<T> = Result<T, RouterError>;
