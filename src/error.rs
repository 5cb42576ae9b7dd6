//! Error types shared by the simulation and evaluation pipeline.

use thiserror::Error;

/// Errors surfaced by simulation, sampling, scoring and evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocalizationError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Every evaluated node carries the same label, so AUC is undefined.
    #[error("Degenerate evaluation: {positives} positive and {negatives} negative nodes")]
    DegenerateEvaluation { positives: usize, negatives: usize },

    #[error("Graph has no nodes")]
    EmptyGraph,

    #[error("Score map is missing {missing} graph node(s)")]
    IncompleteScores { missing: usize },
}

impl LocalizationError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, LocalizationError>;

/// Check that `p` is a probability in [0, 1]. NaN is rejected.
pub(crate) fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(LocalizationError::config(format!(
            "{} must be in [0, 1], got {}",
            name, p
        )))
    }
}
