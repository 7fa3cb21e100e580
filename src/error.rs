use thiserror::Error;

use crate::options::ScoringOptionsBuilderError;

/// Errors raised while configuring fzrank
///
/// Scoring and matching themselves never fail.
#[derive(Error, Debug)]
pub enum Error {
    /// The optional characters pattern is not a valid regex
    #[error("Invalid optional characters pattern {pattern:?}: {source}")]
    InvalidOptionalPattern {
        /// Pattern as given
        pattern: String,
        /// Why it was rejected
        source: regex::Error,
    },
    /// The scoring options failed validation
    #[error("Invalid scoring options: {0}")]
    Options(#[from] ScoringOptionsBuilderError),
}
