//! Fuzzy scoring and matching algorithms.
//!
//! This module provides query preparation, the core scorer, the path aware
//! scorer and the matcher recovering matched positions for highlighting, plus
//! [`RankMatcher`] which puts them behind the [`FuzzyMatcher`] trait.

/// Positions of matched chars
pub mod matcher;
/// Path aware score adjustment
pub mod path_scorer;
/// Query preparation and caching
pub mod query;
mod rank;
/// Core scoring algorithm
pub mod scorer;
pub(crate) mod util;

pub use rank::RankMatcher;

use crate::options::ScoringOptions;
use query::PreparedQuery;

/// Char index into a candidate
pub type IndexType = usize;
/// Score of a candidate, 0 for no match
pub type ScoreType = i64;

/// Ascending char indices of the matched chars of a candidate
pub type MatchIndices = Vec<IndexType>;

/// Trait for fuzzy matching text patterns against choices
pub trait FuzzyMatcher: Send + Sync {
    /// fuzzy match choice with pattern, and return the score & matched indices of characters
    fn fuzzy_indices(&self, choice: &str, pattern: &str) -> Option<(ScoreType, MatchIndices)>;

    /// fuzzy match choice with pattern, and return the score of matching
    fn fuzzy_match(&self, choice: &str, pattern: &str) -> Option<ScoreType> {
        self.fuzzy_indices(choice, pattern).map(|(score, _)| score)
    }
}

/// Score already split chars with the path scorer or the core scorer, as configured
pub(crate) fn score_subject(
    subject: &[char],
    subject_lw: &[char],
    query: &PreparedQuery,
    options: &ScoringOptions,
) -> ScoreType {
    if options.use_path_scoring {
        path_scorer::score_chars(subject, subject_lw, query, options)
    } else {
        scorer::score_chars(subject, subject_lw, query, options)
    }
}
