//! fzrank is a structural fuzzy scorer for Rust.
//!
//! It ranks candidate strings, typically file paths or command labels,
//! against a short query. Matches on word starts, camelCase humps, acronyms,
//! consecutive runs and basenames are rewarded, and the matched chars can be
//! recovered for highlighting. fzrank can be used as a library or through
//! the `fzr` command-line tool.
//!
//! # Examples
//!
//! ```
//! use fzrank::prelude::*;
//!
//! let options = FilterOptionsBuilder::default().build().unwrap();
//! let results = fzrank::filter(["Gruntfile", "filter", "bile"], "file", &options);
//! assert_eq!(results, ["Gruntfile", "filter"]);
//!
//! let scoring = ScoringOptions::default();
//! assert_eq!(fzrank::match_indices("Hello World", "wor", &scoring), [6, 7, 8]);
//!
//! let wrap_options = WrapOptionsBuilder::default().tag_open("<b>").tag_close("</b>").build().unwrap();
//! assert_eq!(fzrank::wrap("Hello World", "wor", &wrap_options), "Hello <b>Wor</b>ld");
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod error;
pub mod filter;
pub mod fuzzy_matcher;
pub mod highlight;
pub mod options;
pub mod prelude;

pub use crate::error::Error;
pub use crate::filter::{Filter, FilterControl, FilterItem, Scored, filter, filter_scored, filter_with_cache};
pub use crate::fuzzy_matcher::query::{PreparedQuery, QueryCache};
pub use crate::fuzzy_matcher::{FuzzyMatcher, MatchIndices, RankMatcher, ScoreType};
pub use crate::options::{FilterOptions, ScoringOptions, WrapOptions};

use crate::fuzzy_matcher::matcher::match_positions;
use crate::fuzzy_matcher::{path_scorer, scorer};

/// Prepare `query` once to score many candidates with it
///
/// Returns `None` for an empty query.
pub fn prepare_query(query: &str, options: &ScoringOptions) -> Option<PreparedQuery> {
    PreparedQuery::new(query, options)
}

/// Score `candidate` against `query`, 0 when it does not match
pub fn score(candidate: &str, query: &str, options: &ScoringOptions) -> ScoreType {
    if candidate.is_empty() {
        return 0;
    }
    match PreparedQuery::new(query, options) {
        Some(prepared) => score_prepared(candidate, &prepared, options),
        None => 0,
    }
}

/// Score `candidate` against an already prepared query
pub fn score_prepared(candidate: &str, query: &PreparedQuery, options: &ScoringOptions) -> ScoreType {
    if options.use_path_scoring {
        path_scorer::score(candidate, query, options)
    } else {
        scorer::score(candidate, query, options)
    }
}

/// Ascending char indices of the chars of `candidate` matched by `query`
pub fn match_indices(candidate: &str, query: &str, options: &ScoringOptions) -> MatchIndices {
    if candidate.is_empty() || query.is_empty() {
        return Vec::new();
    }
    if candidate == query {
        return (0..candidate.chars().count()).collect();
    }
    match PreparedQuery::new(query, options) {
        Some(prepared) => match_positions(candidate, &prepared, options),
        None => Vec::new(),
    }
}

/// `candidate` with the chars matched by `query` wrapped in tags
pub fn wrap(candidate: &str, query: &str, options: &WrapOptions) -> String {
    if candidate.is_empty() {
        return String::new();
    }
    match PreparedQuery::new(query, &options.scoring) {
        Some(prepared) => highlight::wrap_prepared(candidate, &prepared, options),
        None => candidate.to_string(),
    }
}
