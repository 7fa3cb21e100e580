//! Convenience re-exports of commonly used types.
//!
//! This module provides a convenient way to import all the commonly used
//! fzrank types and traits with a single `use fzrank::prelude::*;` statement.

pub use crate::Error;
pub use crate::filter::{Filter, FilterControl, FilterItem, Scored};
pub use crate::fuzzy_matcher::query::{PreparedQuery, QueryCache};
pub use crate::fuzzy_matcher::{FuzzyMatcher, MatchIndices, RankMatcher, ScoreType};
pub use crate::options::{
    FilterOptions, FilterOptionsBuilder, ScoringOptions, ScoringOptionsBuilder, WrapOptions, WrapOptionsBuilder,
};
pub use std::borrow::Cow;
pub use std::sync::Arc;
