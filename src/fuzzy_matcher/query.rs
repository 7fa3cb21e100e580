//! Query preparation.
//!
//! A [`PreparedQuery`] holds everything the scorers derive from the query
//! string alone, so that it is computed once and shared by every candidate.

use std::sync::Arc;

use super::path_scorer::{count_dir, get_extension};
use super::util::{fold_char, truncated_upper_char};
use crate::options::ScoringOptions;

/// Set of the chars occurring in a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharSet {
    ascii: u128,
    other: Vec<char>,
}

impl CharSet {
    /// Build the set of the chars in `chars`
    pub fn new(chars: &[char]) -> Self {
        let mut set = Self::default();
        for &c in chars {
            if c.is_ascii() {
                set.ascii |= 1u128 << (c as u32);
            } else if let Err(idx) = set.other.binary_search(&c) {
                set.other.insert(idx, c);
            }
        }
        set
    }

    /// Is `c` in the set?
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        if c.is_ascii() {
            self.ascii & (1u128 << (c as u32)) != 0
        } else {
            self.other.binary_search(&c).is_ok()
        }
    }
}

/// Derived data of a query, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuery {
    pub(crate) text: String,
    pub(crate) query: Vec<char>,
    pub(crate) query_lw: Vec<char>,
    pub(crate) core: Vec<char>,
    pub(crate) core_lw: Vec<char>,
    pub(crate) core_up: Vec<char>,
    pub(crate) depth: usize,
    pub(crate) ext: Vec<char>,
    pub(crate) char_set: CharSet,
}

impl PreparedQuery {
    /// Prepare `query` for scoring
    ///
    /// Returns `None` for an empty query, nothing can be scored against it.
    pub fn new(query: &str, options: &ScoringOptions) -> Option<Self> {
        if query.is_empty() {
            return None;
        }

        let chars: Vec<char> = query.chars().collect();
        let query_lw: Vec<char> = chars.iter().map(|&c| fold_char(c)).collect();
        let core: Vec<char> = options.optional_characters.replace_all(query, "").chars().collect();
        let core_lw = core.iter().map(|&c| fold_char(c)).collect();
        let core_up = core.iter().map(|&c| truncated_upper_char(c)).collect();
        let depth = count_dir(&chars, chars.len(), options.path_separator);
        let ext = get_extension(&query_lw).to_vec();
        let char_set = CharSet::new(&query_lw);

        debug!(
            "prepared query {:?}: core {:?}, depth {}, extension {:?}",
            query,
            core.iter().collect::<String>(),
            depth,
            ext.iter().collect::<String>()
        );

        Some(Self {
            text: query.to_string(),
            query: chars,
            query_lw,
            core,
            core_lw,
            core_up,
            depth,
            ext,
            char_set,
        })
    }

    /// The query as given
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of chars in the query
    pub fn len(&self) -> usize {
        self.query.len()
    }

    /// Always false, empty queries are never prepared
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// The query with its optional chars removed
    pub fn core(&self) -> String {
        self.core.iter().collect()
    }

    /// Number of path separator boundaries inside the query
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Folded text after the last `.` of the query
    pub fn extension(&self) -> String {
        self.ext.iter().collect()
    }

    /// The set of folded chars of the query
    pub fn char_set(&self) -> &CharSet {
        &self.char_set
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    query: String,
    path_separator: char,
    optional_characters: String,
}

impl CacheKey {
    fn new(query: &str, options: &ScoringOptions) -> Self {
        Self {
            query: query.to_string(),
            path_separator: options.path_separator,
            optional_characters: options.optional_characters.as_str().to_string(),
        }
    }

    fn matches(&self, query: &str, options: &ScoringOptions) -> bool {
        self.query == query
            && self.path_separator == options.path_separator
            && self.optional_characters == options.optional_characters.as_str()
    }
}

/// Caller-owned cache holding the last prepared query
///
/// Preparing a query is cheap but not free, and callers typically score many
/// candidates against the same query before it changes.
#[derive(Debug, Default)]
pub struct QueryCache {
    last: Option<(CacheKey, Arc<PreparedQuery>)>,
}

impl QueryCache {
    /// An empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepared form of `query`, prepared again only if the query or the
    /// options it depends on changed since the last call
    pub fn get(&mut self, query: &str, options: &ScoringOptions) -> Option<Arc<PreparedQuery>> {
        if let Some((key, prepared)) = &self.last
            && key.matches(query, options)
        {
            return Some(prepared.clone());
        }

        let prepared = Arc::new(PreparedQuery::new(query, options)?);
        self.last = Some((CacheKey::new(query, options), prepared.clone()));
        Some(prepared)
    }

    /// Forget the cached query
    pub fn clear(&mut self) {
        self.last = None;
    }
}
