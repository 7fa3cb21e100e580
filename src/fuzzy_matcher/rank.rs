//! [`FuzzyMatcher`] implementation on top of the structural scorer.
//!
//! # Example:
//! ```
//! use fzrank::fuzzy_matcher::{FuzzyMatcher, RankMatcher};
//!
//! let matcher = RankMatcher::default();
//!
//! assert_eq!(None, matcher.fuzzy_match("abc", "abx"));
//! assert!(matcher.fuzzy_match("axbycz", "abc").is_some());
//!
//! let (_score, indices) = matcher.fuzzy_indices("axbycz", "abc").unwrap();
//! assert_eq!(indices, [0, 2, 4]);
//! ```

use std::cell::RefCell;
use std::sync::Arc;

use thread_local::ThreadLocal;

use super::matcher::match_chars;
use super::query::{PreparedQuery, QueryCache};
use super::util::fill_subject;
use super::{FuzzyMatcher, MatchIndices, ScoreType, score_subject};
use crate::options::ScoringOptions;

/// Matcher scoring with the path aware structural scorer
///
/// Each thread keeps its own query cache and char buffers, so one matcher can
/// be shared by a thread pool scoring the same query.
#[derive(Default)]
pub struct RankMatcher {
    options: ScoringOptions,
    query_cache: ThreadLocal<RefCell<QueryCache>>,
    char_buf: ThreadLocal<RefCell<(Vec<char>, Vec<char>)>>,
}

impl RankMatcher {
    /// Creates a matcher scoring with `options`
    pub fn new(options: ScoringOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Options used for scoring
    pub fn options(&self) -> &ScoringOptions {
        &self.options
    }

    fn prepared(&self, pattern: &str) -> Option<Arc<PreparedQuery>> {
        self.query_cache
            .get_or(|| RefCell::new(QueryCache::new()))
            .borrow_mut()
            .get(pattern, &self.options)
    }
}

impl FuzzyMatcher for RankMatcher {
    fn fuzzy_indices(&self, choice: &str, pattern: &str) -> Option<(ScoreType, MatchIndices)> {
        let query = self.prepared(pattern)?;

        let mut buf = self.char_buf.get_or(|| RefCell::new((Vec::new(), Vec::new()))).borrow_mut();
        let (subject, subject_lw) = &mut *buf;
        fill_subject(choice, subject, subject_lw);

        let score = score_subject(subject, subject_lw, &query, &self.options);
        if score == 0 {
            return None;
        }

        let indices = if choice == pattern {
            (0..subject.len()).collect()
        } else {
            match_chars(subject, subject_lw, &query, &self.options)
        };

        Some((score, indices))
    }

    fn fuzzy_match(&self, choice: &str, pattern: &str) -> Option<ScoreType> {
        let query = self.prepared(pattern)?;

        let mut buf = self.char_buf.get_or(|| RefCell::new((Vec::new(), Vec::new()))).borrow_mut();
        let (subject, subject_lw) = &mut *buf;
        fill_subject(choice, subject, subject_lw);

        let score = score_subject(subject, subject_lw, &query, &self.options);
        (score > 0).then_some(score)
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
mod tests {
    use super::*;
    use crate::fuzzy_matcher::util::{assert_order, wrap_matches};
    use crate::options::ScoringOptionsBuilder;

    fn matcher() -> RankMatcher {
        RankMatcher::new(ScoringOptionsBuilder::default().path_separator('/').build().unwrap())
    }

    #[test]
    fn test_no_match() {
        let matcher = matcher();
        assert_eq!(None, matcher.fuzzy_match("bile", "file"));
        assert_eq!(None, matcher.fuzzy_match("", "file"));
        assert_eq!(None, matcher.fuzzy_match("file", ""));
        assert_eq!(None, matcher.fuzzy_indices("bile", "file"));
    }

    #[test]
    fn test_match_indices() {
        let matcher = matcher();
        let (_, indices) = matcher.fuzzy_indices("Hello World", "wor").unwrap();
        assert_eq!(wrap_matches("Hello World", &indices), "Hello [W][o][r]ld");

        let (_, indices) = matcher.fuzzy_indices("src/lib.rs", "src/lib.rs").unwrap();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_score_matches_indices() {
        let matcher = matcher();
        for (choice, pattern) in [("Gruntfile", "file"), ("a/b/c.txt", "bc"), ("FooBarBaz", "fbb")] {
            let score = matcher.fuzzy_match(choice, pattern).unwrap();
            let (indexed_score, _) = matcher.fuzzy_indices(choice, pattern).unwrap();
            assert_eq!(score, indexed_score);
        }
    }

    #[test]
    fn test_match_quality() {
        let matcher = matcher();
        assert_order(&matcher, "file", &["Gruntfile", "filter"]);
        assert_order(&matcher, "bar", &["a/bar", "bar/a"]);
        assert_order(&matcher, "js", &["JavaScript", "JSON", "J.S.O.N."]);
        assert_order(&matcher, "Status", &["StatusUrl", "statusurl"]);
        assert_order(&matcher, "status", &["statusurl", "StatusUrl"]);
    }

    #[test]
    fn test_cache_follows_pattern() {
        let matcher = matcher();
        assert!(matcher.fuzzy_match("abc", "abc").is_some());
        assert!(matcher.fuzzy_match("abc", "xyz").is_none());
        assert!(matcher.fuzzy_match("abc", "abc").is_some());
    }

    #[test]
    fn test_shared_between_threads() {
        let matcher = Arc::new(matcher());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let matcher = matcher.clone();
                std::thread::spawn(move || matcher.fuzzy_match("Gruntfile", "file"))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), matcher.fuzzy_match("Gruntfile", "file"));
        }
    }
}
