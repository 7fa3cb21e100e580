//! Positions of the candidate chars that justify a score.
//!
//! The alignment here follows [`super::scorer`] step for step, but records
//! the move chosen at every cell and walks them back from the last cell.
//! It never gives up early: highlights have to be exact.
//!
//! # Example:
//! ```
//! use fzrank::fuzzy_matcher::matcher::match_positions;
//! use fzrank::fuzzy_matcher::query::PreparedQuery;
//! use fzrank::options::ScoringOptions;
//!
//! let options = ScoringOptions::default();
//! let query = PreparedQuery::new("wor", &options).unwrap();
//!
//! assert_eq!(match_positions("Hello World", &query, &options), [6, 7, 8]);
//! ```

use super::path_scorer::{last_index, trimmed_end};
use super::query::PreparedQuery;
use super::scorer::{accepts_case, score_acronyms, score_character, score_consecutives};
use super::util::{fill_subject, is_match, is_word_start};
use super::{IndexType, MatchIndices};
use crate::options::ScoringOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Stop,
    /// gap in the candidate
    SkipCandidate,
    /// gap in the query
    SkipQuery,
    Align,
}

/// Ascending char indices of `candidate` matched by `query`
///
/// Empty when the candidate does not pass the gate. Candidates containing the
/// path separator also get the matches of their basename merged in.
pub fn match_positions(candidate: &str, query: &PreparedQuery, options: &ScoringOptions) -> MatchIndices {
    let mut subject = Vec::new();
    let mut subject_lw = Vec::new();
    fill_subject(candidate, &mut subject, &mut subject_lw);
    match_chars(&subject, &subject_lw, query, options)
}

pub(crate) fn match_chars(
    subject: &[char],
    subject_lw: &[char],
    query: &PreparedQuery,
    options: &ScoringOptions,
) -> MatchIndices {
    if !options.allow_errors && !is_match(subject, &query.core_lw, &query.core_up) {
        return Vec::new();
    }

    let matches = compute_match(subject, subject_lw, query, options.strict_upper_case, 0);

    // nothing on the whole string means nothing on the basename either
    if matches.is_empty() {
        return matches;
    }

    if subject.contains(&options.path_separator) {
        let base_matches = basename_match(subject, subject_lw, query, options);
        merge_matches(&matches, &base_matches)
    } else {
        matches
    }
}

/// Matches within the basename, extended by as many segments as the query has
fn basename_match(subject: &[char], subject_lw: &[char], query: &PreparedQuery, options: &ScoringOptions) -> MatchIndices {
    let sep = options.path_separator;
    let end = trimmed_end(subject, sep);
    let mut base_pos = last_index(subject, sep, end);
    if base_pos == -1 {
        return Vec::new();
    }

    for _ in 0..query.depth {
        base_pos = last_index(subject, sep, base_pos - 1);
        if base_pos == -1 {
            return Vec::new();
        }
    }

    let offset = (base_pos + 1) as usize;
    let range = offset..(end + 1) as usize;
    let base = subject.get(range.clone()).unwrap_or_default();
    let base_lw = subject_lw.get(range).unwrap_or_default();
    compute_match(base, base_lw, query, options.strict_upper_case, offset)
}

/// Union of two ascending index lists, ascending and without duplicates
pub fn merge_matches(a: &[IndexType], b: &[IndexType]) -> MatchIndices {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut a = a.iter().peekable();
    let mut b = b.iter().peekable();

    loop {
        let next = match (a.peek(), b.peek()) {
            (Some(&&x), Some(&&y)) if x < y => a.next(),
            (Some(&&x), Some(&&y)) if y < x => b.next(),
            (Some(_), Some(_)) => {
                b.next();
                a.next()
            }
            (Some(_), None) => a.next(),
            (None, Some(_)) => b.next(),
            (None, None) => break,
        };
        out.extend(next);
    }

    out
}

/// Align the whole query against `subject` and trace back the aligned chars,
/// reported shifted by `offset`
fn compute_match(
    subject: &[char],
    subject_lw: &[char],
    prepared: &PreparedQuery,
    strict_upper_case: bool,
    offset: usize,
) -> MatchIndices {
    let query = &prepared.query;
    let query_lw = &prepared.query_lw;
    let m = subject.len();
    let n = query.len();
    if m == 0 || n == 0 {
        return Vec::new();
    }

    let acro_score = score_acronyms(subject, subject_lw, query, query_lw).score;

    let mut score_row = vec![0.0; n];
    let mut csc_row = vec![0.0; n];
    let mut trace = vec![Move::Stop; m * n];

    for i in 0..m {
        let si_lw = subject_lw[i];
        let mut score = 0.0;
        let mut score_up = 0.0;
        let mut csc_diag = 0.0;

        for j in 0..n {
            let mut csc_score = 0.0;
            let mut align = 0.0;
            let score_diag = score_up;

            if query_lw[j] == si_lw && accepts_case(subject[i], query[j], query_lw[j], strict_upper_case) {
                let start = is_word_start(i, subject, subject_lw);
                csc_score = if csc_diag > 0.0 {
                    csc_diag
                } else {
                    score_consecutives(subject, subject_lw, query, query_lw, i, j, start)
                };
                align = score_diag + score_character(i, start, acro_score, csc_score);
            }

            score_up = score_row[j];
            csc_diag = csc_row[j];

            // on a tie, skip the query char
            let mut mv = if score >= score_up {
                Move::SkipQuery
            } else {
                score = score_up;
                Move::SkipCandidate
            };

            if align > score {
                score = align;
                mv = Move::Align;
            } else {
                // not taken, the run is broken
                csc_score = 0.0;
            }

            score_row[j] = score;
            csc_row[j] = csc_score;
            trace[i * n + j] = if score > 0.0 { mv } else { Move::Stop };
        }
    }

    let mut matches = Vec::with_capacity(n);
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        match trace[(i - 1) * n + (j - 1)] {
            Move::SkipCandidate => i -= 1,
            Move::SkipQuery => j -= 1,
            Move::Align => {
                matches.push(i - 1 + offset);
                i -= 1;
                j -= 1;
            }
            Move::Stop => break,
        }
    }

    matches.reverse();
    matches
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
mod tests {
    use super::*;
    use crate::fuzzy_matcher::util::wrap_matches;
    use crate::options::ScoringOptionsBuilder;

    fn opts() -> ScoringOptions {
        ScoringOptionsBuilder::default().path_separator('/').build().unwrap()
    }

    fn positions(candidate: &str, query: &str) -> MatchIndices {
        let o = opts();
        let q = PreparedQuery::new(query, &o).unwrap();
        match_positions(candidate, &q, &o)
    }

    #[test]
    fn test_match_word() {
        assert_eq!(positions("Hello World", "wor"), [6, 7, 8]);
        assert_eq!(positions("Hello World", "he"), [0, 1]);
        assert_eq!(positions("Hello World", "d"), [10]);
        assert_eq!(positions("Hello World", "er"), [1, 8]);
    }

    #[test]
    fn test_match_acronym() {
        assert_eq!(
            wrap_matches("ImportanceTableCtrl", &positions("ImportanceTableCtrl", "itc")),
            "[I]mportance[T]able[C]trl"
        );
    }

    #[test]
    fn test_match_basename() {
        assert_eq!(positions("X/X-x", "X"), [0, 2]);
        assert_eq!(positions("XY/XY", "XY"), [0, 1, 3, 4]);
        assert_eq!(positions("X/Y", "XY"), [0, 2]);
        assert_eq!(positions("X-/-", "X/"), [0, 2]);
    }

    #[test]
    fn test_no_match() {
        assert!(positions("Hello World", "xyz").is_empty());
        assert!(positions("", "a").is_empty());
    }

    #[test]
    fn test_merge() {
        assert_eq!(merge_matches(&[], &[]), Vec::<usize>::new());
        assert_eq!(merge_matches(&[1, 3], &[]), [1, 3]);
        assert_eq!(merge_matches(&[], &[2]), [2]);
        assert_eq!(merge_matches(&[5], &[1]), [1, 5]);
        assert_eq!(merge_matches(&[1, 4, 6], &[2, 4, 7, 9]), [1, 2, 4, 6, 7, 9]);
    }

    #[test]
    fn test_query_deeper_than_candidate() {
        // the basename recomputation bails out, only the whole-path matches remain
        assert_eq!(positions("a/b", "x/a/b"), Vec::<usize>::new());
        let lenient = ScoringOptionsBuilder::default()
            .path_separator('/')
            .allow_errors(true)
            .build()
            .unwrap();
        let q = PreparedQuery::new("a/b/c", &lenient).unwrap();
        assert_eq!(match_positions("a/b", &q, &lenient), [0, 1, 2]);
    }
}
