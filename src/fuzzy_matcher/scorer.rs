//! Core scorer: similarity between a prepared query and one candidate.
//!
//! Scoring goes through three tiers, each with its own formula:
//!
//! 1. the whole query is an acronym of the candidate (`fb` vs `FooBar`),
//! 2. the folded query is a substring of the folded candidate,
//! 3. otherwise a Smith-Waterman style alignment where rows are candidate
//!    chars and columns are query chars.
//!
//! The alignment rewards word starts, consecutive runs and matches close to
//! the start of the candidate. It gives up after too many rejected
//! alignments in a row and returns the best score reached so far, which
//! bounds the work on pathological inputs such as a query of repeated vowels
//! against a long candidate.
//!
//! # Example:
//! ```
//! use fzrank::fuzzy_matcher::query::PreparedQuery;
//! use fzrank::fuzzy_matcher::scorer;
//! use fzrank::options::ScoringOptions;
//!
//! let options = ScoringOptions::default();
//! let query = PreparedQuery::new("file", &options).unwrap();
//!
//! assert!(scorer::score("Gruntfile", &query, &options) > scorer::score("filter", &query, &options));
//! assert_eq!(scorer::score("bile", &query, &options), 0);
//! ```

use super::ScoreType;
use super::query::PreparedQuery;
use super::util::{fill_subject, index_of, is_match, is_separator, is_word_end, is_word_start};
use crate::options::ScoringOptions;

/// Base points for a single char match
pub(crate) const WM: f64 = 150.0;
/// Chars in `0..POS_BONUS` get a larger bonus for being close to the start
const POS_BONUS: f64 = 20.0;
/// Length difference at which the size penalty halves a score
const TAU_SIZE: f64 = 85.0;
/// At most `ceil(MISS_COEFF * query.len()) + 5` consecutive rejected alignments
const MISS_COEFF: f64 = 0.75;
/// Candidates longer than this many times the query are never full-word acronyms
const ACRONYM_MAX_RATIO: usize = 12;

/// Score `candidate` against `query`, ignoring path structure
///
/// Returns 0 when the candidate does not contain every core query char in
/// order, unless `allow_errors` is set.
pub fn score(candidate: &str, query: &PreparedQuery, options: &ScoringOptions) -> ScoreType {
    let mut subject = Vec::new();
    let mut subject_lw = Vec::new();
    fill_subject(candidate, &mut subject, &mut subject_lw);
    score_chars(&subject, &subject_lw, query, options)
}

pub(crate) fn score_chars(
    subject: &[char],
    subject_lw: &[char],
    query: &PreparedQuery,
    options: &ScoringOptions,
) -> ScoreType {
    let admissible = is_match(subject, &query.core_lw, &query.core_up);
    if !admissible && !options.allow_errors {
        return 0;
    }
    let raw = compute_score(subject, subject_lw, query, options.strict_upper_case);
    finish(raw, admissible)
}

/// Round a raw score up to the integer score reported to callers
///
/// An admissible candidate never reports 0: the miss budget can stop the
/// alignment before the last query char was reached.
pub(crate) fn finish(raw: f64, admissible: bool) -> ScoreType {
    let score = raw.ceil() as ScoreType;
    if admissible && score < 1 { 1 } else { score }
}

/// Raw score of `subject` for the full query, before rounding
pub(crate) fn compute_score(
    subject: &[char],
    subject_lw: &[char],
    prepared: &PreparedQuery,
    strict_upper_case: bool,
) -> f64 {
    let query = &prepared.query;
    let query_lw = &prepared.query_lw;
    let m = subject.len();
    let n = query.len();

    let acro = score_acronyms(subject, subject_lw, query, query_lw);
    if acro.count == n {
        return score_exact(n, m, acro.score, acro.pos);
    }

    if let Some(pos) = index_of(subject_lw, query_lw, 0) {
        return score_exact_match(subject, subject_lw, query, query_lw, pos);
    }

    let sz = size_penalty(n as f64, m as f64);
    let miss_budget = (MISS_COEFF * n as f64).ceil() as usize + 5;
    let mut miss_left = miss_budget;

    let mut score_row = vec![0.0; n];
    let mut csc_row = vec![0.0; n];

    // only the region between the first occurrence of the first query char
    // and the last occurrence of the last one can contribute
    let start = subject_lw.iter().position(|&c| c == query_lw[0]).unwrap_or(0);
    let stop = match subject_lw.iter().rposition(|&c| c == query_lw[n - 1]) {
        Some(last) if last + 1 > start => last + 1,
        _ => m,
    };

    let mut csc_invalid = true;

    for i in start..stop {
        let si_lw = subject_lw[i];

        if !prepared.char_set.contains(si_lw) {
            // cannot take part in a run, break the ones in progress
            if !csc_invalid {
                csc_row.fill(0.0);
                csc_invalid = true;
            }
            continue;
        }

        let mut score = 0.0;
        let mut score_diag = 0.0;
        let mut csc_diag = 0.0;
        let mut record_miss = true;
        csc_invalid = false;

        for j in 0..n {
            // skipping this candidate char
            let score_up = score_row[j];
            if score_up > score {
                score = score_up;
            }

            let mut csc_score = 0.0;

            if query_lw[j] == si_lw && accepts_case(subject[i], query[j], query_lw[j], strict_upper_case) {
                let start = is_word_start(i, subject, subject_lw);

                csc_score = if csc_diag > 0.0 {
                    csc_diag
                } else {
                    score_consecutives(subject, subject_lw, query, query_lw, i, j, start)
                };

                let align = score_diag + score_character(i, start, acro.score, csc_score);

                if align > score {
                    score = align;
                    miss_left = miss_budget;
                } else {
                    if record_miss {
                        miss_left -= 1;
                        if miss_left == 0 {
                            trace!("miss budget exhausted at row {} of {}", i, m);
                            return score_row[n - 1] * sz;
                        }
                    }
                    record_miss = false;
                }
            }

            score_diag = score_up;
            csc_diag = csc_row[j];
            csc_row[j] = csc_score;
            score_row[j] = score;
        }
    }

    score_row[n - 1] * sz
}

/// Can candidate char `si` align with query char `qj`, given they fold equal?
#[inline]
pub(crate) fn accepts_case(si: char, qj: char, qj_lw: char, strict_upper_case: bool) -> bool {
    !strict_upper_case || qj == qj_lw || si == qj
}

/// Bonus for a match at position `pos`, sharply larger within the first chars
#[inline]
pub fn position_bonus(pos: f64) -> f64 {
    if pos < POS_BONUS {
        let sc = POS_BONUS - pos;
        100.0 + sc * sc
    } else {
        (100.0 + POS_BONUS - pos).max(0.0)
    }
}

/// Penalty for the length difference between query and candidate, 1.0 when equal
#[inline]
pub fn size_penalty(n: f64, m: f64) -> f64 {
    TAU_SIZE / (TAU_SIZE + (m - n).abs())
}

/// Score of a match made of a single pattern of quality `quality` at `pos`
pub fn score_exact(n: usize, m: usize, quality: f64, pos: f64) -> f64 {
    2.0 * n as f64 * (WM * quality + position_bonus(pos)) * size_penalty(n as f64, m as f64)
}

/// Quality of a run of `count` chars out of a query of `len` chars
///
/// Run length weighs the most, case and word boundaries add bonuses that can
/// outweigh one char of length. A run covering the whole query may outrank a
/// longer partial run.
pub fn score_pattern(count: usize, len: usize, same_case: usize, start: bool, end: bool) -> f64 {
    let mut sz = count;

    let mut bonus = 6;
    if same_case == count {
        bonus += 2;
    }
    if start {
        bonus += 3;
    }
    if end {
        bonus += 1;
    }

    if count == len {
        if start {
            sz += if same_case == len { 2 } else { 1 };
        }
        if end {
            bonus += 1;
        }
    }

    (same_case + sz * (sz + bonus)) as f64
}

/// Value of aligning candidate char `i` given its context
#[inline]
pub fn score_character(i: usize, start: bool, acro_score: f64, csc_score: f64) -> f64 {
    let pos_bonus = position_bonus(i as f64);
    if start {
        pos_bonus + WM * (acro_score.max(csc_score) + 10.0)
    } else {
        pos_bonus + WM * csc_score
    }
}

/// Score of the run of folded-equal chars starting at `subject[i]` and `query[j]`
pub fn score_consecutives(
    subject: &[char],
    subject_lw: &[char],
    query: &[char],
    query_lw: &[char],
    i: usize,
    j: usize,
    start: bool,
) -> f64 {
    let m = subject.len();
    let n = query.len();
    let k = (m - i).min(n - j);

    let mut same_case = usize::from(query[j] == subject[i]);
    let mut sz = 1;
    while sz < k && query_lw[j + sz] == subject_lw[i + sz] {
        if query[j + sz] == subject[i + sz] {
            same_case += 1;
        }
        sz += 1;
    }

    // isolated chars are common and carry no structure
    if sz == 1 {
        return (1 + 2 * same_case) as f64;
    }

    score_pattern(sz, n, same_case, start, is_word_end(i + sz - 1, subject, subject_lw))
}

/// Score of the query found verbatim (folded) at `pos`
///
/// A later occurrence is used instead when `pos` is not a word start but the
/// next occurrence is.
pub fn score_exact_match(subject: &[char], subject_lw: &[char], query: &[char], query_lw: &[char], pos: usize) -> f64 {
    let m = subject.len();
    let n = query.len();
    let mut pos = pos;

    let mut start = is_word_start(pos, subject, subject_lw);
    if !start
        && let Some(next) = index_of(subject_lw, query_lw, pos + 1)
        && is_word_start(next, subject, subject_lw)
    {
        start = true;
        pos = next;
    }

    let same_case = (0..n).filter(|&k| query[k] == subject[pos + k]).count();
    let end = is_word_end(pos + n - 1, subject, subject_lw);

    score_exact(n, m, score_pattern(n, n, same_case, start, end), pos as f64)
}

/// Acronym match of a query against a candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcronymResult {
    /// Pattern quality of the acronym
    pub score: f64,
    /// Mean position of the matched word starts
    pub pos: f64,
    /// Number of query chars consumed, separators included
    pub count: usize,
}

impl AcronymResult {
    const EMPTY: Self = Self {
        score: 0.0,
        pos: 0.1,
        count: 0,
    };
}

/// Match query chars to successive word starts of the candidate
///
/// Separators in the query only need to appear somewhere after the previous
/// match. Less than two matched chars is no acronym.
pub fn score_acronyms(subject: &[char], subject_lw: &[char], query: &[char], query_lw: &[char]) -> AcronymResult {
    let m = subject.len();
    let n = query.len();

    if m <= 1 || n <= 1 {
        return AcronymResult::EMPTY;
    }

    let mut count = 0;
    let mut sep_count = 0;
    let mut sum_pos = 0;
    let mut same_case = 0;
    let mut cursor = 0;

    for (j, &qj_lw) in query_lw.iter().enumerate() {
        if is_separator(qj_lw) {
            match subject_lw.get(cursor..).and_then(|rest| rest.iter().position(|&c| c == qj_lw)) {
                Some(p) => {
                    cursor += p + 1;
                    sep_count += 1;
                    continue;
                }
                None => break,
            }
        }

        match (cursor..m).find(|&i| subject_lw[i] == qj_lw && is_word_start(i, subject, subject_lw)) {
            Some(i) => {
                if query[j] == subject[i] {
                    same_case += 1;
                }
                sum_pos += i;
                count += 1;
                cursor = i + 1;
            }
            None => break,
        }
    }

    if count < 2 {
        return AcronymResult::EMPTY;
    }

    let full_word = count == n && is_acronym_full_word(subject, subject_lw, n, count);

    AcronymResult {
        score: score_pattern(count, n, same_case, true, full_word),
        pos: sum_pos as f64 / count as f64,
        count: count + sep_count,
    }
}

/// Does every word start of the candidate take part in the acronym?
fn is_acronym_full_word(subject: &[char], subject_lw: &[char], n: usize, nb_acronym: usize) -> bool {
    let m = subject.len();
    if m > ACRONYM_MAX_RATIO * n {
        return false;
    }

    (0..m).filter(|&i| is_word_start(i, subject, subject_lw)).nth(nb_acronym).is_none()
}
