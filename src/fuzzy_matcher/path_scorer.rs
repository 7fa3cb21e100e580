//! Path aware adjustment of the core score.
//!
//! Candidates are treated as paths: the score of the basename (or of as many
//! trailing segments as the query has) is blended with the whole-path score.
//! Shallow paths weight the basename heavily, deep ones let the whole path
//! count more.

use super::ScoreType;
use super::query::PreparedQuery;
use super::scorer::{compute_score, finish, size_penalty};
use super::util::{fill_subject, is_match, last_position};
use crate::options::ScoringOptions;

/// Directory depth at which the whole path weighs as much as the basename
const TAU_DEPTH: f64 = 13.0;
/// Scale of the basename length penalty applied to the whole-path score
const FILE_COEFF: f64 = 1.2;
/// Extensions like `.tar.gz` are looked up this many dots deep
const EXTENSION_MAX_DEPTH: u32 = 2;
/// Scale applied to an extension found one dot earlier
const EXTENSION_DEPTH_SCALE: f64 = 0.9;

/// Score `candidate` against `query`, treating it as a path
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
    let full = compute_score(subject, subject_lw, query, options.strict_upper_case);
    let adjusted = score_path(subject, subject_lw, full, query, options);
    finish(adjusted, admissible)
}

/// Blend the whole-path score with the basename score
pub(crate) fn score_path(
    subject: &[char],
    subject_lw: &[char],
    full_path_score: f64,
    query: &PreparedQuery,
    options: &ScoringOptions,
) -> f64 {
    if full_path_score == 0.0 {
        return 0.0;
    }

    let sep = options.path_separator;
    let end = trimmed_end(subject, sep);
    let mut base_pos = last_index(subject, sep, end);
    let file_length = end - base_pos;

    let mut full_path_score = full_path_score;
    let mut ext_adjust = 1.0;
    if options.use_extension_bonus {
        ext_adjust += get_extension_score(subject_lw, &query.ext, base_pos, end, EXTENSION_MAX_DEPTH);
        full_path_score *= ext_adjust;
    }

    if base_pos == -1 {
        return full_path_score;
    }

    let mut depth = query.depth;
    while base_pos > -1 && depth > 0 {
        depth -= 1;
        base_pos = last_index(subject, sep, base_pos - 1);
    }

    let base_path_score = if base_pos == -1 {
        full_path_score
    } else {
        let range = (base_pos + 1) as usize..(end + 1) as usize;
        let base = subject.get(range.clone()).unwrap_or_default();
        let base_lw = subject_lw.get(range).unwrap_or_default();
        ext_adjust * compute_score(base, base_lw, query, options.strict_upper_case)
    };

    let alpha = 0.5 * TAU_DEPTH / (TAU_DEPTH + count_dir(subject, (end + 1) as usize, sep) as f64);
    alpha * base_path_score + (1.0 - alpha) * full_path_score * size_penalty(0.0, FILE_COEFF * file_length as f64)
}

/// Index of the last char that is not a trailing separator, -1 if none
pub(crate) fn trimmed_end(subject: &[char], sep: char) -> isize {
    subject.iter().rposition(|&c| c != sep).map_or(-1, |p| p as isize)
}

#[inline]
pub(crate) fn last_index(subject: &[char], ch: char, at: isize) -> isize {
    last_position(subject, ch, at).map_or(-1, |p| p as isize)
}

/// Number of directories in `path[..end]`
///
/// Leading separators are not counted and a run of separators counts once,
/// so `foo/bar`, `/foo/bar` and `foo//bar` all have one.
pub fn count_dir(path: &[char], end: usize, separator: char) -> usize {
    let end = end.min(path.len());
    let mut count = 0;
    let mut in_run = false;

    for &c in path[..end].iter().skip_while(|&&c| c == separator) {
        if c == separator {
            if !in_run {
                count += 1;
            }
            in_run = true;
        } else {
            in_run = false;
        }
    }

    count
}

/// Text after the last `.`, empty if there is none
pub fn get_extension(s: &[char]) -> &[char] {
    match s.iter().rposition(|&c| c == '.') {
        Some(pos) => &s[pos + 1..],
        None => &[],
    }
}

/// Fraction of the candidate extension matched by the query extension
///
/// `start_pos` is the separator before the basename (-1 if none), `end_pos`
/// the last char considered. When nothing matches, the dot before is tried,
/// scaled down, up to `max_depth` times.
pub fn get_extension_score(candidate: &[char], ext: &[char], start_pos: isize, end_pos: isize, max_depth: u32) -> f64 {
    if ext.is_empty() {
        return 0.0;
    }

    let pos = last_index(candidate, '.', end_pos);
    if pos <= start_pos {
        return 0.0;
    }

    let mut n = ext.len();
    let mut m = (end_pos - pos).max(0) as usize;
    if m < n {
        n = m;
        m = ext.len();
    }

    let after_dot = (pos + 1) as usize;
    let matched = (0..n)
        .take_while(|&k| candidate.get(after_dot + k) == Some(&ext[k]))
        .count();

    if matched == 0 && max_depth > 0 {
        return EXTENSION_DEPTH_SCALE * get_extension_score(candidate, ext, start_pos, pos - 1, max_depth - 1);
    }

    matched as f64 / m as f64
}
