//! Wrapping matched chars with markers.

use crate::fuzzy_matcher::IndexType;
use crate::fuzzy_matcher::matcher::match_positions;
use crate::fuzzy_matcher::query::PreparedQuery;
use crate::options::WrapOptions;

/// Wrap the chars of `candidate` matched by `query`
///
/// Unmatched text, trailing text included, is kept as is.
pub fn wrap_prepared(candidate: &str, query: &PreparedQuery, options: &WrapOptions) -> String {
    if candidate == query.as_str() {
        return wrap_all(candidate, options);
    }
    let positions = match_positions(candidate, query, &options.scoring);
    wrap_positions(candidate, &positions, &options.open_tag(), &options.tag_close)
}

pub(crate) fn wrap_all(candidate: &str, options: &WrapOptions) -> String {
    let open = options.open_tag();
    let mut out = String::with_capacity(candidate.len() + open.len() + options.tag_close.len());
    out.push_str(&open);
    out.push_str(candidate);
    out.push_str(&options.tag_close);
    out
}

/// Wrap every maximal run of consecutive `positions` with `open` and `close`
///
/// `positions` are ascending char indices, as returned by the matcher.
pub fn wrap_positions(candidate: &str, positions: &[IndexType], open: &str, close: &str) -> String {
    if positions.is_empty() {
        return candidate.to_string();
    }

    let mut out = String::with_capacity(candidate.len() + positions.len() * (open.len() + close.len()));
    let mut positions = positions.iter().peekable();
    let mut in_run = false;

    for (idx, ch) in candidate.chars().enumerate() {
        let matched = positions.next_if_eq(&&idx).is_some();
        if matched && !in_run {
            out.push_str(open);
        } else if !matched && in_run {
            out.push_str(close);
        }
        in_run = matched;
        out.push(ch);
    }

    if in_run {
        out.push_str(close);
    }

    out
}
