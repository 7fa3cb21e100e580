//! Character helpers shared by the scorer, the path scorer and the matcher.
//!
//! All helpers work on `&[char]` slices. The folded slice of a string always
//! has the same length as the original one (see [`fold_char`]), so an index is
//! valid in both.

/// Lower-case `ch`, keeping only the first char of the expansion.
#[inline]
pub(crate) fn fold_char(ch: char) -> char {
    if ch.is_ascii() {
        ch.to_ascii_lowercase()
    } else {
        ch.to_lowercase().next().unwrap_or(ch)
    }
}

/// Upper-case `ch`, keeping only the first char of the expansion (`ß` -> `S`).
#[inline]
pub(crate) fn truncated_upper_char(ch: char) -> char {
    if ch.is_ascii() {
        ch.to_ascii_uppercase()
    } else {
        ch.to_uppercase().next().unwrap_or(ch)
    }
}

/// Fill `chars` and `folded` from `text`, reusing their allocations.
pub(crate) fn fill_subject(text: &str, chars: &mut Vec<char>, folded: &mut Vec<char>) {
    chars.clear();
    chars.extend(text.chars());
    folded.clear();
    folded.extend(chars.iter().map(|&c| fold_char(c)));
}

/// Characters that delimit words.
#[inline]
pub(crate) fn is_separator(ch: char) -> bool {
    matches!(ch, ' ' | '.' | '-' | '_' | '/' | '\\')
}

/// Is `pos` the first char of a word?
///
/// True at the start of the string, after a separator, and on an upper-case
/// char preceded by a char that is not upper-case (camelCase).
#[inline]
pub(crate) fn is_word_start(pos: usize, subject: &[char], subject_lw: &[char]) -> bool {
    if pos == 0 {
        return true;
    }
    let curr = subject[pos];
    let prev = subject[pos - 1];
    is_separator(prev) || (curr != subject_lw[pos] && prev == subject_lw[pos - 1])
}

/// Is `pos` the last char of a word? Mirror image of [`is_word_start`].
#[inline]
pub(crate) fn is_word_end(pos: usize, subject: &[char], subject_lw: &[char]) -> bool {
    let len = subject.len();
    if pos + 1 >= len {
        return true;
    }
    let curr = subject[pos];
    let next = subject[pos + 1];
    is_separator(next) || (curr == subject_lw[pos] && next != subject_lw[pos + 1])
}

/// Are all chars of the query found in `subject`, in order?
///
/// A subject char matches when it equals either the folded or the
/// truncated upper-case form of the query char at the same position.
pub(crate) fn is_match(subject: &[char], query_lw: &[char], query_up: &[char]) -> bool {
    let m = subject.len();
    let n = query_lw.len();
    if m == 0 || n > m {
        return false;
    }

    let mut rest = subject.iter();
    query_lw
        .iter()
        .zip(query_up)
        .all(|(&lw, &up)| rest.any(|&c| c == lw || c == up))
}

/// First position of `needle` in `hay`, starting the search at `from`.
pub(crate) fn index_of(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    let n = needle.len();
    if n == 0 || n > hay.len() {
        return None;
    }
    (from..=hay.len() - n).find(|&i| hay[i..i + n] == *needle)
}

/// Last position of `ch` in `hay` at or before `at`.
///
/// A negative `at` only inspects position 0, a too large one inspects the
/// whole slice.
pub(crate) fn last_position(hay: &[char], ch: char, at: isize) -> Option<usize> {
    if hay.is_empty() {
        return None;
    }
    let at = at.clamp(0, hay.len() as isize - 1) as usize;
    hay[..=at].iter().rposition(|&c| c == ch)
}

#[cfg(test)]
pub(crate) fn wrap_matches(line: &str, indices: &[usize]) -> String {
    let mut ret = String::new();
    let mut peekable = indices.iter().peekable();
    for (idx, ch) in line.chars().enumerate() {
        let next_id = **peekable.peek().unwrap_or(&&line.len());
        if next_id == idx {
            ret.push_str(format!("[{}]", ch).as_str());
            peekable.next();
        } else {
            ret.push(ch);
        }
    }

    ret
}

#[cfg(test)]
pub(crate) fn assert_order(matcher: &dyn super::FuzzyMatcher, pattern: &str, choices: &[&'static str]) {
    let result = filter_and_sort(matcher, pattern, choices);

    if result != choices {
        // debug print
        println!("pattern: {}", pattern);
        for &choice in choices.iter() {
            if let Some((score, indices)) = matcher.fuzzy_indices(choice, pattern) {
                println!("{}: {:?}", score, wrap_matches(choice, &indices));
            } else {
                println!("NO MATCH for {}", choice);
            }
        }
    }

    assert_eq!(result, choices);
}

#[cfg(test)]
fn filter_and_sort(matcher: &dyn super::FuzzyMatcher, pattern: &str, lines: &[&'static str]) -> Vec<&'static str> {
    let mut lines_with_score: Vec<(i64, &'static str)> = lines
        .iter()
        .filter_map(|&s| matcher.fuzzy_match(s, pattern).map(|score| (score, s)))
        .collect();
    lines_with_score.sort_by_key(|(score, _)| -score);
    lines_with_score.into_iter().map(|(_, string)| string).collect()
}
