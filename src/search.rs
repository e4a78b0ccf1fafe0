// search.rs - Iteration driver and single-match entry point.
//
// `GMatch` walks the subject left to right and yields every accepted match.
// An empty match that sits exactly where the previous accepted match ended
// is rejected, which keeps iteration from stalling on zero-width patterns.

use std::iter::FusedIterator;

use crate::error::LexError;
use crate::matcher::MatchState;
use crate::pattern::Pattern;
use crate::result::MatchResult;
use crate::unit::CodeUnit;

/// Lazy iterator over all matches of a pattern in a subject.
///
/// Created by [`gmatch`]. Single pass: start a new iterator to scan again.
/// An error ends the iteration after it is yielded.
pub struct GMatch<'s, 'p, S, P> {
    state: MatchState<'s, 'p, S, P>,
    subject: &'s [S],
    pattern: Pattern<'p, P>,
    cursor: usize,
    last_end: Option<usize>,
    exhausted: bool,
}

/// Iterate over all matches of `pattern` in `subject`.
///
/// # Examples
///
/// ```
/// use lexmatch::{gmatch, Pattern};
///
/// let pat = Pattern::new(b"%a+").unwrap();
/// let words: Vec<_> = gmatch(b"one two  three", &pat)
///     .map(|m| m.unwrap().as_str().to_owned())
///     .collect();
/// assert_eq!(words, ["one", "two", "three"]);
/// ```
pub fn gmatch<'s, 'p, S: CodeUnit, P: CodeUnit>(
    subject: &'s [S],
    pattern: &Pattern<'p, P>,
) -> GMatch<'s, 'p, S, P> {
    GMatch {
        state: MatchState::new(subject, pattern),
        subject,
        pattern: *pattern,
        cursor: 0,
        last_end: None,
        exhausted: false,
    }
}

/// First match of `pattern` in `subject`.
///
/// An anchored pattern is only tried at offset 0. Returns an empty result
/// (see [`MatchResult::is_match`]) when nothing matches.
pub fn find<'s, S: CodeUnit, P: CodeUnit>(
    subject: &'s [S],
    pattern: &Pattern<'_, P>,
) -> Result<MatchResult<'s, S>, LexError> {
    match gmatch(subject, pattern).next() {
        Some(res) => res,
        None => Ok(MatchResult::empty(subject)),
    }
}

impl<'s, 'p, S: CodeUnit, P: CodeUnit> GMatch<'s, 'p, S, P> {
    /// Next offset worth attempting, or `None` once the subject is used up.
    fn next_candidate(&self) -> Option<usize> {
        if self.cursor > self.subject.len() {
            return None;
        }
        if self.pattern.is_anchored() {
            return Some(self.cursor);
        }
        match self.pattern.first_unit() {
            Some(unit) => S::find(&self.subject[self.cursor..], unit).map(|i| self.cursor + i),
            None => Some(self.cursor),
        }
    }
}

impl<'s, 'p, S: CodeUnit, P: CodeUnit> Iterator for GMatch<'s, 'p, S, P> {
    type Item = Result<MatchResult<'s, S>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted {
            let Some(start) = self.next_candidate() else {
                self.exhausted = true;
                break;
            };
            let outcome = self.state.attempt(start);
            if self.pattern.is_anchored() {
                self.exhausted = true;
            }
            match outcome {
                Err(err) => {
                    self.exhausted = true;
                    return Some(Err(err));
                }
                Ok(Some(end)) if self.last_end != Some(end) => {
                    self.cursor = end;
                    self.last_end = Some(end);
                    let captures = std::mem::take(&mut self.state.captures);
                    return Some(Ok(MatchResult::new(self.subject, start, end, captures)));
                }
                // No match here, or an empty match touching the previous one.
                Ok(_) => self.cursor = start + 1,
            }
        }
        None
    }
}

impl<S: CodeUnit, P: CodeUnit> FusedIterator for GMatch<'_, '_, S, P> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(subject: &str, pattern: &str) -> Vec<(usize, usize)> {
        let pat = Pattern::new(pattern.as_bytes()).unwrap();
        gmatch(subject.as_bytes(), &pat)
            .map(|m| {
                let r = m.unwrap().range().unwrap();
                (r.start, r.end)
            })
            .collect()
    }

    #[test]
    fn no_adjacent_empty_match() {
        assert_eq!(spans("abc", "()a*()"), vec![(0, 1), (2, 2), (3, 3)]);
        assert_eq!(spans("ab", ""), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn adjacent_non_empty_matches() {
        assert_eq!(spans("aaa", "a"), vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(spans("a b cd", " *"), vec![(0, 0), (1, 2), (3, 4), (5, 5), (6, 6)]);
    }

    #[test]
    fn literal_skip_agrees_with_scan() {
        assert_eq!(spans("xxaxxab", "ab"), vec![(5, 7)]);
        assert_eq!(spans("banana", "an"), vec![(1, 3), (3, 5)]);
        assert_eq!(spans("banana", "a+"), vec![(1, 2), (3, 4), (5, 6)]);
        assert!(spans("banana", "z").is_empty());
    }

    #[test]
    fn anchored_tries_start_only() {
        assert_eq!(spans("aaa", "^a"), vec![(0, 1)]);
        assert!(spans("baa", "^a").is_empty());
        assert_eq!(spans("", "^"), vec![(0, 0)]);
    }

    #[test]
    fn find_first() {
        let pat = Pattern::new(b"%d+").unwrap();
        let m = find(b"abc 123 456".as_slice(), &pat).unwrap();
        assert_eq!(m.range(), Some(4..7));

        let m = find(b"abc".as_slice(), &pat).unwrap();
        assert!(!m.is_match());
    }

    #[test]
    fn error_ends_iteration() {
        let pat = Pattern::new(b"a?a?a?").unwrap();
        let mut it = gmatch(b"aaa".as_slice(), &pat);
        it.state.limit_depth(2);
        assert_eq!(it.next().unwrap().unwrap_err(), LexError::PatternTooComplex);
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn mixed_widths() {
        let subject: Vec<u16> = "x=1, y=22".encode_utf16().collect();
        let pat = Pattern::new(b"(%a)=(%d+)").unwrap();
        let found: Vec<_> = gmatch(subject.as_slice(), &pat)
            .map(|m| m.unwrap().capture(1).unwrap().range())
            .collect();
        assert_eq!(found, vec![2..3, 7..9]);
    }
}
