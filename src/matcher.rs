// matcher.rs - Recursive backtracking matcher.
//
// `do_match` tries the pattern from a pattern index against the subject from
// a subject index and returns the end of the match. Only capture boundaries
// and quantifier expansion recurse; consuming a single unit advances both
// cursors in a loop, so stack depth follows pattern nesting rather than
// pattern length.
//
// Every recursive entry to `do_match` takes one unit of the depth budget and
// gives it back on the way out, errors included. Each recursion moves past a
// pattern item, so a pattern the compiler accepted stays within its budget.

use crate::capture::{CaptureSet, CaptureState, MAX_CAPTURES};
use crate::error::LexError;
use crate::pattern::{ascii_digit, bracket_end, is_quantifier, Pattern};
use crate::unit::{match_class, CodeUnit};

/// `Ok(Some(end))` on success, `Ok(None)` when the branch fails.
pub(crate) type MatchOutcome = Result<Option<usize>, LexError>;

/// Per-call matching state for one (subject, pattern) pair.
pub(crate) struct MatchState<'s, 'p, S, P> {
    subject: &'s [S],
    pattern: &'p [P],
    depth: usize,
    max_depth: usize,
    pub(crate) captures: CaptureSet,
}

impl<'s, 'p, S: CodeUnit, P: CodeUnit> MatchState<'s, 'p, S, P> {
    pub(crate) fn new(subject: &'s [S], pattern: &Pattern<'p, P>) -> Self {
        MatchState {
            subject,
            pattern: pattern.as_units(),
            depth: pattern.max_depth(),
            max_depth: pattern.max_depth(),
            captures: CaptureSet::new(),
        }
    }

    /// Attempts the whole pattern at subject offset `start`.
    pub(crate) fn attempt(&mut self, start: usize) -> MatchOutcome {
        self.captures.clear();
        let res = self.match_items(start, 0);
        debug_assert_eq!(self.depth, self.max_depth);
        res
    }

    #[cfg(test)]
    pub(crate) fn limit_depth(&mut self, depth: usize) {
        self.depth = depth;
        self.max_depth = depth;
    }

    fn do_match(&mut self, s: usize, p: usize) -> MatchOutcome {
        if self.depth == 0 {
            log::debug!("match depth budget of {} exhausted", self.max_depth);
            return Err(LexError::PatternTooComplex);
        }
        self.depth -= 1;
        let res = self.match_items(s, p);
        self.depth += 1;
        res
    }

    fn match_items(&mut self, mut s: usize, mut p: usize) -> MatchOutcome {
        let pat = self.pattern;
        let p_end = pat.len();

        while p < p_end {
            let item = pat[p];

            if item.is(b'(') {
                return if pat.get(p + 1).is_some_and(|u| u.is(b')')) {
                    self.start_capture(s, p + 2, true)
                } else {
                    self.start_capture(s, p + 1, false)
                };
            }
            if item.is(b')') {
                return self.end_capture(s, p + 1);
            }
            if item.is(b'$') && p + 1 == p_end {
                return Ok((s == self.subject.len()).then_some(s));
            }

            if item.is(b'%') {
                let escaped = pat[p + 1];
                if escaped.is(b'b') {
                    match self.match_balance(s, p + 2)? {
                        Some(e) => {
                            s = e;
                            p += 4;
                            continue;
                        }
                        None => return Ok(None),
                    }
                }
                if escaped.is(b'f') {
                    p += 2;
                    let ep = bracket_end(pat, p)?;
                    let current = self.subject.get(s).map_or(0, |u| u.value());
                    let previous = match s.checked_sub(1) {
                        Some(i) => self.subject[i].value(),
                        None => 0,
                    };
                    if self.match_bracket(current, p, ep - 1)
                        && !self.match_bracket(previous, p, ep - 1)
                    {
                        p = ep;
                        continue;
                    }
                    return Ok(None);
                }
                if let Some(n) = ascii_digit(escaped) {
                    match self.match_capture(s, n)? {
                        Some(e) => {
                            s = e;
                            p += 2;
                            continue;
                        }
                        None => return Ok(None),
                    }
                }
            }

            let ep = self.class_end(p)?;
            let hit = s < self.subject.len() && self.single_match(self.subject[s].value(), p, ep);
            let suffix = pat.get(ep).copied().filter(|&u| is_quantifier(u));

            match suffix {
                Some(q) if q.is(b'?') => {
                    if hit {
                        if let Some(e) = self.do_match(s + 1, ep + 1)? {
                            return Ok(Some(e));
                        }
                    }
                    p = ep + 1;
                }
                Some(q) if q.is(b'+') => {
                    return if hit {
                        self.max_expand(s + 1, p, ep)
                    } else {
                        Ok(None)
                    };
                }
                Some(q) if q.is(b'*') => return self.max_expand(s, p, ep),
                Some(_) => return self.min_expand(s, p, ep),
                None => {
                    if !hit {
                        return Ok(None);
                    }
                    s += 1;
                    p = ep;
                }
            }
        }

        Ok(Some(s))
    }

    /// Index one past the single-unit class that starts at `p`.
    fn class_end(&self, p: usize) -> Result<usize, LexError> {
        let item = self.pattern[p];
        if item.is(b'%') {
            if p + 1 >= self.pattern.len() {
                return Err(LexError::PatternEndsWithPercent);
            }
            Ok(p + 2)
        } else if item.is(b'[') {
            bracket_end(self.pattern, p)
        } else {
            Ok(p + 1)
        }
    }

    /// Tests subject value `c` against the class spanning `p..ep`.
    fn single_match(&self, c: u32, p: usize, ep: usize) -> bool {
        let item = self.pattern[p];
        if item.is(b'.') {
            true
        } else if item.is(b'%') {
            match_class(c, self.pattern[p + 1].value())
        } else if item.is(b'[') {
            self.match_bracket(c, p, ep - 1)
        } else {
            item.value() == c
        }
    }

    /// Tests `c` against the set whose `[` is at `open` and `]` at `close`.
    fn match_bracket(&self, c: u32, open: usize, close: usize) -> bool {
        let pat = self.pattern;
        let mut found = true;
        let mut i = open + 1;
        if pat[i].is(b'^') {
            found = false;
            i += 1;
        }
        while i < close {
            let u = pat[i];
            if u.is(b'%') {
                i += 1;
                if match_class(c, pat[i].value()) {
                    return found;
                }
                i += 1;
            } else if i + 2 < close && pat[i + 1].is(b'-') {
                if (u.value()..=pat[i + 2].value()).contains(&c) {
                    return found;
                }
                i += 3;
            } else {
                if u.value() == c {
                    return found;
                }
                i += 1;
            }
        }
        !found
    }

    /// `%bxy` with `p` pointing at `x`.
    fn match_balance(&self, s: usize, p: usize) -> MatchOutcome {
        let (Some(open), Some(close)) = (self.pattern.get(p), self.pattern.get(p + 1)) else {
            return Err(LexError::BalancedNoArguments);
        };
        let (open, close) = (open.value(), close.value());
        match self.subject.get(s) {
            Some(u) if u.value() == open => {}
            _ => return Ok(None),
        }
        let mut count = 1usize;
        for (i, u) in self.subject.iter().enumerate().skip(s + 1) {
            let v = u.value();
            if v == close {
                count -= 1;
                if count == 0 {
                    return Ok(Some(i + 1));
                }
            } else if v == open {
                count += 1;
            }
        }
        Ok(None)
    }

    /// Greedy `*`/`+`: longest run first, then back off one unit at a time.
    fn max_expand(&mut self, s: usize, p: usize, ep: usize) -> MatchOutcome {
        let run = self.subject[s..]
            .iter()
            .take_while(|u| self.single_match(u.value(), p, ep))
            .count();
        for i in (0..=run).rev() {
            if let Some(e) = self.do_match(s + i, ep + 1)? {
                return Ok(Some(e));
            }
        }
        Ok(None)
    }

    /// Lazy `-`: try the rest of the pattern before consuming another unit.
    fn min_expand(&mut self, mut s: usize, p: usize, ep: usize) -> MatchOutcome {
        loop {
            if let Some(e) = self.do_match(s, ep + 1)? {
                return Ok(Some(e));
            }
            if s < self.subject.len() && self.single_match(self.subject[s].value(), p, ep) {
                s += 1;
            } else {
                return Ok(None);
            }
        }
    }

    fn start_capture(&mut self, s: usize, p: usize, position: bool) -> MatchOutcome {
        let idx = self.captures.len();
        if idx >= MAX_CAPTURES {
            return Err(LexError::CaptureTooMany);
        }
        self.captures.start(idx, s)?;
        if position {
            self.captures.mark_position(idx);
        }
        let res = self.do_match(s, p)?;
        if res.is_none() {
            self.captures.rollback(idx);
        }
        Ok(res)
    }

    fn end_capture(&mut self, s: usize, p: usize) -> MatchOutcome {
        let idx = self
            .captures
            .nearest_unfinished()
            .ok_or(LexError::CaptureInvalidPattern)?;
        let start = self.captures.read(idx)?.start;
        self.captures.finish(idx, s - start);
        let res = self.do_match(s, p)?;
        if res.is_none() {
            self.captures.mark_unfinished(idx);
        }
        Ok(res)
    }

    /// Back-reference `%n`: the next units must repeat capture `n`.
    fn match_capture(&self, s: usize, n: usize) -> MatchOutcome {
        let cap = n
            .checked_sub(1)
            .and_then(|i| self.captures.read(i).ok())
            .ok_or(LexError::CaptureInvalidIndex)?;
        let len = match cap.state {
            CaptureState::Finished(len) => len,
            CaptureState::Unfinished => return Err(LexError::CaptureInvalidIndex),
            // A position capture has no text to repeat.
            CaptureState::Position => return Ok(None),
        };
        let captured = &self.subject[cap.start..cap.start + len];
        match self.subject.get(s..s + len) {
            Some(next) if next == captured => Ok(Some(s + len)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(subject: &str, pattern: &str) -> Option<(usize, usize)> {
        let pat = Pattern::new(pattern.as_bytes()).unwrap();
        let mut ms = MatchState::new(subject.as_bytes(), &pat);
        (0..=subject.len()).find_map(|start| {
            ms.attempt(start)
                .unwrap()
                .map(|end| (start, end))
        })
    }

    #[test]
    fn literal_and_dot() {
        assert_eq!(run("hello", "ll"), Some((2, 4)));
        assert_eq!(run("hello", "l.o"), Some((2, 5)));
        assert_eq!(run("hello", "xyz"), None);
    }

    #[test]
    fn greedy_and_lazy() {
        assert_eq!(run("aaab", "a*"), Some((0, 3)));
        assert_eq!(run("aaab", "a-"), Some((0, 0)));
        assert_eq!(run("aaab", "a-b"), Some((0, 4)));
        assert_eq!(run("aabaaabaaabaaaba", "b.*b"), Some((2, 15)));
        assert_eq!(run("aabaaabaaabaaaba", "b.-b"), Some((2, 7)));
    }

    #[test]
    fn optional_prefers_one() {
        assert_eq!(run("aaab", ".?b"), Some((2, 4)));
        assert_eq!(run("b", ".?b"), Some((0, 1)));
    }

    #[test]
    fn plus_requires_one() {
        assert_eq!(run("aaa", "b+"), None);
        assert_eq!(run("aba", "ab+a"), Some((0, 3)));
    }

    #[test]
    fn end_anchor_only_when_last() {
        assert_eq!(run("a$a", ".$"), Some((2, 3)));
        assert_eq!(run("a$a", ".$."), Some((0, 3)));
        assert_eq!(run("a$b", "a$"), None);
    }

    #[test]
    fn balanced() {
        assert_eq!(run("x (9 (8) 7) y", "%b()"), Some((2, 11)));
        assert_eq!(run("(unclosed", "%b()"), None);
    }

    #[test]
    fn frontier() {
        assert_eq!(run("THE (quick) fox", "%f[%a]%a+"), Some((0, 3)));
        assert_eq!(run("aba", "%f[%z]"), Some((3, 3)));
        assert_eq!(run("aba", "%f[a%z]"), Some((2, 2)));
    }

    #[test]
    fn back_reference() {
        assert_eq!(run("xuxx uu", "(.)%1"), Some((2, 4)));
        assert_eq!(run("abc", "(.)%1"), None);
    }

    #[test]
    fn captures_roll_back_on_failure() {
        let pat = Pattern::new(b"(a)(b)c").unwrap();
        let mut ms = MatchState::new(b"abx", &pat);
        assert_eq!(ms.attempt(0).unwrap(), None);
        assert!(ms.captures.is_empty());
    }

    #[test]
    fn position_capture_is_recorded() {
        let pat = Pattern::new(b"()aa()").unwrap();
        let mut ms = MatchState::new(b"flaaap", &pat);
        assert_eq!(ms.attempt(2).unwrap(), Some(4));
        let caps: Vec<_> = ms.captures.iter().copied().collect();
        assert_eq!(caps[0].start, 2);
        assert_eq!(caps[0].state, CaptureState::Position);
        assert_eq!(caps[1].start, 4);
        assert_eq!(caps[1].state, CaptureState::Position);
    }

    #[test]
    fn pattern_at_depth_limit_matches() {
        let pat = Pattern::builder(b"a?a?a?a?").max_depth(4).build().unwrap();
        let mut ms = MatchState::new(b"aaaa", &pat);
        assert_eq!(ms.attempt(0).unwrap(), Some(4));
        assert_eq!(ms.attempt(4).unwrap(), Some(4));

        let pat = Pattern::builder(b"(a)(b)").max_depth(4).build().unwrap();
        let mut ms = MatchState::new(b"ab", &pat);
        assert_eq!(ms.attempt(0).unwrap(), Some(2));
    }

    #[test]
    fn depth_budget_is_restored_after_error() {
        let pat = Pattern::builder(b"a?a?a?a?").max_depth(4).build().unwrap();
        let mut ms = MatchState::new(b"aaaa", &pat);
        ms.limit_depth(3);
        assert_eq!(ms.attempt(0), Err(LexError::PatternTooComplex));
        assert_eq!(ms.depth, 3);
    }

    #[test]
    fn long_literal_runs_do_not_recurse() {
        let text = "ab".repeat(100);
        let pat = Pattern::new(text.as_bytes()).unwrap();
        let subject = text.repeat(2);
        let mut ms = MatchState::new(subject.as_bytes(), &pat);
        assert_eq!(ms.attempt(0).unwrap(), Some(200));
    }
}
