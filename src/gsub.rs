// gsub.rs - Substitution engine.
//
// Copies the subject to a fresh buffer, splicing a replacement in place of
// each match. Replacements are either templates with `%` escapes or
// callbacks that build the text from the match.

use crate::error::LexError;
use crate::pattern::{ascii_digit, Pattern};
use crate::result::MatchResult;
use crate::search::gmatch;
use crate::unit::CodeUnit;

/// Source of replacement text for [`gsub`].
///
/// Implemented for templates (`&[S]`, `&[S; N]`, and `&str` for byte
/// subjects) and for closures `FnMut(&MatchResult<S>) -> T` where
/// `T: AsRef<[S]>`.
///
/// In a template, `%0` is the whole match, `%1`..`%9` are captures and
/// `%%` is a literal `%`. An empty capture, position captures included,
/// renders as its 1-based offset.
pub trait Replace<S: CodeUnit> {
    /// Append the replacement for `m` to `out`.
    fn append(&mut self, m: &MatchResult<'_, S>, out: &mut Vec<S>) -> Result<(), LexError>;
}

impl<S: CodeUnit> Replace<S> for &[S] {
    fn append(&mut self, m: &MatchResult<'_, S>, out: &mut Vec<S>) -> Result<(), LexError> {
        expand_template(self, m, out)
    }
}

impl<S: CodeUnit, const N: usize> Replace<S> for &[S; N] {
    fn append(&mut self, m: &MatchResult<'_, S>, out: &mut Vec<S>) -> Result<(), LexError> {
        expand_template(self.as_slice(), m, out)
    }
}

impl Replace<u8> for &str {
    fn append(&mut self, m: &MatchResult<'_, u8>, out: &mut Vec<u8>) -> Result<(), LexError> {
        expand_template(self.as_bytes(), m, out)
    }
}

impl<S, F, T> Replace<S> for F
where
    S: CodeUnit,
    F: FnMut(&MatchResult<'_, S>) -> T,
    T: AsRef<[S]>,
{
    fn append(&mut self, m: &MatchResult<'_, S>, out: &mut Vec<S>) -> Result<(), LexError> {
        out.extend_from_slice((self)(m).as_ref());
        Ok(())
    }
}

fn expand_template<S: CodeUnit>(
    template: &[S],
    m: &MatchResult<'_, S>,
    out: &mut Vec<S>,
) -> Result<(), LexError> {
    let mut units = template.iter().copied();
    while let Some(u) = units.next() {
        if !u.is(b'%') {
            out.push(u);
            continue;
        }
        let escaped = units
            .next()
            .ok_or(LexError::PercentInvalidUseInReplacement)?;
        if escaped.is(b'%') {
            out.push(escaped);
            continue;
        }
        match ascii_digit(escaped) {
            Some(0) => out.extend_from_slice(m.as_slice()),
            Some(n) => append_capture(m, n - 1, out)?,
            None => return Err(LexError::PercentInvalidUseInReplacement),
        }
    }
    Ok(())
}

fn append_capture<S: CodeUnit>(
    m: &MatchResult<'_, S>,
    idx: usize,
    out: &mut Vec<S>,
) -> Result<(), LexError> {
    if idx >= m.len() {
        return Err(LexError::CaptureInvalidIndex);
    }
    let cap = m.capture(idx)?;
    if cap.is_empty() {
        let offset = (cap.start() + 1).to_string();
        out.extend(offset.bytes().map(S::from_ascii));
    } else {
        out.extend_from_slice(cap.as_slice());
    }
    Ok(())
}

/// Replace up to `limit` matches of `pattern` in `subject`.
///
/// A negative `limit` replaces every match; zero returns the subject
/// unchanged. An anchored pattern replaces at most the match at offset 0.
///
/// # Examples
///
/// ```
/// use lexmatch::{gsub, Pattern};
///
/// let pat = Pattern::new(b"(%w+)").unwrap();
/// let out = gsub(b"hello world", &pat, "%1 %1", -1).unwrap();
/// assert_eq!(out, b"hello hello world world");
///
/// let out = gsub(b"hello world", &pat, |m: &lexmatch::MatchResult<u8>| {
///     m.as_str().to_uppercase()
/// }, 1).unwrap();
/// assert_eq!(out, b"HELLO world");
/// ```
pub fn gsub<S: CodeUnit, P: CodeUnit, R: Replace<S>>(
    subject: &[S],
    pattern: &Pattern<'_, P>,
    mut repl: R,
    limit: isize,
) -> Result<Vec<S>, LexError> {
    let mut out = Vec::with_capacity(subject.len());
    let mut copied = 0;
    let mut budget = limit;
    let mut matches = gmatch(subject, pattern);

    while budget != 0 {
        let Some(m) = matches.next().transpose()? else {
            break;
        };
        let Some(range) = m.range() else {
            break;
        };
        out.extend_from_slice(&subject[copied..range.start]);
        repl.append(&m, &mut out)?;
        copied = range.end;
        if budget > 0 {
            budget -= 1;
        }
    }

    out.extend_from_slice(&subject[copied..]);
    Ok(out)
}
