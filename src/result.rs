// result.rs - Match results handed back to callers.
//
// A `MatchResult` owns a snapshot of the capture table taken when the
// matcher succeeded and borrows the subject it was produced from.

use std::fmt;
use std::ops::Range;

use crate::capture::{CaptureSet, CaptureState};
use crate::error::LexError;
use crate::unit::CodeUnit;

// === MatchResult ===

/// Outcome of one match attempt.
///
/// When the pattern has no explicit captures, capture 0 is the whole match.
///
/// # Examples
///
/// ```
/// use lexmatch::{find, Pattern};
///
/// let pat = Pattern::new(b"(%a+)=(%d+)").unwrap();
/// let m = find(b"let width=640;", &pat).unwrap();
/// assert_eq!(m.range(), Some(4..13));
/// assert_eq!(m.at(0).unwrap(), b"width");
/// assert_eq!(m.at(1).unwrap(), b"640");
/// ```
#[derive(Clone)]
pub struct MatchResult<'s, S> {
    subject: &'s [S],
    span: Option<(usize, usize)>,
    captures: CaptureSet,
}

impl<'s, S: CodeUnit> MatchResult<'s, S> {
    /// The result of a search that found nothing.
    pub(crate) fn empty(subject: &'s [S]) -> Self {
        MatchResult {
            subject,
            span: None,
            captures: CaptureSet::new(),
        }
    }

    pub(crate) fn new(subject: &'s [S], start: usize, end: usize, captures: CaptureSet) -> Self {
        let captures = if captures.is_empty() {
            CaptureSet::whole(start, end - start)
        } else {
            captures
        };
        MatchResult {
            subject,
            span: Some((start, end)),
            captures,
        }
    }

    /// Returns `true` if the search found a match.
    pub fn is_match(&self) -> bool {
        self.span.is_some()
    }

    /// Offset of the first unit of the match.
    pub fn position(&self) -> Option<usize> {
        self.span.map(|(start, _)| start)
    }

    /// Range of the whole match.
    pub fn range(&self) -> Option<Range<usize>> {
        self.span.map(|(start, end)| start..end)
    }

    /// Length of the whole match, 0 when nothing matched.
    pub fn length(&self) -> usize {
        self.span.map_or(0, |(start, end)| end - start)
    }

    /// Number of captures. Zero only when nothing matched.
    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    /// The whole match, or an empty slice when nothing matched.
    pub fn as_slice(&self) -> &'s [S] {
        match self.span {
            Some((start, end)) => &self.subject[start..end],
            None => &[],
        }
    }

    /// Capture `i`, counting from 0.
    pub fn capture(&self, i: usize) -> Result<Match<'s, S>, LexError> {
        let cap = self.captures.read(i)?;
        let (end, position) = match cap.state {
            CaptureState::Finished(len) => (cap.start + len, false),
            CaptureState::Position => (cap.start, true),
            CaptureState::Unfinished => return Err(LexError::CaptureNotFinished),
        };
        Ok(Match {
            subject: self.subject,
            start: cap.start,
            end,
            position,
        })
    }

    /// Text of capture `i`. A position capture yields an empty slice.
    pub fn at(&self, i: usize) -> Result<&'s [S], LexError> {
        self.capture(i).map(|m| m.as_slice())
    }

    /// Iterate over all captures in order.
    pub fn iter(&self) -> CapturesIter<'_, 's, S> {
        CapturesIter {
            result: self,
            index: 0,
        }
    }
}

impl<'s> MatchResult<'s, u8> {
    /// The whole match as a `&str`.
    ///
    /// # Panics
    ///
    /// Panics if the matched bytes are not valid UTF-8.
    pub fn as_str(&self) -> &'s str {
        std::str::from_utf8(self.as_slice()).expect("match is not valid UTF-8")
    }
}

impl<S: CodeUnit> fmt::Debug for MatchResult<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchResult")
            .field("range", &self.range())
            .field("captures", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

// === Match ===

/// One capture of a [`MatchResult`], referencing the subject.
#[derive(Debug, Clone, Copy)]
pub struct Match<'s, S> {
    subject: &'s [S],
    start: usize,
    end: usize,
    position: bool,
}

impl<'s, S: CodeUnit> Match<'s, S> {
    /// Offset of the first captured unit.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Offset one past the last captured unit.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The captured units.
    pub fn as_slice(&self) -> &'s [S] {
        &self.subject[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` for a `()` capture, which records only its offset.
    pub fn is_position(&self) -> bool {
        self.position
    }
}

impl<'s> Match<'s, u8> {
    /// The captured text as a `&str`.
    ///
    /// # Panics
    ///
    /// Panics if the captured bytes are not valid UTF-8.
    pub fn as_str(&self) -> &'s str {
        std::str::from_utf8(self.as_slice()).expect("capture is not valid UTF-8")
    }
}

// === CapturesIter ===

/// Iterator over the captures of a [`MatchResult`].
///
/// Yields `None` for a capture that never closed.
pub struct CapturesIter<'r, 's, S> {
    result: &'r MatchResult<'s, S>,
    index: usize,
}

impl<'s, S: CodeUnit> Iterator for CapturesIter<'_, 's, S> {
    type Item = Option<Match<'s, S>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.result.len() {
            return None;
        }
        let m = self.result.capture(self.index).ok();
        self.index += 1;
        Some(m)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.result.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<S: CodeUnit> ExactSizeIterator for CapturesIter<'_, '_, S> {}
