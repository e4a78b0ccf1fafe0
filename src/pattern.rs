// pattern.rs - Pattern compiler.
//
// Validates pattern text in a single left-to-right scan. A `Pattern` is only
// ever built through this scan, so the matcher can rely on its structure
// (escapes have an argument, sets are closed, captures balance).

use std::fmt;

use crate::capture::MAX_CAPTURES;
use crate::error::LexError;
use crate::unit::CodeUnit;

/// Default recursion-depth budget for one matching call.
pub const DEFAULT_MAX_DEPTH: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureProgress {
    Available,
    Unfinished,
    Finished,
}

/// A compiled pattern: a validated view into caller-owned pattern text.
///
/// # Examples
///
/// ```
/// use lexmatch::Pattern;
///
/// let pat = Pattern::new(b"^(%a+)=(%d+)").unwrap();
/// assert!(pat.is_anchored());
/// assert_eq!(pat.captures_len(), 2);
/// ```
#[derive(Clone, Copy)]
pub struct Pattern<'p, P> {
    units: &'p [P],
    anchor: bool,
    captures: usize,
    max_depth: usize,
    first_unit: Option<u32>,
}

impl<'p, P: CodeUnit> Pattern<'p, P> {
    /// Compile `text` with the default depth budget.
    pub fn new(text: &'p [P]) -> Result<Self, LexError> {
        compile(text, DEFAULT_MAX_DEPTH)
    }

    /// Create a [`PatternBuilder`] for custom limits.
    pub fn builder(text: &'p [P]) -> PatternBuilder<'p, P> {
        PatternBuilder::new(text)
    }

    /// Returns `true` if the text started with `^`.
    pub fn is_anchored(&self) -> bool {
        self.anchor
    }

    /// Number of explicit captures, position captures included.
    pub fn captures_len(&self) -> usize {
        self.captures
    }

    /// Recursion-depth budget for one matching call.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Pattern items, without the leading `^`.
    pub fn as_units(&self) -> &'p [P] {
        self.units
    }

    /// Value every match must start with, when the first item is a plain
    /// literal that cannot be skipped.
    pub(crate) fn first_unit(&self) -> Option<u32> {
        self.first_unit
    }
}

impl<'p> Pattern<'p, u8> {
    /// Compile UTF-8 pattern text as bytes.
    pub fn from_text(text: &'p str) -> Result<Self, LexError> {
        Pattern::new(text.as_bytes())
    }
}

impl<P: CodeUnit> fmt::Debug for Pattern<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("anchor", &self.anchor)
            .field("captures", &self.captures)
            .field("len", &self.units.len())
            .finish_non_exhaustive()
    }
}

// === PatternBuilder ===

/// Builder for compiling a [`Pattern`] with custom limits.
///
/// # Examples
///
/// ```
/// use lexmatch::Pattern;
///
/// let pat = Pattern::builder(b"a?a?a?aaa").max_depth(8).build().unwrap();
/// assert_eq!(pat.max_depth(), 8);
/// ```
pub struct PatternBuilder<'p, P> {
    text: &'p [P],
    max_depth: usize,
}

impl<'p, P: CodeUnit> PatternBuilder<'p, P> {
    pub fn new(text: &'p [P]) -> Self {
        PatternBuilder {
            text,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Bound for both the item count at compile time and the matcher's
    /// recursion depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn build(self) -> Result<Pattern<'p, P>, LexError> {
        compile(self.text, self.max_depth)
    }
}

// === Compilation ===

fn compile<P: CodeUnit>(text: &[P], max_depth: usize) -> Result<Pattern<'_, P>, LexError> {
    let anchor = text.first().is_some_and(|u| u.is(b'^'));
    let units = if anchor { &text[1..] } else { text };

    match validate(units, max_depth) {
        Ok((captures, depth)) => {
            log::trace!(
                "compiled pattern: anchor={anchor} captures={captures} depth={depth} len={}",
                units.len()
            );
            Ok(Pattern {
                units,
                anchor,
                captures,
                max_depth,
                first_unit: leading_literal(units),
            })
        }
        Err(err) => {
            log::debug!("pattern rejected: {err}");
            Err(err)
        }
    }
}

/// Returns the number of captures and the item depth.
fn validate<P: CodeUnit>(units: &[P], max_depth: usize) -> Result<(usize, usize), LexError> {
    let end = units.len();
    let mut captures = [CaptureProgress::Available; MAX_CAPTURES];
    let mut level = 0;
    let mut depth = 0;
    let mut q = 0;

    while q < end {
        let u = units[q];
        if u.is(b'(') {
            if level >= MAX_CAPTURES {
                return Err(LexError::CaptureTooMany);
            }
            captures[level] = CaptureProgress::Unfinished;
            level += 1;
            q += 1;
            depth += 1;
            continue;
        }
        if u.is(b')') {
            let open = captures[..level]
                .iter()
                .rposition(|&c| c == CaptureProgress::Unfinished)
                .ok_or(LexError::CaptureInvalidPattern)?;
            captures[open] = CaptureProgress::Finished;
            q += 1;
            depth += 1;
            continue;
        }
        if u.is(b'$') && q + 1 == end {
            q += 1;
            continue;
        }

        if u.is(b'%') {
            q += 1;
            let Some(&escaped) = units.get(q) else {
                return Err(LexError::PatternEndsWithPercent);
            };
            if escaped.is(b'b') {
                if q + 2 >= end {
                    return Err(LexError::BalancedNoArguments);
                }
                q += 3;
                depth += 1;
                continue;
            }
            if escaped.is(b'f') {
                q += 1;
                if !units.get(q).is_some_and(|u| u.is(b'[')) {
                    return Err(LexError::FrontierNoOpenBracket);
                }
                q = bracket_end(units, q)?;
                depth += 1;
                continue;
            }
            if let Some(digit) = ascii_digit(escaped) {
                let finished = digit
                    .checked_sub(1)
                    .filter(|&i| i < level)
                    .is_some_and(|i| captures[i] == CaptureProgress::Finished);
                if !finished {
                    return Err(LexError::CaptureInvalidIndex);
                }
                q += 1;
                depth += 1;
                continue;
            }
            q += 1;
        } else if u.is(b'[') {
            q = bracket_end(units, q)?;
        } else {
            q += 1;
        }

        if units.get(q).is_some_and(|&u| is_quantifier(u)) {
            q += 1;
        }
        depth += 1;
    }

    if captures[..level]
        .iter()
        .any(|&c| c != CaptureProgress::Finished)
    {
        return Err(LexError::CaptureNotFinished);
    }
    if depth > max_depth {
        return Err(LexError::PatternTooComplex);
    }
    Ok((level, depth))
}

/// Index one past the `]` closing the set that opens at `open`.
///
/// The first member (after an optional `^`) is always taken literally, so
/// `[]]` and `[^]]` are sets containing `]`.
pub(crate) fn bracket_end<P: CodeUnit>(units: &[P], open: usize) -> Result<usize, LexError> {
    let end = units.len();
    let mut i = open + 1;
    if units.get(i).is_some_and(|u| u.is(b'^')) {
        i += 1;
    }
    loop {
        if i >= end {
            return Err(LexError::PatternMissingClosingBracket);
        }
        let u = units[i];
        i += 1;
        if u.is(b'%') && i < end {
            i += 1;
        }
        match units.get(i) {
            None => return Err(LexError::PatternMissingClosingBracket),
            Some(u) if u.is(b']') => return Ok(i + 1),
            Some(_) => {}
        }
    }
}

#[inline]
pub(crate) fn is_quantifier<P: CodeUnit>(u: P) -> bool {
    matches!(u.value(), 0x2a | 0x2b | 0x2d | 0x3f) // * + - ?
}

#[inline]
pub(crate) fn ascii_digit<P: CodeUnit>(u: P) -> Option<usize> {
    let v = u.value();
    (0x30..=0x39).contains(&v).then(|| (v - 0x30) as usize)
}

fn leading_literal<P: CodeUnit>(units: &[P]) -> Option<u32> {
    let first = *units.first()?;
    if [b'(', b')', b'%', b'.', b'[', b'$'].iter().any(|&b| first.is(b)) {
        return None;
    }
    match units.get(1) {
        Some(&next) if next.is(b'*') || next.is(b'?') || next.is(b'-') => None,
        _ => Some(first.value()),
    }
}
