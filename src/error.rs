// error.rs - Error taxonomy for pattern compilation, matching and substitution.
//
// A flat set of failure kinds. Each carries a stable numeric code (its
// position in the taxonomy) so callers can store or forward it as a plain
// integer.

use std::fmt;

/// Error type for pattern compilation, matching and substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexError {
    /// Pattern nests too deeply or has too many items for the depth budget.
    PatternTooComplex,
    /// Pattern ends with a bare `%`.
    PatternEndsWithPercent,
    /// A `[` set is never closed.
    PatternMissingClosingBracket,
    /// `%b` is not followed by two characters.
    BalancedNoArguments,
    /// `%f` is not followed by `[`.
    FrontierNoOpenBracket,
    /// More than [`MAX_CAPTURES`](crate::capture::MAX_CAPTURES) captures.
    CaptureTooMany,
    /// A `)` without a matching `(`.
    CaptureInvalidPattern,
    /// Reference to a capture that does not exist or is not closed yet.
    CaptureInvalidIndex,
    /// Pattern ends while a capture is still open.
    CaptureNotFinished,
    /// Capture index past the number of captures in a match result.
    CaptureOutOfRange,
    /// `%` followed by something other than `%` or a digit in a replacement.
    PercentInvalidUseInReplacement,
}

const ALL: [LexError; 11] = [
    LexError::PatternTooComplex,
    LexError::PatternEndsWithPercent,
    LexError::PatternMissingClosingBracket,
    LexError::BalancedNoArguments,
    LexError::FrontierNoOpenBracket,
    LexError::CaptureTooMany,
    LexError::CaptureInvalidPattern,
    LexError::CaptureInvalidIndex,
    LexError::CaptureNotFinished,
    LexError::CaptureOutOfRange,
    LexError::PercentInvalidUseInReplacement,
];

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            LexError::PatternTooComplex => "pattern too complex",
            LexError::PatternEndsWithPercent => "malformed pattern (ends with '%')",
            LexError::PatternMissingClosingBracket => "malformed pattern (missing ']')",
            LexError::BalancedNoArguments => "malformed pattern (missing arguments to '%b')",
            LexError::FrontierNoOpenBracket => "missing '[' after '%f' in pattern",
            LexError::CaptureTooMany => "too many captures",
            LexError::CaptureInvalidPattern => "invalid pattern capture",
            LexError::CaptureInvalidIndex => "invalid capture index",
            LexError::CaptureNotFinished => "unfinished capture",
            LexError::CaptureOutOfRange => "capture index out of range",
            LexError::PercentInvalidUseInReplacement => {
                "invalid use of '%' in replacement string"
            }
        };
        f.write_str(msg)
    }
}

impl std::error::Error for LexError {}

impl LexError {
    /// Stable numeric code of this error.
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Inverse of [`code`](Self::code).
    pub fn from_code(code: i32) -> Option<LexError> {
        usize::try_from(code).ok().and_then(|i| ALL.get(i).copied())
    }

    /// Returns `true` for errors that compiling a pattern can raise.
    ///
    /// [`CaptureInvalidIndex`](Self::CaptureInvalidIndex) is one of them, but
    /// [`gsub`](crate::gsub()) also raises it for a template reference to a
    /// capture the match does not have.
    pub fn is_pattern_error(&self) -> bool {
        !matches!(
            self,
            LexError::CaptureOutOfRange | LexError::PercentInvalidUseInReplacement
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_taxonomy_order() {
        assert_eq!(LexError::PatternTooComplex.code(), 0);
        assert_eq!(LexError::CaptureNotFinished.code(), 8);
        assert_eq!(LexError::PercentInvalidUseInReplacement.code(), 10);
    }

    #[test]
    fn from_code_round_trips() {
        for err in ALL {
            assert_eq!(LexError::from_code(err.code()), Some(err));
        }
        assert_eq!(LexError::from_code(-1), None);
        assert_eq!(LexError::from_code(11), None);
    }

    #[test]
    fn display_impl() {
        assert_eq!(LexError::CaptureTooMany.to_string(), "too many captures");
        assert_eq!(
            LexError::PatternMissingClosingBracket.to_string(),
            "malformed pattern (missing ']')"
        );
    }

    #[test]
    fn pattern_errors() {
        assert!(LexError::BalancedNoArguments.is_pattern_error());
        assert!(LexError::CaptureInvalidIndex.is_pattern_error());
        assert!(!LexError::CaptureOutOfRange.is_pattern_error());
        assert!(!LexError::PercentInvalidUseInReplacement.is_pattern_error());
    }

    #[test]
    fn error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(LexError::PatternTooComplex);
        assert_eq!(err.to_string(), "pattern too complex");
    }
}
