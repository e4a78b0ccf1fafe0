// api.rs - Convenience functions over UTF-8 text.
//
// Compiles the pattern on every call and works on the bytes of `&str`
// subjects. Callers matching one pattern many times should compile a
// `Pattern` once and use the generic functions instead.

use crate::error::LexError;
use crate::gsub::Replace;
use crate::pattern::Pattern;
use crate::result::MatchResult;
use crate::search::GMatch;

/// First match of `pattern` in `subject`.
///
/// # Examples
///
/// ```
/// let m = lexmatch::api::find("key = value", "(%w+)%s*=%s*(%w+)").unwrap();
/// assert_eq!(m.capture(0).unwrap().as_str(), "key");
/// assert_eq!(m.capture(1).unwrap().as_str(), "value");
/// ```
pub fn find<'s>(subject: &'s str, pattern: &str) -> Result<MatchResult<'s, u8>, LexError> {
    let pat = Pattern::from_text(pattern)?;
    crate::search::find(subject.as_bytes(), &pat)
}

/// Returns `true` if `pattern` matches anywhere in `subject`.
pub fn is_match(subject: &str, pattern: &str) -> Result<bool, LexError> {
    find(subject, pattern).map(|m| m.is_match())
}

/// Iterate over all matches of `pattern` in `subject`.
pub fn gmatch<'s, 'p>(
    subject: &'s str,
    pattern: &'p str,
) -> Result<GMatch<'s, 'p, u8, u8>, LexError> {
    let pat = Pattern::from_text(pattern)?;
    Ok(crate::search::gmatch(subject.as_bytes(), &pat))
}

/// Replace up to `limit` matches (all when negative) and return the text.
///
/// Splicing by bytes can split a multi-byte character; any invalid UTF-8
/// in the output is replaced with U+FFFD.
///
/// # Examples
///
/// ```
/// let out = lexmatch::api::gsub("hello world", "o", "0", -1).unwrap();
/// assert_eq!(out, "hell0 w0rld");
/// ```
pub fn gsub<R: Replace<u8>>(
    subject: &str,
    pattern: &str,
    repl: R,
    limit: isize,
) -> Result<String, LexError> {
    let pat = Pattern::from_text(pattern)?;
    let out = crate::gsub::gsub(subject.as_bytes(), &pat, repl, limit)?;
    Ok(match String::from_utf8(out) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_and_is_match() {
        let m = find("hello 42", "%d+").unwrap();
        assert_eq!(m.as_str(), "42");
        assert_eq!(m.position(), Some(6));
        assert!(is_match("hello", "l+").unwrap());
        assert!(!is_match("hello", "^l").unwrap());
    }

    #[test]
    fn compile_errors_surface() {
        assert_eq!(find("x", "[a").unwrap_err(), LexError::PatternMissingClosingBracket);
        assert!(gmatch("x", "%").is_err());
        assert_eq!(gsub("x", "(", "", -1).unwrap_err(), LexError::CaptureNotFinished);
    }

    #[test]
    fn gmatch_words() {
        let words: Vec<_> = gmatch("one two", "%a+")
            .unwrap()
            .map(|m| m.unwrap().as_str().to_owned())
            .collect();
        assert_eq!(words, vec!["one", "two"]);
    }

    #[test]
    fn gsub_lossy() {
        // `.` matches a single byte, cutting the two-byte é in half.
        let out = gsub("é", ".", "%0-", 1).unwrap();
        assert_eq!(out, "\u{fffd}-\u{fffd}");
    }
}
