// unit.rs - Code-unit abstraction and character classification.
//
// The engine never looks at a concrete string type. Subjects, patterns and
// replacement templates are slices of some `CodeUnit`, and every comparison
// goes through the unit's unsigned value.

use std::fmt;

use bitflags::bitflags;

/// A single element of a subject, pattern or replacement sequence.
///
/// All comparisons, ranges and class tests operate on [`value`](Self::value),
/// so a zero unit is ordinary data everywhere.
pub trait CodeUnit: Copy + Eq + fmt::Debug {
    /// Unsigned value of the unit.
    fn value(self) -> u32;

    /// Builds a unit from an ASCII byte.
    fn from_ascii(b: u8) -> Self;

    /// Index of the first unit in `haystack` whose value is `needle`.
    fn find(haystack: &[Self], needle: u32) -> Option<usize> {
        haystack.iter().position(|u| u.value() == needle)
    }

    /// Returns `true` if this unit is the ASCII byte `b`.
    #[inline]
    fn is(self, b: u8) -> bool {
        self.value() == b as u32
    }
}

impl CodeUnit for u8 {
    #[inline]
    fn value(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_ascii(b: u8) -> Self {
        b
    }

    fn find(haystack: &[u8], needle: u32) -> Option<usize> {
        let needle = u8::try_from(needle).ok()?;
        memchr::memchr(needle, haystack)
    }
}

impl CodeUnit for u16 {
    #[inline]
    fn value(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_ascii(b: u8) -> Self {
        b as u16
    }
}

impl CodeUnit for u32 {
    #[inline]
    fn value(self) -> u32 {
        self
    }

    #[inline]
    fn from_ascii(b: u8) -> Self {
        b as u32
    }
}

impl CodeUnit for char {
    #[inline]
    fn value(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_ascii(b: u8) -> Self {
        b as char
    }
}

// === Classification ===

bitflags! {
    /// Character-type bits for the ASCII range.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Ctype: u16 {
        const ALPHA = 1 << 0;
        const CNTRL = 1 << 1;
        const DIGIT = 1 << 2;
        const GRAPH = 1 << 3;
        const LOWER = 1 << 4;
        const PUNCT = 1 << 5;
        const SPACE = 1 << 6;
        const UPPER = 1 << 7;
        const XDIGIT = 1 << 8;
    }
}

const fn ascii_ctype_bits(c: u8) -> u16 {
    let mut bits = 0;
    if c.is_ascii_alphabetic() {
        bits |= Ctype::ALPHA.bits();
    }
    if c.is_ascii_control() {
        bits |= Ctype::CNTRL.bits();
    }
    if c.is_ascii_digit() {
        bits |= Ctype::DIGIT.bits();
    }
    if c.is_ascii_graphic() {
        bits |= Ctype::GRAPH.bits();
    }
    if c.is_ascii_lowercase() {
        bits |= Ctype::LOWER.bits();
    }
    if c.is_ascii_punctuation() {
        bits |= Ctype::PUNCT.bits();
    }
    // C's isspace also accepts vertical tab.
    if matches!(c, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r') {
        bits |= Ctype::SPACE.bits();
    }
    if c.is_ascii_uppercase() {
        bits |= Ctype::UPPER.bits();
    }
    if c.is_ascii_hexdigit() {
        bits |= Ctype::XDIGIT.bits();
    }
    bits
}

const fn build_ascii_ctype_table() -> [u16; 128] {
    let mut table = [0u16; 128];
    let mut i = 0;
    while i < 128 {
        table[i] = ascii_ctype_bits(i as u8);
        i += 1;
    }
    table
}

static ASCII_CTYPE_TABLE: [u16; 128] = build_ascii_ctype_table();

/// Classification of a unit value. Values outside ASCII have no class.
#[inline]
pub fn ctype_of(c: u32) -> Ctype {
    match ASCII_CTYPE_TABLE.get(c as usize) {
        Some(&bits) => Ctype::from_bits_retain(bits),
        None => Ctype::empty(),
    }
}

/// Tests `c` against the class letter `cl` (the character after `%`).
///
/// Lowercase letters select a class, uppercase letters its complement, and
/// any other unit matches itself literally.
pub fn match_class(c: u32, cl: u32) -> bool {
    let Ok(letter) = u8::try_from(cl) else {
        return cl == c;
    };
    let flags = match letter.to_ascii_lowercase() {
        b'a' => Ctype::ALPHA,
        b'c' => Ctype::CNTRL,
        b'd' => Ctype::DIGIT,
        b'g' => Ctype::GRAPH,
        b'l' => Ctype::LOWER,
        b'p' => Ctype::PUNCT,
        b's' => Ctype::SPACE,
        b'u' => Ctype::UPPER,
        b'w' => Ctype::ALPHA | Ctype::DIGIT,
        b'x' => Ctype::XDIGIT,
        b'z' => {
            let res = c == 0;
            return if letter.is_ascii_uppercase() { !res } else { res };
        }
        _ => return cl == c,
    };
    let res = ctype_of(c).intersects(flags);
    if letter.is_ascii_uppercase() {
        !res
    } else {
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctype_table() {
        assert!(ctype_of(b'a' as u32).contains(Ctype::ALPHA | Ctype::LOWER | Ctype::XDIGIT));
        assert!(ctype_of(b'Z' as u32).contains(Ctype::UPPER));
        assert!(ctype_of(0x0b).contains(Ctype::SPACE));
        assert!(ctype_of(b'~' as u32).contains(Ctype::PUNCT | Ctype::GRAPH));
        assert!(ctype_of(0x7f).contains(Ctype::CNTRL));
        assert_eq!(ctype_of(0xe9), Ctype::empty());
        assert_eq!(ctype_of(0x1_0000), Ctype::empty());
    }

    #[test]
    fn class_letters() {
        assert!(match_class(b'q' as u32, b'a' as u32));
        assert!(!match_class(b'1' as u32, b'a' as u32));
        assert!(match_class(b'1' as u32, b'A' as u32));
        assert!(match_class(b'5' as u32, b'w' as u32));
        assert!(match_class(b'_' as u32, b'p' as u32));
        assert!(match_class(b'F' as u32, b'x' as u32));
        assert!(!match_class(b'g' as u32, b'x' as u32));
        assert!(match_class(b' ' as u32, b's' as u32));
        assert!(!match_class(b' ' as u32, b'g' as u32));
    }

    #[test]
    fn zero_class() {
        assert!(match_class(0, b'z' as u32));
        assert!(!match_class(b'a' as u32, b'z' as u32));
        assert!(match_class(b'a' as u32, b'Z' as u32));
        assert!(!match_class(0, b'Z' as u32));
    }

    #[test]
    fn non_class_escape_is_literal() {
        assert!(match_class(b'%' as u32, b'%' as u32));
        assert!(match_class(b']' as u32, b']' as u32));
        assert!(!match_class(b'[' as u32, b']' as u32));
        assert!(match_class(0, 0));
        assert!(match_class(0x263a, 0x263a));
    }

    #[test]
    fn find_units() {
        assert_eq!(u8::find(b"hello", b'l' as u32), Some(2));
        assert_eq!(u8::find(b"hello", 0x1_0000), None);
        assert_eq!(u16::find(&[1, 2, 3], 3), Some(2));
        assert_eq!(char::find(&['a', 'β'], 'β' as u32), Some(1));
        assert!(b'%'.is(b'%'));
        assert_eq!(u32::from_ascii(b'7'), 0x37);
    }
}
