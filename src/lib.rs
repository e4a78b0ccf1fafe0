//! # lexmatch
//!
//! Lua-style pattern matching in pure Rust: compile a pattern, find a match,
//! iterate over all matches, and substitute with templates or callbacks.
//!
//! The engine is generic over the code unit. Subjects and patterns are
//! slices of `u8`, `u16`, `u32` or `char` (see [`CodeUnit`]), and the two
//! need not share a width.
//!
//! ## Quick Start
//!
//! ```rust
//! use lexmatch::prelude::*;
//!
//! let pat = Pattern::new(b"(%d+)-(%d+)").unwrap();
//! let m = find(b"pages 12-34", &pat).unwrap();
//! assert_eq!(m.as_str(), "12-34");
//! assert_eq!(m.capture(1).unwrap().as_str(), "34");
//!
//! let out = gsub(b"pages 12-34", &pat, "%2-%1", -1).unwrap();
//! assert_eq!(out, b"pages 34-12");
//! ```
//!
//! For one-off calls on `&str`, see the [`api`] module:
//!
//! ```rust
//! let out = lexmatch::api::gsub("hello world", "%f[%w]%w", "_", -1).unwrap();
//! assert_eq!(out, "_ello _orld");
//! ```
//!
//! ## Pattern Syntax
//!
//! | Item | Meaning |
//! |------|---------|
//! | `.` | any unit |
//! | `%a %c %d %g %l %p %s %u %w %x` | letters, controls, digits, printable, lowercase, punctuation, space, uppercase, alphanumerics, hex digits (uppercase letter = complement) |
//! | `%z` | the unit with value 0 |
//! | `%x` for non-alphanumeric `x` | the literal `x` |
//! | `[set]`, `[^set]` | a set of units, ranges `a-z` and classes `%d` |
//! | `*` `+` `-` `?` | greedy 0+, greedy 1+, lazy 0+, optional |
//! | `(...)`, `()` | capture, position capture |
//! | `%1`..`%9` | back-reference |
//! | `%bxy` | balanced `x`..`y` run |
//! | `%f[set]` | frontier |
//! | `^`, `$` | anchors (first and last position only) |
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`unit`] | Code-unit trait and character classes |
//! | [`error`] | Error taxonomy |
//! | [`pattern`] | Pattern compiler |
//! | [`capture`] | Capture store |
//! | `matcher` | Backtracking matcher |
//! | [`result`] | Match results |
//! | [`search`] | Iteration and single match |
//! | [`gsub`](mod@gsub) | Substitution |
//! | [`api`] | `&str` convenience functions |

pub mod api;
pub mod capture;
pub mod error;
pub mod gsub;
mod matcher;
pub mod pattern;
pub mod prelude;
pub mod result;
pub mod search;
pub mod unit;

pub use capture::MAX_CAPTURES;
pub use error::LexError;
pub use gsub::{gsub, Replace};
pub use pattern::{Pattern, PatternBuilder, DEFAULT_MAX_DEPTH};
pub use result::{CapturesIter, Match, MatchResult};
pub use search::{find, gmatch, GMatch};
pub use unit::CodeUnit;
