// prelude.rs - Convenient re-exports for the generic API.
//
//! # Prelude
//!
//! ```
//! use lexmatch::prelude::*;
//!
//! let pat = Pattern::new(b"%a+").unwrap();
//! let m = find(b"  answer", &pat).unwrap();
//! assert_eq!(m.as_str(), "answer");
//! ```

pub use crate::error::LexError;
pub use crate::gsub::{gsub, Replace};
pub use crate::pattern::{Pattern, PatternBuilder};
pub use crate::result::{Match, MatchResult};
pub use crate::search::{find, gmatch, GMatch};
pub use crate::unit::CodeUnit;
