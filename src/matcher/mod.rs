//! Regex matching for candidate addresses.
//!
//! Two independent patterns: "acceptable" triggers persistence,
//! "final" triggers termination. Both include any 0x-prefix convention
//! themselves.

mod pattern;

pub use pattern::PatternPair;
