//! The acceptable/final regex pair.

use regex::Regex;

use crate::error::{Error, Result};

/// The two compiled patterns driving one search run.
///
/// An acceptable match is persisted; a final match additionally stops the
/// search. Read-only after construction, so workers share it without any
/// locking.
#[derive(Debug, Clone)]
pub struct PatternPair {
    accept_re: Regex,
    final_re: Regex,
}

impl PatternPair {
    /// Compiles both patterns.
    ///
    /// Fails on the first non-compiling pattern, before any worker is
    /// launched.
    pub fn compile(acceptable: &str, final_pattern: &str) -> Result<Self> {
        Ok(Self {
            accept_re: compile_one(acceptable)?,
            final_re: compile_one(final_pattern)?,
        })
    }

    /// True when the address should be persisted.
    #[inline]
    pub fn is_acceptable(&self, address: &str) -> bool {
        self.accept_re.is_match(address)
    }

    /// True when the address ends the search.
    #[inline]
    pub fn is_final(&self, address: &str) -> bool {
        self.final_re.is_match(address)
    }

    pub fn acceptable(&self) -> &str {
        self.accept_re.as_str()
    }

    pub fn final_pattern(&self) -> &str {
        self.final_re.as_str()
    }
}

fn compile_one(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })
}
