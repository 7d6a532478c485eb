//! Error taxonomy for the miner.
//!
//! Every variant is terminal. There is no retry path in the search; the
//! only non-error shutdown is cooperative cancellation, which is not
//! represented here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A pattern string did not compile as a regular expression.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The entropy source failed or produced an unusable scalar.
    ///
    /// Fatal to the whole search, not just the worker that hit it: a
    /// compromised entropy source invalidates every candidate.
    #[error("entropy source failed: {0}")]
    Entropy(String),

    /// Writing a matched record to the sink failed.
    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),

    /// A worker thread panicked instead of returning a result.
    #[error("worker thread panicked")]
    WorkerPanic,
}

pub type Result<T> = std::result::Result<T, Error>;
