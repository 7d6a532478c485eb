//! The parallel search loop.
//!
//! This module provides:
//! - The per-worker generate-test loop with cooperative shutdown
//! - The shared search state (termination flag, attempt counter, winner)
//! - The pool that spawns, observes, and joins the workers

mod cpu;
mod pool;

pub use cpu::{FinalMatch, SearchState, SearchWorker};
pub use pool::{SearchPool, SearchSummary};
