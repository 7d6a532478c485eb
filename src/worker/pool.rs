//! The search coordinator: spawns workers, joins them, folds the run
//! into a summary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver};

use crate::crypto::{Candidate, CandidateSource};
use crate::error::{Error, Result};
use crate::matcher::PatternPair;
use crate::sink::ResultSink;

use super::cpu::{FinalMatch, SearchState, SearchWorker};

/// Outcome of one completed search run.
#[derive(Debug)]
pub struct SearchSummary {
    /// Total generate-test iterations across all workers.
    pub attempts: u64,
    /// Wall time from spawn to the last worker exiting.
    pub elapsed: Duration,
    /// The candidate that matched the final pattern, if any.
    pub winner: Option<Candidate>,
}

impl SearchSummary {
    /// Throughput, or `None` on an instantaneous run.
    pub fn attempts_per_second(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        (secs > 0.0).then(|| self.attempts as f64 / secs)
    }
}

/// A fixed pool of search workers.
///
/// The pool size is the concurrency limit: there is no work queue and no
/// resizing, each worker runs its own independent generate-test loop.
pub struct SearchPool {
    handles: Option<Vec<JoinHandle<Result<()>>>>,
    found_rx: Receiver<FinalMatch>,
    state: Arc<SearchState>,
    cancel: Arc<AtomicBool>,
    start: Instant,
}

impl SearchPool {
    /// Spawns exactly `workers` threads, each with its own candidate
    /// source built by `make_source`.
    ///
    /// `cancel` is the external stop signal (typically wired to Ctrl-C);
    /// the pool raises it itself when a worker aborts with an error.
    pub fn spawn<G, S, F>(
        workers: usize,
        patterns: PatternPair,
        sink: Arc<S>,
        cancel: Arc<AtomicBool>,
        mut make_source: F,
    ) -> Self
    where
        G: CandidateSource + 'static,
        S: ResultSink + 'static,
        F: FnMut(usize) -> G,
    {
        let (found_tx, found_rx) = bounded(1);
        let state = Arc::new(SearchState::new());
        let patterns = Arc::new(patterns);

        let handles = (0..workers)
            .map(|id| {
                let worker = SearchWorker::new(
                    id,
                    make_source(id),
                    patterns.clone(),
                    sink.clone(),
                    state.clone(),
                    cancel.clone(),
                    found_tx.clone(),
                );
                thread::Builder::new()
                    .name(format!("miner-worker-{}", id))
                    .spawn(move || worker.run())
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Self {
            handles: Some(handles),
            found_rx,
            state,
            cancel,
            start: Instant::now(),
        }
    }

    /// Blocks up to `timeout` for the final match.
    ///
    /// Returns `None` on timeout; the caller decides whether to keep
    /// waiting or to report progress.
    pub fn wait_for_winner(&self, timeout: Duration) -> Option<FinalMatch> {
        self.found_rx.recv_timeout(timeout).ok()
    }

    /// Attempts so far. Workers still in flight may add a few more.
    pub fn attempts(&self) -> u64 {
        self.state.attempts()
    }

    /// True once termination or cancellation has been raised.
    pub fn is_finished(&self) -> bool {
        self.state.is_terminated() || self.cancel.load(Ordering::Relaxed)
    }

    /// Raises the external cancel signal.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn attempts_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.attempts() as f64 / secs
        } else {
            0.0
        }
    }

    /// Joins every worker and folds the run into a summary.
    ///
    /// Blocks until all workers have exited their loops; the caller is
    /// expected to have observed a winner or raised cancellation first.
    /// Returns the first worker error if any worker aborted.
    pub fn join(mut self) -> Result<SearchSummary> {
        let mut first_err = None;

        if let Some(handles) = self.handles.take() {
            for handle in handles {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        first_err.get_or_insert(e);
                    }
                    Err(_) => {
                        first_err.get_or_insert(Error::WorkerPanic);
                    }
                }
            }
        }

        if let Some(e) = first_err {
            return Err(e);
        }

        Ok(SearchSummary {
            attempts: self.state.attempts(),
            elapsed: self.start.elapsed(),
            winner: self.state.take_winner(),
        })
    }
}

impl Drop for SearchPool {
    fn drop(&mut self) {
        self.cancel();
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
    }
}
