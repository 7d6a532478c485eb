//! The worker loop and the shared search state.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::Sender;

use crate::crypto::{Candidate, CandidateSource};
use crate::error::Result;
use crate::matcher::PatternPair;
use crate::sink::ResultSink;

/// The only mutable state shared between workers.
///
/// `terminated` never reverts once raised; `attempts` only increases; the
/// winner is written exactly once, by whichever worker claims the
/// `terminated` transition.
#[derive(Debug, Default)]
pub struct SearchState {
    terminated: AtomicBool,
    attempts: AtomicU64,
    winner: Mutex<Option<Candidate>>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }

    /// Counts one generate-test iteration. One call per iteration keeps
    /// the final total exact across workers.
    #[inline]
    pub fn count_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Records `candidate` as the winner if no worker has won yet.
    ///
    /// The compare-exchange ties the flag transition and the winner write
    /// together: exactly one caller per run can succeed, every later call
    /// is a no-op.
    pub fn try_win(&self, candidate: Candidate) -> bool {
        if self
            .terminated
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            if let Ok(mut winner) = self.winner.lock() {
                *winner = Some(candidate);
            }
            true
        } else {
            false
        }
    }

    /// Consumes the winner. Meaningful only after all workers joined.
    pub fn take_winner(&self) -> Option<Candidate> {
        self.winner.lock().ok().and_then(|mut w| w.take())
    }
}

/// Report of the winning candidate, delivered to the coordinator as soon
/// as a worker claims the final match.
#[derive(Debug, Clone)]
pub struct FinalMatch {
    pub secret_hex: String,
    pub address: String,
    pub worker_id: usize,
}

/// One worker running the generate-test loop.
pub struct SearchWorker<G, S> {
    id: usize,
    source: G,
    patterns: Arc<PatternPair>,
    sink: Arc<S>,
    state: Arc<SearchState>,
    cancel: Arc<AtomicBool>,
    found_tx: Sender<FinalMatch>,
}

impl<G, S> SearchWorker<G, S>
where
    G: CandidateSource,
    S: ResultSink,
{
    pub fn new(
        id: usize,
        source: G,
        patterns: Arc<PatternPair>,
        sink: Arc<S>,
        state: Arc<SearchState>,
        cancel: Arc<AtomicBool>,
        found_tx: Sender<FinalMatch>,
    ) -> Self {
        Self {
            id,
            source,
            patterns,
            sink,
            state,
            cancel,
            found_tx,
        }
    }

    /// Runs until the termination flag or the cancel signal is observed.
    ///
    /// Both are polled once per iteration at the top of the loop, so the
    /// iteration in flight always completes and peers may run a few extra
    /// iterations after the stop condition becomes true.
    pub fn run(mut self) -> Result<()> {
        let result = self.search_loop();
        if result.is_err() {
            // Peers must not keep spinning after this worker aborts.
            self.cancel.store(true, Ordering::Relaxed);
        }
        result
    }

    fn search_loop(&mut self) -> Result<()> {
        loop {
            if self.state.is_terminated() || self.cancel.load(Ordering::Relaxed) {
                return Ok(());
            }

            self.state.count_attempt();
            let candidate = self.source.next_candidate()?;
            let address = candidate.address().to_checksum();

            if self.patterns.is_acceptable(&address) {
                self.sink.append(&candidate.secret_hex(), &address)?;

                if self.patterns.is_final(&address) && self.state.try_win(candidate.clone()) {
                    let report = FinalMatch {
                        secret_hex: candidate.secret_hex(),
                        address,
                        worker_id: self.id,
                    };
                    // The receiver may already be gone on shutdown.
                    let _ = self.found_tx.send(report);
                }
            }
        }
    }
}
