//! End-to-end tests for the parallel search loop.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use eth_vanity_miner::{
    Candidate, CandidateSource, Error, KeyGenerator, MemorySink, PatternPair, Result, SearchPool,
    ResultSink,
};

/// Deterministic source cycling through a fixed candidate list.
///
/// Every call bumps a counter, shared across all sources of a run, so
/// tests can compare the coordinator's attempt total against the number
/// of generations that actually happened.
struct ScriptedSource {
    candidates: Vec<Candidate>,
    next: usize,
    calls: Arc<AtomicU64>,
}

impl ScriptedSource {
    fn new(candidates: Vec<Candidate>) -> Self {
        Self::counted(candidates, Arc::new(AtomicU64::new(0)))
    }

    fn counted(candidates: Vec<Candidate>, calls: Arc<AtomicU64>) -> Self {
        Self {
            candidates,
            next: 0,
            calls,
        }
    }
}

impl CandidateSource for ScriptedSource {
    fn next_candidate(&mut self) -> Result<Candidate> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let candidate = self.candidates[self.next % self.candidates.len()].clone();
        self.next += 1;
        Ok(candidate)
    }
}

/// Source whose entropy runs dry after a fixed number of candidates.
struct DryingSource {
    inner: ScriptedSource,
    remaining: usize,
}

impl CandidateSource for DryingSource {
    fn next_candidate(&mut self) -> Result<Candidate> {
        if self.remaining == 0 {
            return Err(Error::Entropy("source exhausted".into()));
        }
        self.remaining -= 1;
        self.inner.next_candidate()
    }
}

/// Sink that refuses every record.
struct FailingSink;

impl ResultSink for FailingSink {
    fn append(&self, _secret_hex: &str, _address: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }
}

fn candidate(k: u8) -> Candidate {
    let mut secret = [0u8; 32];
    secret[31] = k;
    Candidate::from_secret(secret).unwrap()
}

fn exact(address: &str) -> String {
    // Checksummed addresses contain no regex metacharacters.
    format!("^{}$", address)
}

#[test]
fn single_worker_run_is_deterministic() {
    let candidates: Vec<_> = (1..=5).map(candidate).collect();
    let second = candidates[1].address().to_checksum();
    let target = candidates[2].address().to_checksum();

    let patterns =
        PatternPair::compile(&format!("({}|{})", exact(&second), exact(&target)), &exact(&target))
            .unwrap();
    let sink = Arc::new(MemorySink::new());
    let cancel = Arc::new(AtomicBool::new(false));

    let candidates_for_worker = candidates.clone();
    let pool = SearchPool::spawn(1, patterns, sink.clone(), cancel, move |_| {
        ScriptedSource::new(candidates_for_worker.clone())
    });

    let found = pool
        .wait_for_winner(Duration::from_secs(5))
        .expect("search should find the target");
    assert_eq!(found.address, target);

    let summary = pool.join().unwrap();

    // Iterations 1-3 count; the fourth poll observes termination.
    assert_eq!(summary.attempts, 3);
    let winner = summary.winner.expect("winner recorded");
    assert_eq!(winner.address().to_checksum(), target);

    // One record per acceptable match, in generation order.
    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].1, second);
    assert_eq!(records[1].1, target);
    assert_eq!(records[1].0, winner.secret_hex());
}

#[test]
fn winner_is_reported_exactly_once_across_workers() {
    // Every candidate matches both patterns, so all four workers race to
    // claim the final match.
    let candidates: Vec<_> = (1..=4).map(candidate).collect();
    let patterns = PatternPair::compile("^0x", "^0x").unwrap();
    let sink = Arc::new(MemorySink::new());
    let cancel = Arc::new(AtomicBool::new(false));

    let generations = Arc::new(AtomicU64::new(0));
    let per_worker = candidates.clone();
    let per_worker_calls = generations.clone();
    let pool = SearchPool::spawn(4, patterns, sink.clone(), cancel, move |_| {
        ScriptedSource::counted(per_worker.clone(), per_worker_calls.clone())
    });

    assert!(pool.wait_for_winner(Duration::from_secs(5)).is_some());
    assert!(pool.wait_for_winner(Duration::from_millis(200)).is_none());

    let summary = pool.join().unwrap();
    assert!(summary.winner.is_some());
    assert!(!sink.records().is_empty());

    // Exactly one counted attempt per generation, with no lost updates
    // across the four racing workers.
    assert_eq!(summary.attempts, generations.load(Ordering::Relaxed));
    assert!(summary.attempts >= 1);
}

#[test]
fn impossible_final_pattern_stops_only_via_cancellation() {
    // 'z' never appears in a hex address.
    let patterns = PatternPair::compile("zz", "zz").unwrap();
    let sink = Arc::new(MemorySink::new());
    let cancel = Arc::new(AtomicBool::new(false));

    let pool = SearchPool::spawn(2, patterns, sink.clone(), cancel, |_| KeyGenerator::new());

    assert!(pool.wait_for_winner(Duration::from_millis(200)).is_none());
    assert!(!pool.is_finished());

    pool.cancel();
    let summary = pool.join().unwrap();

    assert!(summary.winner.is_none());
    assert!(summary.attempts > 0);
    assert!(sink.records().is_empty());
}

#[test]
fn sink_failure_aborts_the_search() {
    // Every address is acceptable, so the first append fails the run.
    let patterns = PatternPair::compile("^0x", "zz").unwrap();
    let cancel = Arc::new(AtomicBool::new(false));

    let pool = SearchPool::spawn(2, patterns, Arc::new(FailingSink), cancel, |_| {
        KeyGenerator::new()
    });

    assert!(pool.wait_for_winner(Duration::from_millis(200)).is_none());
    assert!(pool.is_finished());
    assert!(matches!(pool.join(), Err(Error::Io(_))));
}

#[test]
fn entropy_failure_aborts_the_search() {
    let candidates: Vec<_> = (1..=2).map(candidate).collect();
    // Nothing matches, so the sources run dry and abort.
    let patterns = PatternPair::compile("zz", "zz").unwrap();
    let sink = Arc::new(MemorySink::new());
    let cancel = Arc::new(AtomicBool::new(false));

    let per_worker = candidates.clone();
    let pool = SearchPool::spawn(2, patterns, sink, cancel, move |_| DryingSource {
        inner: ScriptedSource::new(per_worker.clone()),
        remaining: 3,
    });

    assert!(matches!(pool.join(), Err(Error::Entropy(_))));
}

/// Source that blows up instead of failing cleanly.
struct PanickingSource;

impl CandidateSource for PanickingSource {
    fn next_candidate(&mut self) -> Result<Candidate> {
        panic!("candidate source gave up");
    }
}

#[test]
fn worker_panic_surfaces_from_join() {
    let patterns = PatternPair::compile("zz", "zz").unwrap();
    let sink = Arc::new(MemorySink::new());
    let cancel = Arc::new(AtomicBool::new(false));

    let pool = SearchPool::spawn(1, patterns, sink, cancel, |_| PanickingSource);

    assert!(matches!(pool.join(), Err(Error::WorkerPanic)));
}
