//! # eth_vanity_miner
//!
//! Regex-driven Ethereum vanity address miner.
//!
//! ## Architecture
//!
//! - `crypto`: key generation and address derivation
//! - `matcher`: the acceptable/final regex pair
//! - `sink`: append-only persistence for matches
//! - `worker`: the parallel search loop and its shared state
//! - `config`: runtime configuration

pub mod config;
pub mod crypto;
pub mod error;
pub mod matcher;
pub mod sink;
pub mod worker;

pub use config::Config;
pub use crypto::{Address, Candidate, CandidateSource, KeyGenerator};
pub use error::{Error, Result};
pub use matcher::PatternPair;
pub use sink::{FileSink, MemorySink, ResultSink};
pub use worker::{FinalMatch, SearchPool, SearchSummary};
