//! Key generation and Ethereum address derivation.
//!
//! This module provides:
//! - Secure random key generation using secp256k1
//! - Address derivation using Keccak-256
//! - The `CandidateSource` seam workers draw candidates from

mod address;
mod candidate;

pub use address::Address;
pub use candidate::{Candidate, CandidateSource, KeyGenerator};
