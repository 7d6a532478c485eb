//! Candidate generation: random secp256k1 keys and their derived addresses.

use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{All, PublicKey, Secp256k1, SecretKey};
use tiny_keccak::{Hasher, Keccak};

use crate::error::{Error, Result};

use super::Address;

/// One generated (secret, address) pair.
///
/// Immutable once produced. Each generation fills a fresh secret buffer;
/// nothing is shared between calls.
#[derive(Debug, Clone)]
pub struct Candidate {
    secret: [u8; 32],
    address: Address,
}

impl Candidate {
    /// Builds a candidate from raw secret bytes.
    ///
    /// Fails if the bytes are not a valid secp256k1 scalar (zero, or at
    /// least the curve order).
    pub fn from_secret(secret: [u8; 32]) -> Result<Self> {
        let secp = Secp256k1::new();
        let secret_key =
            SecretKey::from_slice(&secret).map_err(|e| Error::Entropy(e.to_string()))?;
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);

        Ok(Self {
            secret,
            address: derive_address(&public_key),
        })
    }

    /// The secret as lowercase hex, no 0x prefix.
    pub fn secret_hex(&self) -> String {
        hex::encode(self.secret)
    }

    pub fn secret_bytes(&self) -> &[u8; 32] {
        &self.secret
    }

    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }
}

/// Source of candidates for one worker loop.
///
/// A worker owns its source exclusively, so implementations need no
/// interior synchronization. Failure is fatal to the whole search.
pub trait CandidateSource: Send {
    fn next_candidate(&mut self) -> Result<Candidate>;
}

/// Random candidate generator backed by the operating system entropy
/// source.
pub struct KeyGenerator {
    secp: Secp256k1<All>,
}

impl KeyGenerator {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateSource for KeyGenerator {
    fn next_candidate(&mut self) -> Result<Candidate> {
        let mut secret = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut secret)
            .map_err(|e| Error::Entropy(e.to_string()))?;

        // An out-of-range scalar from a healthy RNG has probability
        // ~2^-128; treat it as an entropy failure rather than retrying.
        let secret_key =
            SecretKey::from_slice(&secret).map_err(|e| Error::Entropy(e.to_string()))?;
        let public_key = PublicKey::from_secret_key(&self.secp, &secret_key);

        Ok(Candidate {
            secret,
            address: derive_address(&public_key),
        })
    }
}

/// Keccak-256 of the uncompressed public key minus its 0x04 tag byte,
/// last 20 bytes.
#[inline]
fn derive_address(public_key: &PublicKey) -> Address {
    let uncompressed = public_key.serialize_uncompressed();

    let mut hasher = Keccak::v256();
    hasher.update(&uncompressed[1..]);
    let mut digest = [0u8; 32];
    hasher.finalize(&mut digest);

    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest[12..]);
    Address::from_bytes(bytes)
}
