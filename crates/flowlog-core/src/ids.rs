//! Identifier generation for edges and correlation ids.
//!
//! Edge ids are short (5 characters) so that history chains stay compact
//! when they are passed from hop to hop. They are derived by hashing 128
//! fresh random bits and keeping a prefix of the Base64 encoding of the
//! digest. With 64 symbols per position this gives roughly a one in a
//! billion chance of two edges colliding, which is enough to keep split
//! flows apart in practice. These ids are NOT secure tokens.

use std::sync::Mutex;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use uuid::Uuid;

/// Length of a generated edge id.
pub const SHORT_ID_LEN: usize = 5;

/// Number of random bytes hashed into a short id.
const SHORT_ID_ENTROPY_BYTES: usize = 16;

/// Source of randomness for identifier generation.
pub trait RandomSource: Send + Sync {
    /// Return `n` random bytes.
    fn random_bytes(&self, n: usize) -> Vec<u8>;

    /// Return a random (version 4) UUID.
    fn random_uuid(&self) -> Uuid;
}

/// Thread-local OS-seeded randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn random_bytes(&self, n: usize) -> Vec<u8> {
        let mut buf = vec![0u8; n];
        rand::thread_rng().fill_bytes(&mut buf);
        buf
    }

    fn random_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic randomness from a fixed seed.
///
/// Two instances created with the same seed produce the same sequence of
/// ids, which makes generated events reproducible in tests.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn random_bytes(&self, n: usize) -> Vec<u8> {
        let mut buf = vec![0u8; n];
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.fill_bytes(&mut buf);
        buf
    }

    fn random_uuid(&self) -> Uuid {
        let mut bytes = [0u8; 16];
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

/// Generate a correlation id in canonical hyphenated UUID form.
pub fn generate_correlation_id(random: &dyn RandomSource) -> String {
    random.random_uuid().hyphenated().to_string()
}

/// Generate a 5-character edge id drawn from the Base64 basic alphabet.
pub fn generate_short_id(random: &dyn RandomSource) -> String {
    let entropy = random.random_bytes(SHORT_ID_ENTROPY_BYTES);
    let digest = blake3::hash(&entropy);
    let mut encoded = STANDARD.encode(digest.as_bytes());
    encoded.truncate(SHORT_ID_LEN);
    encoded
}
