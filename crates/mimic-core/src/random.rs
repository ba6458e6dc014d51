//! Secure random number generation.
//!
//! Every obfuscation field draws from an [`EntropySource`] handle that is
//! passed explicitly into the builders. Production code uses the operating
//! system CSPRNG ([`SystemEntropy`]); tests and reproducible runs use
//! [`SeededEntropy`].
//!
//! [`SecureRng`] adapts a source to [`rand::RngCore`] so the `rand` sampling
//! machinery (unbiased `gen_range`, Fisher-Yates `shuffle`) runs on top of it.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::{CryptoRng, Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::sync::{Mutex, PoisonError};

/// A shareable source of cryptographically strong random bytes.
pub trait EntropySource: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]);
}

/// Operating system entropy (`getrandom`, `/dev/urandom`, `BCryptGenRandom`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEntropy;

impl EntropySource for SystemEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest);
    }
}

/// Deterministic ChaCha20 stream seeded from a `u64`.
///
/// The same seed always yields the same byte stream. Safe to share between
/// threads; draws are serialized through a mutex.
#[derive(Debug)]
pub struct SeededEntropy {
    rng: Mutex<ChaCha20Rng>,
}

impl SeededEntropy {
    /// Create a source from a seed
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }
}

impl EntropySource for SeededEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.fill_bytes(dest);
    }
}

/// Random number generator view over an [`EntropySource`].
pub struct SecureRng<'a> {
    source: &'a dyn EntropySource,
}

impl<'a> SecureRng<'a> {
    /// Wrap an entropy source
    #[must_use]
    pub fn new(source: &'a dyn EntropySource) -> Self {
        Self { source }
    }

    /// Fair coin flip
    pub fn coin(&mut self) -> bool {
        self.gen()
    }

    /// True with probability `1/n`
    pub fn one_in(&mut self, n: u32) -> bool {
        self.gen_ratio(1, n)
    }

    /// Uniformly pick one element of a non-empty slice
    pub fn pick<'b, T>(&mut self, items: &'b [T]) -> &'b T {
        &items[self.gen_range(0..items.len())]
    }

    /// Unbiased in-place Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }

    /// `len` random bytes
    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        self.source.fill_bytes(&mut buf);
        buf
    }

    /// `len` random bytes as lowercase hex (`2 * len` characters)
    pub fn hex(&mut self, len: usize) -> String {
        hex::encode(self.bytes(len))
    }

    /// Inter-packet time drawn from `[min, max]`.
    ///
    /// Inverted bounds are swapped rather than rejected.
    pub fn itime(&mut self, min: u32, max: u32) -> u32 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        self.gen_range(low..=high)
    }
}

impl RngCore for SecureRng<'_> {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.source.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.source.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.source.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.source.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for SecureRng<'_> {}
