//! Adler-32 checksum computation.
//!
//! Every entry in an ARC archive stores the Adler-32 of its original plain
//! bytes. The engine computes it when writing new entries but never checks
//! it on read: deciding whether to accept mismatched data is up to the
//! caller, which compares [`checksum`] of the returned bytes against
//! [`Entry::adler32`](crate::archive::Entry::adler32).
//!
//! # Example
//!
//! ```rust
//! use gdarc::checksum::{Adler32, Checksum, checksum};
//!
//! // One-shot computation
//! assert_eq!(checksum(b"Wikipedia"), 0x11E6_0398);
//!
//! // Incremental computation
//! let mut adler = Adler32::new();
//! adler.update(b"Wiki");
//! adler.update(b"pedia");
//! assert_eq!(adler.finalize(), 0x11E6_0398);
//! ```

/// Largest prime smaller than 2^16.
const MOD_ADLER: u32 = 65521;

/// Largest `n` such that `255 * n * (n + 1) / 2 + (n + 1) * (MOD_ADLER - 1)`
/// still fits in a `u32`, so reductions can be deferred for that many bytes.
const NMAX: usize = 5552;

/// Common trait for checksum computation.
pub trait Checksum: Default + Clone {
    /// The output type of this checksum.
    type Output: Copy + Eq + std::fmt::Debug;

    /// Creates a new checksum calculator.
    fn new() -> Self;

    /// Updates the checksum with additional data.
    fn update(&mut self, data: &[u8]);

    /// Finishes the checksum computation and returns the value.
    fn finalize(&self) -> Self::Output;

    /// Resets the checksum to its initial state.
    fn reset(&mut self);

    /// Computes the checksum of a single slice in one call.
    fn compute(data: &[u8]) -> Self::Output {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}

/// Adler-32 checksum calculator.
///
/// Two running sums modulo 65521, seeded with `a = 1, b = 0` and combined
/// as `b << 16 | a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Checksum for Adler32 {
    type Output = u32;

    fn new() -> Self {
        Self { a: 1, b: 0 }
    }

    fn update(&mut self, data: &[u8]) {
        let mut a = self.a;
        let mut b = self.b;

        for block in data.chunks(NMAX) {
            for &byte in block {
                a += u32::from(byte);
                b += a;
            }
            a %= MOD_ADLER;
            b %= MOD_ADLER;
        }

        self.a = a;
        self.b = b;
    }

    fn finalize(&self) -> u32 {
        (self.b << 16) | self.a
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Computes the Adler-32 of `data`.
///
/// Empty input yields `1`.
#[inline]
pub fn checksum(data: &[u8]) -> u32 {
    Adler32::compute(data)
}

/// Outcome of comparing data against a stored Adler-32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyResult {
    /// Checksum matches the stored value.
    Match,
    /// Checksum does not match.
    Mismatch {
        /// Stored value.
        expected: u32,
        /// Computed value.
        actual: u32,
    },
}

impl VerifyResult {
    /// Returns true if verification passed.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Match)
    }

    /// Returns true if verification failed.
    pub fn is_err(&self) -> bool {
        matches!(self, Self::Mismatch { .. })
    }
}

/// Verifies `data` against an expected Adler-32.
pub fn verify_adler32(data: &[u8], expected: u32) -> VerifyResult {
    let actual = checksum(data);
    if actual == expected {
        VerifyResult::Match
    } else {
        VerifyResult::Mismatch { expected, actual }
    }
}
