//! Collection fingerprints
//!
//! A fingerprint is a cheap summary of a collection used to detect "nothing
//! changed" without comparing the collections themselves. The only contract is
//! that equal logical content yields an equal fingerprint, so the functions
//! computing them are plain `fn` pointers that callers may swap out.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque 64-bit collection fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(i64);

impl Fingerprint {
    /// Fingerprint of a collection that was never loaded
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl From<i64> for Fingerprint {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for Fingerprint {
    fn from(value: i32) -> Self {
        Self(i64::from(value))
    }
}

/// Order-sensitive accumulator (xorshift-and-add over 64-bit words)
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintBuilder {
    acc: u64,
}

impl FingerprintBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mix one word into the accumulator
    pub fn push(&mut self, value: u64) -> &mut Self {
        self.acc ^= self.acc >> 21;
        self.acc ^= self.acc << 35;
        self.acc ^= self.acc >> 4;
        self.acc = self.acc.wrapping_add(value);
        self
    }

    /// Mix a string in as its FNV-1a digest
    pub fn push_str(&mut self, value: &str) -> &mut Self {
        self.push(string_digest(value))
    }

    #[must_use]
    pub fn finish(&self) -> Fingerprint {
        Fingerprint(self.acc as i64)
    }
}

/// Stable 64-bit FNV-1a digest of a string
pub fn string_digest(value: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    value
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}
