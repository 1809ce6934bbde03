//! Key types for AES-128, AES-192 and AES-256.

use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::block::Block;

/// Largest number of rounds (AES-256).
const MAX_ROUNDS: usize = 14;

/// Raw key length not in {16, 24, 32} bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid AES key length: {got} bytes (expected 16, 24 or 32)")]
pub struct KeyLengthError {
    /// Length that was supplied, in bytes.
    pub got: usize,
}

/// AES key material of 128, 192 or 256 bits.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AesKey {
    bytes: [u8; 32],
    len: usize,
}

impl AesKey {
    /// Copies raw key bytes, rejecting lengths other than 16, 24 or 32.
    pub fn new(bytes: &[u8]) -> Result<Self, KeyLengthError> {
        let len = bytes.len();
        if !matches!(len, 16 | 24 | 32) {
            return Err(KeyLengthError { got: len });
        }
        let mut buf = [0u8; 32];
        buf[..len].copy_from_slice(bytes);
        Ok(Self { bytes: buf, len })
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Key size in bits.
    pub fn bits(&self) -> usize {
        self.len * 8
    }

    /// Number of 32-bit words in the key (`Nk`).
    pub(crate) fn words(&self) -> usize {
        self.len / 4
    }

    /// Number of cipher rounds (`Nr`).
    pub fn rounds(&self) -> usize {
        self.words() + 6
    }
}

impl From<[u8; 16]> for AesKey {
    fn from(value: [u8; 16]) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&value);
        Self { bytes, len: 16 }
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesKey")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

/// Expanded round keys; only the first `rounds + 1` entries are meaningful.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RoundKeys {
    keys: [Block; MAX_ROUNDS + 1],
    rounds: usize,
}

impl RoundKeys {
    pub(crate) fn new(keys: [Block; MAX_ROUNDS + 1], rounds: usize) -> Self {
        Self { keys, rounds }
    }

    /// Returns the round key at the requested index (`0..=rounds`).
    #[inline]
    pub fn get(&self, round: usize) -> &Block {
        &self.keys[round]
    }

    /// Number of cipher rounds these keys drive.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

impl fmt::Debug for RoundKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundKeys")
            .field("rounds", &self.rounds)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_standard_lengths() {
        for (len, rounds) in [(16, 10), (24, 12), (32, 14)] {
            let key = AesKey::new(&vec![0x5a; len]).expect("valid length");
            assert_eq!(key.bits(), len * 8);
            assert_eq!(key.rounds(), rounds);
            assert_eq!(key.as_bytes().len(), len);
        }
    }

    #[test]
    fn rejects_other_lengths() {
        for len in [0, 8, 15, 17, 31, 33, 64] {
            assert_eq!(
                AesKey::new(&vec![0u8; len]).unwrap_err(),
                KeyLengthError { got: len }
            );
        }
    }

    #[test]
    fn debug_hides_key_bytes() {
        let key = AesKey::from([0xab; 16]);
        let shown = format!("{key:?}");
        assert!(shown.contains("128"));
        assert!(!shown.contains("171"));
    }
}
