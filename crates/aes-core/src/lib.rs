//! Portable AES block cipher used as the software engine behind `aes-modes`.
//!
//! This crate follows FIPS-197 and provides:
//! - Key schedules for AES-128, AES-192 and AES-256.
//! - Single-block encryption and decryption.
//! - Key and round-key types that wipe themselves on drop.
//!
//! The implementation aims for clarity and testability rather than constant-time
//! guarantees; hardware engines are expected to replace it where timing matters.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod key;
mod round;
mod sbox;

pub use crate::block::{xor_in_place, Block, BLOCK_SIZE};
pub use crate::cipher::{decrypt_block, encrypt_block, expand_key};
pub use crate::key::{AesKey, KeyLengthError, RoundKeys};
