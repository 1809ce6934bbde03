//! CTR (Counter) mode, NIST SP 800-38A §6.5.

use aes_core::{Block, BLOCK_SIZE};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::buffer::stage;
use crate::cipher::{BlockCipher, Direction};
use crate::error::{check_offset, ModeError};

/// Counter block, cached keystream block and the bytes consumed from it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CtrState {
    /// Next counter block to encrypt, a 128-bit big-endian integer.
    pub nonce_counter: Block,
    /// Keystream block produced from the previous counter.
    pub stream_block: Block,
    /// Bytes of `stream_block` already used; must stay in `[0, 16)`.
    pub offset: usize,
}

impl CtrState {
    /// Starts a fresh stream at `nonce_counter`.
    pub fn new(nonce_counter: Block) -> Self {
        Self {
            nonce_counter,
            stream_block: [0u8; BLOCK_SIZE],
            offset: 0,
        }
    }
}

/// Increments a 128-bit big-endian counter by one, wrapping at 2^128.
fn increment_counter(counter: &mut Block) {
    for byte in counter.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

/// CTR over `input` into `output`. Encryption and decryption are the same
/// operation.
pub fn ctr_crypt<C: BlockCipher + ?Sized>(
    cipher: &C,
    state: &mut CtrState,
    input: &[u8],
    output: &mut [u8],
) -> Result<(), ModeError> {
    check_offset(state.offset)?;
    ctr_crypt_in_place(cipher, state, stage(input, output)?)
}

/// In-place form of [`ctr_crypt`].
pub fn ctr_crypt_in_place<C: BlockCipher + ?Sized>(
    cipher: &C,
    state: &mut CtrState,
    data: &mut [u8],
) -> Result<(), ModeError> {
    check_offset(state.offset)?;
    let mut n = state.offset;
    for byte in data.iter_mut() {
        if n == 0 {
            state.stream_block = cipher.crypt_block(Direction::Encrypt, &state.nonce_counter)?;
            increment_counter(&mut state.nonce_counter);
        }
        *byte ^= state.stream_block[n];
        n = (n + 1) % BLOCK_SIZE;
    }
    state.offset = n;
    Ok(())
}
