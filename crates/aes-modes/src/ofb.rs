//! OFB (Output Feedback) mode, NIST SP 800-38A §6.4.

use aes_core::BLOCK_SIZE;

use crate::buffer::stage;
use crate::cfb::FeedbackState;
use crate::cipher::{BlockCipher, Direction};
use crate::error::{check_offset, ModeError};

/// OFB over `input` into `output`. Encryption and decryption are the same
/// operation.
pub fn ofb_crypt<C: BlockCipher + ?Sized>(
    cipher: &C,
    state: &mut FeedbackState,
    input: &[u8],
    output: &mut [u8],
) -> Result<(), ModeError> {
    check_offset(state.offset)?;
    ofb_crypt_in_place(cipher, state, stage(input, output)?)
}

/// In-place form of [`ofb_crypt`].
pub fn ofb_crypt_in_place<C: BlockCipher + ?Sized>(
    cipher: &C,
    state: &mut FeedbackState,
    data: &mut [u8],
) -> Result<(), ModeError> {
    check_offset(state.offset)?;
    let mut n = state.offset;
    for byte in data.iter_mut() {
        if n == 0 {
            state.iv = cipher.crypt_block(Direction::Encrypt, &state.iv)?;
        }
        *byte ^= state.iv[n];
        n = (n + 1) % BLOCK_SIZE;
    }
    state.offset = n;
    Ok(())
}
