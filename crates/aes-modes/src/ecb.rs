//! Single-block ECB entry point.

use aes_core::Block;

use crate::cipher::{BlockCipher, Direction};
use crate::error::ModeError;

/// Encrypts or decrypts exactly one block.
pub fn ecb_crypt<C: BlockCipher + ?Sized>(
    cipher: &C,
    direction: Direction,
    input: &Block,
) -> Result<Block, ModeError> {
    cipher.crypt_block(direction, input)
}
