//! XTS-AES (IEEE 1619, NIST SP 800-38E) with ciphertext stealing.
//!
//! A data unit is processed with two independently keyed engines: the tweak
//! engine turns the 16-byte data-unit identifier into the initial tweak, the
//! data engine transforms each block between two tweak XORs. A trailing
//! partial block borrows bytes from the preceding block's output so the
//! ciphertext is exactly as long as the plaintext.

use aes_core::{xor_in_place, Block, BLOCK_SIZE};
use zeroize::Zeroizing;

use crate::buffer::stage;
use crate::cipher::{BlockCipher, Direction};
use crate::error::ModeError;
use crate::gf128::mul_x_in_place;

/// Largest data unit accepted: 2^20 blocks.
pub const XTS_MAX_LEN: usize = (1 << 20) * BLOCK_SIZE;

/// Encodes a sector number as a little-endian 16-byte data unit.
pub fn data_unit_from_sector(sector: u64) -> Block {
    u128::from(sector).to_le_bytes()
}

fn check_len(len: usize) -> Result<(), ModeError> {
    if !(BLOCK_SIZE..=XTS_MAX_LEN).contains(&len) {
        return Err(ModeError::InvalidInputLength { len });
    }
    Ok(())
}

/// XTS over one data unit from `input` into `output`.
///
/// The data unit must be between 16 bytes and [`XTS_MAX_LEN`]. `data_unit` is
/// only read. On error the output is unusable and the call must be repeated.
pub fn xts_crypt<C: BlockCipher + ?Sized>(
    data_cipher: &C,
    tweak_cipher: &C,
    direction: Direction,
    data_unit: &Block,
    input: &[u8],
    output: &mut [u8],
) -> Result<(), ModeError> {
    // Also checked by the kernel; rejecting here avoids staging a bad unit.
    check_len(input.len())?;
    xts_crypt_in_place(
        data_cipher,
        tweak_cipher,
        direction,
        data_unit,
        stage(input, output)?,
    )
}

/// In-place form of [`xts_crypt`].
pub fn xts_crypt_in_place<C: BlockCipher + ?Sized>(
    data_cipher: &C,
    tweak_cipher: &C,
    direction: Direction,
    data_unit: &Block,
    data: &mut [u8],
) -> Result<(), ModeError> {
    let len = data.len();
    check_len(len)?;

    let leftover = len % BLOCK_SIZE;
    let full_blocks = len / BLOCK_SIZE;
    let (body, tail) = data.split_at_mut(full_blocks * BLOCK_SIZE);

    let mut tweak = Zeroizing::new(tweak_cipher.crypt_block(Direction::Encrypt, data_unit)?);
    let mut prev_tweak = Zeroizing::new([0u8; BLOCK_SIZE]);
    let steal_on_decrypt = leftover != 0 && direction == Direction::Decrypt;

    for (i, chunk) in body.chunks_exact_mut(BLOCK_SIZE).enumerate() {
        if steal_on_decrypt && i + 1 == full_blocks {
            // The last full ciphertext block was produced under the tweak of
            // the stolen position; the tail keeps the current one.
            *prev_tweak = *tweak;
            mul_x_in_place(&mut tweak);
        }
        crypt_with_tweak(data_cipher, direction, &tweak, chunk)?;
        mul_x_in_place(&mut tweak);
    }

    if leftover == 0 {
        return Ok(());
    }

    let t: &Block = if direction == Direction::Decrypt {
        &*prev_tweak
    } else {
        &*tweak
    };
    let prev = &mut body[(full_blocks - 1) * BLOCK_SIZE..];
    let mut scratch = Zeroizing::new([0u8; BLOCK_SIZE]);
    for i in 0..leftover {
        scratch[i] = tail[i] ^ t[i];
        tail[i] = prev[i];
    }
    for i in leftover..BLOCK_SIZE {
        scratch[i] = prev[i] ^ t[i];
    }
    let mut out = Zeroizing::new(data_cipher.crypt_block(direction, &scratch)?);
    xor_in_place(&mut out, t);
    prev.copy_from_slice(&*out);
    Ok(())
}

/// `chunk = crypt(chunk ^ tweak) ^ tweak`.
fn crypt_with_tweak<C: BlockCipher + ?Sized>(
    cipher: &C,
    direction: Direction,
    tweak: &Block,
    chunk: &mut [u8],
) -> Result<(), ModeError> {
    let mut block = Zeroizing::new([0u8; BLOCK_SIZE]);
    block.copy_from_slice(chunk);
    xor_in_place(&mut block, tweak);
    let mut out = Zeroizing::new(cipher.crypt_block(direction, &block)?);
    xor_in_place(&mut out, tweak);
    chunk.copy_from_slice(&*out);
    Ok(())
}
