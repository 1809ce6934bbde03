//! Block representation helpers.

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// AES block of 16 bytes.
pub type Block = [u8; BLOCK_SIZE];

/// XORs `rhs` into `dst`.
#[inline]
pub fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs) {
        *d ^= *r;
    }
}
