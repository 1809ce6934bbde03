//! GF(2^128) arithmetic for XTS tweaks.
//!
//! A tweak is held as two little-endian 64-bit words: bytes `0..8` are the low
//! word and bytes `8..16` the high word (IEEE 1619 / SP 800-38E layout).

use aes_core::Block;

/// Low byte of the reduction polynomial x^128 + x^7 + x^2 + x + 1.
const REDUCTION: u64 = 0x87;

/// Multiplies `tweak` by the primitive element `x`.
///
/// The bit shifted out of the high word is folded back into the low word with
/// the reduction constant. The fold is masked by that bit rather than shifted
/// by a bit-dependent amount, so a clear bit contributes exactly zero.
#[inline]
pub fn mul_x(tweak: &Block) -> Block {
    let mut lo = [0u8; 8];
    let mut hi = [0u8; 8];
    lo.copy_from_slice(&tweak[..8]);
    hi.copy_from_slice(&tweak[8..]);
    let a = u64::from_le_bytes(lo);
    let b = u64::from_le_bytes(hi);

    let carry = b >> 63;
    let ra = (a << 1) ^ (REDUCTION & carry.wrapping_neg());
    let rb = (a >> 63) | (b << 1);

    let mut out = [0u8; 16];
    out[..8].copy_from_slice(&ra.to_le_bytes());
    out[8..].copy_from_slice(&rb.to_le_bytes());
    out
}

/// In-place form of [`mul_x`].
#[inline]
pub fn mul_x_in_place(tweak: &mut Block) {
    *tweak = mul_x(tweak);
}
