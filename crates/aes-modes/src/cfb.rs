//! CFB (Cipher Feedback) modes, NIST SP 800-38A §6.3.
//!
//! CFB128 resumes mid-block through [`FeedbackState::offset`]; CFB8 runs one
//! full block encryption per byte and keeps no offset.

use aes_core::{Block, BLOCK_SIZE};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::buffer::stage;
use crate::cipher::{BlockCipher, Direction};
use crate::error::{check_offset, ModeError};

/// IV plus the number of keystream bytes already consumed from it.
///
/// Shared by CFB128 and OFB. `offset` must stay in `[0, 16)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct FeedbackState {
    /// Feedback register; after the first call it holds the current keystream block.
    pub iv: Block,
    /// Bytes of `iv` already used.
    pub offset: usize,
}

impl FeedbackState {
    /// Starts a fresh stream at `iv`.
    pub fn new(iv: Block) -> Self {
        Self { iv, offset: 0 }
    }
}

/// CFB128 over `input` into `output`.
pub fn cfb128_crypt<C: BlockCipher + ?Sized>(
    cipher: &C,
    direction: Direction,
    state: &mut FeedbackState,
    input: &[u8],
    output: &mut [u8],
) -> Result<(), ModeError> {
    check_offset(state.offset)?;
    cfb128_crypt_in_place(cipher, direction, state, stage(input, output)?)
}

/// In-place form of [`cfb128_crypt`].
pub fn cfb128_crypt_in_place<C: BlockCipher + ?Sized>(
    cipher: &C,
    direction: Direction,
    state: &mut FeedbackState,
    data: &mut [u8],
) -> Result<(), ModeError> {
    check_offset(state.offset)?;
    let mut n = state.offset;
    for byte in data.iter_mut() {
        if n == 0 {
            state.iv = cipher.crypt_block(Direction::Encrypt, &state.iv)?;
        }
        match direction {
            Direction::Encrypt => {
                state.iv[n] ^= *byte;
                *byte = state.iv[n];
            }
            Direction::Decrypt => {
                let c = *byte;
                *byte = c ^ state.iv[n];
                state.iv[n] = c;
            }
        }
        n = (n + 1) % BLOCK_SIZE;
    }
    state.offset = n;
    Ok(())
}

/// CFB8 over `input` into `output`, shifting one ciphertext byte into `iv`
/// per byte processed.
pub fn cfb8_crypt<C: BlockCipher + ?Sized>(
    cipher: &C,
    direction: Direction,
    iv: &mut Block,
    input: &[u8],
    output: &mut [u8],
) -> Result<(), ModeError> {
    cfb8_crypt_in_place(cipher, direction, iv, stage(input, output)?)
}

/// In-place form of [`cfb8_crypt`].
pub fn cfb8_crypt_in_place<C: BlockCipher + ?Sized>(
    cipher: &C,
    direction: Direction,
    iv: &mut Block,
    data: &mut [u8],
) -> Result<(), ModeError> {
    for byte in data.iter_mut() {
        let mut keystream = cipher.crypt_block(Direction::Encrypt, iv)?;
        let input = *byte;
        *byte = input ^ keystream[0];
        let feedback = match direction {
            Direction::Encrypt => *byte,
            Direction::Decrypt => input,
        };
        iv.copy_within(1.., 0);
        iv[BLOCK_SIZE - 1] = feedback;
        keystream.zeroize();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{
        aes, block, unhex, FlakyCipher, SP800_38A_IV, SP800_38A_KEY, SP800_38A_PLAIN,
    };
    use proptest::prelude::*;

    const F313_CIPHER: &str = "3b3fd92eb72dad20333449f8e83cfb4a\
                               c8a64537a0b3a93fcde3cdad9f1ce58b\
                               26751f67a3cbb140b1808cf187a4f4df\
                               c04b05357c5d1c0eeac4c66f9ff7f2e6";

    // NIST SP 800-38A F.3.13 / F.3.14
    #[test]
    fn cfb128_aes128_vector() {
        let cipher = aes(SP800_38A_KEY);
        let pt = unhex(SP800_38A_PLAIN);
        let mut state = FeedbackState::new(block(SP800_38A_IV));
        let mut ct = vec![0u8; pt.len()];
        cfb128_crypt(&cipher, Direction::Encrypt, &mut state, &pt, &mut ct).unwrap();
        assert_eq!(ct, unhex(F313_CIPHER));
        assert_eq!(state.offset, 0);

        let mut state = FeedbackState::new(block(SP800_38A_IV));
        let mut back = vec![0u8; ct.len()];
        cfb128_crypt(&cipher, Direction::Decrypt, &mut state, &ct, &mut back).unwrap();
        assert_eq!(back, pt);
    }

    #[test]
    fn cfb128_tracks_offset_across_calls() {
        let cipher = aes(SP800_38A_KEY);
        let pt = unhex(SP800_38A_PLAIN);
        let mut state = FeedbackState::new(block(SP800_38A_IV));
        let mut ct = vec![0u8; 21];
        cfb128_crypt(&cipher, Direction::Encrypt, &mut state, &pt[..5], &mut ct[..5]).unwrap();
        assert_eq!(state.offset, 5);
        cfb128_crypt(&cipher, Direction::Encrypt, &mut state, &pt[5..21], &mut ct[5..]).unwrap();
        assert_eq!(state.offset, 5);
        assert_eq!(&ct[..], &unhex(F313_CIPHER)[..21]);
    }

    #[test]
    fn cfb128_rejects_bad_offset() {
        let cipher = aes(SP800_38A_KEY);
        let mut state = FeedbackState {
            iv: [0u8; 16],
            offset: 16,
        };
        let mut data = [0u8; 4];
        assert!(matches!(
            cfb128_crypt_in_place(&cipher, Direction::Encrypt, &mut state, &mut data),
            Err(ModeError::BadInputData(_))
        ));
    }

    // NIST SP 800-38A F.3.7 / F.3.8
    #[test]
    fn cfb8_aes128_vector() {
        let cipher = aes(SP800_38A_KEY);
        let pt = unhex("6bc1bee22e409f96e93d7e117393172aae2d");
        let expected = unhex("3b79424c9c0dd436bace9e0ed4586a4f32b9");

        let mut iv = block(SP800_38A_IV);
        let mut ct = vec![0u8; pt.len()];
        cfb8_crypt(&cipher, Direction::Encrypt, &mut iv, &pt, &mut ct).unwrap();
        assert_eq!(ct, expected);
        // The register now holds the last 16 ciphertext bytes.
        assert_eq!(&iv[..], &expected[2..]);

        let mut iv = block(SP800_38A_IV);
        cfb8_crypt_in_place(&cipher, Direction::Decrypt, &mut iv, &mut ct).unwrap();
        assert_eq!(ct, pt);
        assert_eq!(&iv[..], &expected[2..]);
    }

    #[test]
    fn cfb8_engine_failure_propagates() {
        let cipher = FlakyCipher::new(SP800_38A_KEY, 3);
        let mut iv = [0u8; 16];
        let mut data = [0u8; 8];
        assert!(matches!(
            cfb8_crypt_in_place(&cipher, Direction::Decrypt, &mut iv, &mut data),
            Err(ModeError::HardwareAccelFailed(_))
        ));
    }

    proptest! {
        #[test]
        fn cfb128_split_matches_single_call(
            data in proptest::collection::vec(any::<u8>(), 1..80),
            split in any::<prop::sample::Index>(),
            decrypt in any::<bool>(),
        ) {
            let cipher = aes(SP800_38A_KEY);
            let direction = if decrypt { Direction::Decrypt } else { Direction::Encrypt };
            let k = split.index(data.len() + 1);

            let mut whole_state = FeedbackState::new(block(SP800_38A_IV));
            let mut whole = data.clone();
            cfb128_crypt_in_place(&cipher, direction, &mut whole_state, &mut whole).unwrap();

            let mut state = FeedbackState::new(block(SP800_38A_IV));
            let mut parts = data.clone();
            let (head, tail) = parts.split_at_mut(k);
            cfb128_crypt_in_place(&cipher, direction, &mut state, head).unwrap();
            cfb128_crypt_in_place(&cipher, direction, &mut state, tail).unwrap();

            prop_assert_eq!(parts, whole);
            prop_assert_eq!(state, whole_state);
        }

        #[test]
        fn cfb8_split_matches_single_call(
            data in proptest::collection::vec(any::<u8>(), 1..48),
            split in any::<prop::sample::Index>(),
        ) {
            let cipher = aes(SP800_38A_KEY);
            let k = split.index(data.len() + 1);

            let mut whole_iv = block(SP800_38A_IV);
            let mut whole = data.clone();
            cfb8_crypt_in_place(&cipher, Direction::Encrypt, &mut whole_iv, &mut whole).unwrap();

            let mut iv = block(SP800_38A_IV);
            let mut parts = data.clone();
            let (head, tail) = parts.split_at_mut(k);
            cfb8_crypt_in_place(&cipher, Direction::Encrypt, &mut iv, head).unwrap();
            cfb8_crypt_in_place(&cipher, Direction::Encrypt, &mut iv, tail).unwrap();

            prop_assert_eq!(parts, whole);
            prop_assert_eq!(iv, whole_iv);
        }
    }
}
