//! CBC (Cipher Block Chaining) mode, NIST SP 800-38A §6.2.

use aes_core::{xor_in_place, Block, BLOCK_SIZE};
use zeroize::Zeroizing;

use crate::buffer::stage;
use crate::cipher::{BlockCipher, Direction};
use crate::error::ModeError;

/// CBC over `input` into `output`, chaining through `iv`.
///
/// `input.len()` must be a multiple of 16. On success `iv` holds the last
/// ciphertext block, ready for the next call.
pub fn cbc_crypt<C: BlockCipher + ?Sized>(
    cipher: &C,
    direction: Direction,
    iv: &mut Block,
    input: &[u8],
    output: &mut [u8],
) -> Result<(), ModeError> {
    if input.len() % BLOCK_SIZE != 0 {
        return Err(ModeError::InvalidInputLength { len: input.len() });
    }
    cbc_crypt_in_place(cipher, direction, iv, stage(input, output)?)
}

/// In-place form of [`cbc_crypt`].
pub fn cbc_crypt_in_place<C: BlockCipher + ?Sized>(
    cipher: &C,
    direction: Direction,
    iv: &mut Block,
    data: &mut [u8],
) -> Result<(), ModeError> {
    if data.len() % BLOCK_SIZE != 0 {
        return Err(ModeError::InvalidInputLength { len: data.len() });
    }

    let mut block = Zeroizing::new([0u8; BLOCK_SIZE]);
    for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
        block.copy_from_slice(chunk);
        match direction {
            Direction::Encrypt => {
                xor_in_place(&mut block, iv);
                *iv = cipher.crypt_block(Direction::Encrypt, &block)?;
                chunk.copy_from_slice(iv);
            }
            Direction::Decrypt => {
                // `block` still holds this ciphertext; it becomes the next IV.
                let mut plain = Zeroizing::new(cipher.crypt_block(Direction::Decrypt, &block)?);
                xor_in_place(&mut plain, iv);
                chunk.copy_from_slice(plain.as_slice());
                *iv = *block;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{
        aes, block, unhex, FlakyCipher, SP800_38A_IV, SP800_38A_KEY, SP800_38A_PLAIN,
    };

    const F21_CIPHER: &str = "7649abac8119b246cee98e9b12e9197d\
                              5086cb9b507219ee95db113a917678b2\
                              73bed6b8e3c1743b7116e69e22229516\
                              3ff1caa1681fac09120eca307586e1a7";

    // NIST SP 800-38A F.2.1 / F.2.2
    #[test]
    fn cbc_aes128_vector() {
        let cipher = aes(SP800_38A_KEY);
        let pt = unhex(SP800_38A_PLAIN);
        let mut iv = block(SP800_38A_IV);
        let mut ct = vec![0u8; pt.len()];
        cbc_crypt(&cipher, Direction::Encrypt, &mut iv, &pt, &mut ct).unwrap();
        assert_eq!(ct, unhex(F21_CIPHER));
        assert_eq!(iv, block("3ff1caa1681fac09120eca307586e1a7"));

        let mut iv = block(SP800_38A_IV);
        let mut back = vec![0u8; ct.len()];
        cbc_crypt(&cipher, Direction::Decrypt, &mut iv, &ct, &mut back).unwrap();
        assert_eq!(back, pt);
        assert_eq!(iv, block("3ff1caa1681fac09120eca307586e1a7"));
    }

    #[test]
    fn sequential_blocks_equal_one_call() {
        let cipher = aes(SP800_38A_KEY);
        let pt = unhex(SP800_38A_PLAIN);

        let mut iv = block(SP800_38A_IV);
        let mut whole = vec![0u8; 32];
        cbc_crypt(&cipher, Direction::Encrypt, &mut iv, &pt[..32], &mut whole).unwrap();

        let mut iv = block(SP800_38A_IV);
        let mut split = vec![0u8; 32];
        cbc_crypt(&cipher, Direction::Encrypt, &mut iv, &pt[..16], &mut split[..16]).unwrap();
        cbc_crypt(&cipher, Direction::Encrypt, &mut iv, &pt[16..32], &mut split[16..]).unwrap();
        assert_eq!(split, whole);
    }

    #[test]
    fn in_place_decrypt_chains_on_ciphertext() {
        let cipher = aes(SP800_38A_KEY);
        let mut data = unhex(F21_CIPHER);
        let mut iv = block(SP800_38A_IV);
        cbc_crypt_in_place(&cipher, Direction::Decrypt, &mut iv, &mut data).unwrap();
        assert_eq!(data, unhex(SP800_38A_PLAIN));
        assert_eq!(iv, block("3ff1caa1681fac09120eca307586e1a7"));
    }

    #[test]
    fn rejects_partial_blocks() {
        let cipher = aes(SP800_38A_KEY);
        let mut iv = [0u8; 16];
        let input = [0u8; 32];
        let mut out = [0u8; 32];
        for len in [1, 15, 17, 31] {
            assert_eq!(
                cbc_crypt(&cipher, Direction::Encrypt, &mut iv, &input[..len], &mut out),
                Err(ModeError::InvalidInputLength { len })
            );
        }
    }

    #[test]
    fn empty_input_is_noop() {
        let cipher = aes(SP800_38A_KEY);
        let mut iv = block(SP800_38A_IV);
        cbc_crypt_in_place(&cipher, Direction::Encrypt, &mut iv, &mut []).unwrap();
        assert_eq!(iv, block(SP800_38A_IV));
    }

    #[test]
    fn engine_failure_propagates() {
        let cipher = FlakyCipher::new(SP800_38A_KEY, 2);
        let mut iv = [0u8; 16];
        let mut data = [0u8; 64];
        assert!(matches!(
            cbc_crypt_in_place(&cipher, Direction::Encrypt, &mut iv, &mut data),
            Err(ModeError::HardwareAccelFailed(_))
        ));
    }

    #[test]
    fn decrypt_failure_stops_after_completed_blocks() {
        let cipher = FlakyCipher::new(SP800_38A_KEY, 2);
        let ct = unhex(F21_CIPHER);
        let mut iv = block(SP800_38A_IV);
        let mut data = ct.clone();
        assert!(matches!(
            cbc_crypt_in_place(&cipher, Direction::Decrypt, &mut iv, &mut data),
            Err(ModeError::HardwareAccelFailed(_))
        ));
        assert_eq!(&data[..32], &unhex(SP800_38A_PLAIN)[..32]);
        assert_eq!(&iv[..], &ct[16..32]);
    }
}
