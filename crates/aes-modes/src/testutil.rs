//! Helpers shared by the unit tests.

use std::cell::Cell;

use aes_core::Block;

use crate::cipher::{Aes, BlockCipher, Direction};
use crate::error::ModeError;

pub(crate) fn unhex(s: &str) -> Vec<u8> {
    hex::decode(s).expect("valid hex literal")
}

pub(crate) fn block(s: &str) -> Block {
    unhex(s).try_into().expect("16-byte hex literal")
}

pub(crate) fn aes(key_hex: &str) -> Aes {
    Aes::with_key(&unhex(key_hex)).expect("valid AES key")
}

/// NIST SP 800-38A key, IV and four-block plaintext.
pub(crate) const SP800_38A_KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";
pub(crate) const SP800_38A_IV: &str = "000102030405060708090a0b0c0d0e0f";
pub(crate) const SP800_38A_PLAIN: &str = "6bc1bee22e409f96e93d7e117393172a\
                                          ae2d8a571e03ac9c9eb76fac45af8e51\
                                          30c81c46a35ce411e5fbc1191a0a52ef\
                                          f69f2445df4f9b17ad2b417be66c3710";

/// Engine that succeeds for a fixed number of blocks and then reports an
/// accelerator fault.
pub(crate) struct FlakyCipher {
    inner: Aes,
    remaining: Cell<usize>,
}

impl FlakyCipher {
    pub(crate) fn new(key_hex: &str, good_blocks: usize) -> Self {
        Self {
            inner: aes(key_hex),
            remaining: Cell::new(good_blocks),
        }
    }
}

impl BlockCipher for FlakyCipher {
    fn set_key_encrypt(&mut self, key: &[u8]) -> Result<(), ModeError> {
        self.inner.set_key_encrypt(key)
    }

    fn set_key_decrypt(&mut self, key: &[u8]) -> Result<(), ModeError> {
        self.inner.set_key_decrypt(key)
    }

    fn crypt_block(&self, direction: Direction, input: &Block) -> Result<Block, ModeError> {
        match self.remaining.get() {
            0 => Err(ModeError::HardwareAccelFailed("engine busy".into())),
            n => {
                self.remaining.set(n - 1);
                self.inner.crypt_block(direction, input)
            }
        }
    }
}

/// Engine that only runs blocks in the direction its key was installed for.
#[derive(Default)]
pub(crate) struct StrictCipher {
    inner: Aes,
    keyed: Option<Direction>,
}

impl BlockCipher for StrictCipher {
    fn set_key_encrypt(&mut self, key: &[u8]) -> Result<(), ModeError> {
        self.inner.set_key_encrypt(key)?;
        self.keyed = Some(Direction::Encrypt);
        Ok(())
    }

    fn set_key_decrypt(&mut self, key: &[u8]) -> Result<(), ModeError> {
        self.inner.set_key_decrypt(key)?;
        self.keyed = Some(Direction::Decrypt);
        Ok(())
    }

    fn crypt_block(&self, direction: Direction, input: &Block) -> Result<Block, ModeError> {
        if self.keyed != Some(direction) {
            return Err(ModeError::HardwareAccelFailed(format!(
                "key scheduled for {:?}, asked {direction}",
                self.keyed
            )));
        }
        self.inner.crypt_block(direction, input)
    }

    fn clear_key(&mut self) {
        self.inner.clear_key();
        self.keyed = None;
    }
}
