//! The single-block capability every mode is written against.

use core::fmt;
use core::str::FromStr;

use aes_core::{decrypt_block, encrypt_block, expand_key, AesKey, Block, RoundKeys};
use tracing::debug;

use crate::error::ModeError;

/// Whether a call encrypts or decrypts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Plaintext to ciphertext.
    Encrypt,
    /// Ciphertext to plaintext.
    Decrypt,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Encrypt => "encrypt",
            Direction::Decrypt => "decrypt",
        })
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "encrypt" | "enc" => Ok(Direction::Encrypt),
            "decrypt" | "dec" => Ok(Direction::Decrypt),
            other => Err(format!("unknown direction `{other}`")),
        }
    }
}

/// A keyed 16-byte block cipher, implemented in software or by an accelerator.
///
/// The installed key is the engine's own business: modes never inspect it and
/// only hand blocks across this interface.
pub trait BlockCipher {
    /// Installs a key to be used for encryption.
    fn set_key_encrypt(&mut self, key: &[u8]) -> Result<(), ModeError>;

    /// Installs a key to be used for decryption.
    fn set_key_decrypt(&mut self, key: &[u8]) -> Result<(), ModeError>;

    /// Transforms one block under the installed key.
    fn crypt_block(&self, direction: Direction, input: &Block) -> Result<Block, ModeError>;

    /// Drops and wipes any installed key.
    fn clear_key(&mut self) {}
}

impl<C: BlockCipher + ?Sized> BlockCipher for Box<C> {
    fn set_key_encrypt(&mut self, key: &[u8]) -> Result<(), ModeError> {
        (**self).set_key_encrypt(key)
    }

    fn set_key_decrypt(&mut self, key: &[u8]) -> Result<(), ModeError> {
        (**self).set_key_decrypt(key)
    }

    fn crypt_block(&self, direction: Direction, input: &Block) -> Result<Block, ModeError> {
        (**self).crypt_block(direction, input)
    }

    fn clear_key(&mut self) {
        (**self).clear_key()
    }
}

/// Portable software AES engine backed by `aes-core`.
#[derive(Clone, Default)]
pub struct Aes {
    round_keys: Option<RoundKeys>,
}

impl Aes {
    /// Creates an engine with no key installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with `key` installed.
    pub fn with_key(key: &[u8]) -> Result<Self, ModeError> {
        let mut aes = Self::new();
        aes.set_key_encrypt(key)?;
        Ok(aes)
    }

    /// Size of the installed key in bits, if any.
    pub fn key_bits(&self) -> Option<usize> {
        self.round_keys.as_ref().map(|rk| (rk.rounds() - 6) * 32)
    }

    fn install(&mut self, key: &[u8]) -> Result<(), ModeError> {
        let key = AesKey::new(key)?;
        self.round_keys = Some(expand_key(&key));
        debug!(bits = key.bits(), "installed software AES key");
        Ok(())
    }
}

impl BlockCipher for Aes {
    fn set_key_encrypt(&mut self, key: &[u8]) -> Result<(), ModeError> {
        self.install(key)
    }

    // The equivalent-inverse schedule is not used; decryption walks the
    // forward round keys backwards.
    fn set_key_decrypt(&mut self, key: &[u8]) -> Result<(), ModeError> {
        self.install(key)
    }

    fn crypt_block(&self, direction: Direction, input: &Block) -> Result<Block, ModeError> {
        let round_keys = self
            .round_keys
            .as_ref()
            .ok_or(ModeError::BadInputData("no key installed"))?;
        Ok(match direction {
            Direction::Encrypt => encrypt_block(input, round_keys),
            Direction::Decrypt => decrypt_block(input, round_keys),
        })
    }

    fn clear_key(&mut self) {
        self.round_keys = None;
    }
}

impl fmt::Debug for Aes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aes")
            .field("key_bits", &self.key_bits())
            .finish()
    }
}
