//! Keyed contexts with an explicit init / setkey / crypt / free lifecycle.

use aes_core::Block;
use tracing::debug;

use crate::cbc::cbc_crypt;
use crate::cfb::{cfb128_crypt, cfb8_crypt, FeedbackState};
use crate::cipher::{Aes, BlockCipher, Direction};
use crate::ctr::{ctr_crypt, CtrState};
use crate::ecb::ecb_crypt;
use crate::error::ModeError;
use crate::ofb::ofb_crypt;
use crate::xts::{xts_crypt, xts_crypt_in_place};

const NO_KEY: ModeError = ModeError::BadInputData("no key installed");
const WRONG_KEY: ModeError = ModeError::BadInputData("key installed for the other direction");

fn check_key(keyed: Option<Direction>, needed: Direction) -> Result<(), ModeError> {
    match keyed {
        None => Err(NO_KEY),
        Some(direction) if direction == needed => Ok(()),
        Some(_) => Err(WRONG_KEY),
    }
}

/// One engine plus the direction its key was installed for.
///
/// ECB and CBC need the key installed for the direction they run in. CFB,
/// OFB and CTR only ever encrypt blocks, so they need an encryption key for
/// both directions; a decryption key is rejected with `BadInputData`.
///
/// Dropping the context wipes the key, as does [`AesContext::free`].
pub struct AesContext<C: BlockCipher = Aes> {
    cipher: C,
    keyed: Option<Direction>,
}

impl AesContext<Aes> {
    /// Creates a context on the software engine with no key installed.
    pub fn new() -> Self {
        Self::with_cipher(Aes::new())
    }
}

impl Default for AesContext<Aes> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: BlockCipher> AesContext<C> {
    /// Creates a context on an arbitrary engine.
    pub fn with_cipher(cipher: C) -> Self {
        Self {
            cipher,
            keyed: None,
        }
    }

    /// Installs an encryption key (128, 192 or 256 bits).
    pub fn set_key_enc(&mut self, key: &[u8]) -> Result<(), ModeError> {
        self.keyed = None;
        self.cipher.set_key_encrypt(key)?;
        self.keyed = Some(Direction::Encrypt);
        Ok(())
    }

    /// Installs a decryption key (128, 192 or 256 bits).
    pub fn set_key_dec(&mut self, key: &[u8]) -> Result<(), ModeError> {
        self.keyed = None;
        self.cipher.set_key_decrypt(key)?;
        self.keyed = Some(Direction::Decrypt);
        Ok(())
    }

    /// Direction of the installed key, if any.
    pub fn key_direction(&self) -> Option<Direction> {
        self.keyed
    }

    fn cipher(&self, needed: Direction) -> Result<&C, ModeError> {
        check_key(self.keyed, needed)?;
        Ok(&self.cipher)
    }

    /// Single-block ECB.
    pub fn crypt_ecb(&self, direction: Direction, input: &Block) -> Result<Block, ModeError> {
        ecb_crypt(self.cipher(direction)?, direction, input)
    }

    /// CBC; see [`cbc_crypt`].
    pub fn crypt_cbc(
        &self,
        direction: Direction,
        iv: &mut Block,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(), ModeError> {
        cbc_crypt(self.cipher(direction)?, direction, iv, input, output)
    }

    /// CFB128; see [`cfb128_crypt`].
    pub fn crypt_cfb128(
        &self,
        direction: Direction,
        state: &mut FeedbackState,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(), ModeError> {
        cfb128_crypt(self.cipher(Direction::Encrypt)?, direction, state, input, output)
    }

    /// CFB8; see [`cfb8_crypt`].
    pub fn crypt_cfb8(
        &self,
        direction: Direction,
        iv: &mut Block,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(), ModeError> {
        cfb8_crypt(self.cipher(Direction::Encrypt)?, direction, iv, input, output)
    }

    /// OFB; see [`ofb_crypt`].
    pub fn crypt_ofb(
        &self,
        state: &mut FeedbackState,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(), ModeError> {
        ofb_crypt(self.cipher(Direction::Encrypt)?, state, input, output)
    }

    /// CTR; see [`ctr_crypt`].
    pub fn crypt_ctr(
        &self,
        state: &mut CtrState,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(), ModeError> {
        ctr_crypt(self.cipher(Direction::Encrypt)?, state, input, output)
    }

    /// Wipes the installed key. The context can be keyed again afterwards.
    pub fn free(&mut self) {
        self.cipher.clear_key();
        self.keyed = None;
    }
}

impl<C: BlockCipher> Drop for AesContext<C> {
    fn drop(&mut self) {
        self.free();
    }
}

/// Splits a concatenated XTS key into (data key, tweak key).
fn split_xts_key(key: &[u8]) -> Result<(&[u8], &[u8]), ModeError> {
    match key.len() {
        32 | 48 | 64 => Ok(key.split_at(key.len() / 2)),
        len => Err(ModeError::InvalidKeyLength { bits: len * 8 }),
    }
}

/// Data and tweak engines for XTS.
///
/// Keys are supplied concatenated, data key first: 256 bits for XTS-AES-128,
/// 512 bits for XTS-AES-256. The tweak half is always installed for
/// encryption; the data half for the direction later passed to `crypt_xts`.
pub struct XtsContext<C: BlockCipher = Aes> {
    crypt: C,
    tweak: C,
    keyed: Option<Direction>,
}

impl XtsContext<Aes> {
    /// Creates a context on the software engine with no key installed.
    pub fn new() -> Self {
        Self::with_ciphers(Aes::new(), Aes::new())
    }
}

impl Default for XtsContext<Aes> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: BlockCipher> XtsContext<C> {
    /// Creates a context on two arbitrary engines.
    pub fn with_ciphers(crypt: C, tweak: C) -> Self {
        Self {
            crypt,
            tweak,
            keyed: None,
        }
    }

    /// Installs a double-length key for encryption.
    pub fn set_key_enc(&mut self, key: &[u8]) -> Result<(), ModeError> {
        let (data_key, tweak_key) = split_xts_key(key)?;
        self.keyed = None;
        self.tweak.set_key_encrypt(tweak_key)?;
        self.crypt.set_key_encrypt(data_key)?;
        self.keyed = Some(Direction::Encrypt);
        debug!(bits = key.len() * 4, "installed XTS encryption keys");
        Ok(())
    }

    /// Installs a double-length key for decryption.
    pub fn set_key_dec(&mut self, key: &[u8]) -> Result<(), ModeError> {
        let (data_key, tweak_key) = split_xts_key(key)?;
        self.keyed = None;
        self.tweak.set_key_encrypt(tweak_key)?;
        self.crypt.set_key_decrypt(data_key)?;
        self.keyed = Some(Direction::Decrypt);
        debug!(bits = key.len() * 4, "installed XTS decryption keys");
        Ok(())
    }

    /// Direction of the installed keys, if any.
    pub fn key_direction(&self) -> Option<Direction> {
        self.keyed
    }

    fn engines(&self, direction: Direction) -> Result<(&C, &C), ModeError> {
        check_key(self.keyed, direction)?;
        Ok((&self.crypt, &self.tweak))
    }

    /// XTS over one data unit; see [`xts_crypt`].
    pub fn crypt_xts(
        &self,
        direction: Direction,
        data_unit: &Block,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(), ModeError> {
        let (crypt, tweak) = self.engines(direction)?;
        xts_crypt(crypt, tweak, direction, data_unit, input, output)
    }

    /// In-place XTS over one data unit.
    pub fn crypt_xts_in_place(
        &self,
        direction: Direction,
        data_unit: &Block,
        data: &mut [u8],
    ) -> Result<(), ModeError> {
        let (crypt, tweak) = self.engines(direction)?;
        xts_crypt_in_place(crypt, tweak, direction, data_unit, data)
    }

    /// Wipes both keys.
    pub fn free(&mut self) {
        self.crypt.clear_key();
        self.tweak.clear_key();
        self.keyed = None;
    }
}

impl<C: BlockCipher> Drop for XtsContext<C> {
    fn drop(&mut self) {
        self.free();
    }
}
