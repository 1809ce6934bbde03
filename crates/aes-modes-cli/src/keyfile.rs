//! On-disk key material.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

const KEYFILE_VERSION: u32 = 1;

/// A single AES key, or a concatenated data+tweak key for XTS.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct KeyFile {
    version: u32,
    bits: u32,
    xts: bool,
    material: Vec<u8>,
}

fn check_bits(bits: u32) -> Result<()> {
    if !matches!(bits, 128 | 192 | 256) {
        bail!("AES key size must be 128, 192 or 256 bits, got {bits}");
    }
    Ok(())
}

impl KeyFile {
    /// Draws fresh key material from `rng`.
    pub fn generate(rng: &mut (impl RngCore + CryptoRng), bits: u32, xts: bool) -> Result<Self> {
        check_bits(bits)?;
        let halves = if xts { 2 } else { 1 };
        let mut material = vec![0u8; bits as usize / 8 * halves];
        rng.fill_bytes(&mut material);
        Ok(Self {
            version: KEYFILE_VERSION,
            bits,
            xts,
            material,
        })
    }

    /// Wraps existing key bytes; XTS keys are data key followed by tweak key.
    pub fn from_material(material: Vec<u8>, xts: bool) -> Result<Self> {
        let halves = if xts { 2 } else { 1 };
        if material.len() % halves != 0 {
            bail!("XTS key must split into two equal halves");
        }
        let bits = u32::try_from(material.len() / halves * 8).context("key too long")?;
        check_bits(bits)?;
        Ok(Self {
            version: KEYFILE_VERSION,
            bits,
            xts,
            material,
        })
    }

    /// Raw key bytes as handed to the engine.
    pub fn material(&self) -> &[u8] {
        &self.material
    }

    /// Size of one AES key in bits.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Whether this is a double-length XTS key.
    pub fn is_xts(&self) -> bool {
        self.xts
    }

    /// Serializes with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserializes with `bincode` and checks the contents are consistent.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let file: Self = bincode::deserialize(bytes).context("decode key file")?;
        if file.version != KEYFILE_VERSION {
            bail!("unsupported key file version {}", file.version);
        }
        check_bits(file.bits)?;
        let halves = if file.xts { 2 } else { 1 };
        if file.material.len() != file.bits as usize / 8 * halves {
            bail!("key file material does not match its declared size");
        }
        Ok(file)
    }

    /// Writes the key file to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes().context("serialize key file")?;
        fs::write(path, bytes).with_context(|| format!("write {}", path.display()))
    }

    /// Reads a key file from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_bytes(&bytes).with_context(|| format!("load {}", path.display()))
    }
}
