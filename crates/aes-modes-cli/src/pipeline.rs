//! Whole-buffer encryption and decryption in any supported mode.

use aes_engine::Backend;
use aes_modes::{
    data_unit_from_sector, AesContext, Block, CtrState, Direction, FeedbackState, XtsContext,
    BLOCK_SIZE,
};
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use tracing::debug;

/// Mode selectable on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Independent blocks, no IV.
    Ecb,
    /// Cipher block chaining.
    Cbc,
    /// Full-block cipher feedback.
    Cfb128,
    /// Byte-wise cipher feedback.
    Cfb8,
    /// Output feedback.
    Ofb,
    /// Counter mode; the IV is the initial counter block.
    Ctr,
    /// XTS over sectors, double-length key.
    Xts,
}

impl ModeArg {
    /// Whether the mode needs an IV or initial counter.
    pub fn needs_iv(self) -> bool {
        !matches!(self, ModeArg::Ecb | ModeArg::Xts)
    }
}

/// One transformation of a buffer.
pub struct Job<'a> {
    pub backend: Backend,
    pub mode: ModeArg,
    pub direction: Direction,
    pub key: &'a [u8],
    pub iv: Option<Block>,
    pub first_sector: u64,
    pub sector_size: usize,
}

impl Job<'_> {
    /// Transforms `input` and returns a buffer of the same length.
    pub fn run(&self, input: &[u8]) -> Result<Vec<u8>> {
        debug!(
            mode = ?self.mode,
            direction = %self.direction,
            backend = %self.backend,
            len = input.len(),
            "running job"
        );
        let mut output = vec![0u8; input.len()];
        if self.mode == ModeArg::Xts {
            self.run_xts(input, &mut output)?;
        } else {
            self.run_single_key(input, &mut output)?;
        }
        Ok(output)
    }

    /// Feedback and counter modes run the engine forwards in both directions.
    fn key_direction(&self) -> Direction {
        match self.mode {
            ModeArg::Ecb | ModeArg::Cbc | ModeArg::Xts => self.direction,
            ModeArg::Cfb128 | ModeArg::Cfb8 | ModeArg::Ofb | ModeArg::Ctr => Direction::Encrypt,
        }
    }

    fn iv(&self) -> Result<Block> {
        self.iv
            .with_context(|| format!("mode {:?} needs an IV (--iv)", self.mode))
    }

    fn run_single_key(&self, input: &[u8], output: &mut [u8]) -> Result<()> {
        let mut ctx = AesContext::with_cipher(self.backend.instantiate());
        let installed = match self.key_direction() {
            Direction::Encrypt => ctx.set_key_enc(self.key),
            Direction::Decrypt => ctx.set_key_dec(self.key),
        };
        installed.context("install AES key")?;

        match self.mode {
            ModeArg::Ecb => {
                if input.len() % BLOCK_SIZE != 0 {
                    bail!("ECB input must be a multiple of {BLOCK_SIZE} bytes");
                }
                let mut block = [0u8; BLOCK_SIZE];
                for (src, dst) in input
                    .chunks_exact(BLOCK_SIZE)
                    .zip(output.chunks_exact_mut(BLOCK_SIZE))
                {
                    block.copy_from_slice(src);
                    dst.copy_from_slice(&ctx.crypt_ecb(self.direction, &block)?);
                }
            }
            ModeArg::Cbc => ctx
                .crypt_cbc(self.direction, &mut self.iv()?, input, output)
                .context("CBC")?,
            ModeArg::Cfb128 => {
                let mut state = FeedbackState::new(self.iv()?);
                ctx.crypt_cfb128(self.direction, &mut state, input, output)?
            }
            ModeArg::Cfb8 => ctx.crypt_cfb8(self.direction, &mut self.iv()?, input, output)?,
            ModeArg::Ofb => ctx.crypt_ofb(&mut FeedbackState::new(self.iv()?), input, output)?,
            ModeArg::Ctr => ctx.crypt_ctr(&mut CtrState::new(self.iv()?), input, output)?,
            ModeArg::Xts => bail!("XTS needs a double-length key"),
        }
        Ok(())
    }

    fn run_xts(&self, input: &[u8], output: &mut [u8]) -> Result<()> {
        if self.sector_size < BLOCK_SIZE {
            bail!("sector size must be at least {BLOCK_SIZE} bytes");
        }
        let mut ctx =
            XtsContext::with_ciphers(self.backend.instantiate(), self.backend.instantiate());
        let installed = match self.direction {
            Direction::Encrypt => ctx.set_key_enc(self.key),
            Direction::Decrypt => ctx.set_key_dec(self.key),
        };
        installed.context("install XTS key")?;

        let units = input
            .chunks(self.sector_size)
            .zip(output.chunks_mut(self.sector_size));
        for (index, (src, dst)) in units.enumerate() {
            let sector = u64::try_from(index)
                .ok()
                .and_then(|i| self.first_sector.checked_add(i))
                .context("sector number overflows u64")?;
            ctx.crypt_xts(self.direction, &data_unit_from_sector(sector), src, dst)
                .with_context(|| format!("sector {sector}"))?;
        }
        Ok(())
    }
}

/// Parses a 16-byte IV from hex.
pub fn parse_iv(hex_str: &str) -> Result<Block> {
    let bytes = hex::decode(hex_str.trim()).context("decode IV hex")?;
    Block::try_from(bytes.as_slice())
        .map_err(|_| anyhow::anyhow!("IV must be 16 bytes (32 hex characters)"))
}
