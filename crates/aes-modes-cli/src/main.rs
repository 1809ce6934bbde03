//! Command-line interface for the AES mode engine.

#![forbid(unsafe_code)]

mod keyfile;
mod pipeline;
mod selftest;

use std::fs;
use std::path::{Path, PathBuf};

use aes_engine::Backend;
use aes_modes::Direction;
use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use crate::keyfile::KeyFile;
use crate::pipeline::{parse_iv, Job, ModeArg};

/// AES block cipher modes: ECB, CBC, CFB, OFB, CTR and XTS.
#[derive(Parser)]
#[command(name = "aesm", version, author, about = "AES modes of operation CLI")]
struct Cli {
    /// Raise the log level (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Block cipher backend; probed when omitted.
    #[arg(long, global = true, value_name = "NAME")]
    backend: Option<Backend>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a key file.
    Keygen {
        /// AES key size in bits (128, 192 or 256).
        #[arg(long, default_value_t = 128)]
        bits: u32,
        /// Generate a double-length key for XTS.
        #[arg(long, default_value_t = false)]
        xts: bool,
        /// Store this key instead of a random one.
        #[arg(long, value_name = "HEX", conflicts_with_all = ["bits", "seed"])]
        key_hex: Option<String>,
        /// Output path for the key file.
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
        /// Optional RNG seed for reproducible keys.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Encrypt a file.
    Enc(CryptArgs),
    /// Decrypt a file.
    Dec(CryptArgs),
    /// Check the engine against built-in known-answer vectors.
    Selftest,
    /// Generate a key, then encrypt and decrypt random data in every mode.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct CryptArgs {
    /// Path to the key file.
    #[arg(long, value_name = "FILE")]
    key: PathBuf,
    /// Mode of operation.
    #[arg(long, value_enum)]
    mode: ModeArg,
    /// IV or initial counter block as 32 hex characters.
    #[arg(long, value_name = "HEX")]
    iv: Option<String>,
    /// XTS: sector number of the first data unit.
    #[arg(long, default_value_t = 0)]
    sector: u64,
    /// XTS: bytes per data unit.
    #[arg(long, default_value_t = 512)]
    sector_size: usize,
    /// Input file.
    #[arg(long, value_name = "FILE")]
    input: PathBuf,
    /// Output file.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let backend = match cli.backend {
        Some(backend) if !backend.is_available() => {
            bail!("backend {backend} is not available on this machine")
        }
        Some(backend) => backend,
        None => Backend::probe(),
    };

    match cli.command {
        Commands::Keygen {
            bits,
            xts,
            key_hex,
            out,
            seed,
        } => cmd_keygen(bits, xts, key_hex.as_deref(), &out, seed),
        Commands::Enc(args) => cmd_crypt(backend, Direction::Encrypt, &args),
        Commands::Dec(args) => cmd_crypt(backend, Direction::Decrypt, &args),
        Commands::Selftest => {
            let passed = selftest::run(backend)?;
            println!("{passed} vectors passed on {backend}");
            Ok(())
        }
        Commands::Demo { seed } => cmd_demo(backend, seed),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_keygen(
    bits: u32,
    xts: bool,
    key_hex: Option<&str>,
    out: &Path,
    seed: Option<u64>,
) -> Result<()> {
    let key = match key_hex {
        Some(hex_str) => {
            let material = hex::decode(hex_str.trim()).context("decode key hex")?;
            KeyFile::from_material(material, xts)?
        }
        None => KeyFile::generate(&mut seeded_rng(seed), bits, xts)?,
    };
    key.save(out)?;
    info!(bits = key.bits(), xts = key.is_xts(), path = %out.display(), "wrote key file");
    Ok(())
}

fn cmd_crypt(backend: Backend, direction: Direction, args: &CryptArgs) -> Result<()> {
    let key = KeyFile::load(&args.key)?;
    match (args.mode == ModeArg::Xts, key.is_xts()) {
        (true, false) => bail!(
            "{} holds a single AES key; XTS needs one made with `keygen --xts`",
            args.key.display()
        ),
        (false, true) => bail!(
            "{} holds an XTS key; pass `--mode xts` or use a single key",
            args.key.display()
        ),
        _ => {}
    }
    let iv = match (&args.iv, args.mode.needs_iv()) {
        (Some(hex_str), true) => Some(parse_iv(hex_str)?),
        (Some(_), false) => bail!("mode {:?} takes no IV", args.mode),
        (None, _) => None,
    };

    let input = Zeroizing::new(
        fs::read(&args.input).with_context(|| format!("read {}", args.input.display()))?,
    );
    let job = Job {
        backend,
        mode: args.mode,
        direction,
        key: key.material(),
        iv,
        first_sector: args.sector,
        sector_size: args.sector_size,
    };
    let output = Zeroizing::new(job.run(&input)?);
    fs::write(&args.output, output.as_slice())
        .with_context(|| format!("write {}", args.output.display()))?;
    Ok(())
}

fn cmd_demo(backend: Backend, seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut data = [0u8; 100];
    rng.fill_bytes(&mut data);
    let mut iv = [0u8; 16];
    rng.fill_bytes(&mut iv);
    println!("backend: {backend}");
    println!("iv: {}", hex::encode(iv));
    println!("plaintext: {}", hex::encode(data));

    for &mode in ModeArg::value_variants() {
        let key = KeyFile::generate(&mut rng, 128, mode == ModeArg::Xts)?;
        let plaintext = match mode {
            ModeArg::Ecb | ModeArg::Cbc => &data[..96],
            _ => &data[..],
        };
        let job = |direction| Job {
            backend,
            mode,
            direction,
            key: key.material(),
            iv: mode.needs_iv().then_some(iv),
            first_sector: 0,
            sector_size: 512,
        };
        let ciphertext = job(Direction::Encrypt).run(plaintext)?;
        let decrypted = job(Direction::Decrypt).run(&ciphertext)?;
        println!("{mode:?} key: {}", hex::encode(key.material()));
        println!("{mode:?} ciphertext: {}", hex::encode(&ciphertext));
        if decrypted != plaintext {
            bail!("demo roundtrip failed for {mode:?}");
        }
    }
    println!("all modes round-tripped");
    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    let mut seed_bytes = [0u8; 32];
    match seed {
        Some(value) => seed_bytes[..8].copy_from_slice(&value.to_le_bytes()),
        None => rand::rngs::OsRng.fill_bytes(&mut seed_bytes),
    }
    ChaCha20Rng::from_seed(seed_bytes)
}
