//! Built-in known-answer vectors (NIST SP 800-38A, IEEE 1619).

use aes_engine::Backend;
use aes_modes::Direction;
use anyhow::{bail, Context, Result};

use crate::pipeline::{parse_iv, Job, ModeArg};

const NIST_KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";
const NIST_IV: &str = "000102030405060708090a0b0c0d0e0f";
const NIST_PLAIN: &str = "6bc1bee22e409f96e93d7e117393172a\
                          ae2d8a571e03ac9c9eb76fac45af8e51\
                          30c81c46a35ce411e5fbc1191a0a52ef\
                          f69f2445df4f9b17ad2b417be66c3710";

#[derive(Clone, Copy)]
struct Vector {
    name: &'static str,
    mode: ModeArg,
    key: &'static str,
    iv: Option<&'static str>,
    sector: u64,
    sector_size: usize,
    plain: &'static str,
    cipher: &'static str,
}

const VECTORS: &[Vector] = &[
    Vector {
        name: "SP 800-38A F.1.1 ECB-AES128",
        mode: ModeArg::Ecb,
        key: NIST_KEY,
        iv: None,
        sector: 0,
        sector_size: 0,
        plain: NIST_PLAIN,
        cipher: "3ad77bb40d7a3660a89ecaf32466ef97\
                 f5d3d58503b9699de785895a96fdbaaf\
                 43b1cd7f598ece23881b00e3ed030688\
                 7b0c785e27e8ad3f8223207104725dd4",
    },
    Vector {
        name: "SP 800-38A F.2.1 CBC-AES128",
        mode: ModeArg::Cbc,
        key: NIST_KEY,
        iv: Some(NIST_IV),
        sector: 0,
        sector_size: 0,
        plain: NIST_PLAIN,
        cipher: "7649abac8119b246cee98e9b12e9197d\
                 5086cb9b507219ee95db113a917678b2\
                 73bed6b8e3c1743b7116e69e22229516\
                 3ff1caa1681fac09120eca307586e1a7",
    },
    Vector {
        name: "SP 800-38A F.3.13 CFB128-AES128",
        mode: ModeArg::Cfb128,
        key: NIST_KEY,
        iv: Some(NIST_IV),
        sector: 0,
        sector_size: 0,
        plain: NIST_PLAIN,
        cipher: "3b3fd92eb72dad20333449f8e83cfb4a\
                 c8a64537a0b3a93fcde3cdad9f1ce58b\
                 26751f67a3cbb140b1808cf187a4f4df\
                 c04b05357c5d1c0eeac4c66f9ff7f2e6",
    },
    Vector {
        name: "SP 800-38A F.3.7 CFB8-AES128",
        mode: ModeArg::Cfb8,
        key: NIST_KEY,
        iv: Some(NIST_IV),
        sector: 0,
        sector_size: 0,
        plain: "6bc1bee22e409f96e93d7e117393172aae2d",
        cipher: "3b79424c9c0dd436bace9e0ed4586a4f32b9",
    },
    Vector {
        name: "SP 800-38A F.4.1 OFB-AES128",
        mode: ModeArg::Ofb,
        key: NIST_KEY,
        iv: Some(NIST_IV),
        sector: 0,
        sector_size: 0,
        plain: NIST_PLAIN,
        cipher: "3b3fd92eb72dad20333449f8e83cfb4a\
                 7789508d16918f03f53c52dac54ed825\
                 9740051e9c5fecf64344f7a82260edcc\
                 304c6528f659c77866a510d9c1d6ae5e",
    },
    Vector {
        name: "SP 800-38A F.5.1 CTR-AES128",
        mode: ModeArg::Ctr,
        key: NIST_KEY,
        iv: Some("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff"),
        sector: 0,
        sector_size: 0,
        plain: NIST_PLAIN,
        cipher: "874d6191b620e3261bef6864990db6ce\
                 9806f66b7970fdff8617187bb9fffdff\
                 5ae4df3edbd5d35e5b4f09020db03eab\
                 1e031dda2fbe03d1792170a0f3009cee",
    },
    Vector {
        name: "IEEE 1619 XTS-AES-128 #1",
        mode: ModeArg::Xts,
        key: "0000000000000000000000000000000000000000000000000000000000000000",
        iv: None,
        sector: 0,
        sector_size: 32,
        plain: "0000000000000000000000000000000000000000000000000000000000000000",
        cipher: "917cf69ebd68b2ec9b9fe9a3eadda692cd43d2f59598ed858c02c2652fbf922e",
    },
    Vector {
        name: "IEEE 1619 XTS-AES-128 #15",
        mode: ModeArg::Xts,
        key: "fffefdfcfbfaf9f8f7f6f5f4f3f2f1f0bfbebdbcbbbab9b8b7b6b5b4b3b2b1b0",
        iv: None,
        sector: 0x12_3456_789a,
        sector_size: 17,
        plain: "000102030405060708090a0b0c0d0e0f10",
        cipher: "6c1625db4671522d3d7599601de7ca09ed",
    },
];

impl Vector {
    fn job<'a>(&self, backend: Backend, direction: Direction, key: &'a [u8]) -> Result<Job<'a>> {
        Ok(Job {
            backend,
            mode: self.mode,
            direction,
            key,
            iv: self.iv.map(parse_iv).transpose()?,
            first_sector: self.sector,
            sector_size: self.sector_size,
        })
    }

    fn check(&self, backend: Backend) -> Result<()> {
        let key = hex::decode(self.key).context("decode vector key")?;
        let plain = hex::decode(self.plain).context("decode vector plaintext")?;
        let cipher = hex::decode(self.cipher).context("decode vector ciphertext")?;

        let ct = self.job(backend, Direction::Encrypt, &key)?.run(&plain)?;
        if ct != cipher {
            bail!(
                "{}: encrypt produced {}, expected {}",
                self.name,
                hex::encode(&ct),
                self.cipher
            );
        }
        let pt = self.job(backend, Direction::Decrypt, &key)?.run(&cipher)?;
        if pt != plain {
            bail!("{}: decrypt did not recover the plaintext", self.name);
        }
        Ok(())
    }
}

/// Runs every vector against `backend`, printing one line per vector.
pub fn run(backend: Backend) -> Result<usize> {
    for vector in VECTORS {
        vector
            .check(backend)
            .with_context(|| format!("self-test failed on {backend}"))?;
        println!("ok  {}", vector.name);
    }
    Ok(VECTORS.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_vectors_pass_on_every_backend() {
        for &backend in Backend::ALL {
            assert_eq!(run(backend).unwrap(), VECTORS.len());
        }
    }

    #[test]
    fn covers_every_mode() {
        use clap::ValueEnum;
        for mode in ModeArg::value_variants() {
            assert!(
                VECTORS.iter().any(|v| v.mode == *mode),
                "no vector for {mode:?}"
            );
        }
    }

    #[test]
    fn corrupted_vector_is_reported_by_name() {
        let mut bad = VECTORS[1];
        bad.cipher = "00000000000000000000000000000000\
                      5086cb9b507219ee95db113a917678b2\
                      73bed6b8e3c1743b7116e69e22229516\
                      3ff1caa1681fac09120eca307586e1a7";
        let err = bad.check(Backend::Software).unwrap_err();
        assert!(err.to_string().contains("F.2.1 CBC"), "{err}");
    }
}
