//! Available block cipher backends.

use core::fmt;
use core::str::FromStr;

use aes_modes::{Aes, BlockCipher};
use tracing::info;

/// Engine implementations this build can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Portable table-based AES from `aes-core`.
    Software,
}

/// Backend name that is not compiled in.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown backend `{0}` (available: software)")]
pub struct UnknownBackend(pub String);

impl Backend {
    /// Every backend compiled into this build, preferred first.
    pub const ALL: &'static [Backend] = &[Backend::Software];

    /// Resolves the preferred backend for this process.
    ///
    /// Call once at start-up and pass the result around; nothing is cached
    /// globally.
    pub fn probe() -> Self {
        let backend = Self::ALL
            .iter()
            .copied()
            .find(|b| b.is_available())
            .unwrap_or(Backend::Software);
        info!(%backend, "selected block cipher backend");
        backend
    }

    /// Whether the backend can be used on this machine.
    pub fn is_available(self) -> bool {
        match self {
            Backend::Software => true,
        }
    }

    /// Creates an unkeyed engine.
    pub fn instantiate(self) -> Box<dyn BlockCipher + Send> {
        match self {
            Backend::Software => Box::new(Aes::new()),
        }
    }

    /// Stable lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            Backend::Software => "software",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownBackend(s.to_owned()))
    }
}
