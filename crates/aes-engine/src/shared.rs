//! Mutex-serialized access to one engine.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use aes_modes::{Block, BlockCipher, Direction, ModeError};
use tracing::trace;

/// Cloneable handle to an engine shared between threads.
pub struct SharedEngine<C> {
    inner: Arc<Mutex<C>>,
}

impl<C> Clone for SharedEngine<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn poisoned() -> ModeError {
    ModeError::HardwareAccelFailed("engine lock poisoned".into())
}

impl<C: BlockCipher> SharedEngine<C> {
    /// Takes ownership of `cipher`.
    pub fn new(cipher: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cipher)),
        }
    }

    /// Blocks until the engine is free and holds it until the session drops.
    ///
    /// Hold one session for a whole mode call (key install included), not
    /// per block.
    pub fn session(&self) -> Result<Session<'_, C>, ModeError> {
        let guard = self.inner.lock().map_err(|_| poisoned())?;
        trace!("engine session acquired");
        Ok(Session { guard })
    }

    /// Like [`session`](Self::session) but reports a busy engine instead of
    /// waiting.
    pub fn try_session(&self) -> Result<Session<'_, C>, ModeError> {
        match self.inner.try_lock() {
            Ok(guard) => {
                trace!("engine session acquired");
                Ok(Session { guard })
            }
            Err(TryLockError::WouldBlock) => {
                Err(ModeError::HardwareAccelFailed("engine busy".into()))
            }
            Err(TryLockError::Poisoned(_)) => Err(poisoned()),
        }
    }

    /// Runs `f` inside one session.
    pub fn with_session<R>(
        &self,
        f: impl FnOnce(&mut Session<'_, C>) -> Result<R, ModeError>,
    ) -> Result<R, ModeError> {
        let mut session = self.session()?;
        f(&mut session)
    }
}

/// Exclusive use of a [`SharedEngine`]; itself a [`BlockCipher`].
pub struct Session<'a, C> {
    guard: MutexGuard<'a, C>,
}

impl<C: BlockCipher> BlockCipher for Session<'_, C> {
    fn set_key_encrypt(&mut self, key: &[u8]) -> Result<(), ModeError> {
        self.guard.set_key_encrypt(key)
    }

    fn set_key_decrypt(&mut self, key: &[u8]) -> Result<(), ModeError> {
        self.guard.set_key_decrypt(key)
    }

    fn crypt_block(&self, direction: Direction, input: &Block) -> Result<Block, ModeError> {
        self.guard.crypt_block(direction, input)
    }

    fn clear_key(&mut self) {
        self.guard.clear_key()
    }
}

impl<C> Drop for Session<'_, C> {
    fn drop(&mut self) {
        trace!("engine session released");
    }
}
