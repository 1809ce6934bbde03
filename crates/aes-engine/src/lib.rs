//! Engine selection and sharing for `aes-modes`.
//!
//! An accelerator is typically a single device used by many threads. The
//! backend is resolved once with [`Backend::probe`] and the resulting engine
//! is wrapped in a [`SharedEngine`]; callers take one [`Session`] per logical
//! crypt call so no other thread can swap keys between the blocks of that
//! call.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod backend;
mod shared;

pub use backend::{Backend, UnknownBackend};
pub use shared::{Session, SharedEngine};
