//! Block cipher modes of operation layered over a pluggable AES engine.
//!
//! Every mode is written once against the [`BlockCipher`] capability, so a
//! hardware accelerator and the portable [`Aes`] software engine are
//! interchangeable. Carry state (IVs, offsets, counters) is owned by the caller
//! and threaded through each call by `&mut`, which lets independent streams
//! interleave freely.
//!
//! Provided modes:
//! - ECB single-block ([`ecb_crypt`]).
//! - CBC ([`cbc_crypt`]), block-aligned input only.
//! - CFB128 ([`cfb128_crypt`]) and CFB8 ([`cfb8_crypt`]).
//! - OFB ([`ofb_crypt`]) and CTR ([`ctr_crypt`]).
//! - XTS with ciphertext stealing ([`xts_crypt`]), plus the [`gf128::mul_x`]
//!   tweak update it relies on.
//!
//! [`AesContext`] and [`XtsContext`] wrap the free functions in the familiar
//! init / setkey / crypt / free lifecycle and wipe key material on drop.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod buffer;
mod cbc;
mod cfb;
mod cipher;
mod context;
mod ctr;
mod ecb;
mod error;
pub mod gf128;
mod ofb;
mod xts;

#[cfg(test)]
mod testutil;

pub use aes_core::{Block, BLOCK_SIZE};

pub use crate::cbc::{cbc_crypt, cbc_crypt_in_place};
pub use crate::cfb::{
    cfb128_crypt, cfb128_crypt_in_place, cfb8_crypt, cfb8_crypt_in_place, FeedbackState,
};
pub use crate::cipher::{Aes, BlockCipher, Direction};
pub use crate::context::{AesContext, XtsContext};
pub use crate::ctr::{ctr_crypt, ctr_crypt_in_place, CtrState};
pub use crate::ecb::ecb_crypt;
pub use crate::error::ModeError;
pub use crate::ofb::{ofb_crypt, ofb_crypt_in_place};
pub use crate::xts::{data_unit_from_sector, xts_crypt, xts_crypt_in_place, XTS_MAX_LEN};
