//! AES key schedule and block encryption/decryption.

use zeroize::Zeroize;

use crate::block::Block;
use crate::key::{AesKey, RoundKeys};
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};
use crate::sbox::sbox;

const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

fn sub_word(word: u32) -> u32 {
    u32::from_be_bytes(word.to_be_bytes().map(sbox))
}

/// Expands a 128, 192 or 256-bit key into `rounds + 1` round keys.
pub fn expand_key(key: &AesKey) -> RoundKeys {
    let nk = key.words();
    let rounds = key.rounds();
    let total = 4 * (rounds + 1);

    let mut w = [0u32; 60];
    for (slot, chunk) in w.iter_mut().zip(key.as_bytes().chunks_exact(4)) {
        *slot = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    for i in nk..total {
        let mut temp = w[i - 1];
        if i % nk == 0 {
            temp = sub_word(temp.rotate_left(8)) ^ (u32::from(RCON[i / nk - 1]) << 24);
        } else if nk > 6 && i % nk == 4 {
            temp = sub_word(temp);
        }
        w[i] = w[i - nk] ^ temp;
    }

    let mut keys = [[0u8; 16]; 15];
    for (round_key, words) in keys.iter_mut().zip(w[..total].chunks_exact(4)) {
        for (dst, word) in round_key.chunks_exact_mut(4).zip(words) {
            dst.copy_from_slice(&word.to_be_bytes());
        }
    }
    w.zeroize();

    RoundKeys::new(keys, rounds)
}

/// Encrypts a single 16-byte block with pre-expanded round keys.
pub fn encrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let rounds = round_keys.rounds();
    let mut state = *block;

    add_round_key(&mut state, round_keys.get(0));

    for round in 1..rounds {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        mix_columns(&mut state);
        add_round_key(&mut state, round_keys.get(round));
    }

    sub_bytes(&mut state);
    shift_rows(&mut state);
    add_round_key(&mut state, round_keys.get(rounds));

    state
}

/// Decrypts a single 16-byte block with pre-expanded round keys.
pub fn decrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let rounds = round_keys.rounds();
    let mut state = *block;

    add_round_key(&mut state, round_keys.get(rounds));
    for round in (1..rounds).rev() {
        inv_shift_rows(&mut state);
        inv_sub_bytes(&mut state);
        add_round_key(&mut state, round_keys.get(round));
        inv_mix_columns(&mut state);
    }
    inv_shift_rows(&mut state);
    inv_sub_bytes(&mut state);
    add_round_key(&mut state, round_keys.get(0));

    state
}
