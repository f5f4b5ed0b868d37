//! Decoders and encoders (spec.md §4.2).
//!
//! Decoders are built by recursive composition: a 3-to-8 decoder is two
//! 2-to-4 decoders gated by the high address bit and its negation, and so
//! on up to 5-to-32 (the register-file address decoder).

use crate::gates::{and, not};

/// Recursively builds a `2^n`-wide one-hot decoder from `n` address bits
/// (LSB-first in `addr`, i.e. `addr[0]` is the low bit).
///
/// Index `i` of the result is high iff the address bits equal `i`. This is
/// the single general implementation backing `decoder_2to4` through
/// `decoder_5to32`; those are thin fixed-width wrappers kept because
/// spec.md §4.2 names them individually.
fn decode_n(addr: &[u8]) -> Vec<u8> {
    if addr.is_empty() {
        return vec![1];
    }
    let (high_bit, rest) = addr.split_last().unwrap();
    let lower = decode_n(rest);
    let not_high = not(*high_bit, 1);
    let mut out = Vec::with_capacity(lower.len() * 2);
    for &l in &lower {
        out.push(and(l, not_high, 1));
    }
    for &l in &lower {
        out.push(and(l, *high_bit, 1));
    }
    out
}

/// 2-to-4 one-hot decoder.
pub fn decoder_2to4(addr: [u8; 2]) -> [u8; 4] {
    decode_n(&addr).try_into().unwrap()
}

/// 3-to-8 one-hot decoder: two 2-to-4 decoders gated by bit 2 and its
/// negation (spec.md §4.2).
pub fn decoder_3to8(addr: [u8; 3]) -> [u8; 8] {
    decode_n(&addr).try_into().unwrap()
}

/// 4-to-16 one-hot decoder.
pub fn decoder_4to16(addr: [u8; 4]) -> [u8; 16] {
    decode_n(&addr).try_into().unwrap()
}

/// 5-to-32 one-hot decoder — used by the register file to select one of
/// 32 registers from a 5-bit address (spec.md §4.3).
pub fn decoder_5to32(addr: [u8; 5]) -> [u8; 32] {
    decode_n(&addr).try_into().unwrap()
}

/// 8-to-3 priority encoder: returns the 3-bit index (LSB-first) of the
/// highest-set input bit. Inputs are indexed low-to-high in `bits`.
pub fn encoder_8to3(bits: [u8; 8]) -> [u8; 3] {
    let mut index = 0usize;
    for (i, &b) in bits.iter().enumerate() {
        if b == 1 {
            index = i;
        }
    }
    [
        (index & 1) as u8,
        ((index >> 1) & 1) as u8,
        ((index >> 2) & 1) as u8,
    ]
}

/// Returns the position of the single set bit in a one-hot vector, or `-1`
/// if no bit is set. Per spec.md §9 Open Questions, `-1` is chosen over 0
/// or `len` because it can never be confused with a valid zero index.
pub fn one_hot_to_decimal(bits: &[u8]) -> i32 {
    let mut found: i32 = -1;
    for (i, &b) in bits.iter().enumerate() {
        if b == 1 {
            found = i as i32;
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoder_2to4_is_one_hot() {
        for i in 0..4u8 {
            let addr = [i & 1, (i >> 1) & 1];
            let out = decoder_2to4(addr);
            for (j, &bit) in out.iter().enumerate() {
                assert_eq!(bit, if j as u8 == i { 1 } else { 0 });
            }
        }
    }

    #[test]
    fn decoder_5to32_is_one_hot_for_every_register_address() {
        for i in 0..32u8 {
            let addr = [i & 1, (i >> 1) & 1, (i >> 2) & 1, (i >> 3) & 1, (i >> 4) & 1];
            let out = decoder_5to32(addr);
            assert_eq!(out.iter().sum::<u8>(), 1);
            assert_eq!(out[i as usize], 1);
        }
    }

    #[test]
    fn encoder_8to3_picks_highest_set_bit() {
        let mut bits = [0u8; 8];
        bits[2] = 1;
        bits[5] = 1;
        let idx = encoder_8to3(bits);
        assert_eq!(idx, [1, 0, 1]); // 5 = 0b101
    }

    #[test]
    fn one_hot_to_decimal_sentinel_on_empty() {
        assert_eq!(one_hot_to_decimal(&[0, 0, 0, 0]), -1);
        assert_eq!(one_hot_to_decimal(&[0, 0, 1, 0]), 2);
    }
}
