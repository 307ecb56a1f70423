//! Deterministic luck: a stateless hash of a key into `[0, 1)`.
//!
//! The same key yields the same value on every call and across process
//! restarts, so any cache can be regenerated from its coordinates alone.
//! Keys are built like a comma-joined list: `[3, -2, "initialValue"]`
//! hashes the string `"3,-2,initialValue"`.

use std::fmt;

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// One component of a luck key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPart<'a> {
    Int(i64),
    Str(&'a str),
}

impl From<i32> for KeyPart<'_> {
    fn from(v: i32) -> Self {
        KeyPart::Int(v as i64)
    }
}

impl From<i64> for KeyPart<'_> {
    fn from(v: i64) -> Self {
        KeyPart::Int(v)
    }
}

impl<'a> From<&'a str> for KeyPart<'a> {
    fn from(s: &'a str) -> Self {
        KeyPart::Str(s)
    }
}

impl fmt::Display for KeyPart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Int(v) => write!(f, "{v}"),
            KeyPart::Str(s) => f.write_str(s),
        }
    }
}

/// Join key parts with `,`.
pub fn join_key(parts: &[KeyPart<'_>]) -> String {
    parts
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Hash `key` into `[0, 1)`.
pub fn luck(key: &str) -> f64 {
    murmur3_32(key.as_bytes(), 0) as f64 / 4_294_967_296.0
}

/// Luck of a composite key.
pub fn seeded_value(parts: &[KeyPart<'_>]) -> f64 {
    luck(&join_key(parts))
}

/// MurmurHash3, x86 32-bit variant.
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    let mut h = seed;
    let mut blocks = data.chunks_exact(4);

    for block in &mut blocks {
        let k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h ^= mix_k(k);
        h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k = 0u32;
        for (i, b) in tail.iter().enumerate() {
            k |= (*b as u32) << (8 * i);
        }
        h ^= mix_k(k);
    }

    h ^= data.len() as u32;
    fmix32(h)
}

fn mix_k(k: u32) -> u32 {
    k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}
