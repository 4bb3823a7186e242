//! Pluggable key hashing.
//!
//! A table hashes the raw UTF-8 bytes of each key exactly once per
//! operation. Any `Fn(&[u8]) -> u64` is a hasher, so plain functions such
//! as [`djb2`] can be passed directly; [`BuildHasherKey`] adapts the std
//! `BuildHasher` family.

use core::hash::{BuildHasher, Hasher};

/// Maps key bytes to a 64-bit hash. Must be deterministic for the lifetime
/// of the table that uses it.
pub trait KeyHasher {
    fn hash_key(&self, key: &[u8]) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&[u8]) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &[u8]) -> u64 {
        self(key)
    }
}

/// Adapter that feeds key bytes through a `BuildHasher`.
#[derive(Clone, Debug, Default)]
pub struct BuildHasherKey<S>(pub S);

impl<S: BuildHasher> KeyHasher for BuildHasherKey<S> {
    #[inline]
    fn hash_key(&self, key: &[u8]) -> u64 {
        let mut h = self.0.build_hasher();
        h.write(key);
        h.finish()
    }
}

/// Hasher used by `ChainedTable::default()`.
pub type DefaultKeyHasher = BuildHasherKey<hashbrown::hash_map::DefaultHashBuilder>;

/// djb2: `hash * 33 + byte`, seeded with 5381.
pub fn djb2(key: &[u8]) -> u64 {
    let mut hash: u64 = 5381;
    for &b in key {
        hash = hash.wrapping_shl(5).wrapping_add(hash).wrapping_add(b as u64);
    }
    hash
}

/// 64-bit FNV-1a.
pub fn fnv1a(key: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 14695981039346656037;
    const PRIME: u64 = 1099511628211;

    let mut hash = OFFSET_BASIS;
    for &b in key {
        hash ^= b as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// `hash << 5 + byte` over a 32-bit accumulator. Weak, but cheap and handy
/// for reproducing collision-heavy layouts.
pub fn shift_add(key: &[u8]) -> u64 {
    let mut hash: u32 = 0;
    for &b in key {
        hash = hash.wrapping_shl(5).wrapping_add(b as u32);
    }
    hash as u64
}

/// XXH64 with seed 0.
pub fn xxh64(key: &[u8]) -> u64 {
    xxhash_rust::xxh64::xxh64(key, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(djb2(b""), 5381);
        assert_eq!(djb2(b"a"), 5381 * 33 + 97);
        assert_eq!(fnv1a(b""), 14695981039346656037);
        assert_eq!(fnv1a(b"a"), 0xaf63dc4c8601ec8c);
        assert_eq!(shift_add(b"ab"), (97 << 5) + 98);
        assert_eq!(xxh64(b""), 0xef46db3751d8e999);
    }

    #[test]
    fn shift_add_wraps_at_32_bits() {
        let long = [0xffu8; 64];
        assert!(shift_add(&long) <= u32::MAX as u64);
    }

    #[test]
    fn closures_and_fns_are_hashers() {
        fn via<H: KeyHasher>(h: &H, k: &[u8]) -> u64 {
            h.hash_key(k)
        }
        assert_eq!(via(&djb2, b"key"), djb2(b"key"));
        let constant = |_: &[u8]| 7u64;
        assert_eq!(via(&constant, b"anything"), 7);
    }

    #[test]
    fn build_hasher_adapter_is_deterministic_per_instance() {
        let h = DefaultKeyHasher::default();
        assert_eq!(h.hash_key(b"same"), h.hash_key(b"same"));
        let sip = BuildHasherKey(std::hash::BuildHasherDefault::<
            std::collections::hash_map::DefaultHasher,
        >::default());
        assert_eq!(sip.hash_key(b"x"), sip.clone().hash_key(b"x"));
    }
}
