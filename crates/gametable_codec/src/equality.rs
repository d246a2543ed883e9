//! Sequence equality and hashing for table records.
//!
//! Lists in a table distinguish "absent" from "present but empty", so both
//! helpers take `Option<&[T]>`.

use std::hash::{DefaultHasher, Hash, Hasher};

/// Multiplier applied per element of a non-empty sequence.
pub const HASH_PRIME_PRESENT: u64 = 31;

/// Multiplier applied to the seed of a null or empty sequence.
pub const HASH_PRIME_EMPTY: u64 = 17;

/// Order-sensitive structural equality. A null sequence never equals an
/// empty one.
pub fn sequence_equals<T: PartialEq>(a: Option<&[T]>, b: Option<&[T]>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => std::ptr::eq(a, b) || a == b,
        _ => false,
    }
}

/// Hash of a single value with a deterministic hasher.
pub fn hash_code<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Folds `items` into `seed`, in order.
///
/// A null or empty sequence yields `seed * prime_empty`; otherwise each item
/// contributes `h = h * prime_present + hash(item)`. Arithmetic wraps.
pub fn accumulate_hash<T: Hash>(
    seed: u64,
    items: Option<&[T]>,
    prime_present: u64,
    prime_empty: u64,
) -> u64 {
    match items {
        Some(items) if !items.is_empty() => items.iter().fold(seed, |h, item| {
            h.wrapping_mul(prime_present).wrapping_add(hash_code(item))
        }),
        _ => seed.wrapping_mul(prime_empty),
    }
}
