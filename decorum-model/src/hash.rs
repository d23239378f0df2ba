//! Hash primitives of the decorator contract.
//!
//! Every function here produces a 32-bit, wrapping hash so that values built
//! at runtime and values declared natively agree bit for bit. Scalars use
//! their natural hash; sequences fold their elements through [`sequence`].

/// Multiplier applied to a property name's hash before it is mixed with the
/// property's value hash.
pub const MEMBER_NAME_MULTIPLIER: i32 = 127;

const SEQUENCE_SEED: i32 = 1;
const SEQUENCE_MULTIPLIER: i32 = 31;

const CANONICAL_FLOAT_NAN: u32 = 0x7fc0_0000;
const CANONICAL_DOUBLE_NAN: u64 = 0x7ff8_0000_0000_0000;

/// Hash of a boolean.
#[must_use]
pub const fn boolean(value: bool) -> i32 {
    if value { 1231 } else { 1237 }
}

/// Hash of a 64-bit integer: the two halves folded together.
#[must_use]
pub const fn long(value: i64) -> i32 {
    (value ^ ((value as u64) >> 32) as i64) as i32
}

/// Canonical bit pattern of a float; every NaN collapses to one pattern.
#[must_use]
pub fn float_bits(value: f32) -> u32 {
    if value.is_nan() {
        CANONICAL_FLOAT_NAN
    } else {
        value.to_bits()
    }
}

/// Canonical bit pattern of a double; every NaN collapses to one pattern.
#[must_use]
pub fn double_bits(value: f64) -> u64 {
    if value.is_nan() {
        CANONICAL_DOUBLE_NAN
    } else {
        value.to_bits()
    }
}

/// Hash of a float.
#[must_use]
pub fn float(value: f32) -> i32 {
    float_bits(value) as i32
}

/// Hash of a double.
#[must_use]
pub fn double(value: f64) -> i32 {
    long(double_bits(value) as i64)
}

/// Polynomial hash over the UTF-16 code units of a string.
#[must_use]
pub fn string(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Order-sensitive hash over already-hashed sequence elements.
pub fn sequence<I>(element_hashes: I) -> i32
where
    I: IntoIterator<Item = i32>,
{
    element_hashes.into_iter().fold(SEQUENCE_SEED, |acc, h| {
        acc.wrapping_mul(SEQUENCE_MULTIPLIER).wrapping_add(h)
    })
}

/// Contribution of one property to an aggregate hash.
#[must_use]
pub fn member(name: &str, value_hash: i32) -> i32 {
    MEMBER_NAME_MULTIPLIER.wrapping_mul(string(name)) ^ value_hash
}
