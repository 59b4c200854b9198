//! Prefix byte constants (§3).

/// Positive small-int range: embedded value is the byte itself, 0..=127.
pub const SMALL_INT_POSITIVE_MAX: u8 = 0x7f;
/// Negative small-int range starts here; embedded value is the byte as a
/// two's-complement i8, representing -64..=-1.
pub const SMALL_INT_NEGATIVE_MIN: u8 = 0xc0;

/// Unsigned integer, 1 following byte.
pub const U8: u8 = 0x80;
/// Unsigned integer, 2 following bytes, little-endian.
pub const U16: u8 = 0x81;
/// Unsigned integer, 4 following bytes, little-endian.
pub const U32: u8 = 0x82;
/// Unsigned integer, 8 following bytes, little-endian.
pub const U64: u8 = 0x83;
/// Signed integer, 1 following byte.
pub const I8: u8 = 0x84;
/// Signed integer, 2 following bytes, little-endian.
pub const I16: u8 = 0x85;
/// Signed integer, 4 following bytes, little-endian.
pub const I32: u8 = 0x86;
/// Signed integer, 8 following bytes, little-endian.
pub const I64: u8 = 0x87;
/// 32-bit little-endian IEEE-754.
pub const F32: u8 = 0x88;
/// 64-bit little-endian IEEE-754.
pub const F64: u8 = 0x89;

/// Table record (§4.5).
pub const TABLE: u8 = 0xb5;
/// Error (sum-type failure variant, §4.4).
pub const ERROR: u8 = 0xb6;
/// Handle reference (§4.6).
pub const HANDLE: u8 = 0xb7;
/// Variant (§4.4).
pub const VARIANT: u8 = 0xb8;
/// Structure (ordered aggregate, §4.3).
pub const STRUCTURE: u8 = 0xb9;
/// Array (element-wise, §4.2).
pub const ARRAY: u8 = 0xba;
/// Map (key-then-value pairs, §4.2).
pub const MAP: u8 = 0xbb;
/// Binary (raw byte payload, §4.2).
pub const BINARY: u8 = 0xbc;
/// String (§4.2).
pub const STRING: u8 = 0xbd;
/// Nil (empty optional / empty variant).
pub const NIL: u8 = 0xbe;
/// Reserved for extension.
pub const RESERVED_EXTENSION: u8 = 0xbf;

/// `true` if `p` is a positive small-int prefix (embeds 0..=127 directly).
#[inline]
pub const fn is_small_int_positive(p: u8) -> bool {
    p <= SMALL_INT_POSITIVE_MAX
}

/// `true` if `p` is a negative small-int prefix (embeds -64..=-1 directly).
#[inline]
pub const fn is_small_int_negative(p: u8) -> bool {
    p >= SMALL_INT_NEGATIVE_MIN
}

/// Decode a negative small-int prefix byte into its `i8` value.
#[inline]
pub const fn small_int_negative_value(p: u8) -> i8 {
    p as i8
}
