//! Sum-type codec (§4.4): optionals, variants and fallible results.

use crate::codec::prefix::{ERROR, NIL, VARIANT};
use crate::io::{Input, Output, Prepended};
use crate::traits::{Deserialize, Serialize};
use crate::Error;

impl<T: Serialize> Serialize for Option<T> {
    fn size(&self) -> usize {
        match self {
            Some(v) => v.size(),
            None => 1,
        }
    }

    fn prefix(&self) -> u8 {
        match self {
            Some(v) => v.prefix(),
            None => NIL,
        }
    }

    fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
        match self {
            Some(v) => v.write(out),
            None => out.push_byte(NIL),
        }
    }
}

impl<T: Serialize + Deserialize> Deserialize for Option<T> {
    fn matches(p: u8) -> bool {
        p == NIL || T::matches(p)
    }

    fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
        let p = input.read_byte()?;
        if p == NIL {
            return Ok(None);
        }
        if !T::matches(p) {
            return Err(Error::BadFormat(p));
        }
        let mut prepended = Prepended::new(p, input);
        Ok(Some(T::read(&mut prepended)?))
    }
}

/// Implemented by an enum derived with `#[derive(Serialize, Deserialize)]`
/// over a sum of distinct payload types, including at most one
/// `#[wire(empty)]` unit variant (§4.4 "Variant of T₁..Tₙ").
///
/// The derive doesn't implement `Serialize`/`Deserialize` directly; it
/// implements this, and its own `Serialize`/`Deserialize` impls delegate
/// to [`write_variant`] / [`read_variant`] below, which do the shared
/// `Variant` framing (prefix byte, signed index).
pub trait VariantEnum: Sized {
    /// 0-based index of the active variant, or `-1` for the empty state.
    fn variant_index(&self) -> i32;

    /// Size of the payload encoding alone (the `Nil` byte, for the empty
    /// state; otherwise the active variant's inner `Serialize::size`).
    fn variant_payload_size(&self) -> usize;

    /// Writes the payload encoding alone, including its own prefix byte.
    fn write_variant_payload<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error>;

    /// Reconstructs `Self` given an already-validated index and a reader
    /// positioned at the start of the payload encoding.
    fn read_variant<I: Input + ?Sized>(index: i32, input: &mut I) -> Result<Self, Error>;
}

/// Wire encoding of the empty variant's index: a raw, untagged four-byte
/// little-endian `-1`, not the compact tagged-integer form ordinary
/// (non-negative) indices use. This is the one place the format departs
/// from tagged encoding — the empty index is the only legal negative
/// index, so reserving its tagged single-byte form (`0xFF`, "small
/// negative int -1") as the raw encoding's leading byte is unambiguous.
const EMPTY_VARIANT_INDEX_BYTES: [u8; 4] = (-1i32).to_le_bytes();

fn write_variant_index<O: Output + ?Sized>(index: i32, out: &mut O) -> Result<(), Error> {
    if index == -1 {
        out.write(&EMPTY_VARIANT_INDEX_BYTES)
    } else {
        index.write(out)
    }
}

fn variant_index_size(index: i32) -> usize {
    if index == -1 {
        EMPTY_VARIANT_INDEX_BYTES.len()
    } else {
        index.size()
    }
}

fn read_variant_index<I: Input + ?Sized>(input: &mut I) -> Result<i32, Error> {
    let p = input.read_byte()?;
    if p == EMPTY_VARIANT_INDEX_BYTES[0] {
        let mut rest = [0u8; 3];
        input.read(&mut rest)?;
        let index = i32::from_le_bytes([p, rest[0], rest[1], rest[2]]);
        if index != -1 {
            return Err(Error::BadFormat(p));
        }
        return Ok(-1);
    }
    let mut prepended = Prepended::new(p, input);
    i32::read(&mut prepended)
}

/// Exact wire size of a `Variant` value, for a derived `Serialize::size`.
pub fn variant_size<T: VariantEnum>(value: &T) -> usize {
    1 + variant_index_size(value.variant_index()) + value.variant_payload_size()
}

/// Writes a `Variant` value's full framing, for a derived `Serialize::write`.
pub fn write_variant<T: VariantEnum, O: Output + ?Sized>(
    value: &T,
    out: &mut O,
) -> Result<(), Error> {
    out.push_byte(VARIANT)?;
    write_variant_index(value.variant_index(), out)?;
    value.write_variant_payload(out)
}

/// Reads a `Variant` value's full framing, for a derived `Deserialize::read`.
pub fn read_variant<T: VariantEnum, I: Input + ?Sized>(input: &mut I) -> Result<T, Error> {
    let p = input.read_byte()?;
    if p != VARIANT {
        return Err(Error::BadFormat(p));
    }
    let index = read_variant_index(input)?;
    T::read_variant(index, input)
}

/// Writes the distinguished empty state's payload (`Nil`), for use by
/// derived [`VariantEnum::write_variant_payload`] impls.
pub fn write_empty_variant<O: Output + ?Sized>(out: &mut O) -> Result<(), Error> {
    out.push_byte(NIL)
}

/// Size of the empty state's payload.
pub const EMPTY_VARIANT_SIZE: usize = 1;

/// A fallible result whose success case encodes exactly as `T` and whose
/// failure case is prefixed `Error` (§4.4 "Result of E, T"). `E` is the
/// enum's underlying integer representation — callers typically use a
/// fieldless `#[repr(i64)]` enum convertible to and from `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireResult<E, T> {
    Ok(T),
    Err(E),
}

impl<E, T> WireResult<E, T> {
    pub fn ok(self) -> Option<T> {
        match self {
            WireResult::Ok(v) => Some(v),
            WireResult::Err(_) => None,
        }
    }

    pub fn err(self) -> Option<E> {
        match self {
            WireResult::Ok(_) => None,
            WireResult::Err(e) => Some(e),
        }
    }
}

impl<E, T> From<WireResult<E, T>> for Result<T, E> {
    fn from(value: WireResult<E, T>) -> Self {
        match value {
            WireResult::Ok(v) => Ok(v),
            WireResult::Err(e) => Err(e),
        }
    }
}

impl<E, T> From<Result<T, E>> for WireResult<E, T> {
    fn from(value: Result<T, E>) -> Self {
        match value {
            Ok(v) => WireResult::Ok(v),
            Err(e) => WireResult::Err(e),
        }
    }
}

impl<E, T> Serialize for WireResult<E, T>
where
    E: Copy + Into<i64>,
    T: Serialize,
{
    fn size(&self) -> usize {
        match self {
            WireResult::Ok(v) => v.size(),
            WireResult::Err(e) => 1 + (*e).into().size(),
        }
    }

    fn prefix(&self) -> u8 {
        match self {
            WireResult::Ok(v) => v.prefix(),
            WireResult::Err(_) => ERROR,
        }
    }

    fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
        match self {
            WireResult::Ok(v) => v.write(out),
            WireResult::Err(e) => {
                out.push_byte(ERROR)?;
                (*e).into().write(out)
            }
        }
    }
}

impl<E, T> Deserialize for WireResult<E, T>
where
    E: TryFrom<i64>,
    T: Serialize + Deserialize,
{
    fn matches(p: u8) -> bool {
        p == ERROR || T::matches(p)
    }

    fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
        let p = input.read_byte()?;
        if p == ERROR {
            let code = i64::read(input)?;
            let e = E::try_from(code).map_err(|_| Error::ProtocolError("unrecognized error code"))?;
            return Ok(WireResult::Err(e));
        }
        if !T::matches(p) {
            return Err(Error::BadFormat(p));
        }
        let mut prepended = Prepended::new(p, input);
        Ok(WireResult::Ok(T::read(&mut prepended)?))
    }
}
