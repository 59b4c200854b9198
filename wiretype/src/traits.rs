//! The codec surface every wire-representable type implements (§4.1).
//!
//! Mirrors the shape of `fuel_types::canonical::{Serialize, Deserialize}`:
//! one trait per direction, each able to report its own size ahead of
//! writing so callers can `prepare()` the output in one shot.

use crate::io::{Input, Output};
use crate::Error;

/// Encodes `Self` to the wire.
pub trait Serialize {
    /// `true` for integral types of 8 bytes or fewer: sequences of such a
    /// type are encoded as one `Binary` payload rather than element-wise
    /// (§3, "byte-packed sequence").
    const PACKED: bool = false;

    /// Upper bound on the number of bytes [`Serialize::write`] will emit.
    /// Exact for primitives, strings, binaries and fixed-arity aggregates of
    /// those; an upper bound wherever the true size depends on a nested
    /// call the caller hasn't made yet (e.g. handle references).
    fn size(&self) -> usize;

    /// The prefix byte [`Serialize::write`] will emit first.
    fn prefix(&self) -> u8;

    /// Emit the prefix byte followed by the payload.
    fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error>;

    /// Write the raw little-endian bytes of a `PACKED` type, with no prefix
    /// of its own. Only called from within a byte-packed sequence's own
    /// `Binary` framing. Unreachable for any type with `PACKED == false`.
    fn write_packed<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
        let _ = out;
        unreachable!("write_packed called on a non-PACKED type")
    }

    /// Convenience: encode into a fresh `Vec<u8>`.
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::with_capacity(self.size());
        self.write(&mut buf)?;
        Ok(buf)
    }
}

/// Decodes `Self` from the wire.
pub trait Deserialize: Sized {
    /// Whether `prefix` is a legal first byte for this type's decoder.
    fn matches(prefix: u8) -> bool;

    /// Read the prefix byte, validate it with [`Deserialize::matches`], then
    /// read the payload.
    fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error>;

    /// Read the raw little-endian bytes of a `PACKED` type, with no prefix
    /// of its own. See [`Serialize::write_packed`].
    fn read_packed<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
        let _ = input;
        unreachable!("read_packed called on a non-PACKED type")
    }

    /// Convenience: decode from a byte slice, ignoring trailing bytes.
    fn from_bytes(mut bytes: &[u8]) -> Result<Self, Error> {
        Self::read(&mut bytes)
    }
}
