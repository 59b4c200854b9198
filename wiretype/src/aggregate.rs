//! Aggregate codec (§4.3): ordered-member structures, value wrappers and
//! logical buffer pairs.
//!
//! Structs themselves are wire-representable via `#[derive(Serialize,
//! Deserialize)]` in `wiretype-derive`, which expands to calls into the
//! helpers below. This module carries only the framing rules the derive
//! needs and can't reasonably inline: the header read/write and the
//! buffer-pair bookkeeping.

use crate::codec::prefix::STRUCTURE;
use crate::io::{Input, Output};
use crate::traits::{Deserialize, Serialize};
use crate::Error;

/// Writes the `Structure` prefix and member count. Skipped entirely for
/// value wrappers, whose derived `write` calls straight through to the
/// inner member.
pub fn write_structure_header<O: Output + ?Sized>(
    out: &mut O,
    member_count: usize,
) -> Result<(), Error> {
    out.push_byte(STRUCTURE)?;
    (member_count as u64).write(out)
}

/// Reads and validates the `Structure` prefix and member count against
/// `expected`. Returns `InvalidMemberCount` on mismatch.
pub fn read_structure_header<I: Input + ?Sized>(
    input: &mut I,
    expected: usize,
) -> Result<(), Error> {
    let p = input.read_byte()?;
    if p != STRUCTURE {
        return Err(Error::BadFormat(p));
    }
    let found = u64::read_packed_len(input)?;
    if found != expected {
        return Err(Error::InvalidMemberCount {
            expected,
            found,
        });
    }
    Ok(())
}

/// Exact wire size of a `Structure` header for `member_count` members.
pub fn structure_header_size(member_count: usize) -> usize {
    1 + (member_count as u64).size()
}

/// A helper so `read_structure_header` doesn't need to know `u64`'s own
/// prefix byte was already consumed as part of `Structure` framing: the
/// member count is encoded as a bare compact integer, sharing `u64`'s size
/// rules but without its own leading prefix byte.
trait ReadPackedLen {
    fn read_packed_len<I: Input + ?Sized>(input: &mut I) -> Result<usize, Error>;
}

impl ReadPackedLen for u64 {
    fn read_packed_len<I: Input + ?Sized>(input: &mut I) -> Result<usize, Error> {
        let v = u64::read(input)?;
        usize::try_from(v).map_err(|_| Error::InvalidMemberCount {
            expected: 0,
            found: usize::MAX,
        })
    }
}

/// Marker for a single-member aggregate that elides the `Structure` framing
/// and encodes identically to its one member (§4.3, "value wrapper").
///
/// `#[derive(ValueWrapper)]` implements this (and `Serialize`/`Deserialize`
/// by delegation) for a newtype struct; `matches` is delegated to the inner
/// type, per the decode rule.
pub trait ValueWrapper {
    type Inner: Serialize + Deserialize;

    fn inner(&self) -> &Self::Inner;
    fn from_inner(inner: Self::Inner) -> Self;
}

/// Blanket `Serialize`/`Deserialize` for a type that only implements
/// [`ValueWrapper`] would conflict with the derive-generated impls for
/// ordinary aggregates, so the derive macro emits the delegation directly
/// rather than relying on a blanket here. This free function is what it
/// calls into for `write`, kept here so the delegation logic lives in one
/// place instead of being reproduced by the macro for every wrapper.
pub fn write_value_wrapper<W, O>(wrapper: &W, out: &mut O) -> Result<(), Error>
where
    W: ValueWrapper,
    O: Output + ?Sized,
{
    wrapper.inner().write(out)
}

pub fn read_value_wrapper<W, I>(input: &mut I) -> Result<W, Error>
where
    W: ValueWrapper,
    I: Input + ?Sized,
{
    Ok(W::from_inner(W::Inner::read(input)?))
}

/// Writes a logical buffer pair's `count` elements of `backing`, bounded by
/// `backing`'s own length (§4.3, "logical buffer pair"). `backing` already
/// holds exactly the live elements; callers with a fixed-capacity array and
/// a separate live-count field slice it down to `count` before calling.
pub fn write_buffer_pair<T, O>(backing: &[T], out: &mut O) -> Result<(), Error>
where
    T: Serialize + Clone,
    O: Output + ?Sized,
{
    backing.to_vec().write(out)
}

/// Reads a logical buffer pair into `capacity` slots. A wire count greater
/// than `capacity` is rejected unless `unbounded` is set, in which case the
/// caller's backing storage is a single trivially-releasable slot and the
/// returned `Vec` may exceed length 1 — it is the derive's job to move
/// those elements into whatever growable storage backs an `unbounded`
/// field.
pub fn read_buffer_pair<T, I>(input: &mut I, capacity: usize, unbounded: bool) -> Result<Vec<T>, Error>
where
    T: Serialize + Deserialize,
    I: Input + ?Sized,
{
    let elements = Vec::<T>::read(input)?;
    if !unbounded && elements.len() > capacity {
        return Err(Error::InvalidContainerLength);
    }
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SizeCalculator;

    #[test]
    fn structure_header_round_trips() {
        let mut buf = Vec::new();
        write_structure_header(&mut buf, 3).unwrap();
        let mut slice = buf.as_slice();
        read_structure_header(&mut slice, 3).unwrap();
        assert!(slice.is_empty());
    }

    #[test]
    fn structure_header_rejects_wrong_count() {
        let mut buf = Vec::new();
        write_structure_header(&mut buf, 3).unwrap();
        let mut slice = buf.as_slice();
        let err = read_structure_header(&mut slice, 2).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidMemberCount {
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn structure_header_size_is_exact() {
        let mut calc = SizeCalculator::default();
        write_structure_header(&mut calc, 5).unwrap();
        assert_eq!(calc.size(), structure_header_size(5));
    }

    #[test]
    fn buffer_pair_rejects_overflow_unless_unbounded() {
        let mut buf = Vec::new();
        vec![1u32, 2, 3].write(&mut buf).unwrap();
        let mut slice = buf.as_slice();
        assert!(read_buffer_pair::<u32, _>(&mut slice, 2, false).is_err());

        let mut slice = buf.as_slice();
        let elements = read_buffer_pair::<u32, _>(&mut slice, 1, true).unwrap();
        assert_eq!(elements, vec![1, 2, 3]);
    }
}
