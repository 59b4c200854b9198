//! Container codecs (§4.2): ordered sequences (element-wise or byte-packed),
//! mappings, fixed tuples and strings.

use std::collections::HashMap;
use std::hash::Hash;

use crate::codec::prefix::{ARRAY, BINARY, MAP, STRING};
use crate::io::{Input, Output};
use crate::traits::{Deserialize, Serialize};
use crate::Error;

/// To protect against a hostile length prefix, container decoders never
/// pre-reserve more than this many elements/bytes ahead of actually reading
/// them.
pub const DECODE_LIMIT: usize = 64 * (1 << 20);

fn write_len<O: Output + ?Sized>(len: usize, out: &mut O) -> Result<(), Error> {
    let len: u64 = len
        .try_into()
        .map_err(|_| Error::ProtocolError("length does not fit in u64"))?;
    len.write(out)
}

fn read_len<I: Input + ?Sized>(input: &mut I) -> Result<usize, Error> {
    let len = u64::read(input)?;
    usize::try_from(len).map_err(|_| Error::InvalidContainerLength)
}

/// Exact encoded size of a length/count field.
fn len_size(len: usize) -> usize {
    (len as u64).size()
}

impl<T> Serialize for Vec<T>
where
    T: Serialize,
{
    fn size(&self) -> usize {
        if T::PACKED {
            let byte_len = self.len().saturating_mul(core::mem::size_of::<T>());
            1 + len_size(byte_len) + byte_len
        } else {
            let elements: usize = self.iter().map(Serialize::size).sum();
            1 + len_size(self.len()) + elements
        }
    }

    fn prefix(&self) -> u8 {
        if T::PACKED {
            BINARY
        } else {
            ARRAY
        }
    }

    fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
        out.push_byte(self.prefix())?;
        if T::PACKED {
            let byte_len = self
                .len()
                .checked_mul(core::mem::size_of::<T>())
                .ok_or(Error::ProtocolError("packed sequence too large"))?;
            write_len(byte_len, out)?;
            for element in self {
                element.write_packed(out)?;
            }
            Ok(())
        } else {
            write_len(self.len(), out)?;
            for element in self {
                element.write(out)?;
            }
            Ok(())
        }
    }
}

impl<T> Deserialize for Vec<T>
where
    T: Serialize + Deserialize,
{
    fn matches(p: u8) -> bool {
        if T::PACKED {
            p == BINARY
        } else {
            p == ARRAY
        }
    }

    fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
        let p = input.read_byte()?;
        if !Self::matches(p) {
            return Err(Error::BadFormat(p));
        }
        if T::PACKED {
            let byte_len = read_len(input)?;
            let elem_size = core::mem::size_of::<T>();
            if elem_size == 0 || byte_len % elem_size != 0 {
                return Err(Error::InvalidContainerLength);
            }
            let n = byte_len / elem_size;
            if n > DECODE_LIMIT {
                return Err(Error::ProtocolError("packed sequence exceeds decode limit"));
            }
            // Never pre-reserve based on an unvalidated wire length.
            let mut out = Vec::new();
            for _ in 0..n {
                out.push(T::read_packed(input)?);
            }
            Ok(out)
        } else {
            let n = read_len(input)?;
            if n > DECODE_LIMIT {
                return Err(Error::ProtocolError("sequence exceeds decode limit"));
            }
            let mut out = Vec::new();
            for _ in 0..n {
                out.push(T::read(input)?);
            }
            Ok(out)
        }
    }
}

impl<K, V> Serialize for HashMap<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn size(&self) -> usize {
        let pairs: usize = self.iter().map(|(k, v)| k.size() + v.size()).sum();
        1 + len_size(self.len()) + pairs
    }

    fn prefix(&self) -> u8 {
        MAP
    }

    fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
        out.push_byte(MAP)?;
        write_len(self.len(), out)?;
        for (k, v) in self {
            k.write(out)?;
            v.write(out)?;
        }
        Ok(())
    }
}

impl<K, V> Deserialize for HashMap<K, V>
where
    K: Serialize + Deserialize + Eq + Hash,
    V: Serialize + Deserialize,
{
    fn matches(p: u8) -> bool {
        p == MAP
    }

    fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
        let p = input.read_byte()?;
        if p != MAP {
            return Err(Error::BadFormat(p));
        }
        let n = read_len(input)?;
        if n > DECODE_LIMIT {
            return Err(Error::ProtocolError("map exceeds decode limit"));
        }
        let mut out = HashMap::new();
        for _ in 0..n {
            let k = K::read(input)?;
            let v = V::read(input)?;
            out.insert(k, v);
        }
        Ok(out)
    }
}

impl Serialize for String {
    fn size(&self) -> usize {
        1 + len_size(self.len()) + self.len()
    }

    fn prefix(&self) -> u8 {
        STRING
    }

    fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
        out.push_byte(STRING)?;
        write_len(self.len(), out)?;
        out.write(self.as_bytes())
    }
}

impl Deserialize for String {
    fn matches(p: u8) -> bool {
        p == STRING
    }

    fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
        let p = input.read_byte()?;
        if p != STRING {
            return Err(Error::BadFormat(p));
        }
        let len = read_len(input)?;
        if len > DECODE_LIMIT {
            return Err(Error::ProtocolError("string exceeds decode limit"));
        }
        let mut bytes = vec![0u8; len];
        input.read(&mut bytes)?;
        String::from_utf8(bytes).map_err(|_| Error::InvalidStringLength)
    }
}

macro_rules! impl_tuple {
    ($len:expr; $($idx:tt => $name:ident),+) => {
        impl<$($name: Serialize),+> Serialize for ($($name,)+) {
            fn size(&self) -> usize {
                1 + len_size($len) $(+ self.$idx.size())+
            }

            fn prefix(&self) -> u8 {
                ARRAY
            }

            fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
                out.push_byte(ARRAY)?;
                write_len($len, out)?;
                $(self.$idx.write(out)?;)+
                Ok(())
            }
        }

        impl<$($name: Serialize + Deserialize),+> Deserialize for ($($name,)+) {
            fn matches(p: u8) -> bool {
                p == ARRAY
            }

            fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
                let p = input.read_byte()?;
                if p != ARRAY {
                    return Err(Error::BadFormat(p));
                }
                let n = read_len(input)?;
                if n != $len {
                    return Err(Error::InvalidContainerLength);
                }
                Ok(($($name::read(input)?,)+))
            }
        }
    };
}

/// The zero-arity tuple: an empty `Array`, used as the argument tuple of a
/// nullary RPC method and as `WireResult`'s unit success case.
impl Serialize for () {
    fn size(&self) -> usize {
        1 + len_size(0)
    }

    fn prefix(&self) -> u8 {
        ARRAY
    }

    fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
        out.push_byte(ARRAY)?;
        write_len(0, out)
    }
}

impl Deserialize for () {
    fn matches(p: u8) -> bool {
        p == ARRAY
    }

    fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
        let p = input.read_byte()?;
        if p != ARRAY {
            return Err(Error::BadFormat(p));
        }
        let n = read_len(input)?;
        if n != 0 {
            return Err(Error::InvalidContainerLength);
        }
        Ok(())
    }
}


impl_tuple!(1; 0 => A);
impl_tuple!(2; 0 => A, 1 => B);
impl_tuple!(3; 0 => A, 1 => B, 2 => C);
impl_tuple!(4; 0 => A, 1 => B, 2 => C, 3 => D);
impl_tuple!(5; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
impl_tuple!(6; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);

impl<T, const N: usize> Serialize for [T; N]
where
    T: Serialize,
{
    fn size(&self) -> usize {
        if T::PACKED {
            let byte_len = N.saturating_mul(core::mem::size_of::<T>());
            1 + len_size(byte_len) + byte_len
        } else {
            let elements: usize = self.iter().map(Serialize::size).sum();
            1 + len_size(N) + elements
        }
    }

    fn prefix(&self) -> u8 {
        if T::PACKED {
            BINARY
        } else {
            ARRAY
        }
    }

    fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
        out.push_byte(self.prefix())?;
        if T::PACKED {
            let byte_len = N.saturating_mul(core::mem::size_of::<T>());
            write_len(byte_len, out)?;
            for element in self {
                element.write_packed(out)?;
            }
        } else {
            write_len(N, out)?;
            for element in self {
                element.write(out)?;
            }
        }
        Ok(())
    }
}

impl<T, const N: usize> Deserialize for [T; N]
where
    T: Serialize + Deserialize + Copy + Default,
{
    fn matches(p: u8) -> bool {
        if T::PACKED {
            p == BINARY
        } else {
            p == ARRAY
        }
    }

    fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
        let p = input.read_byte()?;
        if !Self::matches(p) {
            return Err(Error::BadFormat(p));
        }
        let mut out = [T::default(); N];
        if T::PACKED {
            let byte_len = read_len(input)?;
            let elem_size = core::mem::size_of::<T>();
            if elem_size == 0 || byte_len != N.saturating_mul(elem_size) {
                return Err(Error::InvalidContainerLength);
            }
            for slot in out.iter_mut() {
                *slot = T::read_packed(input)?;
            }
        } else {
            let n = read_len(input)?;
            if n != N {
                return Err(Error::InvalidContainerLength);
            }
            for slot in out.iter_mut() {
                *slot = T::read(input)?;
            }
        }
        Ok(out)
    }
}
