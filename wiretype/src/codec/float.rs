//! Floating point and boolean primitives (§4.1).

use super::prefix::{F32, F64};
use crate::io::{Input, Output};
use crate::traits::{Deserialize, Serialize};
use crate::Error;

impl Serialize for f32 {
    fn size(&self) -> usize {
        5
    }

    fn prefix(&self) -> u8 {
        F32
    }

    fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
        out.push_byte(F32)?;
        out.write(&self.to_le_bytes())
    }
}

impl Deserialize for f32 {
    fn matches(p: u8) -> bool {
        p == F32
    }

    fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
        let p = input.read_byte()?;
        if p != F32 {
            return Err(Error::BadFormat(p));
        }
        let mut b = [0u8; 4];
        input.read(&mut b)?;
        Ok(f32::from_le_bytes(b))
    }
}

impl Serialize for f64 {
    fn size(&self) -> usize {
        9
    }

    fn prefix(&self) -> u8 {
        F64
    }

    fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
        out.push_byte(F64)?;
        out.write(&self.to_le_bytes())
    }
}

impl Deserialize for f64 {
    fn matches(p: u8) -> bool {
        p == F64
    }

    fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
        let p = input.read_byte()?;
        if p != F64 {
            return Err(Error::BadFormat(p));
        }
        let mut b = [0u8; 8];
        input.read(&mut b)?;
        Ok(f64::from_le_bytes(b))
    }
}

impl Serialize for bool {
    fn size(&self) -> usize {
        1
    }

    fn prefix(&self) -> u8 {
        *self as u8
    }

    fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
        out.push_byte(*self as u8)
    }
}

impl Deserialize for bool {
    fn matches(p: u8) -> bool {
        p == 0x00 || p == 0x01
    }

    fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
        let p = input.read_byte()?;
        match p {
            0x00 => Ok(false),
            0x01 => Ok(true),
            _ => Err(Error::BadFormat(p)),
        }
    }
}

/// A single-byte character value, encoded identically to [`u8`] (§4.1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireChar(pub u8);

impl Serialize for WireChar {
    fn size(&self) -> usize {
        self.0.size()
    }

    fn prefix(&self) -> u8 {
        self.0.prefix()
    }

    fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
        self.0.write(out)
    }
}

impl Deserialize for WireChar {
    fn matches(p: u8) -> bool {
        u8::matches(p)
    }

    fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
        Ok(WireChar(u8::read(input)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn f32_round_trips(value: f32) -> bool {
        let mut buf = Vec::new();
        value.write(&mut buf).unwrap();
        let decoded = f32::read(&mut buf.as_slice()).unwrap();
        decoded.to_bits() == value.to_bits()
    }

    #[quickcheck]
    fn f64_round_trips(value: f64) -> bool {
        let mut buf = Vec::new();
        value.write(&mut buf).unwrap();
        let decoded = f64::read(&mut buf.as_slice()).unwrap();
        decoded.to_bits() == value.to_bits()
    }

    #[quickcheck]
    fn bool_round_trips(value: bool) -> bool {
        let mut buf = Vec::new();
        value.write(&mut buf).unwrap();
        bool::read(&mut buf.as_slice()).unwrap() == value
    }

    #[test]
    fn wire_char_shares_u8s_encoding() {
        let mut buf = Vec::new();
        WireChar(65).write(&mut buf).unwrap();
        let mut expected = Vec::new();
        65u8.write(&mut expected).unwrap();
        assert_eq!(buf, expected);
    }
}
