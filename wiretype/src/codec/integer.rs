//! Integer promotion and acceptance rules (§4.1).

use super::prefix::*;
use crate::io::{Input, Output};
use crate::traits::{Deserialize, Serialize};
use crate::Error;

/// Widths, in bits, an unsigned/signed integer decoder may read a payload of.
const fn width_bits<T>() -> u32 {
    (core::mem::size_of::<T>() as u32) * 8
}

macro_rules! impl_unsigned {
    ($t:ty) => {
        impl Serialize for $t {
            const PACKED: bool = true;

            fn size(&self) -> usize {
                let v = *self as u64;
                if v <= SMALL_INT_POSITIVE_MAX as u64 {
                    1
                } else if v < 1 << 8 {
                    2
                } else if v < 1 << 16 {
                    3
                } else if v < 1u64 << 32 {
                    5
                } else {
                    9
                }
            }

            fn prefix(&self) -> u8 {
                let v = *self as u64;
                if v <= SMALL_INT_POSITIVE_MAX as u64 {
                    v as u8
                } else if v < 1 << 8 {
                    U8
                } else if v < 1 << 16 {
                    U16
                } else if v < 1u64 << 32 {
                    U32
                } else {
                    U64
                }
            }

            fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
                let v = *self as u64;
                let p = self.prefix();
                out.push_byte(p)?;
                if is_small_int_positive(p) {
                    return Ok(());
                }
                match p {
                    U8 => out.write(&(v as u8).to_le_bytes()),
                    U16 => out.write(&(v as u16).to_le_bytes()),
                    U32 => out.write(&(v as u32).to_le_bytes()),
                    U64 => out.write(&v.to_le_bytes()),
                    _ => unreachable!(),
                }
            }

            fn write_packed<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
                out.write(&self.to_le_bytes())
            }
        }

        impl Deserialize for $t {
            fn matches(p: u8) -> bool {
                if is_small_int_positive(p) {
                    return true;
                }
                match p {
                    U8 => width_bits::<$t>() >= 8,
                    U16 => width_bits::<$t>() >= 16,
                    U32 => width_bits::<$t>() >= 32,
                    U64 => width_bits::<$t>() >= 64,
                    _ => false,
                }
            }

            fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
                let p = input.read_byte()?;
                if !Self::matches(p) {
                    if is_small_int_negative(p) {
                        return Err(Error::BadFormat(p));
                    }
                    return Err(Error::BadFormat(p));
                }
                let value: u64 = if is_small_int_positive(p) {
                    p as u64
                } else {
                    match p {
                        U8 => {
                            let mut b = [0u8; 1];
                            input.read(&mut b)?;
                            u8::from_le_bytes(b) as u64
                        }
                        U16 => {
                            let mut b = [0u8; 2];
                            input.read(&mut b)?;
                            u16::from_le_bytes(b) as u64
                        }
                        U32 => {
                            let mut b = [0u8; 4];
                            input.read(&mut b)?;
                            u32::from_le_bytes(b) as u64
                        }
                        U64 => {
                            let mut b = [0u8; 8];
                            input.read(&mut b)?;
                            u64::from_le_bytes(b)
                        }
                        _ => unreachable!(),
                    }
                };
                Ok(value as $t)
            }

            fn read_packed<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
                let mut b = [0u8; core::mem::size_of::<$t>()];
                input.read(&mut b)?;
                Ok(<$t>::from_le_bytes(b))
            }
        }
    };
}

impl_unsigned!(u8);
impl_unsigned!(u16);
impl_unsigned!(u32);
impl_unsigned!(u64);

macro_rules! impl_signed {
    ($t:ty) => {
        impl Serialize for $t {
            const PACKED: bool = true;

            fn size(&self) -> usize {
                let v = *self as i64;
                if (-32..=SMALL_INT_POSITIVE_MAX as i64).contains(&v) {
                    1
                } else if (i8::MIN as i64..=i8::MAX as i64).contains(&v) {
                    2
                } else if (i16::MIN as i64..=i16::MAX as i64).contains(&v) {
                    3
                } else if (i32::MIN as i64..=i32::MAX as i64).contains(&v) {
                    5
                } else {
                    9
                }
            }

            fn prefix(&self) -> u8 {
                let v = *self as i64;
                if (-32..=SMALL_INT_POSITIVE_MAX as i64).contains(&v) {
                    v as i8 as u8
                } else if (i8::MIN as i64..=i8::MAX as i64).contains(&v) {
                    I8
                } else if (i16::MIN as i64..=i16::MAX as i64).contains(&v) {
                    I16
                } else if (i32::MIN as i64..=i32::MAX as i64).contains(&v) {
                    I32
                } else {
                    I64
                }
            }

            fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
                let v = *self as i64;
                let p = self.prefix();
                out.push_byte(p)?;
                if is_small_int_positive(p) || is_small_int_negative(p) {
                    return Ok(());
                }
                match p {
                    I8 => out.write(&(v as i8).to_le_bytes()),
                    I16 => out.write(&(v as i16).to_le_bytes()),
                    I32 => out.write(&(v as i32).to_le_bytes()),
                    I64 => out.write(&v.to_le_bytes()),
                    _ => unreachable!(),
                }
            }

            fn write_packed<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
                out.write(&self.to_le_bytes())
            }
        }

        impl Deserialize for $t {
            fn matches(p: u8) -> bool {
                if is_small_int_positive(p) || is_small_int_negative(p) {
                    return true;
                }
                match p {
                    I8 => width_bits::<$t>() >= 8,
                    I16 => width_bits::<$t>() >= 16,
                    I32 => width_bits::<$t>() >= 32,
                    I64 => width_bits::<$t>() >= 64,
                    _ => false,
                }
            }

            fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
                let p = input.read_byte()?;
                if !Self::matches(p) {
                    return Err(Error::BadFormat(p));
                }
                let value: i64 = if is_small_int_positive(p) {
                    p as i64
                } else if is_small_int_negative(p) {
                    small_int_negative_value(p) as i64
                } else {
                    match p {
                        I8 => {
                            let mut b = [0u8; 1];
                            input.read(&mut b)?;
                            i8::from_le_bytes(b) as i64
                        }
                        I16 => {
                            let mut b = [0u8; 2];
                            input.read(&mut b)?;
                            i16::from_le_bytes(b) as i64
                        }
                        I32 => {
                            let mut b = [0u8; 4];
                            input.read(&mut b)?;
                            i32::from_le_bytes(b) as i64
                        }
                        I64 => {
                            let mut b = [0u8; 8];
                            input.read(&mut b)?;
                            i64::from_le_bytes(b)
                        }
                        _ => unreachable!(),
                    }
                };
                Ok(value as $t)
            }

            fn read_packed<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
                let mut b = [0u8; core::mem::size_of::<$t>()];
                input.read(&mut b)?;
                Ok(<$t>::from_le_bytes(b))
            }
        }
    };
}

impl_signed!(i8);
impl_signed!(i16);
impl_signed!(i32);
impl_signed!(i64);

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    macro_rules! round_trip_property {
        ($name:ident, $t:ty) => {
            #[quickcheck]
            fn $name(value: $t) -> bool {
                let mut buf = Vec::new();
                Serialize::write(&value, &mut buf).unwrap();
                <$t as Deserialize>::read(&mut buf.as_slice()).unwrap() == value
            }
        };
    }

    round_trip_property!(u8_round_trips, u8);
    round_trip_property!(u16_round_trips, u16);
    round_trip_property!(u32_round_trips, u32);
    round_trip_property!(u64_round_trips, u64);
    round_trip_property!(i8_round_trips, i8);
    round_trip_property!(i16_round_trips, i16);
    round_trip_property!(i32_round_trips, i32);
    round_trip_property!(i64_round_trips, i64);

    #[test]
    fn small_positive_ints_compact_to_one_byte() {
        let mut buf = Vec::new();
        7u32.write(&mut buf).unwrap();
        assert_eq!(buf, vec![7]);
    }

    #[test]
    fn small_negative_ints_compact_to_one_byte() {
        let mut buf = Vec::new();
        (-3i32).write(&mut buf).unwrap();
        assert_eq!(buf.len(), 1);
        assert_eq!(i32::read(&mut buf.as_slice()).unwrap(), -3);
    }
}
