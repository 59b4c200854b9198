//! Table codec (§4.5): a versioned aggregate designed for forward- and
//! backward-compatible evolution.
//!
//! `#[derive(Table)]` implements [`Table`] for a struct and its own
//! `Serialize`/`Deserialize` delegate to [`write_table`] / [`read_table`].

use std::collections::HashSet;

use siphasher::sip::SipHasher24;
use std::hash::Hasher;

use crate::bounded::{BoundedReader, BoundedWriter};
use crate::codec::prefix::{BINARY, TABLE};
use crate::container::DECODE_LIMIT;
use crate::io::{Input, Output};
use crate::traits::{Deserialize, Serialize};
use crate::Error;

/// Fixed keys for the namespace hash (§4.5): the guard only needs to
/// distinguish tables from each other, not resist a hostile peer, so the
/// keys are constants rather than per-process randomness.
const NAMESPACE_KEY_0: u64 = 0x5445_4c45_4d41_5453;
const NAMESPACE_KEY_1: u64 = 0x5345_4c42_4154_5249;

/// 64-bit SipHash-2-4 of a table's name, used as the wire version guard.
pub fn namespace_hash(name: &str) -> u64 {
    let mut hasher = SipHasher24::new_with_keys(NAMESPACE_KEY_0, NAMESPACE_KEY_1);
    hasher.write(name.as_bytes());
    hasher.finish()
}

/// Byte value used to pad an entry's payload out to its declared size.
pub const PADDING_BYTE: u8 = 0x5a;

/// One active entry, ready to be framed onto the wire.
pub struct TableEntry {
    pub id: u64,
    /// Reserved space for this entry's payload; always `>= payload.len()`.
    /// Schemas reserve more than the current payload needs so a later
    /// version can grow the field without bumping the namespace hash.
    pub declared_size: u64,
    pub payload: Vec<u8>,
}

/// Implemented by a struct derived with `#[derive(Table)]` (§4.5).
pub trait Table: Sized + Default {
    /// Name hashed into the namespace guard.
    const NAME: &'static str;

    /// Non-empty, non-deprecated entries to emit, each already encoded as
    /// a full value (its own prefix byte included).
    fn active_entries(&self) -> Result<Vec<TableEntry>, Error>;

    /// Applies one decoded entry's payload to the matching field. Only
    /// called for ids in [`Table::known_ids`] that aren't deprecated.
    fn apply_entry(&mut self, id: u64, payload: &[u8]) -> Result<(), Error>;

    /// Ids that have been superseded by a deprecated marker: never
    /// emitted, and silently skipped (not applied) if seen on the wire.
    fn deprecated_ids() -> &'static [u64];

    /// All ids this table's current schema recognizes, active or
    /// deprecated. An id outside this set is an unknown entry, silently
    /// skipped rather than rejected, to tolerate a newer writer.
    fn known_ids() -> &'static [u64];
}

/// Exact wire size of a table value, for a derived `Serialize::size`.
pub fn table_size<T: Table>(table: &T) -> Result<usize, Error> {
    let entries = table.active_entries()?;
    let mut size = 1 + namespace_hash(T::NAME).size() + (entries.len() as u64).size();
    for entry in &entries {
        let declared = entry.declared_size.max(entry.payload.len() as u64);
        size += entry.id.size() + 1 + declared.size() + declared as usize;
    }
    Ok(size)
}

/// Writes a table value's full framing, for a derived `Serialize::write`.
///
/// Every framing field (namespace hash, active count, entry id, declared
/// size) travels through the ordinary tagged `u64` codec, not raw 8-byte
/// little-endian — matching how every other value on the wire, including
/// this codec's own handle references and RPC selectors, is framed.
pub fn write_table<T: Table, O: Output + ?Sized>(table: &T, out: &mut O) -> Result<(), Error> {
    out.push_byte(TABLE)?;
    namespace_hash(T::NAME).write(out)?;

    let entries = table.active_entries()?;
    (entries.len() as u64).write(out)?;

    for entry in &entries {
        let declared = entry.declared_size.max(entry.payload.len() as u64);
        entry.id.write(out)?;
        out.push_byte(BINARY)?;
        declared.write(out)?;

        let mut bounded = BoundedWriter::new(out, declared as usize);
        bounded.write(&entry.payload)?;
        bounded.pad_remaining(PADDING_BYTE)?;
    }
    Ok(())
}

/// Reads a table value's full framing into a fresh `T`, for a derived
/// `Deserialize::read`.
pub fn read_table<T: Table, I: Input + ?Sized>(input: &mut I) -> Result<T, Error> {
    let p = input.read_byte()?;
    if p != TABLE {
        return Err(Error::BadFormat(p));
    }

    let hash = u64::read(input)?;
    if hash != namespace_hash(T::NAME) {
        return Err(Error::ProtocolError("table namespace hash mismatch"));
    }

    let active_count = u64::read(input)? as usize;
    if active_count > DECODE_LIMIT {
        return Err(Error::ProtocolError("table entry count exceeds decode limit"));
    }

    let mut table = T::default();
    let mut seen = HashSet::with_capacity(active_count);

    for _ in 0..active_count {
        let id = u64::read(input)?;
        if !seen.insert(id) {
            return Err(Error::ProtocolError("duplicate table entry id"));
        }

        let bp = input.read_byte()?;
        if bp != BINARY {
            return Err(Error::BadFormat(bp));
        }
        let declared_size = u64::read(input)? as usize;
        if declared_size > DECODE_LIMIT {
            return Err(Error::ProtocolError(
                "table entry payload exceeds decode limit",
            ));
        }

        let mut payload = vec![0u8; declared_size];
        let mut bounded = BoundedReader::new(input, declared_size);
        bounded.read(&mut payload)?;
        bounded.skip_remainder()?;

        if T::deprecated_ids().contains(&id) || !T::known_ids().contains(&id) {
            tracing::trace!(id, "skipping deprecated or unknown table entry");
            continue;
        }
        table.apply_entry(id, &payload)?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, PartialEq, Debug)]
    struct Settings {
        retries: u32,
        label: String,
    }

    impl Table for Settings {
        const NAME: &'static str = "Settings";

        fn active_entries(&self) -> Result<Vec<TableEntry>, Error> {
            let mut entries = Vec::new();
            if self.retries != 0 {
                entries.push(TableEntry {
                    id: 1,
                    declared_size: self.retries.size() as u64,
                    payload: self.retries.to_bytes()?,
                });
            }
            if !self.label.is_empty() {
                entries.push(TableEntry {
                    id: 2,
                    declared_size: self.label.size() as u64,
                    payload: self.label.to_bytes()?,
                });
            }
            Ok(entries)
        }

        fn apply_entry(&mut self, id: u64, payload: &[u8]) -> Result<(), Error> {
            match id {
                1 => self.retries = u32::from_bytes(payload)?,
                2 => self.label = String::from_bytes(payload)?,
                _ => {}
            }
            Ok(())
        }

        fn deprecated_ids() -> &'static [u64] {
            &[]
        }

        fn known_ids() -> &'static [u64] {
            &[1, 2]
        }
    }

    #[test]
    fn table_round_trips() {
        let settings = Settings {
            retries: 3,
            label: "prod".to_string(),
        };
        let mut buf = Vec::new();
        write_table(&settings, &mut buf).unwrap();
        let decoded: Settings = read_table(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, settings);
    }

    #[test]
    fn table_rejects_mismatched_namespace() {
        let settings = Settings {
            retries: 3,
            label: "prod".to_string(),
        };
        let mut buf = Vec::new();
        write_table(&settings, &mut buf).unwrap();

        // Flip the last byte of the namespace hash's own tagged encoding,
        // leaving its prefix byte untouched, so the corruption always
        // surfaces as a hash mismatch rather than an unrelated `BadFormat`
        // from a now-invalid prefix.
        let mut hash_encoding = Vec::new();
        namespace_hash("Settings").write(&mut hash_encoding).unwrap();
        let corrupt_at = 1 + hash_encoding.len() - 1;
        buf[corrupt_at] ^= 0xff;

        let err = read_table::<Settings, _>(&mut buf.as_slice()).unwrap_err();
        assert!(matches!(err, Error::ProtocolError(_)));
    }

    #[test]
    fn table_skips_unknown_entry() {
        let mut buf = Vec::new();
        buf.push(TABLE);
        namespace_hash("Settings").write(&mut buf).unwrap();
        1u64.write(&mut buf).unwrap();
        99u64.write(&mut buf).unwrap();
        buf.push(BINARY);
        4u64.write(&mut buf).unwrap();
        buf.extend_from_slice(&[0u8; 4]);

        let decoded: Settings = read_table(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, Settings::default());
    }

    #[test]
    fn table_rejects_duplicate_id() {
        let mut buf = Vec::new();
        buf.push(TABLE);
        namespace_hash("Settings").write(&mut buf).unwrap();
        2u64.write(&mut buf).unwrap();
        for _ in 0..2 {
            1u64.write(&mut buf).unwrap();
            buf.push(BINARY);
            1u64.write(&mut buf).unwrap();
            buf.push(5);
        }
        let err = read_table::<Settings, _>(&mut buf.as_slice()).unwrap_err();
        assert!(matches!(err, Error::ProtocolError(_)));
    }

    /// Pins spec's own S7 worked example byte-for-byte: a table whose
    /// namespace hash is `H`, whose entry id 0 holds a `u8` of 42 and whose
    /// entry id 1 is empty, encodes as
    /// `[TABLE, <H as u64>, 0x01, 0x00, BINARY, 0x01, 0x2A]`.
    #[test]
    fn table_matches_worked_example_bytes() {
        #[derive(Default, PartialEq, Debug)]
        struct OneEntry {
            value: u8,
        }

        impl Table for OneEntry {
            const NAME: &'static str = "OneEntry";

            fn active_entries(&self) -> Result<Vec<TableEntry>, Error> {
                let mut entries = Vec::new();
                if self.value != 0 {
                    entries.push(TableEntry {
                        id: 0,
                        declared_size: self.value.size() as u64,
                        payload: self.value.to_bytes()?,
                    });
                }
                Ok(entries)
            }

            fn apply_entry(&mut self, id: u64, payload: &[u8]) -> Result<(), Error> {
                if id == 0 {
                    self.value = u8::from_bytes(payload)?;
                }
                Ok(())
            }

            fn deprecated_ids() -> &'static [u64] {
                &[]
            }

            fn known_ids() -> &'static [u64] {
                &[0, 1]
            }
        }

        let value = OneEntry { value: 42 };
        let mut buf = Vec::new();
        write_table(&value, &mut buf).unwrap();

        let mut expected = vec![TABLE];
        namespace_hash("OneEntry").write(&mut expected).unwrap();
        expected.extend_from_slice(&[0x01, 0x00, BINARY, 0x01, 0x2A]);

        assert_eq!(buf, expected);
        assert_eq!(read_table::<OneEntry, _>(&mut buf.as_slice()).unwrap(), value);
    }
}
