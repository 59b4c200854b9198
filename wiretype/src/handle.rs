//! Handle codec (§4.6): opaque resource references threaded through the
//! writer/reader side channel rather than the byte stream itself.

use core::marker::PhantomData;

use crate::codec::prefix::HANDLE;
use crate::io::{Input, Output, EMPTY_HANDLE_REFERENCE};
use crate::traits::{Deserialize, Serialize};
use crate::Error;

/// Identifies a handle policy family on the wire (§4.6, `handle_type`).
/// Implementors are zero-sized tags; the constant is the only thing that
/// travels on the wire.
pub trait HandlePolicy {
    /// Wire tag identifying this policy. Distinct policies must use
    /// distinct tags so a decoder can reject a handle meant for another
    /// family (`UnexpectedHandleType`).
    const HANDLE_TYPE: i64;
}

/// A resource reference whose payload travels out-of-band: the wire only
/// carries the policy tag and a side-channel index (§6.5).
///
/// `reference` is the index returned by `Output::push_handle` at encode
/// time and passed to `Input::get_handle` at decode time; the empty
/// handle is `reference == -1` and round-trips without touching either
/// side channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle<P: HandlePolicy> {
    reference: i64,
    _policy: PhantomData<P>,
}

impl<P: HandlePolicy> Handle<P> {
    /// The empty handle: encodes as reference `-1`, no side-channel calls.
    pub fn empty() -> Self {
        Handle {
            reference: EMPTY_HANDLE_REFERENCE,
            _policy: PhantomData,
        }
    }

    /// Wraps a raw value, pushing it onto `out`'s handle side channel now
    /// so the reference it's written with later is already known. Most
    /// callers instead build a `Handle` from a raw resource at the point
    /// where it's about to be serialized; see [`Handle::from_raw`].
    pub fn from_raw<O: Output + ?Sized>(raw: i64, out: &mut O) -> Self {
        Handle {
            reference: out.push_handle(raw),
            _policy: PhantomData,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reference == EMPTY_HANDLE_REFERENCE
    }

    /// Resolves the handle's raw value via `input`'s side channel. The
    /// empty handle always resolves to [`EMPTY_HANDLE_REFERENCE`] without
    /// a lookup.
    pub fn resolve<I: Input + ?Sized>(&self, input: &mut I) -> Result<i64, Error> {
        if self.is_empty() {
            return Ok(EMPTY_HANDLE_REFERENCE);
        }
        input.get_handle(self.reference)
    }
}

impl<P: HandlePolicy> Serialize for Handle<P> {
    fn size(&self) -> usize {
        1 + P::HANDLE_TYPE.size() + self.reference.size()
    }

    fn prefix(&self) -> u8 {
        HANDLE
    }

    fn write<O: Output + ?Sized>(&self, out: &mut O) -> Result<(), Error> {
        out.push_byte(HANDLE)?;
        P::HANDLE_TYPE.write(out)?;
        self.reference.write(out)
    }
}

impl<P: HandlePolicy> Deserialize for Handle<P> {
    fn matches(p: u8) -> bool {
        p == HANDLE
    }

    fn read<I: Input + ?Sized>(input: &mut I) -> Result<Self, Error> {
        let p = input.read_byte()?;
        if p != HANDLE {
            return Err(Error::BadFormat(p));
        }
        let handle_type = i64::read(input)?;
        if handle_type != P::HANDLE_TYPE {
            return Err(Error::UnexpectedHandleType);
        }
        let reference = i64::read(input)?;
        Ok(Handle {
            reference,
            _policy: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FileDescriptor;
    impl HandlePolicy for FileDescriptor {
        const HANDLE_TYPE: i64 = 1;
    }

    struct Socket;
    impl HandlePolicy for Socket {
        const HANDLE_TYPE: i64 = 2;
    }

    #[test]
    fn empty_handle_round_trips_without_side_channel() {
        let handle: Handle<FileDescriptor> = Handle::empty();
        let mut buf = Vec::new();
        handle.write(&mut buf).unwrap();
        let decoded = Handle::<FileDescriptor>::read(&mut buf.as_slice()).unwrap();
        assert!(decoded.is_empty());
        assert_eq!(decoded.resolve(&mut buf.as_slice()).unwrap(), -1);
    }

    #[test]
    fn mismatched_policy_is_rejected() {
        let handle: Handle<FileDescriptor> = Handle::empty();
        let mut buf = Vec::new();
        handle.write(&mut buf).unwrap();
        let err = Handle::<Socket>::read(&mut buf.as_slice()).unwrap_err();
        assert!(matches!(err, Error::UnexpectedHandleType));
    }

    #[derive(Default)]
    struct SideChannelWriter {
        bytes: Vec<u8>,
        pushed: Vec<i64>,
    }

    impl Output for SideChannelWriter {
        fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
            self.bytes.extend_from_slice(bytes);
            Ok(())
        }

        fn push_handle(&mut self, handle: i64) -> i64 {
            let reference = self.pushed.len() as i64;
            self.pushed.push(handle);
            reference
        }
    }

    struct SideChannelReader<'a> {
        bytes: &'a [u8],
        handles: Vec<i64>,
    }

    impl<'a> Input for SideChannelReader<'a> {
        fn ensure(&mut self, n: usize) -> bool {
            self.bytes.len() >= n
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<(), Error> {
            self.bytes.read(buf)
        }

        fn skip(&mut self, n: usize) -> Result<(), Error> {
            self.bytes.skip(n)
        }

        fn get_handle(&mut self, reference: i64) -> Result<i64, Error> {
            usize::try_from(reference)
                .ok()
                .and_then(|idx| self.handles.get(idx).copied())
                .ok_or(Error::InvalidHandleReference)
        }
    }

    #[test]
    fn non_empty_handle_resolves_through_side_channel() {
        let mut out = SideChannelWriter::default();
        let handle: Handle<FileDescriptor> = Handle::from_raw(42, &mut out);
        assert!(!handle.is_empty());
        handle.write(&mut out).unwrap();

        let mut reader = SideChannelReader {
            bytes: &out.bytes,
            handles: out.pushed,
        };
        let decoded = Handle::<FileDescriptor>::read(&mut reader).unwrap();
        assert_eq!(decoded.resolve(&mut reader).unwrap(), 42);
    }
}
