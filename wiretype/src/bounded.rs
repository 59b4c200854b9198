//! Bounded streams (§4.9): an `Output`/`Input` wrapper with a fixed byte
//! budget, used internally to implement the table format's skip-tolerance
//! and available to callers who want the same guarantee elsewhere.

use crate::io::{Input, Output};
use crate::Error;

/// Wraps an [`Output`] with a fixed byte budget. Every write checks
/// `bytes_written + n <= budget`, failing with `WriteLimitReached`
/// rather than exceeding it.
pub struct BoundedWriter<'a, O: ?Sized> {
    inner: &'a mut O,
    budget: usize,
    written: usize,
}

impl<'a, O: Output + ?Sized> BoundedWriter<'a, O> {
    pub fn new(inner: &'a mut O, budget: usize) -> Self {
        BoundedWriter {
            inner,
            budget,
            written: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.budget - self.written
    }

    /// Fills the rest of the budget with `fill`, e.g. a table entry's
    /// declared-size padding.
    pub fn pad_remaining(&mut self, fill: u8) -> Result<(), Error> {
        let remaining = self.remaining();
        self.skip(remaining, fill)
    }
}

impl<'a, O: Output + ?Sized> Output for BoundedWriter<'a, O> {
    fn prepare(&mut self, n: usize) {
        self.inner.prepare(n);
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if self.written + bytes.len() > self.budget {
            return Err(Error::WriteLimitReached);
        }
        self.inner.write(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    fn push_handle(&mut self, handle: i64) -> i64 {
        self.inner.push_handle(handle)
    }
}

/// Wraps an [`Input`] with a fixed byte budget, the mirror of
/// [`BoundedWriter`]. `skip_remainder` consumes whatever of the budget a
/// length-prefixed container's own decode didn't — e.g. a table entry's
/// declared-size padding, or a newer writer's trailing fields.
pub struct BoundedReader<'a, I: ?Sized> {
    inner: &'a mut I,
    budget: usize,
    consumed: usize,
}

impl<'a, I: Input + ?Sized> BoundedReader<'a, I> {
    pub fn new(inner: &'a mut I, budget: usize) -> Self {
        BoundedReader {
            inner,
            budget,
            consumed: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.budget - self.consumed
    }

    /// Advances past whatever of the budget hasn't been consumed yet.
    pub fn skip_remainder(&mut self) -> Result<(), Error> {
        let remaining = self.remaining();
        self.skip(remaining)
    }
}

impl<'a, I: Input + ?Sized> Input for BoundedReader<'a, I> {
    fn ensure(&mut self, n: usize) -> bool {
        self.remaining() >= n && self.inner.ensure(n)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        if self.consumed + buf.len() > self.budget {
            return Err(Error::ReadLimitReached);
        }
        self.inner.read(buf)?;
        self.consumed += buf.len();
        Ok(())
    }

    fn skip(&mut self, n: usize) -> Result<(), Error> {
        if self.consumed + n > self.budget {
            return Err(Error::ReadLimitReached);
        }
        self.inner.skip(n)?;
        self.consumed += n;
        Ok(())
    }

    fn get_handle(&mut self, reference: i64) -> Result<i64, Error> {
        self.inner.get_handle(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Serialize;

    #[test]
    fn writer_rejects_overflow_and_pads() {
        let mut backing = Vec::new();
        {
            let mut bounded = BoundedWriter::new(&mut backing, 4);
            bounded.write(&[1, 2]).unwrap();
            bounded.pad_remaining(0x5a).unwrap();
        }
        assert_eq!(backing, vec![1, 2, 0x5a, 0x5a]);

        let mut backing = Vec::new();
        let mut bounded = BoundedWriter::new(&mut backing, 1);
        assert!(matches!(
            bounded.write(&[1, 2]),
            Err(Error::WriteLimitReached)
        ));
    }

    #[test]
    fn reader_rejects_overflow_and_skips_remainder() {
        let data = vec![1u8, 2, 3, 4, 5];
        let mut slice = data.as_slice();
        let mut bounded = BoundedReader::new(&mut slice, 3);
        let mut byte = [0u8; 1];
        bounded.read(&mut byte).unwrap();
        assert_eq!(byte[0], 1);
        bounded.skip_remainder().unwrap();
        assert_eq!(bounded.remaining(), 0);
        assert_eq!(slice, &[4, 5]);
    }

    #[test]
    fn reader_rejects_read_past_budget() {
        let data = vec![1u8, 2, 3];
        let mut slice = data.as_slice();
        let mut bounded = BoundedReader::new(&mut slice, 1);
        let mut buf = [0u8; 2];
        assert!(matches!(bounded.read(&mut buf), Err(Error::ReadLimitReached)));
    }

    #[test]
    fn bounded_writer_composes_with_serialize() {
        let mut backing = Vec::new();
        let mut bounded = BoundedWriter::new(&mut backing, 16);
        42u32.write(&mut bounded).unwrap();
        assert!(!backing.is_empty());
    }
}
