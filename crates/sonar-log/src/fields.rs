//! Checked big-endian field reads over a byte slice.
//!
//! `bytes::Buf` panics when a read runs past the end of the buffer; vendor
//! files are frequently cut short by a power loss on the boat, so every read
//! is checked first and reported through the caller's error constructor.

use crate::error::DecodeError;
use bytes::Buf;

/// Sequential reader over one header or record.
pub(crate) struct FieldReader<'a, F>
where
    F: Fn(usize, usize) -> DecodeError,
{
    buf: &'a [u8],
    short: F,
}

impl<'a, F> FieldReader<'a, F>
where
    F: Fn(usize, usize) -> DecodeError,
{
    /// `short(needed, available)` builds the error for a read past the end.
    pub fn new(buf: &'a [u8], short: F) -> Self {
        Self { buf, short }
    }

    fn ensure(&self, n: usize) -> Result<(), DecodeError> {
        if self.buf.remaining() < n {
            return Err((self.short)(n, self.buf.remaining()));
        }
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.ensure(n)?;
        self.buf.advance(n);
        Ok(())
    }

    pub fn i32(&mut self) -> Result<i32, DecodeError> {
        self.ensure(4)?;
        Ok(self.buf.get_i32())
    }

    pub fn u32(&mut self) -> Result<u32, DecodeError> {
        self.ensure(4)?;
        Ok(self.buf.get_u32())
    }

    pub fn i16(&mut self) -> Result<i16, DecodeError> {
        self.ensure(2)?;
        Ok(self.buf.get_i16())
    }

    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        self.ensure(n)?;
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }
}
