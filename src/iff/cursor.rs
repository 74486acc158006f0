//! Bounded big-endian reader over the input slice.

use crate::error::IffError;

pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub(crate) fn set_position(&mut self, pos: usize) -> Result<(), IffError> {
        if pos > self.data.len() {
            return Err(IffError::UnexpectedEof);
        }
        self.pos = pos;
        Ok(())
    }

    pub(crate) fn skip(&mut self, n: usize) -> Result<(), IffError> {
        let new_pos = self.pos.checked_add(n).ok_or(IffError::UnexpectedEof)?;
        self.set_position(new_pos)
    }

    /// Next byte without consuming it.
    pub(crate) fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, IffError> {
        let b = self.peek_u8().ok_or(IffError::UnexpectedEof)?;
        self.pos += 1;
        Ok(b)
    }

    pub(crate) fn read_i8(&mut self) -> Result<i8, IffError> {
        self.read_u8().map(|b| b as i8)
    }

    pub(crate) fn read_u16_be(&mut self) -> Result<u16, IffError> {
        self.read_array().map(u16::from_be_bytes)
    }

    pub(crate) fn read_i16_be(&mut self) -> Result<i16, IffError> {
        self.read_array().map(i16::from_be_bytes)
    }

    pub(crate) fn read_u32_be(&mut self) -> Result<u32, IffError> {
        self.read_array().map(u32::from_be_bytes)
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N], IffError> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Fill `buf` entirely or fail without consuming anything.
    pub(crate) fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), IffError> {
        let src = self.take(buf.len())?;
        buf.copy_from_slice(src);
        Ok(())
    }

    /// Borrow the next `n` bytes and advance past them.
    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8], IffError> {
        let end = self.pos.checked_add(n).ok_or(IffError::UnexpectedEof)?;
        let src = self.data.get(self.pos..end).ok_or(IffError::UnexpectedEof)?;
        self.pos = end;
        Ok(src)
    }
}
