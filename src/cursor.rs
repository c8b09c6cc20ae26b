//! Component A: the byte cursor.
//!
//! A stateful, bounds-checked, endian-aware reader over a borrowed byte
//! slice. Every decoder in this crate (ELF, AR, symbol tables, relocations)
//! is built on top of [`Cursor`] so that bounds-checking lives in one place.

use crate::error::{Error, ErrorContext};

/// Byte order to interpret multi-byte scalars with.
///
/// Named after the ELF `EI_DATA` values it is almost always derived from,
/// rather than a generic "LittleEndian"/"BigEndian" pair, since that is the
/// vocabulary the rest of this crate uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    /// `ELFDATA2LSB` — little-endian.
    Little,
    /// `ELFDATA2MSB` — big-endian.
    Big,
}

/// A bounds-checked reader over a byte slice with a fixed [`Endian`].
///
/// `u8`/`u16`/`u32`/`u64`/`i32`/`i64` each advance the cursor by the field's
/// width and fail with [`Error::TruncatedInput`] if fewer bytes remain.
/// There is no implicit widening between methods — callers widen
/// class-dependent fields explicitly rather than threading a type parameter
/// through every decode call.
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    endian: Endian,
    file: Option<String>,
}

impl<'a> Cursor<'a> {
    /// Build a cursor over `data`, starting at offset 0.
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            pos: 0,
            endian,
            file: None,
        }
    }

    /// Attach a file name that will be included in any error this cursor
    /// raises.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// The current read position, in bytes from the start of the slice.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Seek to an absolute byte offset. Does not validate that `pos` is
    /// in-bounds; the next read will fail with `TruncatedInput` if it is
    /// not.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// The endianness this cursor was constructed with.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    fn context(&self) -> ErrorContext {
        let ctx = ErrorContext::at(String::new(), self.pos as u64);
        match &self.file {
            Some(file) => ctx.with_file(file.clone()),
            None => ErrorContext {
                file: None,
                offset: Some(self.pos as u64),
            },
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let end = self.pos.checked_add(n).ok_or_else(|| Error::TruncatedInput {
            context: self.context(),
            needed: n,
        })?;
        let slice = self.data.get(self.pos..end).ok_or_else(|| Error::TruncatedInput {
            context: self.context(),
            needed: n,
        })?;
        self.pos = end;
        Ok(slice)
    }

    /// Read a single byte.
    pub fn u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    /// Read a 16-bit unsigned integer in the cursor's endianness.
    pub fn u16(&mut self) -> Result<u16, Error> {
        let bytes = self.take(2)?;
        Ok(match self.endian {
            Endian::Little => u16::from_le_bytes([bytes[0], bytes[1]]),
            Endian::Big => u16::from_be_bytes([bytes[0], bytes[1]]),
        })
    }

    /// Read a 32-bit unsigned integer in the cursor's endianness.
    pub fn u32(&mut self) -> Result<u32, Error> {
        let bytes = self.take(4)?;
        Ok(match self.endian {
            Endian::Little => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            Endian::Big => u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        })
    }

    /// Read a 64-bit unsigned integer in the cursor's endianness.
    pub fn u64(&mut self) -> Result<u64, Error> {
        let bytes = self.take(8)?;
        let b = [
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ];
        Ok(match self.endian {
            Endian::Little => u64::from_le_bytes(b),
            Endian::Big => u64::from_be_bytes(b),
        })
    }

    /// Read a 32-bit signed integer in the cursor's endianness.
    pub fn i32(&mut self) -> Result<i32, Error> {
        let bytes = self.take(4)?;
        Ok(match self.endian {
            Endian::Little => i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            Endian::Big => i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        })
    }

    /// Read a 64-bit signed integer in the cursor's endianness.
    pub fn i64(&mut self) -> Result<i64, Error> {
        let bytes = self.take(8)?;
        let b = [
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ];
        Ok(match self.endian {
            Endian::Little => i64::from_le_bytes(b),
            Endian::Big => i64::from_be_bytes(b),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_scalars_little_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let mut c = Cursor::new(&data, Endian::Little);
        assert_eq!(c.u8().unwrap(), 0x01);
        assert_eq!(c.u16().unwrap(), 0x0403);
        assert_eq!(c.u32().unwrap(), 0x0807_0605);
    }

    #[test]
    fn reads_scalars_big_endian() {
        let data = [0x00, 0x00, 0x00, 0x01];
        let mut c = Cursor::new(&data, Endian::Big);
        assert_eq!(c.u32().unwrap(), 1);
    }

    #[test]
    fn truncated_read_fails() {
        let data = [0x01];
        let mut c = Cursor::new(&data, Endian::Little);
        assert!(matches!(c.u16(), Err(Error::TruncatedInput { .. })));
    }

    #[test]
    fn u64_round_trips() {
        let data = 0x1122_3344_5566_7788u64.to_be_bytes();
        let mut c = Cursor::new(&data, Endian::Big);
        assert_eq!(c.u64().unwrap(), 0x1122_3344_5566_7788);
    }

    #[test]
    fn negative_addend_decodes() {
        let data = (-4i32).to_le_bytes();
        let mut c = Cursor::new(&data, Endian::Little);
        assert_eq!(c.i32().unwrap(), -4);
    }
}
