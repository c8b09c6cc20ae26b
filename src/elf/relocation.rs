//! Component E: the relocation decoder (`SHT_REL`/`SHT_RELA`).

use super::consts::{SHT_REL, SHT_RELA};
use crate::cursor::{Cursor, Endian};
use crate::error::{Error, ErrorContext};

/// A class-32 `SHT_REL` record: 8 bytes, implicit addend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rel32 {
    /// `r_offset`
    pub r_offset: u32,
    /// `r_info`
    pub r_info: u32,
}

impl Rel32 {
    /// `r_info >> 8`
    pub fn symbol(&self) -> u32 {
        self.r_info >> 8
    }

    /// `r_info & 0xff`
    pub fn kind(&self) -> u32 {
        self.r_info & 0xff
    }
}

/// A class-64 `SHT_RELA` record: 24 bytes, explicit addend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rela64 {
    /// `r_offset`
    pub r_offset: u64,
    /// `r_info`
    pub r_info: u64,
    /// `r_addend`
    pub r_addend: i64,
}

impl Rela64 {
    /// `r_info >> 32`
    pub fn symbol(&self) -> u64 {
        self.r_info >> 32
    }

    /// `r_info & 0xffffffff`
    pub fn kind(&self) -> u64 {
        self.r_info & 0xffff_ffff
    }
}

/// Decode a `SHT_REL` section's entries.
///
/// `sh_type` must be `SHT_REL`; any other type is
/// [`Error::WrongRelocationKind`].
pub fn read_rel32(
    blob: &[u8],
    endian: Endian,
    sh_type: u32,
    offset: u64,
    size: u64,
    file: Option<&str>,
) -> Result<Vec<Rel32>, Error> {
    if sh_type != SHT_REL {
        return Err(Error::WrongRelocationKind {
            context: ctx(file, offset),
        });
    }

    let slice = slice_of(blob, offset, size, file)?;
    let mut cursor = Cursor::new(slice, endian);
    if let Some(f) = file {
        cursor = cursor.with_file(f);
    }

    let count = slice.len() / 8;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(Rel32 {
            r_offset: cursor.u32()?,
            r_info: cursor.u32()?,
        });
    }
    Ok(out)
}

/// Decode a `SHT_RELA` section's entries.
///
/// `sh_type` must be `SHT_RELA`; any other type is
/// [`Error::WrongRelocationKind`].
pub fn read_rela64(
    blob: &[u8],
    endian: Endian,
    sh_type: u32,
    offset: u64,
    size: u64,
    file: Option<&str>,
) -> Result<Vec<Rela64>, Error> {
    if sh_type != SHT_RELA {
        return Err(Error::WrongRelocationKind {
            context: ctx(file, offset),
        });
    }

    let slice = slice_of(blob, offset, size, file)?;
    let mut cursor = Cursor::new(slice, endian);
    if let Some(f) = file {
        cursor = cursor.with_file(f);
    }

    let count = slice.len() / 24;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(Rela64 {
            r_offset: cursor.u64()?,
            r_info: cursor.u64()?,
            r_addend: cursor.i64()?,
        });
    }
    Ok(out)
}

fn ctx(file: Option<&str>, offset: u64) -> ErrorContext {
    ErrorContext {
        file: file.map(String::from),
        offset: Some(offset),
    }
}

fn slice_of<'a>(blob: &'a [u8], offset: u64, size: u64, file: Option<&str>) -> Result<&'a [u8], Error> {
    let start = offset as usize;
    let end = start + size as usize;
    blob.get(start..end)
        .ok_or_else(|| Error::TruncatedInput {
            context: ctx(file, offset),
            needed: size as usize,
        })
}
