//! Program headers (`Phdr`) — the load-time segment table.

use super::header::ElfClass;
use crate::cursor::Cursor;
use crate::error::Error;

/// One entry of the program-header table, with all address/size fields
/// widened to 64 bits regardless of class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramHeader {
    /// `p_type`
    pub p_type: u32,
    /// `p_flags`
    pub flags: u32,
    /// `p_offset`
    pub offset: u64,
    /// `p_vaddr`
    pub vaddr: u64,
    /// `p_paddr`
    pub paddr: u64,
    /// `p_filesz`
    pub filesz: u64,
    /// `p_memsz`
    pub memsz: u64,
    /// `p_align`
    pub align: u64,
}

impl ProgramHeader {
    /// Decode one entry, dispatching once on `class` for the field order:
    /// class-32 puts `p_flags` after `p_memsz`; class-64 puts it right
    /// after `p_type`.
    fn decode_one(cursor: &mut Cursor<'_>, class: ElfClass) -> Result<Self, Error> {
        match class {
            ElfClass::Elf32 => {
                let p_type = cursor.u32()?;
                let offset = cursor.u32()? as u64;
                let vaddr = cursor.u32()? as u64;
                let paddr = cursor.u32()? as u64;
                let filesz = cursor.u32()? as u64;
                let memsz = cursor.u32()? as u64;
                let flags = cursor.u32()?;
                let align = cursor.u32()? as u64;
                Ok(Self {
                    p_type,
                    flags,
                    offset,
                    vaddr,
                    paddr,
                    filesz,
                    memsz,
                    align,
                })
            }
            ElfClass::Elf64 => {
                let p_type = cursor.u32()?;
                let flags = cursor.u32()?;
                let offset = cursor.u64()?;
                let vaddr = cursor.u64()?;
                let paddr = cursor.u64()?;
                let filesz = cursor.u64()?;
                let memsz = cursor.u64()?;
                let align = cursor.u64()?;
                Ok(Self {
                    p_type,
                    flags,
                    offset,
                    vaddr,
                    paddr,
                    filesz,
                    memsz,
                    align,
                })
            }
        }
    }

    /// Decode the whole program-header table: `phnum` entries of
    /// `phentsize` bytes each, starting at `phoff`. An empty table is
    /// returned without error when `phoff == 0`, regardless of `phnum`.
    pub fn decode_table(
        blob: &[u8],
        class: ElfClass,
        endian: crate::cursor::Endian,
        phoff: u64,
        phnum: u16,
        phentsize: u16,
        file: Option<&str>,
    ) -> Result<Vec<Self>, Error> {
        if phoff == 0 {
            return Ok(Vec::new());
        }

        let mut headers = Vec::with_capacity(phnum as usize);
        for i in 0..phnum {
            let start = phoff as usize + i as usize * phentsize as usize;
            let mut cursor = Cursor::new(blob, endian);
            if let Some(f) = file {
                cursor = cursor.with_file(f);
            }
            cursor.seek(start);
            headers.push(Self::decode_one(&mut cursor, class)?);
        }
        Ok(headers)
    }
}
