//! Section headers (`Shdr`) — the link-time section table, plus the
//! section-header string table resolution pass that fills in `name`.

use super::header::ElfClass;
use crate::cursor::{Cursor, Endian};
use crate::error::Error;
use crate::strtab::string_at;

/// One entry of the section-header table, with `name` resolved after the
/// whole table has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    /// `sh_name`, an index into the section-header string table.
    pub name_index: u32,
    /// The resolved name, filled in after the `shstrtab` section is known.
    pub name: String,
    /// `sh_type`
    pub sh_type: u32,
    /// `sh_flags`
    pub flags: u64,
    /// `sh_addr`
    pub addr: u64,
    /// `sh_offset`
    pub offset: u64,
    /// `sh_size`
    pub size: u64,
    /// `sh_link`
    pub link: u32,
    /// `sh_info`
    pub info: u32,
    /// `sh_addralign`
    pub addralign: u64,
    /// `sh_entsize`
    pub entsize: u64,
}

impl SectionHeader {
    fn decode_one(cursor: &mut Cursor<'_>, class: ElfClass) -> Result<Self, Error> {
        let name_index = cursor.u32()?;
        let sh_type = cursor.u32()?;

        let (flags, addr, offset, size, link, info, addralign, entsize) = match class {
            ElfClass::Elf32 => {
                let flags = cursor.u32()? as u64;
                let addr = cursor.u32()? as u64;
                let offset = cursor.u32()? as u64;
                let size = cursor.u32()? as u64;
                let link = cursor.u32()?;
                let info = cursor.u32()?;
                let addralign = cursor.u32()? as u64;
                let entsize = cursor.u32()? as u64;
                (flags, addr, offset, size, link, info, addralign, entsize)
            }
            ElfClass::Elf64 => {
                let flags = cursor.u64()?;
                let addr = cursor.u64()?;
                let offset = cursor.u64()?;
                let size = cursor.u64()?;
                let link = cursor.u32()?;
                let info = cursor.u32()?;
                let addralign = cursor.u64()?;
                let entsize = cursor.u64()?;
                (flags, addr, offset, size, link, info, addralign, entsize)
            }
        };

        Ok(Self {
            name_index,
            name: String::new(),
            sh_type,
            flags,
            addr,
            offset,
            size,
            link,
            info,
            addralign,
            entsize,
        })
    }

    /// Decode the section-header table (`shnum` entries of `shentsize`
    /// bytes starting at `shoff`; empty if `shoff == 0`), then resolve
    /// every entry's `name` against the `shstrndx` section.
    pub fn decode_table(
        blob: &[u8],
        class: ElfClass,
        endian: Endian,
        shoff: u64,
        shnum: u16,
        shentsize: u16,
        shstrndx: u16,
        file: Option<&str>,
    ) -> Result<Vec<Self>, Error> {
        if shoff == 0 {
            return Ok(Vec::new());
        }

        let mut headers = Vec::with_capacity(shnum as usize);
        for i in 0..shnum {
            let start = shoff as usize + i as usize * shentsize as usize;
            let mut cursor = Cursor::new(blob, endian);
            if let Some(f) = file {
                cursor = cursor.with_file(f);
            }
            cursor.seek(start);
            headers.push(Self::decode_one(&mut cursor, class)?);
        }

        // shstrndx == 0 addresses the null section header, which never
        // really holds a string table; resolve against an empty slice in
        // that case rather than treating shstrndx == 0 specially.
        let shstrtab: &[u8] = match headers.get(shstrndx as usize) {
            Some(sh) if sh.sh_type == crate::elf::consts::SHT_STRTAB => {
                let start = sh.offset as usize;
                let end = start + sh.size as usize;
                blob.get(start..end).ok_or_else(|| Error::TruncatedInput {
                    context: crate::error::ErrorContext {
                        file: file.map(String::from),
                        offset: Some(start as u64),
                    },
                    needed: sh.size as usize,
                })?
            }
            _ => &[],
        };

        for sh in headers.iter_mut() {
            sh.name = string_at(shstrtab, sh.name_index, file)?;
        }

        Ok(headers)
    }
}
