//! Component D: the symbol-table decoder.

use super::consts::{SHN_UNDEF, SHT_SYMTAB};
use super::header::ElfClass;
use crate::cursor::{Cursor, Endian};
use crate::error::{Error, ErrorContext};
use crate::strtab::string_at;

use super::section_header::SectionHeader;

/// One `.symtab` entry, name already resolved against `.strtab`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTableEntry {
    /// `st_name`
    pub name_index: u32,
    /// The resolved symbol name.
    pub name: String,
    /// `st_info` — binding in the high nibble, type in the low nibble.
    pub info: u8,
    /// `st_other`
    pub other: u8,
    /// `st_shndx`. `SHN_UNDEF` (0) marks the symbol as undefined.
    pub shndx: u16,
    /// `st_value`, widened to 64 bits.
    pub value: u64,
    /// `st_size`, widened to 64 bits.
    pub size: u64,
}

impl SymbolTableEntry {
    /// The symbol's binding (`STB_*`): `info >> 4`.
    pub fn bind(&self) -> u8 {
        self.info >> 4
    }

    /// The symbol's type (`STT_*`): `info & 0x0f`.
    pub fn symbol_type(&self) -> u8 {
        self.info & 0x0f
    }

    /// Whether this entry is undefined (`shndx == SHN_UNDEF`).
    pub fn is_undefined(&self) -> bool {
        self.shndx == SHN_UNDEF
    }

    fn decode_one(
        cursor: &mut Cursor<'_>,
        class: ElfClass,
        strtab: &[u8],
        file: Option<&str>,
    ) -> Result<Self, Error> {
        let (name_index, value, size, info, other, shndx) = match class {
            ElfClass::Elf32 => {
                let name_index = cursor.u32()?;
                let value = cursor.u32()? as u64;
                let size = cursor.u32()? as u64;
                let info = cursor.u8()?;
                let other = cursor.u8()?;
                let shndx = cursor.u16()?;
                (name_index, value, size, info, other, shndx)
            }
            ElfClass::Elf64 => {
                let name_index = cursor.u32()?;
                let info = cursor.u8()?;
                let other = cursor.u8()?;
                let shndx = cursor.u16()?;
                let value = cursor.u64()?;
                let size = cursor.u64()?;
                (name_index, value, size, info, other, shndx)
            }
        };

        let name = string_at(strtab, name_index, file)?;

        Ok(Self {
            name_index,
            name,
            info,
            other,
            shndx,
            value,
            size,
        })
    }
}

/// The whole `.symtab`, in file order. Entry 0 is always present (the
/// null/placeholder entry) but is excluded from link analysis by
/// [`crate::link::get_link_info`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: Vec<SymbolTableEntry>,
}

impl SymbolTable {
    /// Build a table directly from already-decoded entries, bypassing
    /// section lookup. Used by link-resolution tests that want to
    /// exercise [`crate::link`] without round-tripping a whole ELF blob.
    pub(crate) fn from_entries(entries: Vec<SymbolTableEntry>) -> Self {
        Self { entries }
    }

    /// Locate `.symtab`/`.strtab` in `sections`, and decode every entry of
    /// the symbol table. Fails with [`Error::NoSymbolTable`] if no section
    /// is named `.symtab` with type `SHT_SYMTAB`.
    pub fn decode(
        blob: &[u8],
        class: ElfClass,
        endian: Endian,
        sections: &[SectionHeader],
        file: Option<&str>,
    ) -> Result<Self, Error> {
        let symtab_sh = sections
            .iter()
            .find(|sh| sh.name == ".symtab" && sh.sh_type == SHT_SYMTAB)
            .ok_or_else(|| Error::NoSymbolTable {
                context: match file {
                    Some(f) => ErrorContext::file(f),
                    None => ErrorContext::none(),
                },
            })?;

        let symtab_slice = slice_of(blob, symtab_sh.offset, symtab_sh.size, file)?;
        let strtab_sh = sections
            .get(symtab_sh.link as usize)
            .ok_or_else(|| Error::NoSymbolTable {
                context: match file {
                    Some(f) => ErrorContext::file(f),
                    None => ErrorContext::none(),
                },
            })?;
        let strtab_slice = slice_of(blob, strtab_sh.offset, strtab_sh.size, file)?;

        let entry_size: usize = match class {
            ElfClass::Elf32 => 16,
            ElfClass::Elf64 => 24,
        };
        let count = symtab_slice.len() / entry_size;

        let mut entries = Vec::with_capacity(count);
        let mut cursor = Cursor::new(symtab_slice, endian);
        if let Some(f) = file {
            cursor = cursor.with_file(f);
        }
        for _ in 0..count {
            entries.push(SymbolTableEntry::decode_one(
                &mut cursor,
                class,
                strtab_slice,
                file,
            )?);
        }

        Ok(Self { entries })
    }

    /// All entries, in file order, including entry 0.
    pub fn entries(&self) -> &[SymbolTableEntry] {
        &self.entries
    }

    /// Index-based access, matching the index space used by
    /// [`crate::link::SymLinkInfo`] and [`crate::link::Resolver`].
    pub fn get(&self, index: usize) -> Option<&SymbolTableEntry> {
        self.entries.get(index)
    }

    /// Number of entries, including entry 0.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries at all (never true for a
    /// successfully decoded `.symtab`, which always has at least the null
    /// entry, but useful for constructed tables in tests).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn slice_of<'a>(blob: &'a [u8], offset: u64, size: u64, file: Option<&str>) -> Result<&'a [u8], Error> {
    let start = offset as usize;
    let end = start + size as usize;
    blob.get(start..end).ok_or_else(|| Error::TruncatedInput {
        context: ErrorContext {
            file: file.map(String::from),
            offset: Some(start as u64),
        },
        needed: size as usize,
    })
}
