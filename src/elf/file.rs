//! Component C's entry point: decode a whole ELF blob into a structured
//! [`ElfFile`].

use super::header::{ElfClass, ElfFileHeader};
use super::program_header::ProgramHeader;
use super::relocation::{read_rel32, read_rela64, Rel32, Rela64};
use super::section_header::SectionHeader;
use crate::error::Error;

/// A decoded ELF object file: header, program headers, and section
/// headers (with names resolved), plus the byte buffer they all index
/// into.
///
/// The buffer outlives all views: every section/string slice handed out
/// elsewhere is an offset into `data`, not a copy.
#[derive(Debug, Clone)]
pub struct ElfFile {
    /// The logical name this file was read under (for error context and
    /// display), if known.
    pub name: Option<String>,
    /// The owned byte buffer the whole file was decoded from.
    pub data: Vec<u8>,
    /// The file header.
    pub header: ElfFileHeader,
    /// The program-header table, possibly empty.
    pub program_headers: Vec<ProgramHeader>,
    /// The section-header table, possibly empty, names resolved.
    pub section_headers: Vec<SectionHeader>,
}

impl ElfFile {
    /// Decode `blob` into a structured `ElfFile`. `name` is used only for
    /// error reporting.
    pub fn decode(blob: Vec<u8>, name: Option<String>) -> Result<Self, Error> {
        let header = ElfFileHeader::decode(&blob, name.as_deref())?;

        let program_headers = ProgramHeader::decode_table(
            &blob,
            header.class,
            header.data,
            header.phoff,
            header.phnum,
            header.phentsize,
            name.as_deref(),
        )?;

        let section_headers = SectionHeader::decode_table(
            &blob,
            header.class,
            header.data,
            header.shoff,
            header.shnum,
            header.shentsize,
            header.shstrndx,
            name.as_deref(),
        )?;

        Ok(Self {
            name,
            data: blob,
            header,
            program_headers,
            section_headers,
        })
    }

    /// Find a section header by its resolved name.
    pub fn section_by_name(&self, name: &str) -> Option<&SectionHeader> {
        self.section_headers.iter().find(|sh| sh.name == name)
    }

    /// The bytes of section `index`, if in range.
    pub fn section_bytes(&self, index: usize) -> Option<&[u8]> {
        let sh = self.section_headers.get(index)?;
        let start = sh.offset as usize;
        let end = start + sh.size as usize;
        self.data.get(start..end)
    }

    /// Decode the `SHT_REL` table at section `index`.
    pub fn read_rel32(&self, index: usize) -> Result<Vec<Rel32>, Error> {
        let sh = self
            .section_headers
            .get(index)
            .ok_or_else(|| Error::WrongRelocationKind {
                context: crate::error::ErrorContext {
                    file: self.name.clone(),
                    offset: None,
                },
            })?;
        read_rel32(
            &self.data,
            self.header.data,
            sh.sh_type,
            sh.offset,
            sh.size,
            self.name.as_deref(),
        )
    }

    /// Decode the `SHT_RELA` table at section `index`.
    pub fn read_rela64(&self, index: usize) -> Result<Vec<Rela64>, Error> {
        let sh = self
            .section_headers
            .get(index)
            .ok_or_else(|| Error::WrongRelocationKind {
                context: crate::error::ErrorContext {
                    file: self.name.clone(),
                    offset: None,
                },
            })?;
        read_rela64(
            &self.data,
            self.header.data,
            sh.sh_type,
            sh.offset,
            sh.size,
            self.name.as_deref(),
        )
    }

    /// The ELF class this file was decoded as.
    pub fn class(&self) -> ElfClass {
        self.header.class
    }
}
