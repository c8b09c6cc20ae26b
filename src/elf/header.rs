//! The ELF file header (`Ehdr`) and its class/endianness identification
//! bytes. This is the only ELF structure required to sit at a fixed offset
//! (0) in the file.

use crate::cursor::{Cursor, Endian};
use crate::error::{Error, ErrorContext};

/// `EI_CLASS` — whether the object uses 32-bit or 64-bit layouts.
///
/// This is the single tag the rest of the decoder dispatches on exactly
/// once per table, rather than per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElfClass {
    /// `ELFCLASS32`
    Elf32,
    /// `ELFCLASS64`
    Elf64,
}

impl ElfClass {
    fn from_byte(value: u8, context: ErrorContext) -> Result<Self, Error> {
        match value {
            1 => Ok(ElfClass::Elf32),
            2 => Ok(ElfClass::Elf64),
            other => Err(Error::BadClass {
                value: other,
                context,
            }),
        }
    }
}

fn endian_from_byte(value: u8, context: ErrorContext) -> Result<Endian, Error> {
    match value {
        1 => Ok(Endian::Little),
        2 => Ok(Endian::Big),
        other => Err(Error::BadEndian {
            value: other,
            context,
        }),
    }
}

/// The non-class-dependent parts of the ELF header, plus the
/// class-dependent entry/offset triple, widened to 64 bits on read
/// regardless of class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElfFileHeader {
    /// `EI_CLASS`
    pub class: ElfClass,
    /// `EI_DATA`
    pub data: Endian,
    /// `EI_VERSION`
    pub ei_version: u8,
    /// `EI_OSABI`
    pub os_abi: u8,
    /// `EI_ABIVERSION`
    pub abi_version: u8,
    /// `e_type`, accepted opaquely.
    pub e_type: u16,
    /// `e_machine`, accepted opaquely.
    pub machine: u16,
    /// `e_version`
    pub e_version: u32,
    /// `e_entry`, widened to 64 bits.
    pub entry: u64,
    /// `e_phoff`, widened to 64 bits.
    pub phoff: u64,
    /// `e_shoff`, widened to 64 bits.
    pub shoff: u64,
    /// `e_flags`
    pub flags: u32,
    /// `e_ehsize`
    pub ehsize: u16,
    /// `e_phentsize`
    pub phentsize: u16,
    /// `e_phnum`
    pub phnum: u16,
    /// `e_shentsize`
    pub shentsize: u16,
    /// `e_shnum`
    pub shnum: u16,
    /// `e_shstrndx`
    pub shstrndx: u16,
}

impl ElfFileHeader {
    /// Decode the file header from the start of `blob`.
    ///
    /// `blob` is re-sliced (not consumed) since later stages (program and
    /// section headers) need the whole buffer; this only reads the fixed
    /// 16-byte identifier plus the 36/48-byte class-dependent tail.
    pub fn decode(blob: &[u8], file: Option<&str>) -> Result<Self, Error> {
        let ctx_at = |offset: usize| {
            let c = ErrorContext {
                file: None,
                offset: Some(offset as u64),
            };
            match file {
                Some(f) => c.with_file(f),
                None => c,
            }
        };

        if blob.len() < 16 {
            return Err(Error::TruncatedInput {
                context: ctx_at(0),
                needed: 16 - blob.len(),
            });
        }

        let class = ElfClass::from_byte(blob[4], ctx_at(4))?;
        let data = endian_from_byte(blob[5], ctx_at(5))?;
        let ei_version = blob[6];
        let os_abi = blob[7];
        let abi_version = blob[8];
        // Bytes 9..15 are reserved padding.

        let mut cursor = Cursor::new(&blob[16..], data);
        if let Some(f) = file {
            cursor = cursor.with_file(f);
        }

        let e_type = cursor.u16()?;
        let machine = cursor.u16()?;
        let e_version = cursor.u32()?;

        let (entry, phoff, shoff) = match class {
            ElfClass::Elf32 => (
                cursor.u32()? as u64,
                cursor.u32()? as u64,
                cursor.u32()? as u64,
            ),
            ElfClass::Elf64 => (cursor.u64()?, cursor.u64()?, cursor.u64()?),
        };

        let flags = cursor.u32()?;
        let ehsize = cursor.u16()?;
        let phentsize = cursor.u16()?;
        let phnum = cursor.u16()?;
        let shentsize = cursor.u16()?;
        let shnum = cursor.u16()?;
        let shstrndx = cursor.u16()?;

        Ok(Self {
            class,
            data,
            ei_version,
            os_abi,
            abi_version,
            e_type,
            machine,
            e_version,
            entry,
            phoff,
            shoff,
            flags,
            ehsize,
            phentsize,
            phnum,
            shentsize,
            shnum,
            shstrndx,
        })
    }
}
