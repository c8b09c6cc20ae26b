//! A deliberately unfinished stub for the final layout / relocation
//! fix-up pass.
//!
//! This crate stops at symbol resolution. `do_layout` exists to show the
//! intended next stage's shape — it groups sections into the same
//! segment buckets the original linker used, then hands back an empty
//! `ElfFile` shell. No section concatenation, address assignment, or
//! relocation fix-up happens here.

use crate::cursor::Endian;
use crate::elf::{ElfClass, ElfFile, ElfFileHeader};
use crate::orchestrate::DecodedUnit;

/// The three program-header buckets sections are grouped into, in file
/// offset order: text (R+E), read-only data and notes (R), and writable
/// data (R+W).
pub const PHDR_ORDER: [&[&str]; 3] = [
    &[".text"],
    &[".note", ".rodata", ".reginfo", ".eh_frame_hdr"],
    &[".data", ".eh_frame", ".got", ".bss"],
];

/// Build the section-name groups that would become program-header
/// segments, logging the plan the way a diagnostic build would. Does not
/// perform layout.
pub fn do_layout(units: &[DecodedUnit]) -> ElfFile {
    for bucket in PHDR_ORDER.iter() {
        log::info!("phdr bucket: {bucket:?}");
    }

    for unit in units {
        for sh in &unit.file.section_headers {
            let bucket = PHDR_ORDER.iter().position(|names| names.contains(&sh.name.as_str()));
            log::debug!("{}: section {:?} -> bucket {:?}", unit.name, sh.name, bucket);
        }
    }

    empty_elf_shell()
}

fn empty_elf_shell() -> ElfFile {
    ElfFile {
        name: None,
        data: Vec::new(),
        header: ElfFileHeader {
            class: ElfClass::Elf64,
            data: Endian::Little,
            ei_version: 1,
            os_abi: 0,
            abi_version: 0,
            e_type: 0,
            machine: 0,
            e_version: 1,
            entry: 0,
            phoff: 0,
            shoff: 0,
            flags: 0,
            ehsize: 0,
            phentsize: 0,
            phnum: 0,
            shentsize: 0,
            shnum: 0,
            shstrndx: 0,
        },
        program_headers: Vec::new(),
        section_headers: Vec::new(),
    }
}
