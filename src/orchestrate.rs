//! Component J: sniff, decode, extract, and resolve a whole link.

use rayon::prelude::*;

use crate::ar::ArFile;
use crate::elf::ElfFile;
use crate::elf::SymbolTable;
use crate::error::Error;
use crate::link::{get_link_info, resolve_symbols, LinkUnit, Resolver, SymLinkInfo};
use crate::sniff::{sniff, FileType};

/// One fully decoded translation unit ready for resolution.
pub struct DecodedUnit {
    /// The logical name this unit was read under — the input file's name,
    /// or `archive_name(member_name)` for an archive member.
    pub name: String,
    /// The decoded ELF file.
    pub file: ElfFile,
    /// The decoded symbol table.
    pub symtab: SymbolTable,
    /// The extracted link info.
    pub info: SymLinkInfo,
}

/// The outcome of a whole link: every decoded unit plus the resolution of
/// every undefined symbol across all of them.
pub struct LinkResult {
    /// Units in the stable order the resolver used for tie-breaking.
    pub units: Vec<DecodedUnit>,
    /// One resolution per `(unit_index, entry_index)` drawn from each
    /// unit's undefined symbols.
    pub resolutions: std::collections::HashMap<(usize, usize), Resolver>,
}

impl LinkResult {
    /// Every undefined reference that stayed unresolved, as
    /// `(unit name, symbol name)` pairs, in unit order.
    pub fn unresolved(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        for (unit_index, unit) in self.units.iter().enumerate() {
            for &entry_index in &unit.info.undefined_syms {
                if matches!(
                    self.resolutions.get(&(unit_index, entry_index)),
                    Some(Resolver::Unresolved)
                ) {
                    // `entry_index` was collected from this same unit's
                    // symbol table, so the lookup always succeeds; skip
                    // defensively rather than panicking if that invariant
                    // is ever violated.
                    if let Some(entry) = unit.symtab.get(entry_index) {
                        out.push((unit.name.as_str(), entry.name.as_str()));
                    }
                }
            }
        }
        out
    }
}

/// Decode one ELF blob into everything the resolver needs, without
/// resolving yet.
fn decode_elf_unit(name: String, blob: Vec<u8>) -> Result<DecodedUnit, Error> {
    log::debug!("decoding {name} as ELF");
    let file = ElfFile::decode(blob, Some(name.clone()))?;
    let symtab = SymbolTable::decode(&file.data, file.header.class, file.header.data, &file.section_headers, Some(&name))?;
    let info = get_link_info(&symtab, Some(&name))?;
    Ok(DecodedUnit {
        name,
        file,
        symtab,
        info,
    })
}

/// Expand one top-level input into zero or more ELF units: the input
/// itself if it sniffs as ELF, or every ELF member of it if it sniffs as
/// an archive. Non-ELF archive members are skipped, matching the
/// orchestrator's sniff-then-decode contract.
fn expand_input(name: &str, blob: &[u8]) -> Result<Vec<(String, Vec<u8>)>, Error> {
    match sniff(blob, Some(name))? {
        FileType::Elf => Ok(vec![(name.to_string(), blob.to_vec())]),
        FileType::Ar => {
            let ar = ArFile::decode(blob, Some(name))?;
            let mut out = Vec::new();
            for (member_name, member) in ar.members() {
                if sniff(member.body, Some(member_name)).is_ok_and(|t| t == FileType::Elf) {
                    out.push((format!("{name}({member_name})"), member.body.to_vec()));
                } else {
                    log::debug!("skipping non-ELF archive member {member_name} in {name}");
                }
            }
            Ok(out)
        }
        FileType::ThinAr => Err(Error::UnsupportedThinArchive {
            context: crate::error::ErrorContext::file(name),
        }),
    }
}

/// Run a whole link: expand archives, decode every resulting ELF unit in
/// parallel, then resolve cross-unit symbols sequentially.
///
/// `inputs` must already be in the orchestrator's intended stable order
/// (command-line order, with libraries appended) — that order is what the
/// resolver's tie-break depends on.
pub fn link(inputs: Vec<(String, Vec<u8>)>) -> Result<LinkResult, Error> {
    let mut flat = Vec::new();
    for (name, blob) in &inputs {
        flat.extend(expand_input(name, blob)?);
    }

    log::info!("decoding {} unit(s)", flat.len());

    let decoded: Result<Vec<DecodedUnit>, Error> = flat
        .into_par_iter()
        .map(|(name, blob)| decode_elf_unit(name, blob))
        .collect();
    let units = decoded?;

    let link_units: Vec<LinkUnit<'_>> = units
        .iter()
        .map(|u| LinkUnit {
            file: &u.file,
            symtab: &u.symtab,
            info: &u.info,
        })
        .collect();
    let resolutions = resolve_symbols(&link_units);

    Ok(LinkResult { units, resolutions })
}
