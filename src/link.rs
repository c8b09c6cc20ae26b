//! Components H and I: per-unit link-info extraction and cross-unit
//! symbol resolution.

use std::collections::HashMap;

use crate::elf::consts::{SHN_UNDEF, STB_GLOBAL, STB_LOCAL};
use crate::elf::{ElfFile, SymbolTable};
use crate::error::{Error, ErrorContext};

/// The subset of a unit's symbol table that the resolver cares about:
/// which entries are undefined references, and which entries are global
/// definitions available to satisfy other units' references.
///
/// Entry 0 (the null symbol-table entry) is always local and undefined
/// and is excluded from both lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymLinkInfo {
    /// Indices, into this unit's symbol table, of entries that reference
    /// an undefined symbol (`shndx == SHN_UNDEF`), regardless of bind.
    pub undefined_syms: Vec<usize>,
    /// Indices of entries that define a symbol with `STB_GLOBAL` bind
    /// other units may bind to. Local and weak definitions are never
    /// exported.
    pub exported_syms: Vec<usize>,
    /// `exported_syms`, indexed by name for resolution lookups.
    pub exported_by_name: HashMap<String, usize>,
}

/// Extract [`SymLinkInfo`] from a decoded unit's symbol table.
///
/// Fails with [`Error::DuplicateGlobal`] if the same unit defines the same
/// global name twice — that is a fatal error local to this one unit, not
/// a cross-unit concern for the resolver.
pub fn get_link_info(symtab: &SymbolTable, file: Option<&str>) -> Result<SymLinkInfo, Error> {
    let mut info = SymLinkInfo::default();

    for (index, entry) in symtab.entries().iter().enumerate() {
        if index == 0 {
            continue;
        }
        if entry.is_undefined() {
            info.undefined_syms.push(index);
            continue;
        }
        if entry.bind() != STB_GLOBAL {
            // Local, or weak (weak is not distinguished from local here):
            // neither is visible to other units.
            continue;
        }
        if info.exported_by_name.contains_key(&entry.name) {
            return Err(Error::DuplicateGlobal {
                name: entry.name.clone(),
                context: ErrorContext {
                    file: file.map(String::from),
                    offset: None,
                },
            });
        }
        info.exported_by_name.insert(entry.name.clone(), index);
        info.exported_syms.push(index);
    }

    Ok(info)
}

/// Where an undefined symbol reference was resolved to, or [`Resolver::Unresolved`]
/// if no unit in the link exports it. An unresolved symbol is not an
/// [`Error`] — it is reported as a diagnostic by the orchestrator, same as
/// the original linker this design is modeled on treats it as "expected to
/// fail later" rather than a decode-time fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolver {
    /// The symbol is defined by unit `unit_index` at symbol-table entry
    /// `entry_index`.
    Resolved {
        /// Index into the link's ordered unit list.
        unit_index: usize,
        /// Index into that unit's symbol table.
        entry_index: usize,
    },
    /// No unit in the link exports this symbol.
    Unresolved,
}

/// One decoded unit together with its link info, as seen by the resolver.
pub struct LinkUnit<'a> {
    /// The unit's ELF file, for error context and symbol lookup.
    pub file: &'a ElfFile,
    /// The unit's symbol table.
    pub symtab: &'a SymbolTable,
    /// The unit's extracted link info.
    pub info: &'a SymLinkInfo,
}

/// Resolve every undefined reference across all units against every
/// unit's exports.
///
/// Units are walked in ascending index order — the order they were given
/// on the command line, libraries appended last — and the first unit
/// (by that order) exporting a given name wins, exactly as each
/// individual unit's references are walked in ascending symbol-table
/// index order. Ties are broken by unit order, never by which reference
/// happened to resolve first within a unit. A unit's own exports are never
/// considered for its own undefined references — an undefined symbol only
/// resolves against a *different* unit.
///
/// Returns one [`Resolver`] per `(unit_index, entry_index)` pair drawn
/// from every unit's `undefined_syms`, keyed the same way.
pub fn resolve_symbols(units: &[LinkUnit<'_>]) -> HashMap<(usize, usize), Resolver> {
    let mut results = HashMap::new();

    for (unit_index, unit) in units.iter().enumerate() {
        for &entry_index in &unit.info.undefined_syms {
            // `entry_index` was collected from this same unit's symbol
            // table in `get_link_info`, so the lookup always succeeds;
            // skip defensively rather than panicking if that invariant
            // is ever violated.
            let Some(entry) = unit.symtab.get(entry_index) else {
                continue;
            };
            let name = &entry.name;

            let resolution = units
                .iter()
                .enumerate()
                .filter(|(defining_unit, _)| *defining_unit != unit_index)
                .find_map(|(defining_unit, defining)| {
                    defining
                        .info
                        .exported_by_name
                        .get(name)
                        .map(|&defining_entry| Resolver::Resolved {
                            unit_index: defining_unit,
                            entry_index: defining_entry,
                        })
                })
                .unwrap_or(Resolver::Unresolved);

            results.insert((unit_index, entry_index), resolution);
        }
    }

    results
}
