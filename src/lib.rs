//! A small static linker core for ELF objects targeting the Native Client
//! (NaCl) family of architectures (x86-32, x86-64, ARM).
//!
//! This crate is the core of a linker, not a linker: it parses ELF and AR
//! inputs at the byte level, extracts per-unit symbol tables, and resolves
//! undefined symbols across units to a `(defining unit, symbol index)` pair
//! or leaves them unresolved. Final executable layout and relocation
//! fix-up are a deliberate stub (see [`layout`]); filesystem search-path
//! resolution and file-type sniffing by magic bytes are implemented but
//! kept as thin, independently testable layers so the resolution engine
//! itself stays free of I/O.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic, missing_docs)]

pub mod ar;
pub mod config;
pub mod cursor;
pub mod elf;
pub mod error;
pub mod layout;
pub mod link;
pub mod orchestrate;
pub mod search_paths;
pub mod sniff;
pub mod strtab;

pub use error::{Error, Result};
