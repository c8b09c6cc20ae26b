//! The error taxonomy shared by every decoder in this crate.
//!
//! Every fatal condition raised by the byte cursor, the ELF/AR decoders, the
//! link-info extractor, or the orchestrator is one variant of [`Error`]. The
//! cross-unit resolver is the one component that does *not* raise through
//! this type for its "expected failure" (an undefined symbol that stays
//! unresolved); see [`crate::link::resolve_symbols`].

use std::fmt;

/// Where a fatal error occurred, when that information is available.
///
/// Carries the offending file's logical name and, for byte-level decode
/// errors, the offset into that file's blob where the failure was detected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ErrorContext {
    /// Logical name of the file being decoded, if known at the call site.
    pub file: Option<String>,
    /// Byte offset into the file's blob where the failure was detected.
    pub offset: Option<u64>,
}

impl ErrorContext {
    /// An empty context, for call sites that have no file or offset handy.
    pub fn none() -> Self {
        Self::default()
    }

    /// A context naming only the file.
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            file: Some(name.into()),
            offset: None,
        }
    }

    /// A context naming the file and the offset the failure was detected at.
    pub fn at(name: impl Into<String>, offset: u64) -> Self {
        Self {
            file: Some(name.into()),
            offset: Some(offset),
        }
    }

    /// Attach a file name to a context that so far only has an offset (or
    /// nothing), without disturbing an offset that is already set.
    pub fn with_file(mut self, name: impl Into<String>) -> Self {
        if self.file.is_none() {
            self.file = Some(name.into());
        }
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.offset) {
            (Some(file), Some(offset)) => write!(f, "{file}@0x{offset:x}"),
            (Some(file), None) => write!(f, "{file}"),
            (None, Some(offset)) => write!(f, "<unknown file>@0x{offset:x}"),
            (None, None) => write!(f, "<unknown location>"),
        }
    }
}

/// The taxonomy of fatal errors this crate can raise.
///
/// All variants are fatal to the current link: the orchestrator aborts the
/// process with the kind and its context printed to standard error. The one
/// exception — an unresolved undefined symbol — is not represented here at
/// all; it is a null [`crate::link::Resolver`], not an `Error`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Error {
    /// The byte cursor ran past the end of its backing slice.
    #[error("truncated input at {context}: needed {needed} more byte(s)")]
    TruncatedInput {
        /// Where the read was attempted.
        context: ErrorContext,
        /// How many bytes were requested but unavailable.
        needed: usize,
    },

    /// A string-table lookup found no terminating NUL before the end of the
    /// table.
    #[error("unterminated string in string table at {context}")]
    UnterminatedString {
        /// Where the lookup started.
        context: ErrorContext,
    },

    /// `EI_DATA` was neither `ELFDATA2LSB` (1) nor `ELFDATA2MSB` (2).
    #[error("bad ELF endianness byte {value} at {context}")]
    BadEndian {
        /// The offending byte.
        value: u8,
        /// Where the byte was read from.
        context: ErrorContext,
    },

    /// `EI_CLASS` was neither `ELFCLASS32` (1) nor `ELFCLASS64` (2).
    #[error("bad ELF class byte {value} at {context}")]
    BadClass {
        /// The offending byte.
        value: u8,
        /// Where the byte was read from.
        context: ErrorContext,
    },

    /// No `.symtab` section of type `SHT_SYMTAB` was found in a unit whose
    /// symbols were required.
    #[error("no .symtab section in {context}")]
    NoSymbolTable {
        /// The ELF unit that lacked a symbol table.
        context: ErrorContext,
    },

    /// `read_rel32`/`read_rela64` were invoked on a section of the wrong
    /// `sh_type`.
    #[error("section at {context} is not the expected relocation kind")]
    WrongRelocationKind {
        /// The section that was misclassified.
        context: ErrorContext,
    },

    /// The blob is a thin archive (`!<thin>\n`); thin archives are
    /// recognized but never dereferenced.
    #[error("thin archives are not supported: {context}")]
    UnsupportedThinArchive {
        /// The archive that could not be decoded.
        context: ErrorContext,
    },

    /// An AR header had a non-numeric size, a long-name offset out of
    /// range, or a long-name reference before the `//` member was seen.
    #[error("malformed AR header at {context}: {reason}")]
    MalformedArHeader {
        /// Human-readable description of what was wrong with the header.
        reason: String,
        /// Where in the archive the malformed header began.
        context: ErrorContext,
    },

    /// A single unit exported the same global symbol name twice.
    #[error("duplicate global symbol {name:?} in {context}")]
    DuplicateGlobal {
        /// The symbol name that collided.
        name: String,
        /// The unit that redefined it.
        context: ErrorContext,
    },

    /// The sniffer saw no recognized magic in the first 8 bytes of a blob.
    #[error("unrecognized file type at {context}")]
    UnknownFileType {
        /// The blob that could not be classified.
        context: ErrorContext,
    },

    /// A requested input path does not exist, either literally or under any
    /// configured `-L` search path.
    #[error("cannot find input {path:?} in any search path")]
    MissingInput {
        /// The path (or library name) that could not be resolved.
        path: String,
    },

    /// An underlying I/O operation failed while reading a file from disk.
    #[error("I/O error reading {context}: {kind}")]
    Io {
        /// The kind of I/O failure.
        kind: std::io::ErrorKind,
        /// The file being read, if known.
        context: ErrorContext,
    },
}

/// Convenience alias used throughout the decoders.
pub type Result<T> = std::result::Result<T, Error>;
