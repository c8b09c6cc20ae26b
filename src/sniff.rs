//! Component G: classify a blob by magic bytes before choosing a decoder.

use crate::error::{Error, ErrorContext};

const ELF_MAGIC: &[u8; 4] = b"\x7fELF";
const AR_MAGIC: &[u8; 8] = b"!<arch>\n";
const THIN_AR_MAGIC: &[u8; 8] = b"!<thin>\n";

/// What kind of object a blob's leading bytes identify it as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// An ELF object (`\x7fELF`).
    Elf,
    /// A plain Unix archive (`!<arch>\n`).
    Ar,
    /// A thin archive (`!<thin>\n`). Recognized so callers can reject it
    /// with a clear error rather than failing to match `Ar`'s magic.
    ThinAr,
}

/// Identify `blob` by its leading bytes. Returns
/// [`Error::UnknownFileType`] if none of the recognized magics match.
pub fn sniff(blob: &[u8], file: Option<&str>) -> Result<FileType, Error> {
    if blob.len() >= 4 && &blob[0..4] == ELF_MAGIC.as_slice() {
        return Ok(FileType::Elf);
    }
    if blob.len() >= 8 && &blob[0..8] == THIN_AR_MAGIC.as_slice() {
        return Ok(FileType::ThinAr);
    }
    if blob.len() >= 8 && &blob[0..8] == AR_MAGIC.as_slice() {
        return Ok(FileType::Ar);
    }
    Err(Error::UnknownFileType {
        context: ErrorContext {
            file: file.map(String::from),
            offset: Some(0),
        },
    })
}
