//! Component F: the AR archive decoder.
//!
//! Traditional Unix `ar` archives: an 8-byte magic, then a sequence of
//! 60-byte ASCII headers each immediately followed by the member's body,
//! padded to an even file offset. The GNU long-filename extension (the
//! `//` member) and the embedded symbol-table member (the `/` member) are
//! both recognized and consumed without being exposed as ordinary members.

use crate::error::{Error, ErrorContext};

const HEADER_LEN: usize = 60;
const AR_MAGIC: &[u8; 8] = b"!<arch>\n";
const THIN_AR_MAGIC: &[u8; 8] = b"!<thin>\n";

/// The 60-byte ASCII header preceding every AR member body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArFileHeader {
    /// The member's filename, after long-name resolution.
    pub filename: String,
    /// Raw ASCII timestamp field, whitespace-trimmed.
    pub timestamp: String,
    /// Raw ASCII owner-id field, whitespace-trimmed.
    pub owner_id: String,
    /// Raw ASCII group-id field, whitespace-trimmed.
    pub group_id: String,
    /// Raw ASCII file-mode field, whitespace-trimmed.
    pub file_mode: String,
    /// Decoded decimal file size.
    pub file_size: u64,
}

/// One non-special archive member: its header and its body, borrowed from
/// the archive's backing blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArMember<'a> {
    /// The member's header.
    pub header: ArFileHeader,
    /// The member's body, a slice of the archive's blob.
    pub body: &'a [u8],
}

/// A decoded AR archive: every ordinary member, in the order they appeared
/// in the archive. The `/` (symbol index) and `//` (long-filename table)
/// members are consumed during decoding and never appear here.
///
/// Members are kept in a `Vec` rather than a map so that orchestration can
/// expand an archive's members into the link's unit order deterministically;
/// lookups by name are a linear scan, which is fine for the archive sizes
/// this format targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArFile<'a> {
    members: Vec<(String, ArMember<'a>)>,
}

impl<'a> ArFile<'a> {
    /// Decode a plain (non-thin) AR archive from `blob`.
    pub fn decode(blob: &'a [u8], file: Option<&str>) -> Result<Self, Error> {
        if blob.len() >= 8 && &blob[0..8] == THIN_AR_MAGIC.as_slice() {
            return Err(Error::UnsupportedThinArchive {
                context: ctx(file, 0),
            });
        }
        if blob.len() < 8 || &blob[0..8] != AR_MAGIC.as_slice() {
            return Err(Error::MalformedArHeader {
                reason: "missing !<arch>\\n magic".into(),
                context: ctx(file, 0),
            });
        }

        let mut members = Vec::new();
        let mut long_names: Option<&'a [u8]> = None;
        let mut offset = 8usize;

        while offset < blob.len() {
            let header_bytes = blob.get(offset..offset + HEADER_LEN).ok_or_else(|| {
                Error::MalformedArHeader {
                    reason: "truncated member header".into(),
                    context: ctx(file, offset as u64),
                }
            })?;

            let raw_name = trimmed(&header_bytes[0..16]);
            let timestamp = trimmed(&header_bytes[16..28]);
            let owner_id = trimmed(&header_bytes[28..34]);
            let group_id = trimmed(&header_bytes[34..40]);
            let file_mode = trimmed(&header_bytes[40..48]);
            let size_field = trimmed(&header_bytes[48..58]);
            let file_size: u64 = size_field.trim().parse().map_err(|_| Error::MalformedArHeader {
                reason: format!("non-numeric size field {size_field:?}"),
                context: ctx(file, offset as u64),
            })?;

            let body_start = offset + HEADER_LEN;
            let body_end = body_start + file_size as usize;
            let body = blob.get(body_start..body_end).ok_or_else(|| {
                Error::MalformedArHeader {
                    reason: "member body runs past end of archive".into(),
                    context: ctx(file, offset as u64),
                }
            })?;

            let resolved_name = resolve_name(&raw_name, long_names, file, offset as u64)?;

            match resolved_name.as_str() {
                "/" => {
                    // GNU symbol index, consumed but not exposed.
                }
                "//" => {
                    long_names = Some(body);
                }
                _ => {
                    members.push((
                        resolved_name.clone(),
                        ArMember {
                            header: ArFileHeader {
                                filename: resolved_name,
                                timestamp,
                                owner_id,
                                group_id,
                                file_mode,
                                file_size,
                            },
                            body,
                        },
                    ));
                }
            }

            offset = body_end;
            if offset % 2 != 0 {
                offset += 1;
            }
        }

        Ok(Self { members })
    }

    /// Look up a member by resolved name.
    pub fn get(&self, name: &str) -> Option<&ArMember<'a>> {
        self.members.iter().find(|(n, _)| n == name).map(|(_, m)| m)
    }

    /// Iterate over every ordinary member, in archive order.
    pub fn members(&self) -> impl Iterator<Item = (&String, &ArMember<'a>)> {
        self.members.iter().map(|(n, m)| (n, m))
    }

    /// Number of ordinary members (excludes `/` and `//`).
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the archive has no ordinary members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

fn trimmed(field: &[u8]) -> String {
    String::from_utf8_lossy(field).trim_end().to_string()
}

fn resolve_name<'a>(
    raw_name: &str,
    long_names: Option<&'a [u8]>,
    file: Option<&str>,
    offset: u64,
) -> Result<String, Error> {
    if raw_name == "/" || raw_name == "//" {
        return Ok(raw_name.to_string());
    }

    if let Some(rest) = raw_name.strip_prefix('/') {
        if let Ok(index) = rest.parse::<usize>() {
            let table = long_names.ok_or_else(|| Error::MalformedArHeader {
                reason: "long-name reference before // member was seen".into(),
                context: ctx(file, offset),
            })?;
            let slice = table.get(index..).ok_or_else(|| Error::MalformedArHeader {
                reason: format!("long-name offset {index} out of range"),
                context: ctx(file, offset),
            })?;
            let end = slice
                .iter()
                .position(|&b| b == 0 || b == b'/')
                .ok_or_else(|| Error::MalformedArHeader {
                    reason: format!("long-name at offset {index} is not terminated"),
                    context: ctx(file, offset),
                })?;
            return Ok(String::from_utf8_lossy(&slice[..end]).into_owned());
        }
    }

    // Plain short name: the `/` terminator delimits the name, spaces are
    // part of it.
    let end = raw_name.find('/').unwrap_or(raw_name.len());
    Ok(raw_name[..end].to_string())
}

fn ctx(file: Option<&str>, offset: u64) -> ErrorContext {
    ErrorContext {
        file: file.map(String::from),
        offset: Some(offset),
    }
}
