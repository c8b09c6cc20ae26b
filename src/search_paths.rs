//! Resolve `-l`/positional input names to full filesystem paths.
//!
//! Mirrors `DetermineFilepaths` from the Go original this crate's design
//! is based on: a literal path that exists is used as-is; otherwise each
//! `-L` directory is tried in declared order; if none match, the input is
//! reported as missing rather than silently dropped.

use std::path::{Path, PathBuf};

use crate::error::Error;

/// Resolve every entry of `inputs` to a filesystem path, trying each entry
/// literally first and then each of `search_paths` in order.
///
/// Returns [`Error::MissingInput`] on the first name that cannot be found
/// anywhere, naming that input.
pub fn resolve_paths(
    inputs: &[String],
    search_paths: &[PathBuf],
) -> Result<Vec<PathBuf>, Error> {
    let mut out = Vec::with_capacity(inputs.len());
    for input in inputs {
        out.push(resolve_one(input, search_paths)?);
    }
    Ok(out)
}

fn resolve_one(input: &str, search_paths: &[PathBuf]) -> Result<PathBuf, Error> {
    let literal = Path::new(input);
    if literal.exists() {
        return Ok(literal.to_path_buf());
    }

    for dir in search_paths {
        let joined = dir.join(input);
        if joined.exists() {
            return Ok(joined);
        }
    }

    Err(Error::MissingInput {
        path: input.to_string(),
    })
}
