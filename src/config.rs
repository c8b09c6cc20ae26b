//! Explicit link configuration.
//!
//! The Go original this crate's design is based on drove the linker off of
//! package-level `flag` variables (`Outfile`, `SearchPaths`, ...). Per
//! spec.md's design note on global mutable state, this crate instead
//! threads an explicit [`LinkConfig`] from the CLI parser down into
//! [`crate::orchestrate::link`] and its caller.

use std::path::PathBuf;

/// All configuration the orchestrator needs for one link, gathered from
/// the command line (or built programmatically by an embedder).
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// `-o`/`--output`: where the linked output would be written. The
    /// layout stage is a stub, so this is currently only plumbed through
    /// for diagnostics.
    pub output: PathBuf,
    /// `-e`/`--entry`: the symbol name that names the link's entry point.
    pub entry: String,
    /// `-L`: library search paths, tried in declared order.
    pub search_paths: Vec<PathBuf>,
    /// `-l`: library names/paths, resolved via `search_paths` and
    /// appended after positional inputs.
    pub libraries: Vec<String>,
    /// Positional arguments: non-library inputs, tried literally only.
    pub inputs: Vec<String>,
    /// Whether an unresolved undefined symbol should fail the link. The
    /// cross-unit resolver itself never treats this as fatal; the caller
    /// decides.
    pub fail_on_unresolved: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("a.out"),
            entry: "_start".to_string(),
            search_paths: Vec::new(),
            libraries: Vec::new(),
            inputs: Vec::new(),
            fail_on_unresolved: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_linker() {
        let config = LinkConfig::default();
        assert_eq!(config.output, PathBuf::from("a.out"));
        assert_eq!(config.entry, "_start");
        assert!(config.search_paths.is_empty());
    }
}
