//! Typed errors for the narrow set of hard failures the library can raise.
//!
//! Everything else — per-symbol parse failures, subtype-oracle failures —
//! is a *soft* error per spec §7: it is collected as a `String` into a
//! snapshot's `parse_errors` or the differ's error sequence and never
//! surfaces as an `Err`. `CoreError` exists only for the handful of
//! operations (library-file resolution) that can genuinely fail outright.

use std::path::PathBuf;

use thiserror::Error;

/// Hard failure surfaced by the library.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A [`crate::parser::resolver::LibraryFileResolver`] failed to read a
    /// library file it had promised to supply.
    #[error("failed to read library file {path}: {source}")]
    LibraryFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O failure (used by the CLI layer when loading source files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
