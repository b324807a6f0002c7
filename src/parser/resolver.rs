//! Library-file resolution (spec §4.1 step 1, §5).
//!
//! When a `.d.ts` file references a name from outside itself — a DOM
//! lib type, a dependency's ambient declarations — this crate has no
//! project graph to walk. A [`LibraryFileResolver`] is how a host
//! application plugs one in: given a bare specifier, it returns the `.d.ts`
//! source text to parse for that library, or `None` to leave the reference
//! unresolved (which the subtype oracle then treats as the opaque top
//! type, spec §9 Open Question 2).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// Supplies declaration source text for library references a `.d.ts` file
/// does not define itself. Implementations never need to succeed: a
/// resolver that always returns `None` is a valid, if conservative, choice.
pub trait LibraryFileResolver {
    /// Resolve `specifier` (e.g. `"node"`, `"lib.dom.d.ts"`) to declaration
    /// source text, or `None` if this resolver has nothing for it.
    fn resolve(&self, specifier: &str) -> Result<Option<String>, CoreError>;
}

/// Resolves specifiers against `.d.ts` files on disk under a fixed root
/// directory, the same "candidate path, check existence, read" shape as
/// the teacher's `TsPathResolver` for import-path resolution — adapted
/// here from project-relative JS imports to flat library-name lookups.
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn candidate_path(&self, specifier: &str) -> PathBuf {
        if specifier.ends_with(".d.ts") {
            self.root.join(specifier)
        } else {
            self.root.join(format!("{specifier}.d.ts"))
        }
    }
}

impl LibraryFileResolver for DirectoryResolver {
    fn resolve(&self, specifier: &str) -> Result<Option<String>, CoreError> {
        let path = self.candidate_path(specifier);
        if !path.exists() {
            return Ok(None);
        }
        read_library_file(&path).map(Some)
    }
}

/// Resolves specifiers against an in-binary table, for hosts that want to
/// ship a fixed set of library declarations (e.g. `lib.es5.d.ts`) without a
/// filesystem dependency.
pub struct BundledResolver {
    entries: HashMap<&'static str, &'static str>,
}

impl BundledResolver {
    pub fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            entries: entries.iter().copied().collect(),
        }
    }
}

impl LibraryFileResolver for BundledResolver {
    fn resolve(&self, specifier: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.get(specifier).map(|s| s.to_string()))
    }
}

fn read_library_file(path: &Path) -> Result<String, CoreError> {
    std::fs::read_to_string(path).map_err(|source| CoreError::LibraryFile {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn directory_resolver_reads_a_dts_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join("widgets.d.ts")).unwrap();
        writeln!(f, "export declare function widget(): void;").unwrap();

        let resolver = DirectoryResolver::new(dir.path());
        let resolved = resolver.resolve("widgets").unwrap();
        assert!(resolved.unwrap().contains("widget"));
    }

    #[test]
    fn directory_resolver_returns_none_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = DirectoryResolver::new(dir.path());
        assert!(resolver.resolve("missing").unwrap().is_none());
    }

    #[test]
    fn bundled_resolver_looks_up_by_exact_specifier() {
        static ENTRIES: &[(&str, &str)] = &[("lib.es5.d.ts", "declare var Array: unknown;")];
        let resolver = BundledResolver::new(ENTRIES);
        assert!(resolver.resolve("lib.es5.d.ts").unwrap().is_some());
        assert!(resolver.resolve("lib.es2015.d.ts").unwrap().is_none());
    }
}
