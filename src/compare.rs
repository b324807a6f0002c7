//! The public entry point (spec §6): `compare(CompareOptions) -> Report`.
//!
//! Mirrors the teacher's `handle_diff_command` (`src/cli/dispatch/handlers/
//! diff.rs`) at the shape level — load two snapshots, hand them to a pure
//! comparison function, branch only on how the result is reported — but
//! generalized from file-backed snapshots on disk to two in-memory source
//! strings, since the core has no project tree to walk (spec §5).

use crate::differ;
use crate::parser;
use crate::parser::resolver::LibraryFileResolver;
use crate::policy::builtin::DefaultPolicy;
use crate::policy::Policy;
use crate::types::Report;

/// Input to [`compare`]. Only `old_source` and `new_source` are required;
/// everything else has a spec-mandated default.
pub struct CompareOptions<'a> {
    pub old_source: String,
    pub new_source: String,
    pub old_filename: String,
    pub new_filename: String,
    /// Defaults to [`DefaultPolicy`] when left `None`.
    pub policy: Option<&'a dyn Policy>,
    pub library_file_resolver: Option<&'a dyn LibraryFileResolver>,
}

impl<'a> CompareOptions<'a> {
    /// Build options from just the two required source strings; every
    /// other field takes its spec default (`"old.d.ts"` / `"new.d.ts"`,
    /// the default policy, no library-file resolver).
    pub fn new(old_source: impl Into<String>, new_source: impl Into<String>) -> Self {
        Self {
            old_source: old_source.into(),
            new_source: new_source.into(),
            old_filename: "old.d.ts".to_string(),
            new_filename: "new.d.ts".to_string(),
            policy: None,
            library_file_resolver: None,
        }
    }

    pub fn with_filenames(mut self, old_filename: impl Into<String>, new_filename: impl Into<String>) -> Self {
        self.old_filename = old_filename.into();
        self.new_filename = new_filename.into();
        self
    }

    pub fn with_policy(mut self, policy: &'a dyn Policy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_library_file_resolver(mut self, resolver: &'a dyn LibraryFileResolver) -> Self {
        self.library_file_resolver = Some(resolver);
        self
    }
}

/// Compare two `.d.ts` source strings and produce a [`Report`].
///
/// Creates two fully independent parser snapshots, diffs them, classifies
/// every change with `options.policy` (or [`DefaultPolicy`]), and drops
/// both snapshots on return (spec §5) — nothing from this call outlives
/// the returned `Report`, which holds only owned strings.
///
/// Never fails for input that tokenizes at all: parse and oracle failures
/// are soft errors collected into `Report::warnings` (spec §7).
pub fn compare(options: CompareOptions<'_>) -> Report {
    let old_snapshot = parser::parse_with_resolver(
        &options.old_source,
        &options.old_filename,
        options.library_file_resolver,
    );
    let new_snapshot = parser::parse_with_resolver(
        &options.new_source,
        &options.new_filename,
        options.library_file_resolver,
    );

    let mut warnings = old_snapshot.parse_errors.clone();
    warnings.extend(new_snapshot.parse_errors.clone());

    let changes = differ::diff(&old_snapshot, &new_snapshot);

    let policy: &dyn Policy = options.policy.unwrap_or(&DefaultPolicy);

    crate::classify::classify(
        changes,
        policy,
        &old_snapshot.symbols,
        &new_snapshot.symbols,
        old_snapshot.symbols.len(),
        new_snapshot.symbols.len(),
        options.old_filename,
        options.new_filename,
        warnings,
    )
}
