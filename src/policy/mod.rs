//! Pluggable release-impact policy: the mapping from a structural
//! [`AnalyzedChange`] to a [`ReleaseType`].
//!
//! Kept as a trait object (`&dyn Policy`) rather than a single hardcoded
//! function because not every consumer has the same semver contract — a
//! read-only accessor library and a write-heavy configuration builder
//! disagree on how severe an added required parameter is. [`builtin`]
//! ships the three policies this crate knows about; a host can implement
//! [`Policy`] itself for anything stricter or looser.

pub mod builtin;

use crate::types::{AnalyzedChange, ReleaseType, SymbolMetadata};

/// Extra context a [`Policy`] can use beyond the single change it was
/// handed (spec §4.4): the full changeset the current change was drawn
/// from, this change's position in it, and the named symbol's metadata on
/// both sides. A policy that only needs the change itself — every
/// built-in does — ignores all four fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolicyContext<'a> {
    pub changes: &'a [AnalyzedChange],
    pub index: usize,
    pub old_metadata: Option<&'a SymbolMetadata>,
    pub new_metadata: Option<&'a SymbolMetadata>,
}

impl<'a> PolicyContext<'a> {
    /// The change this context was built for (`changes[index]`).
    pub fn current(&self) -> Option<&'a AnalyzedChange> {
        self.changes.get(self.index)
    }
}

/// Maps one structural change to a release-impact classification.
pub trait Policy {
    fn classify(&self, change: &AnalyzedChange, ctx: &PolicyContext<'_>) -> ReleaseType;
}

#[cfg(test)]
pub(crate) fn test_change(category: crate::types::ChangeCategory) -> AnalyzedChange {
    AnalyzedChange {
        symbol_name: "f".to_string(),
        symbol_kind: crate::types::SymbolKind::Function,
        category,
        explanation: String::new(),
        before: None,
        after: None,
        details: None,
    }
}
