//! Core data model for API-surface comparison.
//!
//! This module defines the fundamental data structures shared by every
//! component of the pipeline:
//! - [`SymbolKind`] / [`ReleaseType`] / [`ChangeCategory`] — closed
//!   enumerations matched exhaustively throughout the crate.
//! - [`ExportedSymbol`] / [`ModuleSnapshot`] — the parser's output.
//! - [`AnalyzedChange`] / [`Change`] / [`Report`] — the differ's and
//!   classifier's output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Closed enumeration of exportable declaration kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    Function,
    Class,
    Interface,
    TypeAlias,
    Enum,
    Namespace,
    Variable,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::TypeAlias => "type-alias",
            SymbolKind::Enum => "enum",
            SymbolKind::Namespace => "namespace",
            SymbolKind::Variable => "variable",
        };
        f.write_str(s)
    }
}

/// Release-impact classification, ordered most-severe first by declaration
/// order reversed: `Forbidden > Major > Minor > Patch > None`.
///
/// The derived [`Ord`] implementation makes `Iterator::max` over a sequence
/// of `ReleaseType` directly compute the §4.4 aggregation fold.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseType {
    None,
    Patch,
    Minor,
    Major,
    Forbidden,
}

impl std::fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReleaseType::None => "none",
            ReleaseType::Patch => "patch",
            ReleaseType::Minor => "minor",
            ReleaseType::Major => "major",
            ReleaseType::Forbidden => "forbidden",
        };
        f.write_str(s)
    }
}

impl ReleaseType {
    /// Fold a sequence of per-change release types into the overall report
    /// release type. Empty input yields `None` per spec §4.4.
    pub fn fold(types: impl IntoIterator<Item = ReleaseType>) -> ReleaseType {
        types.into_iter().max().unwrap_or(ReleaseType::None)
    }

    /// Which `changes-by-impact` bucket this release type groups into.
    pub fn bucket(self) -> ImpactBucket {
        match self {
            ReleaseType::Forbidden => ImpactBucket::Forbidden,
            ReleaseType::Major => ImpactBucket::Breaking,
            ReleaseType::Minor => ImpactBucket::NonBreaking,
            ReleaseType::Patch | ReleaseType::None => ImpactBucket::Unchanged,
        }
    }
}

/// Which bucket of [`Report::changes_by_impact`] a [`Change`] belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImpactBucket {
    Forbidden,
    Breaking,
    NonBreaking,
    Unchanged,
}

/// 1-based line, 0-based column source position, diagnostic only.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
    pub end_line: Option<u32>,
    pub end_column: Option<u32>,
}

/// Whether enum consumers are expected to handle additional members added in
/// a future release (`open`) or not (`closed`). Authoritative for
/// enum-member-addition semantics (spec §3).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnumOpenness {
    Open,
    Closed,
}

/// Metadata extracted from a symbol's leading documentation comment.
/// All fields are optional — absence of a tag leaves the field unset.
#[derive(Clone, Default, PartialEq, Debug, Serialize, Deserialize)]
pub struct SymbolMetadata {
    pub is_deprecated: bool,
    pub deprecation_message: Option<String>,
    pub default_value: Option<String>,
    pub enum_type: Option<EnumOpenness>,
}

impl SymbolMetadata {
    /// True if every field is at its default (absent) value.
    pub fn is_empty(&self) -> bool {
        !self.is_deprecated
            && self.deprecation_message.is_none()
            && self.default_value.is_none()
            && self.enum_type.is_none()
    }
}

/// The comparison unit: one exported name, its kind, its normalized
/// signature, and whatever metadata/location we could attach to it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportedSymbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Normalized, comparison-stable signature string (see §4.1).
    pub signature: String,
    pub metadata: Option<SymbolMetadata>,
    pub source_location: Option<SourceLocation>,
    /// Structural shape of this symbol in the owning snapshot's
    /// [`crate::parser::type_model::TypeArena`], when one could be
    /// resolved. The fast path (signature equality) never needs this; the
    /// differ's structural fallback (widening/narrowing, param arity and
    /// order) does, via
    /// [`crate::parser::type_model::TypeArena::import`].
    #[serde(skip)]
    pub(crate) shape: Option<SymbolShape>,
}

/// A named, typed function parameter, kept alongside the flat
/// [`ExportedSymbol::signature`] string so the differ can reason about
/// arity, optionality, and order without re-parsing a rendered string.
#[derive(Clone, Debug)]
pub struct FunctionParam {
    pub name: String,
    /// The identifier as written at the declaration site (`x`, `callback`,
    /// ...), kept separately from `name` because `name` is the positionally
    /// erased `arg{i}` form used when rendering a comparison-stable
    /// signature string. Reorder detection (§4.3) needs the real
    /// identifier; falls back to the erased form for destructured or rest
    /// patterns that have no single identifier.
    pub source_name: String,
    pub ty: crate::parser::type_model::TypeHandle,
    pub optional: bool,
}

/// The structural shape of a function-like symbol (a plain function, or a
/// single overload of one).
#[derive(Clone, Debug)]
pub struct FunctionShape {
    pub params: Vec<FunctionParam>,
    pub return_type: crate::parser::type_model::TypeHandle,
}

/// The structural shape backing a symbol's [`ExportedSymbol::signature`].
/// Function-like symbols (including each overload) get a [`FunctionShape`]
/// so the differ can compare parameters one at a time; everything else
/// (interfaces, type aliases, enums, classes, namespaces, variables) is a
/// single resolved [`crate::parser::type_model::TypeHandle`].
#[derive(Clone, Debug)]
pub enum SymbolShape {
    Function(Vec<FunctionShape>),
    Value(crate::parser::type_model::TypeHandle),
}

impl ExportedSymbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, signature: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            signature: signature.into(),
            metadata: None,
            source_location: None,
            shape: None,
        }
    }

    pub fn with_shape(mut self, shape: SymbolShape) -> Self {
        self.shape = Some(shape);
        self
    }
}

/// The parser's output for one side of a comparison.
///
/// `symbols` is a `BTreeMap` rather than a `HashMap`: iteration order is
/// then simply string order, which is sufficient for every "visit all
/// names deterministically" requirement in the spec without an explicit
/// sort at each call site.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModuleSnapshot {
    pub symbols: BTreeMap<String, ExportedSymbol>,
    /// Soft parser failures; never aborts parsing (spec §4.1, §7).
    pub parse_errors: Vec<String>,
    /// Opaque type arena backing this snapshot's `TypeHandle`s. Not
    /// serialized — it exists only for the lifetime of one `compare` call.
    #[serde(skip)]
    pub(crate) types: crate::parser::type_model::TypeArena,
}

impl ModuleSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Closed enumeration of the eighteen change categories, grouped by cause
/// in the spec. Every policy must match every variant exhaustively —
/// omission is a compile error by construction, not convention.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeCategory {
    // existence
    SymbolAdded,
    SymbolRemoved,
    SignatureIdentical,
    FieldRenamed,
    // type shape
    TypeWidened,
    TypeNarrowed,
    ReturnTypeChanged,
    // parameters
    ParamAddedRequired,
    ParamAddedOptional,
    ParamRemoved,
    ParamOrderChanged,
    // metadata
    FieldDeprecated,
    FieldUndeprecated,
    DefaultAdded,
    DefaultRemoved,
    DefaultChanged,
    // optionality
    OptionalityLoosened,
    OptionalityTightened,
}

/// Structured auxiliary data attached to an [`AnalyzedChange`], e.g. the
/// detected permutation for a `param-order-changed` classification.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeDetails {
    /// `old_position -> new_position` for each reordered parameter, by
    /// normalized parameter index (`argN`).
    ParamPermutation { moved: Vec<(usize, usize)> },
    /// Which direction a `return-type-changed` classification went. The
    /// category alone doesn't distinguish a covariant widening (source
    /// compatible) from a narrowing (a potential break) — this does.
    TypeDirection { widened: bool },
}

/// One categorized difference between an old and new symbol (or a pure
/// addition/removal).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalyzedChange {
    pub symbol_name: String,
    pub symbol_kind: SymbolKind,
    pub category: ChangeCategory,
    pub explanation: String,
    pub before: Option<String>,
    pub after: Option<String>,
    pub details: Option<ChangeDetails>,
}

/// An [`AnalyzedChange`] plus the release type a policy assigned to it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Change {
    #[serde(flatten)]
    pub change: AnalyzedChange,
    pub release_type: ReleaseType,
}

/// Changes grouped by impact bucket, per the §3 grouping rule.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChangesByImpact {
    pub forbidden: Vec<Change>,
    pub breaking: Vec<Change>,
    pub non_breaking: Vec<Change>,
    pub unchanged: Vec<Change>,
}

impl ChangesByImpact {
    /// Total number of changes across all four buckets.
    pub fn total(&self) -> usize {
        self.forbidden.len() + self.breaking.len() + self.non_breaking.len() + self.unchanged.len()
    }
}

/// Summary statistics over one comparison.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total_old: usize,
    pub total_new: usize,
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
}

/// The final output of a `compare` call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
    pub release_type: ReleaseType,
    pub changes_by_impact: ChangesByImpact,
    pub stats: Stats,
    pub old_file: String,
    pub new_file: String,
    /// Soft parse/oracle errors surfaced alongside the report (spec §7).
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_type_orders_most_severe_first() {
        assert!(ReleaseType::Forbidden > ReleaseType::Major);
        assert!(ReleaseType::Major > ReleaseType::Minor);
        assert!(ReleaseType::Minor > ReleaseType::Patch);
        assert!(ReleaseType::Patch > ReleaseType::None);
    }

    #[test]
    fn fold_of_empty_is_none() {
        assert_eq!(ReleaseType::fold(std::iter::empty()), ReleaseType::None);
    }

    #[test]
    fn fold_is_the_maximum() {
        let types = vec![ReleaseType::Patch, ReleaseType::Major, ReleaseType::Minor];
        assert_eq!(ReleaseType::fold(types), ReleaseType::Major);
    }

    #[test]
    fn bucket_grouping_rule() {
        assert_eq!(ReleaseType::Forbidden.bucket(), ImpactBucket::Forbidden);
        assert_eq!(ReleaseType::Major.bucket(), ImpactBucket::Breaking);
        assert_eq!(ReleaseType::Minor.bucket(), ImpactBucket::NonBreaking);
        assert_eq!(ReleaseType::Patch.bucket(), ImpactBucket::Unchanged);
        assert_eq!(ReleaseType::None.bucket(), ImpactBucket::Unchanged);
    }

    #[test]
    fn metadata_is_empty_by_default() {
        assert!(SymbolMetadata::default().is_empty());
    }
}
