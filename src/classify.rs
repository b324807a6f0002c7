//! Applying a [`Policy`] to a sequence of [`AnalyzedChange`]s and folding
//! the result into a [`Report`] (spec §4.4).
//!
//! This mirrors the teacher's `ImpactAnalysis` fold in `diff.rs`: walk a
//! flat changeset once, bucket by severity, and compute summary counters
//! alongside the bucketing rather than in a second pass.

use std::collections::BTreeMap;

use crate::policy::{Policy, PolicyContext};
use crate::types::{Change, ChangeCategory, ChangesByImpact, ExportedSymbol, ReleaseType, Report, Stats};

/// Apply `policy` to every change in `changes`, grouping the results into
/// a [`Report`] against the given file names and snapshot sizes.
///
/// `old_symbols`/`new_symbols` are the owning snapshots' symbol tables,
/// consulted only to build each change's [`PolicyContext::old_metadata`] /
/// `new_metadata` — a policy that keys off a symbol's deprecation or
/// default-value metadata (not just its `ChangeCategory`) needs that, per
/// spec §4.4.
///
/// `warnings` carries forward the soft parse/oracle errors collected by
/// the parser and differ (spec §7) so they ride alongside the report
/// rather than being silently dropped.
#[allow(clippy::too_many_arguments)]
pub fn classify(
    changes: Vec<crate::types::AnalyzedChange>,
    policy: &dyn Policy,
    old_symbols: &BTreeMap<String, ExportedSymbol>,
    new_symbols: &BTreeMap<String, ExportedSymbol>,
    total_old: usize,
    total_new: usize,
    old_file: impl Into<String>,
    new_file: impl Into<String>,
    warnings: Vec<String>,
) -> Report {
    let mut stats = Stats {
        total_old,
        total_new,
        ..Stats::default()
    };

    // Computed as a first pass, over an immutable borrow of `changes`, so
    // `PolicyContext::changes` can see the *entire* changeset (spec §4.4)
    // even for a change near the front — the second pass then moves each
    // `AnalyzedChange` into its bucketed `Change` without a borrow conflict.
    let release_types: Vec<ReleaseType> = (0..changes.len())
        .map(|index| {
            let change = &changes[index];
            let ctx = PolicyContext {
                changes: &changes,
                index,
                old_metadata: old_symbols.get(&change.symbol_name).and_then(|s| s.metadata.as_ref()),
                new_metadata: new_symbols.get(&change.symbol_name).and_then(|s| s.metadata.as_ref()),
            };
            policy.classify(change, &ctx)
        })
        .collect();

    let mut by_impact = ChangesByImpact::default();

    for (change, release_type) in changes.into_iter().zip(release_types.iter().copied()) {
        match change.category {
            ChangeCategory::SymbolAdded => stats.added += 1,
            ChangeCategory::SymbolRemoved => stats.removed += 1,
            ChangeCategory::SignatureIdentical => stats.unchanged += 1,
            _ => stats.modified += 1,
        }

        let bucketed = Change { change, release_type };
        match bucketed.release_type.bucket() {
            crate::types::ImpactBucket::Forbidden => by_impact.forbidden.push(bucketed),
            crate::types::ImpactBucket::Breaking => by_impact.breaking.push(bucketed),
            crate::types::ImpactBucket::NonBreaking => by_impact.non_breaking.push(bucketed),
            crate::types::ImpactBucket::Unchanged => by_impact.unchanged.push(bucketed),
        }
    }

    Report {
        release_type: ReleaseType::fold(release_types),
        changes_by_impact: by_impact,
        stats,
        old_file: old_file.into(),
        new_file: new_file.into(),
        warnings,
    }
}
