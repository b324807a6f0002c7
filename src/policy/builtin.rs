//! The three built-in policies.
//!
//! [`DefaultPolicy`] is the ordinary semver contract: additions are minor,
//! removals and incompatible shape changes are major, forbidden categories
//! (there are none by default — every category here maps to a real
//! release type) stay reserved for a host's own stricter [`Policy`].
//! [`ReadOnlyPolicy`] and [`WriteOnlyPolicy`] adjust categories whose
//! severity depends on which direction data flows through the symbol.

use crate::types::{ChangeCategory, ChangeDetails, ReleaseType};

use super::{Policy, PolicyContext};
use crate::types::AnalyzedChange;

/// The ordinary semver policy: matches every variant of [`ChangeCategory`]
/// exhaustively so a future category addition is a compile error here, not
/// a silent `None` classification.
pub struct DefaultPolicy;

impl Policy for DefaultPolicy {
    fn classify(&self, change: &AnalyzedChange, _ctx: &PolicyContext<'_>) -> ReleaseType {
        match change.category {
            ChangeCategory::SymbolAdded => ReleaseType::Minor,
            ChangeCategory::SymbolRemoved => ReleaseType::Major,
            ChangeCategory::SignatureIdentical => ReleaseType::None,
            ChangeCategory::FieldRenamed => ReleaseType::Major,

            ChangeCategory::TypeWidened => ReleaseType::Minor,
            ChangeCategory::TypeNarrowed => ReleaseType::Major,
            ChangeCategory::ReturnTypeChanged => ReleaseType::Major,

            ChangeCategory::ParamAddedRequired => ReleaseType::Major,
            ChangeCategory::ParamAddedOptional => ReleaseType::Minor,
            ChangeCategory::ParamRemoved => ReleaseType::Major,
            ChangeCategory::ParamOrderChanged => ReleaseType::Major,

            ChangeCategory::FieldDeprecated => ReleaseType::Patch,
            ChangeCategory::FieldUndeprecated => ReleaseType::Minor,
            ChangeCategory::DefaultAdded => ReleaseType::Patch,
            ChangeCategory::DefaultRemoved => ReleaseType::Minor,
            ChangeCategory::DefaultChanged => ReleaseType::Patch,

            ChangeCategory::OptionalityLoosened => ReleaseType::Major,
            ChangeCategory::OptionalityTightened => ReleaseType::Major,
        }
    }
}

/// A read-only surface: callers only ever read values out (a getter, a
/// return type, an enum, a constant). A parameter a caller must now
/// *supply* to keep calling such a function is comparatively harmless —
/// there is no stored call site to break, only a read — so an added
/// required parameter and a tightened parameter optionality both drop to
/// `minor`. Every other category matches `DefaultPolicy`'s judgment.
pub struct ReadOnlyPolicy;

impl Policy for ReadOnlyPolicy {
    fn classify(&self, change: &AnalyzedChange, ctx: &PolicyContext<'_>) -> ReleaseType {
        match change.category {
            ChangeCategory::ParamAddedRequired => ReleaseType::Minor,
            ChangeCategory::OptionalityTightened => ReleaseType::Minor,
            _ => DefaultPolicy.classify(change, ctx),
        }
    }
}

/// A write-only surface: callers only ever construct or mutate values (a
/// builder, a config object consumers assemble and hand off). Shrinking
/// what a caller can supply — narrowing a parameter type, removing a
/// parameter, losing a default, loosening what used to be guaranteed
/// present — is the dangerous direction here; widening what a caller may
/// supply is comparatively harmless even when `DefaultPolicy` treats the
/// data-read equivalent as breaking.
pub struct WriteOnlyPolicy;

impl Policy for WriteOnlyPolicy {
    fn classify(&self, change: &AnalyzedChange, ctx: &PolicyContext<'_>) -> ReleaseType {
        match change.category {
            ChangeCategory::TypeNarrowed => ReleaseType::Minor,
            ChangeCategory::TypeWidened => ReleaseType::Major,
            ChangeCategory::ParamRemoved => ReleaseType::Minor,
            ChangeCategory::DefaultRemoved => ReleaseType::Major,
            ChangeCategory::OptionalityLoosened => ReleaseType::Minor,
            _ => DefaultPolicy.classify(change, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::test_change;

    #[test]
    fn default_policy_covers_every_category_exhaustively() {
        let ctx = PolicyContext::default();
        assert_eq!(
            DefaultPolicy.classify(&test_change(ChangeCategory::SymbolAdded), &ctx),
            ReleaseType::Minor
        );
        assert_eq!(
            DefaultPolicy.classify(&test_change(ChangeCategory::SymbolRemoved), &ctx),
            ReleaseType::Major
        );
        assert_eq!(
            DefaultPolicy.classify(&test_change(ChangeCategory::SignatureIdentical), &ctx),
            ReleaseType::None
        );
    }

    #[test]
    fn return_type_changed_is_always_major_regardless_of_direction() {
        let ctx = PolicyContext::default();
        let mut widened = test_change(ChangeCategory::ReturnTypeChanged);
        widened.details = Some(ChangeDetails::TypeDirection { widened: true });
        assert_eq!(DefaultPolicy.classify(&widened, &ctx), ReleaseType::Major);

        let mut narrowed = test_change(ChangeCategory::ReturnTypeChanged);
        narrowed.details = Some(ChangeDetails::TypeDirection { widened: false });
        assert_eq!(DefaultPolicy.classify(&narrowed, &ctx), ReleaseType::Major);
    }

    #[test]
    fn read_only_policy_treats_added_required_param_and_tightened_optionality_as_minor() {
        let ctx = PolicyContext::default();
        let added = test_change(ChangeCategory::ParamAddedRequired);
        assert_eq!(ReadOnlyPolicy.classify(&added, &ctx), ReleaseType::Minor);
        assert_eq!(DefaultPolicy.classify(&added, &ctx), ReleaseType::Major);

        let tightened = test_change(ChangeCategory::OptionalityTightened);
        assert_eq!(ReadOnlyPolicy.classify(&tightened, &ctx), ReleaseType::Minor);
        assert_eq!(DefaultPolicy.classify(&tightened, &ctx), ReleaseType::Major);
    }

    #[test]
    fn write_only_policy_flips_widening_narrowing_and_downgrades_param_removal() {
        let ctx = PolicyContext::default();
        let widened = test_change(ChangeCategory::TypeWidened);
        assert_eq!(WriteOnlyPolicy.classify(&widened, &ctx), ReleaseType::Major);
        assert_eq!(DefaultPolicy.classify(&widened, &ctx), ReleaseType::Minor);

        let narrowed = test_change(ChangeCategory::TypeNarrowed);
        assert_eq!(WriteOnlyPolicy.classify(&narrowed, &ctx), ReleaseType::Minor);
        assert_eq!(DefaultPolicy.classify(&narrowed, &ctx), ReleaseType::Major);

        let removed = test_change(ChangeCategory::ParamRemoved);
        assert_eq!(WriteOnlyPolicy.classify(&removed, &ctx), ReleaseType::Minor);
        assert_eq!(DefaultPolicy.classify(&removed, &ctx), ReleaseType::Major);
    }
}
