//! Member-level optionality comparison for interface and object-literal
//! shapes (spec §4.3: "Interface/object property optionality changes").
//!
//! Width subtyping makes a required-to-optional flip on an existing
//! member invisible to [`super::subtype::Comparison::classify`] in one
//! direction (an object missing an optional property is still assignable
//! to the looser shape) and a real break in the other, so the pair comes
//! back `Widened`/`Narrowed` rather than the dedicated optionality
//! category the spec calls for. This module catches that one case —
//! same member set, only optionality flags differ — before the generic
//! whole-type classification runs.

use crate::parser::type_model::PropertyType;
use crate::types::ChangeCategory;

/// One member whose optionality flag changed between two same-named,
/// same-typed object members.
pub struct OptionalityDelta {
    pub member: String,
    pub category: ChangeCategory,
}

/// `Some` only when `old` and `new` have exactly the same member names and
/// every shared member's optionality is the only thing that changed (type
/// changes, additions, and removals are left for the caller's whole-type
/// widening/narrowing classification).
pub fn pure_optionality_deltas(
    old: &[PropertyType],
    new: &[PropertyType],
) -> Option<Vec<OptionalityDelta>> {
    if old.len() != new.len() {
        return None;
    }

    let mut deltas = Vec::new();
    for old_prop in old {
        let new_prop = new.iter().find(|p| p.name == old_prop.name)?;
        if old_prop.optional && !new_prop.optional {
            deltas.push(OptionalityDelta {
                member: old_prop.name.clone(),
                category: ChangeCategory::OptionalityTightened,
            });
        } else if !old_prop.optional && new_prop.optional {
            deltas.push(OptionalityDelta {
                member: old_prop.name.clone(),
                category: ChangeCategory::OptionalityLoosened,
            });
        }
    }

    if deltas.is_empty() {
        None
    } else {
        Some(deltas)
    }
}
