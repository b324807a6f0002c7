//! Parameter-list comparison: arity, optionality, and order, for a single
//! pair of old/new [`FunctionShape`]s.
//!
//! Order detection uses name similarity (`strsim::levenshtein`) rather than
//! position alone, so renaming `a, b` to `b, a` reads as a reorder instead
//! of "every parameter's name changed."

use strsim::levenshtein;

use crate::types::{ChangeCategory, ChangeDetails, FunctionShape};

use super::subtype::{Comparison, Widening};

/// One structural difference found between an old and new parameter list.
pub struct ParamDiff {
    pub category: ChangeCategory,
    pub explanation: String,
    pub details: Option<ChangeDetails>,
}

/// Compare one old/new overload pair's parameter lists and return every
/// structural difference found. Each pair may yield more than one
/// [`ParamDiff`] — e.g. a parameter added *and* a later one reordered.
pub fn diff_params(old: &FunctionShape, new: &FunctionShape, cmp: &mut Comparison) -> Vec<ParamDiff> {
    let mut diffs = Vec::new();

    if new.params.len() > old.params.len() {
        for p in &new.params[old.params.len()..] {
            let category = if p.optional {
                ChangeCategory::ParamAddedOptional
            } else {
                ChangeCategory::ParamAddedRequired
            };
            diffs.push(ParamDiff {
                category,
                explanation: format!("parameter `{}` was added", p.name),
                details: None,
            });
        }
    } else if old.params.len() > new.params.len() {
        for p in &old.params[new.params.len()..] {
            diffs.push(ParamDiff {
                category: ChangeCategory::ParamRemoved,
                explanation: format!("parameter `{}` was removed", p.name),
                details: None,
            });
        }
    }

    let shared = old.params.len().min(new.params.len());
    if let Some(permutation) = detect_reorder(&old.params[..shared], &new.params[..shared]) {
        diffs.push(ParamDiff {
            category: ChangeCategory::ParamOrderChanged,
            explanation: "parameters were reordered".to_string(),
            details: Some(ChangeDetails::ParamPermutation { moved: permutation }),
        });
    } else {
        for i in 0..shared {
            let op = &old.params[i];
            let np = &new.params[i];
            if op.optional && !np.optional {
                diffs.push(ParamDiff {
                    category: ChangeCategory::OptionalityTightened,
                    explanation: format!("parameter {i} became required"),
                    details: None,
                });
            } else if !op.optional && np.optional {
                diffs.push(ParamDiff {
                    category: ChangeCategory::OptionalityLoosened,
                    explanation: format!("parameter {i} became optional"),
                    details: None,
                });
            }

            // A narrower parameter type means the function now accepts
            // fewer of the arguments callers could previously pass — a
            // parameter narrows contravariantly relative to the return
            // type, so `Incomparable` (structurally unresolvable) is
            // treated as narrowed rather than silently dropped (spec §4.3).
            let old_rendered = cmp.type_to_string(op.ty);
            let new_rendered = cmp.type_to_string(np.ty);
            if old_rendered != new_rendered {
                let widening = cmp.classify(op.ty, np.ty);
                let widened = matches!(widening, Widening::Widened);
                let category = if widened { ChangeCategory::TypeWidened } else { ChangeCategory::TypeNarrowed };
                let verb = if widened { "widened" } else { "narrowed" };
                diffs.push(ParamDiff {
                    category,
                    explanation: format!(
                        "parameter {i} type {verb} from `{old_rendered}` to `{new_rendered}`"
                    ),
                    details: Some(ChangeDetails::TypeDirection { widened }),
                });
            }
        }
    }

    let return_widening = cmp.classify(old.return_type, new.return_type);
    match return_widening {
        Widening::Widened => diffs.push(ParamDiff {
            category: ChangeCategory::ReturnTypeChanged,
            explanation: format!(
                "return type widened from `{}` to `{}`",
                cmp.type_to_string(old.return_type),
                cmp.type_to_string(new.return_type)
            ),
            details: Some(ChangeDetails::TypeDirection { widened: true }),
        }),
        Widening::Narrowed => diffs.push(ParamDiff {
            category: ChangeCategory::ReturnTypeChanged,
            explanation: format!(
                "return type narrowed from `{}` to `{}`",
                cmp.type_to_string(old.return_type),
                cmp.type_to_string(new.return_type)
            ),
            details: Some(ChangeDetails::TypeDirection { widened: false }),
        }),
        Widening::Incomparable => {}
    }

    diffs
}

/// A reorder is reported only when every shared-position parameter pairs up
/// one-to-one with a near-identical name elsewhere in the list — otherwise
/// this is better described as individual parameter changes than a single
/// permutation.
fn detect_reorder(
    old: &[crate::types::FunctionParam],
    new: &[crate::types::FunctionParam],
) -> Option<Vec<(usize, usize)>> {
    if old.len() != new.len() || old.len() < 2 {
        return None;
    }
    if old.iter().zip(new.iter()).all(|(o, n)| o.source_name == n.source_name) {
        return None;
    }

    let mut moved = Vec::new();
    let mut used = vec![false; new.len()];
    for (old_pos, op) in old.iter().enumerate() {
        let best = new
            .iter()
            .enumerate()
            .filter(|(j, _)| !used[*j])
            .min_by_key(|(_, np)| levenshtein(&op.source_name, &np.source_name));
        let (new_pos, np) = best?;
        if levenshtein(&op.source_name, &np.source_name) > 1 {
            return None;
        }
        used[new_pos] = true;
        if old_pos != new_pos {
            moved.push((old_pos, new_pos));
        }
    }

    if moved.is_empty() {
        None
    } else {
        Some(moved)
    }
}
