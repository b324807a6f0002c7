//! Structural diffing: turns two [`ModuleSnapshot`]s into a sequence of
//! [`AnalyzedChange`]s, before any release-impact policy is applied.
//!
//! The overall shape mirrors the teacher's snapshot differ (`diff.rs`):
//! build two name sets, diff membership first, then diff the symbols
//! present on both sides. What differs from that model is everything
//! below the name-set comparison — a `.d.ts` symbol carries a structural
//! shape, not just a path, so "present on both sides" still has to answer
//! whether the shape changed and in which direction.

pub mod object;
pub mod params;
pub mod rename;
pub mod subtype;

use crate::types::{AnalyzedChange, ChangeCategory, ExportedSymbol, ModuleSnapshot, SymbolShape};

use rename::{find_rename, SignatureIndex};
use subtype::{Comparison, Widening};

/// Diff two snapshots into a flat sequence of changes, one entry per
/// observed difference (a single symbol can yield several — e.g. a
/// function gaining a parameter AND its return type widening).
pub fn diff(old: &ModuleSnapshot, new: &ModuleSnapshot) -> Vec<AnalyzedChange> {
    let mut changes = Vec::new();

    let removed_index = SignatureIndex::build(old.symbols.values());
    let added_index = SignatureIndex::build(new.symbols.values());

    let mut renamed_away: std::collections::HashSet<&str> = std::collections::HashSet::new();
    let mut renamed_into: std::collections::HashSet<&str> = std::collections::HashSet::new();

    for (name, old_symbol) in &old.symbols {
        if new.symbols.contains_key(name) {
            continue;
        }
        if let Some(new_name) = find_rename(old_symbol, &removed_index, &added_index) {
            if new_name != name {
                renamed_away.insert(name.as_str());
                renamed_into.insert(new_name);
                changes.push(AnalyzedChange {
                    symbol_name: name.clone(),
                    symbol_kind: old_symbol.kind,
                    category: ChangeCategory::FieldRenamed,
                    explanation: format!("`{name}` was renamed to `{new_name}`"),
                    before: Some(name.clone()),
                    after: Some(new_name.to_string()),
                    details: None,
                });
            }
        }
    }

    for (name, old_symbol) in &old.symbols {
        if new.symbols.contains_key(name) || renamed_away.contains(name.as_str()) {
            continue;
        }
        changes.push(AnalyzedChange {
            symbol_name: name.clone(),
            symbol_kind: old_symbol.kind,
            category: ChangeCategory::SymbolRemoved,
            explanation: format!("`{name}` was removed"),
            before: Some(old_symbol.signature.clone()),
            after: None,
            details: None,
        });
    }

    for (name, new_symbol) in &new.symbols {
        if old.symbols.contains_key(name) || renamed_into.contains(name.as_str()) {
            continue;
        }
        changes.push(AnalyzedChange {
            symbol_name: name.clone(),
            symbol_kind: new_symbol.kind,
            category: ChangeCategory::SymbolAdded,
            explanation: format!("`{name}` was added"),
            before: None,
            after: Some(new_symbol.signature.clone()),
            details: None,
        });
    }

    for (name, old_symbol) in &old.symbols {
        if let Some(new_symbol) = new.symbols.get(name) {
            changes.extend(diff_symbol(name, old_symbol, old, new_symbol, new));
        }
    }

    changes
}

fn diff_symbol(
    name: &str,
    old_symbol: &ExportedSymbol,
    old: &ModuleSnapshot,
    new_symbol: &ExportedSymbol,
    new: &ModuleSnapshot,
) -> Vec<AnalyzedChange> {
    let mut changes = Vec::new();

    if old_symbol.signature == new_symbol.signature {
        changes.push(AnalyzedChange {
            symbol_name: name.to_string(),
            symbol_kind: old_symbol.kind,
            category: ChangeCategory::SignatureIdentical,
            explanation: "no structural change".to_string(),
            before: Some(old_symbol.signature.clone()),
            after: Some(new_symbol.signature.clone()),
            details: None,
        });
    } else {
        changes.extend(diff_shape(name, old_symbol, old, new_symbol, new));
    }

    changes.extend(diff_metadata(name, old_symbol, new_symbol));
    changes
}

fn diff_shape(
    name: &str,
    old_symbol: &ExportedSymbol,
    old: &ModuleSnapshot,
    new_symbol: &ExportedSymbol,
    new: &ModuleSnapshot,
) -> Vec<AnalyzedChange> {
    let mut cmp = Comparison::new();

    match (&old_symbol.shape, &new_symbol.shape) {
        (Some(SymbolShape::Function(old_overloads)), Some(SymbolShape::Function(new_overloads))) => {
            let pairs = old_overloads.len().min(new_overloads.len());
            let mut changes = Vec::new();
            for i in 0..pairs {
                let old_shape = &old_overloads[i];
                let new_shape = &new_overloads[i];
                let local_old_return = cmp_import(&mut cmp, &old.types, old_shape.return_type);
                let local_new_return = cmp_import(&mut cmp, &new.types, new_shape.return_type);
                let mut local_old = old_shape.clone();
                let mut local_new = new_shape.clone();
                local_old.return_type = local_old_return;
                local_new.return_type = local_new_return;
                for p in local_old.params.iter_mut() {
                    p.ty = cmp_import(&mut cmp, &old.types, p.ty);
                }
                for p in local_new.params.iter_mut() {
                    p.ty = cmp_import(&mut cmp, &new.types, p.ty);
                }
                for diff in params::diff_params(&local_old, &local_new, &mut cmp) {
                    changes.push(AnalyzedChange {
                        symbol_name: name.to_string(),
                        symbol_kind: old_symbol.kind,
                        category: diff.category,
                        explanation: diff.explanation,
                        before: Some(old_symbol.signature.clone()),
                        after: Some(new_symbol.signature.clone()),
                        details: diff.details,
                    });
                }
            }
            if new_overloads.len() > pairs {
                changes.push(AnalyzedChange {
                    symbol_name: name.to_string(),
                    symbol_kind: old_symbol.kind,
                    category: ChangeCategory::ParamAddedOptional,
                    explanation: "an overload was added".to_string(),
                    before: Some(old_symbol.signature.clone()),
                    after: Some(new_symbol.signature.clone()),
                    details: None,
                });
            } else if old_overloads.len() > pairs {
                changes.push(AnalyzedChange {
                    symbol_name: name.to_string(),
                    symbol_kind: old_symbol.kind,
                    category: ChangeCategory::ParamRemoved,
                    explanation: "an overload was removed".to_string(),
                    before: Some(old_symbol.signature.clone()),
                    after: Some(new_symbol.signature.clone()),
                    details: None,
                });
            }
            changes
        }
        (Some(SymbolShape::Value(old_handle)), Some(SymbolShape::Value(new_handle))) => {
            let local_old = cmp_import(&mut cmp, &old.types, *old_handle);
            let local_new = cmp_import(&mut cmp, &new.types, *new_handle);

            if let Some(deltas) =
                object::pure_optionality_deltas(cmp.members_of(local_old), cmp.members_of(local_new))
            {
                return deltas
                    .into_iter()
                    .map(|d| AnalyzedChange {
                        symbol_name: name.to_string(),
                        symbol_kind: old_symbol.kind,
                        category: d.category,
                        explanation: format!("member `{}` of `{name}` changed optionality", d.member),
                        before: Some(old_symbol.signature.clone()),
                        after: Some(new_symbol.signature.clone()),
                        details: None,
                    })
                    .collect();
            }

            let category = match cmp.classify(local_old, local_new) {
                Widening::Widened => ChangeCategory::TypeWidened,
                Widening::Narrowed => ChangeCategory::TypeNarrowed,
                Widening::Incomparable => ChangeCategory::TypeNarrowed,
            };
            vec![AnalyzedChange {
                symbol_name: name.to_string(),
                symbol_kind: old_symbol.kind,
                category,
                explanation: format!(
                    "`{name}` changed from `{}` to `{}`",
                    old_symbol.signature, new_symbol.signature
                ),
                before: Some(old_symbol.signature.clone()),
                after: Some(new_symbol.signature.clone()),
                details: None,
            }]
        }
        _ => vec![AnalyzedChange {
            symbol_name: name.to_string(),
            symbol_kind: old_symbol.kind,
            category: ChangeCategory::TypeNarrowed,
            explanation: format!(
                "`{name}` changed from `{}` to `{}`",
                old_symbol.signature, new_symbol.signature
            ),
            before: Some(old_symbol.signature.clone()),
            after: Some(new_symbol.signature.clone()),
            details: None,
        }],
    }
}

fn cmp_import(
    cmp: &mut Comparison,
    arena: &crate::parser::type_model::TypeArena,
    handle: crate::parser::type_model::TypeHandle,
) -> crate::parser::type_model::TypeHandle {
    cmp.import_one(arena, handle)
}

fn diff_metadata(
    name: &str,
    old_symbol: &ExportedSymbol,
    new_symbol: &ExportedSymbol,
) -> Vec<AnalyzedChange> {
    let mut changes = Vec::new();

    let old_deprecated = old_symbol.metadata.as_ref().map(|m| m.is_deprecated).unwrap_or(false);
    let new_deprecated = new_symbol.metadata.as_ref().map(|m| m.is_deprecated).unwrap_or(false);
    if !old_deprecated && new_deprecated {
        changes.push(AnalyzedChange {
            symbol_name: name.to_string(),
            symbol_kind: old_symbol.kind,
            category: ChangeCategory::FieldDeprecated,
            explanation: format!("`{name}` was marked deprecated"),
            before: None,
            after: new_symbol.metadata.as_ref().and_then(|m| m.deprecation_message.clone()),
            details: None,
        });
    } else if old_deprecated && !new_deprecated {
        changes.push(AnalyzedChange {
            symbol_name: name.to_string(),
            symbol_kind: old_symbol.kind,
            category: ChangeCategory::FieldUndeprecated,
            explanation: format!("`{name}` is no longer deprecated"),
            before: None,
            after: None,
            details: None,
        });
    }

    let old_default = old_symbol.metadata.as_ref().and_then(|m| m.default_value.as_ref());
    let new_default = new_symbol.metadata.as_ref().and_then(|m| m.default_value.as_ref());
    match (old_default, new_default) {
        (None, Some(v)) => changes.push(AnalyzedChange {
            symbol_name: name.to_string(),
            symbol_kind: old_symbol.kind,
            category: ChangeCategory::DefaultAdded,
            explanation: format!("`{name}` gained a default value of `{v}`"),
            before: None,
            after: Some(v.clone()),
            details: None,
        }),
        (Some(v), None) => changes.push(AnalyzedChange {
            symbol_name: name.to_string(),
            symbol_kind: old_symbol.kind,
            category: ChangeCategory::DefaultRemoved,
            explanation: format!("`{name}` lost its default value of `{v}`"),
            before: Some(v.clone()),
            after: None,
            details: None,
        }),
        (Some(old_v), Some(new_v)) if old_v != new_v => changes.push(AnalyzedChange {
            symbol_name: name.to_string(),
            symbol_kind: old_symbol.kind,
            category: ChangeCategory::DefaultChanged,
            explanation: format!("`{name}`'s default value changed from `{old_v}` to `{new_v}`"),
            before: Some(old_v.clone()),
            after: Some(new_v.clone()),
            details: None,
        }),
        _ => {}
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn snap(source: &str) -> ModuleSnapshot {
        parser::parse(source, "test.d.ts")
    }

    #[test]
    fn added_symbol_is_reported() {
        let old = snap("export declare function f(): void;");
        let new = snap("export declare function f(): void;\nexport declare function g(): void;");
        let changes = diff(&old, &new);
        assert!(changes.iter().any(|c| c.category == ChangeCategory::SymbolAdded && c.symbol_name == "g"));
    }

    #[test]
    fn removed_symbol_is_reported() {
        let old = snap("export declare function f(): void;\nexport declare function g(): void;");
        let new = snap("export declare function f(): void;");
        let changes = diff(&old, &new);
        assert!(changes.iter().any(|c| c.category == ChangeCategory::SymbolRemoved && c.symbol_name == "g"));
    }

    #[test]
    fn identical_signature_is_reported_as_unchanged() {
        let old = snap("export declare function f(a: string): void;");
        let new = snap("export declare function f(a: string): void;");
        let changes = diff(&old, &new);
        assert!(changes.iter().any(|c| c.category == ChangeCategory::SignatureIdentical));
    }

    #[test]
    fn renamed_function_with_unique_shape_is_a_rename() {
        let old = snap("export declare function oldName(a: string): void;");
        let new = snap("export declare function newName(a: string): void;");
        let changes = diff(&old, &new);
        assert!(changes.iter().any(|c| c.category == ChangeCategory::FieldRenamed));
        assert!(!changes.iter().any(|c| c.category == ChangeCategory::SymbolAdded));
        assert!(!changes.iter().any(|c| c.category == ChangeCategory::SymbolRemoved));
    }

    #[test]
    fn added_required_parameter_is_detected() {
        let old = snap("export declare function f(a: string): void;");
        let new = snap("export declare function f(a: string, b: number): void;");
        let changes = diff(&old, &new);
        assert!(changes.iter().any(|c| c.category == ChangeCategory::ParamAddedRequired));
    }

    #[test]
    fn widened_union_return_type_is_detected() {
        let old = snap("export declare function f(): string;");
        let new = snap("export declare function f(): string | number;");
        let changes = diff(&old, &new);
        assert!(changes.iter().any(|c| c.category == ChangeCategory::ReturnTypeChanged));
    }

    #[test]
    fn newly_deprecated_symbol_is_detected() {
        let old = snap("export declare function f(): void;");
        let new = snap("/** @deprecated use g instead */\nexport declare function f(): void;");
        let changes = diff(&old, &new);
        assert!(changes.iter().any(|c| c.category == ChangeCategory::FieldDeprecated));
    }

    #[test]
    fn widened_interface_member_is_detected() {
        let old = snap("export interface Opts { mode: string; }");
        let new = snap("export interface Opts { mode: string | number; }");
        let changes = diff(&old, &new);
        assert!(changes.iter().any(|c| c.category == ChangeCategory::TypeWidened));
    }

    #[test]
    fn added_optional_interface_member_is_widening() {
        let old = snap("export interface User { name: string; }");
        let new = snap("export interface User { name: string; email?: string; }");
        let changes = diff(&old, &new);
        assert!(changes.iter().any(|c| c.category == ChangeCategory::TypeWidened));
    }

    #[test]
    fn interface_member_becoming_optional_is_optionality_loosened_not_widened() {
        let old = snap("export interface Opts { mode: string; }");
        let new = snap("export interface Opts { mode?: string; }");
        let changes = diff(&old, &new);
        assert!(changes.iter().any(|c| c.category == ChangeCategory::OptionalityLoosened));
        assert!(!changes.iter().any(|c| c.category == ChangeCategory::TypeWidened));
    }

    #[test]
    fn removed_interface_member_is_narrowing() {
        let old = snap("export interface User { name: string; email?: string; }");
        let new = snap("export interface User { name: string; }");
        let changes = diff(&old, &new);
        assert!(changes.iter().any(|c| c.category == ChangeCategory::TypeNarrowed));
    }
}
