//! Bridges the differ to the structural subtype oracle.
//!
//! Two symbols being compared were built from two different
//! [`crate::parser::type_model::TypeArena`]s — one per
//! [`crate::types::ModuleSnapshot`] — so their `TypeHandle`s are never
//! directly comparable. [`Comparison`] imports both sides into one shared
//! arena once per symbol pair and answers widening/narrowing questions
//! against that shared arena from then on.

use std::collections::BTreeSet;

use crate::parser::type_model::{OracleError, ResolvedType, TypeArena, TypeHandle};

/// Which direction a type changed, or that the oracle couldn't tell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Widening {
    /// `new` accepts a superset of what `old` accepted (old -> new is a
    /// strict source-compatible broadening).
    Widened,
    /// `new` accepts a subset of what `old` accepted.
    Narrowed,
    /// Neither side is a subtype of the other, or both are: same shape by
    /// a route that doesn't round through widening/narrowing.
    Incomparable,
}

/// One shared arena holding both sides' types for the duration of a single
/// symbol comparison.
pub struct Comparison {
    arena: TypeArena,
}

impl Comparison {
    pub fn new() -> Self {
        Self { arena: TypeArena::new() }
    }

    /// Import `old`'s handle from `old_arena` and `new`'s handle from
    /// `new_arena` into this comparison's shared arena, returning local
    /// handles valid against `self.arena` only.
    pub fn import_pair(
        &mut self,
        old_arena: &TypeArena,
        old: TypeHandle,
        new_arena: &TypeArena,
        new: TypeHandle,
    ) -> (TypeHandle, TypeHandle) {
        let local_old = self.arena.import(old_arena, old);
        let local_new = self.arena.import(new_arena, new);
        (local_old, local_new)
    }

    /// Import a single handle from `arena` into this comparison's shared
    /// arena, for callers that only need one side at a time (e.g. per
    /// overload, where old and new parameters come from different source
    /// arenas already determined by the caller).
    pub fn import_one(&mut self, arena: &TypeArena, handle: TypeHandle) -> TypeHandle {
        self.arena.import(arena, handle)
    }

    pub fn type_to_string(&self, handle: TypeHandle) -> String {
        self.arena.type_to_string(handle)
    }

    /// `members-of(type)` against this comparison's shared arena, for
    /// object-member-level analysis (optionality transitions) that the
    /// whole-type [`Comparison::classify`] can't express on its own.
    pub fn members_of(&self, handle: TypeHandle) -> &[crate::parser::type_model::PropertyType] {
        self.arena.members_of(handle)
    }

    /// Classify the direction of change from `old` to `new`. When the
    /// oracle can't answer structurally (an unresolved reference on either
    /// side), the conservative default is narrowing: an unresolvable type
    /// is one the consumer might be relying on by name, so treat the
    /// change as a potential break rather than silently waving it through
    /// as a widening.
    pub fn classify(&self, old: TypeHandle, new: TypeHandle) -> Widening {
        if old == new {
            return Widening::Incomparable;
        }
        let old_subtype_of_new = self.arena.is_subtype(old, new);
        let new_subtype_of_old = self.arena.is_subtype(new, old);

        match (old_subtype_of_new, new_subtype_of_old) {
            (Ok(true), Ok(true)) => self.classify_mutual_subtype(old, new),
            (Ok(true), Ok(false)) => Widening::Widened,
            (Ok(false), Ok(true)) => Widening::Narrowed,
            (Ok(false), Ok(false)) => Widening::Incomparable,
            (Err(_), _) | (_, Err(_)) => Widening::Narrowed,
        }
    }

    /// Width subtyping makes adding or removing an *optional* object member
    /// mutually assignable in both directions (an extra optional field
    /// never breaks assignability either way), so the generic subtype
    /// check alone can't tell "a member was added" from "a member was
    /// removed" — both report as mutual subtypes. Object/interface shapes
    /// get a dedicated member-set comparison so that an interface gaining
    /// an optional member reads as widened and one losing a member reads
    /// as narrowed (spec §8 scenario 4), while every other mutually
    /// assignable pair (same members, e.g. reached via a `Reference` on one
    /// side) stays `Incomparable`.
    fn classify_mutual_subtype(&self, old: TypeHandle, new: TypeHandle) -> Widening {
        if let (ResolvedType::Object(pa), ResolvedType::Object(pb)) =
            (self.arena.get(old), self.arena.get(new))
        {
            let names_a: BTreeSet<&str> = pa.iter().map(|p| p.name.as_str()).collect();
            let names_b: BTreeSet<&str> = pb.iter().map(|p| p.name.as_str()).collect();
            if names_b.len() > names_a.len() && names_b.is_superset(&names_a) {
                return Widening::Widened;
            }
            if names_a.len() > names_b.len() && names_a.is_superset(&names_b) {
                return Widening::Narrowed;
            }
        }
        Widening::Incomparable
    }

    pub fn oracle_error(&self, old: TypeHandle, new: TypeHandle) -> Option<OracleError> {
        self.arena.is_subtype(old, new).err().or_else(|| self.arena.is_subtype(new, old).err())
    }
}

impl Default for Comparison {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::type_model::{Primitive, ResolvedType};

    #[test]
    fn widened_union_is_detected_across_arenas() {
        let mut old_arena = TypeArena::new();
        let old_string = old_arena.insert(ResolvedType::Primitive(Primitive::String));

        let mut new_arena = TypeArena::new();
        let new_string = new_arena.insert(ResolvedType::Primitive(Primitive::String));
        let new_number = new_arena.insert(ResolvedType::Primitive(Primitive::Number));
        let new_union = new_arena.insert(ResolvedType::Union(vec![new_string, new_number]));

        let mut cmp = Comparison::new();
        let (lo, ln) = cmp.import_pair(&old_arena, old_string, &new_arena, new_union);
        assert_eq!(cmp.classify(lo, ln), Widening::Widened);
    }

    #[test]
    fn unresolved_reference_mismatch_defaults_to_narrowed() {
        let mut old_arena = TypeArena::new();
        let old_ref = old_arena.insert(ResolvedType::Reference("Foo".into()));
        let mut new_arena = TypeArena::new();
        let new_ref = new_arena.insert(ResolvedType::Reference("Bar".into()));

        let mut cmp = Comparison::new();
        let (lo, ln) = cmp.import_pair(&old_arena, old_ref, &new_arena, new_ref);
        assert_eq!(cmp.classify(lo, ln), Widening::Narrowed);
    }
}
