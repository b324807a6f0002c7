//! The "type-checker capability" from spec §6, minus the type-checker.
//!
//! `oxc` parses TypeScript syntax but performs no type inference or
//! resolution — there is no real type-checker behind this crate. This
//! module plays that role instead: it owns a small arena of
//! [`ResolvedType`]s per snapshot and answers the narrow set of structural
//! questions the differ needs (`is_subtype`, `type_to_string`, member
//! lookups) over *that* arena.
//!
//! [`TypeHandle`] is the "opaque handle" from spec §3/§9: a cheap `Copy`
//! index into the owning snapshot's arena. It is never valid across
//! snapshots and carries no lifetime of its own — the snapshot that built
//! it must outlive any comparison that uses it.

use std::fmt::Write as _;

/// Index into a [`TypeArena`]. Only meaningful relative to the arena that
/// produced it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TypeHandle(pub(crate) u32);

/// Reserved handle for the opaque top type — what an unresolvable built-in
/// resolves to when no library-file resolver was supplied (spec §4.1 step
/// 1, §9 Open Question 2).
pub const TOP: TypeHandle = TypeHandle(0);
/// Reserved handle for the bottom type (`never`).
pub const NEVER: TypeHandle = TypeHandle(1);

/// A structural property of an object-like type.
#[derive(Clone, Debug)]
pub struct PropertyType {
    pub name: String,
    pub ty: TypeHandle,
    pub optional: bool,
    pub readonly: bool,
}

/// A resolved, structural description of a TypeScript type, sufficient for
/// the subtype oracle and for rendering diagnostic strings. This is
/// intentionally much coarser than a real type-checker's type model — it
/// only needs to answer the questions spec §6 names.
#[derive(Clone, Debug)]
pub enum ResolvedType {
    /// Could not be resolved (no library-file resolver supplied, or a
    /// genuinely dynamic construct). Assignable to/from everything.
    Top,
    /// The bottom type. Assignable to everything, nothing assignable to it
    /// except itself.
    Never,
    Primitive(Primitive),
    /// A literal type, e.g. `"foo"`, `42`, `true`.
    Literal(LiteralValue),
    /// Sorted union constituents (spec §4.1: "union constituents are
    /// sorted").
    Union(Vec<TypeHandle>),
    /// Sorted intersection constituents.
    Intersection(Vec<TypeHandle>),
    Array(TypeHandle),
    Tuple(Vec<TypeHandle>),
    /// Structural object shape: interfaces, object type literals, class
    /// instance shapes.
    Object(Vec<PropertyType>),
    /// A function/method shape, for function-valued properties.
    Function {
        params: Vec<TypeHandle>,
        return_type: TypeHandle,
    },
    /// A named type this crate did not resolve further (either it refers
    /// to a declaration outside the parsed file with no library-file
    /// entry, or resolution was not attempted). `is_subtype` against a
    /// `Reference` is answered only by name equality; anything else is an
    /// oracle failure the differ must fall back from (spec §4.3).
    Reference(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Null,
    Undefined,
    Void,
    Object,
    Unknown,
}

#[derive(Clone, PartialEq, Debug)]
pub enum LiteralValue {
    String(String),
    Number(String),
    Boolean(bool),
}

/// Per-snapshot arena of resolved types. Indices `0` and `1` are always
/// [`TOP`] and [`NEVER`].
#[derive(Clone, Debug)]
pub struct TypeArena {
    types: Vec<ResolvedType>,
}

impl Default for TypeArena {
    fn default() -> Self {
        Self {
            types: vec![ResolvedType::Top, ResolvedType::Never],
        }
    }
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resolved type, returning its handle.
    pub fn insert(&mut self, ty: ResolvedType) -> TypeHandle {
        let idx = self.types.len() as u32;
        self.types.push(ty);
        TypeHandle(idx)
    }

    pub fn get(&self, handle: TypeHandle) -> &ResolvedType {
        &self.types[handle.0 as usize]
    }

    /// Overwrite the type stored at `handle` in place. Every existing
    /// handle into this arena keeps pointing at the same slot, so this is
    /// how a [`crate::parser::resolver::LibraryFileResolver`] lookup
    /// patches an unresolved [`ResolvedType::Reference`] after the fact
    /// without having to rewrite every `FunctionShape`/`PropertyType` that
    /// already captured the old handle.
    pub fn patch(&mut self, handle: TypeHandle, ty: ResolvedType) {
        self.types[handle.0 as usize] = ty;
    }

    /// Every `(handle, name)` pair still sitting at an unresolved
    /// [`ResolvedType::Reference`] — candidates for library-file
    /// resolution (spec §4.1 step 1).
    pub fn unresolved_references(&self) -> Vec<(TypeHandle, String)> {
        self.types
            .iter()
            .enumerate()
            .filter_map(|(i, ty)| match ty {
                ResolvedType::Reference(name) => Some((TypeHandle(i as u32), name.clone())),
                _ => None,
            })
            .collect()
    }

    /// `members-of(type)` from spec §6.
    pub fn members_of(&self, handle: TypeHandle) -> &[PropertyType] {
        match self.get(handle) {
            ResolvedType::Object(props) => props,
            _ => &[],
        }
    }

    /// `call-signatures-of(type)` from spec §6, restricted to the single
    /// function shape this model supports.
    pub fn call_signature_of(&self, handle: TypeHandle) -> Option<(&[TypeHandle], TypeHandle)> {
        match self.get(handle) {
            ResolvedType::Function { params, return_type } => Some((params, *return_type)),
            _ => None,
        }
    }

    /// `type-to-string(type)` from spec §6 — used only for widening /
    /// narrowing diagnostics, never for equality (normalized signatures
    /// own that job).
    pub fn type_to_string(&self, handle: TypeHandle) -> String {
        let mut out = String::new();
        self.render(handle, &mut out);
        out
    }

    fn render(&self, handle: TypeHandle, out: &mut String) {
        match self.get(handle) {
            ResolvedType::Top => out.push_str("unknown"),
            ResolvedType::Never => out.push_str("never"),
            ResolvedType::Primitive(p) => out.push_str(primitive_name(*p)),
            ResolvedType::Literal(LiteralValue::String(s)) => {
                let _ = write!(out, "\"{}\"", s);
            }
            ResolvedType::Literal(LiteralValue::Number(n)) => out.push_str(n),
            ResolvedType::Literal(LiteralValue::Boolean(b)) => {
                out.push_str(if *b { "true" } else { "false" })
            }
            ResolvedType::Union(members) => {
                let mut rendered: Vec<String> =
                    members.iter().map(|m| self.type_to_string(*m)).collect();
                rendered.sort();
                out.push_str(&rendered.join(" | "));
            }
            ResolvedType::Intersection(members) => {
                let mut rendered: Vec<String> =
                    members.iter().map(|m| self.type_to_string(*m)).collect();
                rendered.sort();
                out.push_str(&rendered.join(" & "));
            }
            ResolvedType::Array(elem) => {
                let inner = self.type_to_string(*elem);
                let _ = write!(out, "{}[]", inner);
            }
            ResolvedType::Tuple(elems) => {
                out.push('[');
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&self.type_to_string(*e));
                }
                out.push(']');
            }
            ResolvedType::Object(props) => {
                let mut names: Vec<&PropertyType> = props.iter().collect();
                names.sort_by(|a, b| a.name.cmp(&b.name));
                out.push('{');
                for (i, p) in names.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    let opt = if p.optional { "?" } else { "" };
                    let ro = if p.readonly { "readonly " } else { "" };
                    let _ = write!(out, "{}{}{}: {}", ro, p.name, opt, self.type_to_string(p.ty));
                }
                out.push('}');
            }
            ResolvedType::Function { params, return_type } => {
                out.push('(');
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "arg{}: {}", i, self.type_to_string(*p));
                }
                let _ = write!(out, ") => {}", self.type_to_string(*return_type));
            }
            ResolvedType::Reference(name) => out.push_str(name),
        }
    }

    /// Deep-copy the type graph rooted at `handle` from `other` into
    /// `self`, returning the corresponding local handle.
    ///
    /// `TypeHandle`s are only meaningful relative to the arena that
    /// produced them (spec §3 "Lifetimes"), so comparing a type from the
    /// old snapshot against one from the new snapshot requires importing
    /// both into one shared arena first — the differ does this once per
    /// comparison, not once per symbol, to keep it cheap.
    pub fn import(&mut self, other: &TypeArena, handle: TypeHandle) -> TypeHandle {
        if handle == TOP {
            return TOP;
        }
        if handle == NEVER {
            return NEVER;
        }
        match other.get(handle).clone() {
            ResolvedType::Top => TOP,
            ResolvedType::Never => NEVER,
            ResolvedType::Primitive(p) => self.insert(ResolvedType::Primitive(p)),
            ResolvedType::Literal(l) => self.insert(ResolvedType::Literal(l)),
            ResolvedType::Union(members) => {
                let imported: Vec<TypeHandle> = members.iter().map(|m| self.import(other, *m)).collect();
                self.insert(ResolvedType::Union(imported))
            }
            ResolvedType::Intersection(members) => {
                let imported: Vec<TypeHandle> = members.iter().map(|m| self.import(other, *m)).collect();
                self.insert(ResolvedType::Intersection(imported))
            }
            ResolvedType::Array(elem) => {
                let imported = self.import(other, elem);
                self.insert(ResolvedType::Array(imported))
            }
            ResolvedType::Tuple(elems) => {
                let imported: Vec<TypeHandle> = elems.iter().map(|e| self.import(other, *e)).collect();
                self.insert(ResolvedType::Tuple(imported))
            }
            ResolvedType::Object(props) => {
                let imported: Vec<PropertyType> = props
                    .iter()
                    .map(|p| PropertyType {
                        name: p.name.clone(),
                        ty: self.import(other, p.ty),
                        optional: p.optional,
                        readonly: p.readonly,
                    })
                    .collect();
                self.insert(ResolvedType::Object(imported))
            }
            ResolvedType::Function { params, return_type } => {
                let imported_params: Vec<TypeHandle> =
                    params.iter().map(|p| self.import(other, *p)).collect();
                let imported_ret = self.import(other, return_type);
                self.insert(ResolvedType::Function {
                    params: imported_params,
                    return_type: imported_ret,
                })
            }
            ResolvedType::Reference(name) => self.insert(ResolvedType::Reference(name)),
        }
    }

    /// `is-subtype(a, b)` from spec §6: is `a` assignable to `b`?
    ///
    /// Returns `Err` when the question cannot be answered structurally —
    /// currently only when either side is an unresolved [`ResolvedType::
    /// Reference`] whose name doesn't match the other side. Per spec
    /// §4.3, the differ must catch this and fall back to a conservative
    /// classification; it is not this oracle's job to guess.
    pub fn is_subtype(&self, a: TypeHandle, b: TypeHandle) -> Result<bool, OracleError> {
        if a == b {
            return Ok(true);
        }
        let ra = self.get(a);
        let rb = self.get(b);

        // The opaque top type is bidirectionally assignable (§9 Open
        // Question 2): unresolved built-ins never block a comparison.
        if matches!(ra, ResolvedType::Top) || matches!(rb, ResolvedType::Top) {
            return Ok(true);
        }
        if matches!(ra, ResolvedType::Never) {
            return Ok(true);
        }
        if matches!(rb, ResolvedType::Never) {
            return Ok(matches!(ra, ResolvedType::Never));
        }

        match (ra, rb) {
            (ResolvedType::Union(members), _) => {
                self.all_subtype(members, b)
            }
            (_, ResolvedType::Union(members)) => self.any_subtype(a, members),
            (ResolvedType::Intersection(members), _) => self.any_subtype_of_members(members, b),
            (_, ResolvedType::Intersection(members)) => self.all_subtype_target(a, members),
            (ResolvedType::Literal(lit), ResolvedType::Primitive(p)) => {
                Ok(literal_matches_primitive(lit, *p))
            }
            (ResolvedType::Primitive(pa), ResolvedType::Primitive(pb)) => Ok(pa == pb),
            (ResolvedType::Literal(la), ResolvedType::Literal(lb)) => Ok(la == lb),
            (ResolvedType::Array(ea), ResolvedType::Array(eb)) => self.is_subtype(*ea, *eb),
            (ResolvedType::Tuple(ta), ResolvedType::Tuple(tb)) => {
                if ta.len() != tb.len() {
                    return Ok(false);
                }
                for (ea, eb) in ta.iter().zip(tb.iter()) {
                    if !self.is_subtype(*ea, *eb)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (ResolvedType::Object(pa), ResolvedType::Object(pb)) => self.object_subtype(pa, pb),
            (
                ResolvedType::Function { params: pa, return_type: ra },
                ResolvedType::Function { params: pb, return_type: rb },
            ) => self.function_subtype(pa, *ra, pb, *rb),
            (ResolvedType::Reference(na), ResolvedType::Reference(nb)) => {
                if na == nb {
                    Ok(true)
                } else {
                    Err(OracleError::Unresolved(format!("{na} vs {nb}")))
                }
            }
            (ResolvedType::Reference(n), _) | (_, ResolvedType::Reference(n)) => {
                Err(OracleError::Unresolved(n.clone()))
            }
            _ => Ok(false),
        }
    }

    fn all_subtype(&self, members: &[TypeHandle], b: TypeHandle) -> Result<bool, OracleError> {
        for m in members {
            if !self.is_subtype(*m, b)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn any_subtype(&self, a: TypeHandle, members: &[TypeHandle]) -> Result<bool, OracleError> {
        for m in members {
            if self.is_subtype(a, *m)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn any_subtype_of_members(
        &self,
        members: &[TypeHandle],
        b: TypeHandle,
    ) -> Result<bool, OracleError> {
        for m in members {
            if self.is_subtype(*m, b)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn all_subtype_target(&self, a: TypeHandle, members: &[TypeHandle]) -> Result<bool, OracleError> {
        for m in members {
            if !self.is_subtype(a, *m)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn object_subtype(&self, pa: &[PropertyType], pb: &[PropertyType]) -> Result<bool, OracleError> {
        for prop_b in pb {
            match pa.iter().find(|p| p.name == prop_b.name) {
                None => {
                    if !prop_b.optional {
                        return Ok(false);
                    }
                }
                Some(prop_a) => {
                    if prop_b.optional {
                        // fine either way
                    } else if prop_a.optional {
                        // a promises less certainty than b requires
                        return Ok(false);
                    }
                    if !self.is_subtype(prop_a.ty, prop_b.ty)? {
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }

    fn function_subtype(
        &self,
        pa: &[TypeHandle],
        ra: TypeHandle,
        pb: &[TypeHandle],
        rb: TypeHandle,
    ) -> Result<bool, OracleError> {
        if pa.len() != pb.len() {
            return Ok(false);
        }
        // Parameters are contravariant.
        for (a_param, b_param) in pa.iter().zip(pb.iter()) {
            if !self.is_subtype(*b_param, *a_param)? {
                return Ok(false);
            }
        }
        // Return type is covariant.
        self.is_subtype(ra, rb)
    }
}

/// The oracle could not answer a subtyping question structurally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OracleError {
    Unresolved(String),
}

impl std::fmt::Display for OracleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleError::Unresolved(name) => write!(f, "unresolved type reference: {name}"),
        }
    }
}

fn primitive_name(p: Primitive) -> &'static str {
    match p {
        Primitive::String => "string",
        Primitive::Number => "number",
        Primitive::Boolean => "boolean",
        Primitive::BigInt => "bigint",
        Primitive::Symbol => "symbol",
        Primitive::Null => "null",
        Primitive::Undefined => "undefined",
        Primitive::Void => "void",
        Primitive::Object => "object",
        Primitive::Unknown => "unknown",
    }
}

fn literal_matches_primitive(lit: &LiteralValue, p: Primitive) -> bool {
    matches!(
        (lit, p),
        (LiteralValue::String(_), Primitive::String)
            | (LiteralValue::Number(_), Primitive::Number)
            | (LiteralValue::Boolean(_), Primitive::Boolean)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with_primitives() -> (TypeArena, TypeHandle, TypeHandle, TypeHandle) {
        let mut arena = TypeArena::new();
        let string = arena.insert(ResolvedType::Primitive(Primitive::String));
        let number = arena.insert(ResolvedType::Primitive(Primitive::Number));
        let boolean = arena.insert(ResolvedType::Primitive(Primitive::Boolean));
        (arena, string, number, boolean)
    }

    #[test]
    fn top_is_bidirectionally_assignable() {
        let (arena, string, _, _) = arena_with_primitives();
        assert!(arena.is_subtype(string, TOP).unwrap());
        assert!(arena.is_subtype(TOP, string).unwrap());
    }

    #[test]
    fn narrowed_union_is_subtype_of_wider_union() {
        let (mut arena, string, number, boolean) = arena_with_primitives();
        let wide = arena.insert(ResolvedType::Union(vec![string, number, boolean]));
        let narrow = arena.insert(ResolvedType::Union(vec![string, number]));
        assert!(arena.is_subtype(narrow, wide).unwrap());
        assert!(!arena.is_subtype(wide, narrow).unwrap());
    }

    #[test]
    fn literal_is_subtype_of_its_primitive() {
        let mut arena = TypeArena::new();
        let string = arena.insert(ResolvedType::Primitive(Primitive::String));
        let lit = arena.insert(ResolvedType::Literal(LiteralValue::String("ok".into())));
        assert!(arena.is_subtype(lit, string).unwrap());
        assert!(!arena.is_subtype(string, lit).unwrap());
    }

    #[test]
    fn object_with_added_optional_property_is_a_supertype() {
        let mut arena = TypeArena::new();
        let string = arena.insert(ResolvedType::Primitive(Primitive::String));
        let old = arena.insert(ResolvedType::Object(vec![PropertyType {
            name: "name".into(),
            ty: string,
            optional: false,
            readonly: false,
        }]));
        let new = arena.insert(ResolvedType::Object(vec![
            PropertyType {
                name: "name".into(),
                ty: string,
                optional: false,
                readonly: false,
            },
            PropertyType {
                name: "email".into(),
                ty: string,
                optional: true,
                readonly: false,
            },
        ]));
        // old accepts anything new would (old requires strictly less) => old is the supertype
        assert!(arena.is_subtype(new, old).unwrap());
    }

    #[test]
    fn object_with_added_required_property_is_not_bidirectionally_assignable() {
        let mut arena = TypeArena::new();
        let string = arena.insert(ResolvedType::Primitive(Primitive::String));
        let old = arena.insert(ResolvedType::Object(vec![PropertyType {
            name: "name".into(),
            ty: string,
            optional: false,
            readonly: false,
        }]));
        let new = arena.insert(ResolvedType::Object(vec![
            PropertyType {
                name: "name".into(),
                ty: string,
                optional: false,
                readonly: false,
            },
            PropertyType {
                name: "id".into(),
                ty: string,
                optional: false,
                readonly: false,
            },
        ]));
        assert!(arena.is_subtype(new, old).unwrap());
        assert!(!arena.is_subtype(old, new).unwrap());
    }

    #[test]
    fn import_copies_a_type_graph_across_arenas() {
        let mut old_arena = TypeArena::new();
        let old_string = old_arena.insert(ResolvedType::Primitive(Primitive::String));
        let old_union = old_arena.insert(ResolvedType::Union(vec![old_string, TOP]));

        let mut new_arena = TypeArena::new();
        let imported = new_arena.import(&old_arena, old_union);
        assert_eq!(new_arena.type_to_string(imported), "string | unknown");
    }

    #[test]
    fn unresolved_reference_mismatch_is_an_oracle_error() {
        let mut arena = TypeArena::new();
        let a = arena.insert(ResolvedType::Reference("Foo".into()));
        let b = arena.insert(ResolvedType::Reference("Bar".into()));
        assert!(arena.is_subtype(a, b).is_err());
    }
}
