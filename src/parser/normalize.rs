//! Deterministic signature construction (spec §4.1 step 2).
//!
//! [`TypeArena::type_to_string`](super::type_model::TypeArena::type_to_string)
//! already does most of the normalization work for a single resolved type:
//! union/intersection/object members are rendered in sorted order and
//! function parameters are rendered as `arg0, arg1, …`. What's left for
//! this module is everything that spans more than one resolved type: alpha-
//! renaming a declaration's own generic parameters, and building the
//! kind-specific signature shape (interfaces, enums, overloaded functions)
//! around the rendered type strings.

use std::collections::HashMap;

/// Assigns `T0, T1, …` to a declaration's own generic type parameters, in
/// declaration order. Two functions differing only in the *name* of a
/// generic parameter (`fn f<T>` vs `fn f<U>`) must normalize to the same
/// signature; this mapping is applied as a post-pass over the rendered
/// string rather than threaded through type resolution, since nothing
/// downstream of rendering cares about the original names.
pub fn generic_rename_map(type_params: &[&str]) -> HashMap<String, String> {
    type_params
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), format!("T{i}")))
        .collect()
}

/// Replace every whole-identifier occurrence of a generic parameter name in
/// `rendered` with its alpha-renamed form. Operates on identifier
/// boundaries (`[A-Za-z0-9_$]`) so `T` does not clobber `TResult`.
pub fn apply_generic_renames(rendered: &str, renames: &HashMap<String, String>) -> String {
    if renames.is_empty() {
        return rendered.to_string();
    }
    let bytes = rendered.as_bytes();
    let mut out = String::with_capacity(rendered.len());
    let mut i = 0;
    while i < bytes.len() {
        if is_ident_start(bytes[i]) {
            let start = i;
            i += 1;
            while i < bytes.len() && is_ident_continue(bytes[i]) {
                i += 1;
            }
            let ident = &rendered[start..i];
            match renames.get(ident) {
                Some(renamed) => out.push_str(renamed),
                None => out.push_str(ident),
            }
        } else {
            out.push(bytes[i] as char);
            i += 1;
        }
    }
    out
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Join overload signatures with `"; "`, in source declaration order (spec
/// §4.1: "overloads join in declaration order, not sorted" — unlike union
/// members and object properties, overload order is part of the public API
/// a caller overload-resolves against).
pub fn join_overloads(signatures: impl IntoIterator<Item = String>) -> String {
    signatures.into_iter().collect::<Vec<_>>().join("; ")
}

/// Render a sorted `name: value` list for enum members, e.g. an enum
/// normalizes to its full member set rather than just its name so that
/// adding, removing, or renumbering a member is visible to the differ as a
/// signature change. `is_const` distinguishes `const enum` from `enum`:
/// the two have different erasure/inlining semantics at call sites, so a
/// declaration gaining or losing `const` must not normalize identically.
pub fn enum_signature(mut members: Vec<(String, String)>, is_const: bool) -> String {
    members.sort_by(|a, b| a.0.cmp(&b.0));
    let rendered: Vec<String> = members
        .into_iter()
        .map(|(name, value)| format!("{name} = {value}"))
        .collect();
    let keyword = if is_const { "const enum" } else { "enum" };
    format!("{keyword} {{{}}}", rendered.join(", "))
}

/// The header information around a class's member list: everything that
/// changes the class's public contract without changing any individual
/// member's signature (becoming `abstract`, gaining a generic parameter,
/// swapping a base class or implemented interface).
#[derive(Default)]
pub struct ClassHeader {
    pub is_abstract: bool,
    pub generics: Vec<String>,
    pub extends: Option<String>,
    pub implements: Vec<String>,
}

/// Render a class's public shape: header clauses followed by sorted
/// instance + static members, each a `name: signature` pair. Private
/// (`#`-prefixed or `private`-modified) members never reach this function
/// (spec: only the public surface is compared). The constructor, when
/// present, is expanded into the member list under the `new` key by the
/// caller, just like any other member.
pub fn class_signature(mut members: Vec<(String, String)>, header: ClassHeader) -> String {
    members.sort_by(|a, b| a.0.cmp(&b.0));
    let rendered: Vec<String> = members
        .into_iter()
        .map(|(name, sig)| format!("{name}: {sig}"))
        .collect();

    let mut out = String::new();
    if header.is_abstract {
        out.push_str("abstract ");
    }
    out.push_str("class");
    if !header.generics.is_empty() {
        out.push('<');
        out.push_str(&header.generics.join(", "));
        out.push('>');
    }
    if let Some(base) = &header.extends {
        out.push_str(" extends ");
        out.push_str(base);
    }
    if !header.implements.is_empty() {
        let mut sorted = header.implements;
        sorted.sort();
        out.push_str(" implements ");
        out.push_str(&sorted.join(", "));
    }
    out.push_str(&format!(" {{{}}}", rendered.join("; ")));
    out
}

/// Render a namespace's exported member set: sorted `name: signature`
/// pairs of everything the namespace itself exports, recursively
/// normalized by the same rules as top-level symbols.
pub fn namespace_signature(mut members: Vec<(String, String)>) -> String {
    members.sort_by(|a, b| a.0.cmp(&b.0));
    let rendered: Vec<String> = members
        .into_iter()
        .map(|(name, sig)| format!("{name}: {sig}"))
        .collect();
    format!("namespace {{{}}}", rendered.join("; "))
}
