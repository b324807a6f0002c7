//! Resolves `oxc` `TSType` AST nodes into [`ResolvedType`]s (spec §4.1 step
//! 1, §6).
//!
//! `oxc` parses TypeScript syntax only — it has no type-checker behind it,
//! so a `TSTypeReference` to `Promise<T>` or a project-local interface is
//! just a name, never an inferred shape. This builder resolves what it can
//! see directly in the syntax tree (literals, unions, object shapes,
//! function types) and falls back to [`ResolvedType::Reference`] for
//! anything named — array/tuple generics and arbitrary type references
//! alike — leaving the subtype oracle's existing reference-name-equality
//! rule to decide what to do with it.

use oxc_ast::ast::{
    TSLiteral, TSSignature, TSType, TSTypeName, TSTypeOperatorOperator,
};

use super::type_model::{LiteralValue, Primitive, PropertyType, ResolvedType, TypeArena, TypeHandle};

/// Resolve one `TSType` node into a handle in `arena`.
pub fn resolve_ts_type(ty: &TSType<'_>, arena: &mut TypeArena) -> TypeHandle {
    match ty {
        TSType::TSStringKeyword(_) => arena.insert(ResolvedType::Primitive(Primitive::String)),
        TSType::TSNumberKeyword(_) => arena.insert(ResolvedType::Primitive(Primitive::Number)),
        TSType::TSBooleanKeyword(_) => arena.insert(ResolvedType::Primitive(Primitive::Boolean)),
        TSType::TSBigIntKeyword(_) => arena.insert(ResolvedType::Primitive(Primitive::BigInt)),
        TSType::TSSymbolKeyword(_) => arena.insert(ResolvedType::Primitive(Primitive::Symbol)),
        TSType::TSNullKeyword(_) => arena.insert(ResolvedType::Primitive(Primitive::Null)),
        TSType::TSUndefinedKeyword(_) => arena.insert(ResolvedType::Primitive(Primitive::Undefined)),
        TSType::TSVoidKeyword(_) => arena.insert(ResolvedType::Primitive(Primitive::Void)),
        TSType::TSObjectKeyword(_) => arena.insert(ResolvedType::Primitive(Primitive::Object)),
        TSType::TSAnyKeyword(_) | TSType::TSUnknownKeyword(_) => super::type_model::TOP,
        TSType::TSNeverKeyword(_) => super::type_model::NEVER,
        TSType::TSThisType(_) => arena.insert(ResolvedType::Reference("this".to_string())),

        TSType::TSLiteralType(lit) => resolve_literal(&lit.literal, arena),

        TSType::TSUnionType(u) => {
            let members: Vec<TypeHandle> = u.types.iter().map(|t| resolve_ts_type(t, arena)).collect();
            arena.insert(ResolvedType::Union(members))
        }
        TSType::TSIntersectionType(i) => {
            let members: Vec<TypeHandle> = i.types.iter().map(|t| resolve_ts_type(t, arena)).collect();
            arena.insert(ResolvedType::Intersection(members))
        }
        TSType::TSArrayType(a) => {
            let elem = resolve_ts_type(&a.element_type, arena);
            arena.insert(ResolvedType::Array(elem))
        }
        TSType::TSTupleType(t) => {
            let members: Vec<TypeHandle> = t
                .element_types
                .iter()
                .map(|e| resolve_tuple_element(e, arena))
                .collect();
            arena.insert(ResolvedType::Tuple(members))
        }
        TSType::TSParenthesizedType(p) => resolve_ts_type(&p.type_annotation, arena),
        TSType::TSTypeOperatorType(op) => {
            // `keyof T` / `readonly T[]` resolve to their operand; this
            // crate has no stronger opinion about operator types than
            // "treat as the thing it modifies" (spec §4.1: unresolvable
            // constructs fall back to the opaque top type on the operand
            // only when the operand itself does).
            if op.operator == TSTypeOperatorOperator::Readonly {
                resolve_ts_type(&op.type_annotation, arena)
            } else {
                super::type_model::TOP
            }
        }

        TSType::TSFunctionType(f) => {
            let params: Vec<TypeHandle> = f
                .params
                .items
                .iter()
                .map(|p| match &p.pattern.type_annotation {
                    Some(ann) => resolve_ts_type(&ann.type_annotation, arena),
                    None => super::type_model::TOP,
                })
                .collect();
            let return_type = resolve_ts_type(&f.return_type.type_annotation, arena);
            arena.insert(ResolvedType::Function { params, return_type })
        }

        TSType::TSTypeLiteral(lit) => {
            let props = resolve_signatures(&lit.members, arena);
            arena.insert(ResolvedType::Object(props))
        }

        TSType::TSTypeReference(r) => {
            let name = type_name_to_string(&r.type_name);
            match (name.as_str(), r.type_arguments.as_ref().map(|a| a.params.len())) {
                ("Array" | "ReadonlyArray", Some(1)) => {
                    let elem = resolve_ts_type(
                        &r.type_arguments.as_ref().unwrap().params[0],
                        arena,
                    );
                    arena.insert(ResolvedType::Array(elem))
                }
                _ => arena.insert(ResolvedType::Reference(render_reference(&name, r, arena))),
            }
        }

        // Everything else (conditional types, mapped types, template
        // literal types, type queries, indexed access, infer) is beyond
        // what a syntax-only parser can resolve structurally; treat it as
        // the opaque top type rather than guess.
        _ => super::type_model::TOP,
    }
}

fn resolve_tuple_element(elem: &oxc_ast::ast::TSTupleElement<'_>, arena: &mut TypeArena) -> TypeHandle {
    use oxc_ast::ast::TSTupleElement;
    match elem {
        TSTupleElement::TSNamedTupleMember(named) => resolve_ts_type(&named.element_type, arena),
        TSTupleElement::TSOptionalType(opt) => resolve_ts_type(&opt.type_annotation, arena),
        TSTupleElement::TSRestType(rest) => resolve_ts_type(&rest.type_annotation, arena),
        _ => super::type_model::TOP,
    }
}

fn resolve_literal(lit: &TSLiteral<'_>, arena: &mut TypeArena) -> TypeHandle {
    match lit {
        TSLiteral::StringLiteral(s) => {
            arena.insert(ResolvedType::Literal(LiteralValue::String(s.value.to_string())))
        }
        TSLiteral::NumericLiteral(n) => {
            arena.insert(ResolvedType::Literal(LiteralValue::Number(n.raw.to_string())))
        }
        TSLiteral::BooleanLiteral(b) => {
            arena.insert(ResolvedType::Literal(LiteralValue::Boolean(b.value)))
        }
        _ => super::type_model::TOP,
    }
}

pub(crate) fn resolve_signatures(members: &[TSSignature<'_>], arena: &mut TypeArena) -> Vec<PropertyType> {
    let mut props = Vec::new();
    for member in members {
        match member {
            TSSignature::TSPropertySignature(p) => {
                let name = property_key_name(&p.key);
                let ty = match &p.type_annotation {
                    Some(ann) => resolve_ts_type(&ann.type_annotation, arena),
                    None => super::type_model::TOP,
                };
                props.push(PropertyType {
                    name,
                    ty,
                    optional: p.optional,
                    readonly: p.readonly,
                });
            }
            TSSignature::TSMethodSignature(m) => {
                let name = property_key_name(&m.key);
                let params: Vec<TypeHandle> = m
                    .params
                    .items
                    .iter()
                    .map(|param| match &param.pattern.type_annotation {
                        Some(ann) => resolve_ts_type(&ann.type_annotation, arena),
                        None => super::type_model::TOP,
                    })
                    .collect();
                let return_type = m
                    .return_type
                    .as_ref()
                    .map(|r| resolve_ts_type(&r.type_annotation, arena))
                    .unwrap_or(super::type_model::TOP);
                let fn_type = arena.insert(ResolvedType::Function { params, return_type });
                props.push(PropertyType {
                    name,
                    ty: fn_type,
                    optional: m.optional,
                    readonly: false,
                });
            }
            // Call/construct/index signatures have no name to key an
            // object property by; they are not part of the width-subtyping
            // comparison this model performs.
            _ => {}
        }
    }
    props
}

fn property_key_name(key: &oxc_ast::ast::PropertyKey<'_>) -> String {
    use oxc_ast::ast::PropertyKey;
    match key {
        PropertyKey::StaticIdentifier(id) => id.name.to_string(),
        PropertyKey::StringLiteral(s) => s.value.to_string(),
        PropertyKey::NumericLiteral(n) => n.raw.to_string(),
        _ => "<computed>".to_string(),
    }
}

pub fn type_name_to_string(name: &TSTypeName<'_>) -> String {
    match name {
        TSTypeName::IdentifierReference(id) => id.name.to_string(),
        TSTypeName::QualifiedName(q) => {
            format!("{}.{}", type_name_to_string(&q.left), q.right.name)
        }
        TSTypeName::ThisExpression(_) => "this".to_string(),
    }
}

/// A reference's rendered name includes its type arguments so that
/// `Box<string>` and `Box<number>` are distinct references rather than
/// colliding on the bare name `Box`.
fn render_reference(name: &str, r: &oxc_ast::ast::TSTypeReference<'_>, arena: &mut TypeArena) -> String {
    let Some(args) = &r.type_arguments else {
        return name.to_string();
    };
    if args.params.is_empty() {
        return name.to_string();
    }
    let rendered: Vec<String> = args
        .params
        .iter()
        .map(|a| {
            let handle = resolve_ts_type(a, arena);
            arena.type_to_string(handle)
        })
        .collect();
    format!("{}<{}>", name, rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn parse_type_alias_type<'a>(
        allocator: &'a Allocator,
        source: &'a str,
    ) -> oxc_ast::ast::Program<'a> {
        let source_type = SourceType::default().with_typescript(true);
        Parser::new(allocator, source, source_type).parse().program
    }

    #[test]
    fn resolves_primitive_union() {
        let allocator = Allocator::default();
        let program = parse_type_alias_type(&allocator, "type T = string | number;");
        let mut arena = TypeArena::new();
        let alias = find_type_alias(&program);
        let handle = resolve_ts_type(&alias.type_annotation, &mut arena);
        assert_eq!(arena.type_to_string(handle), "number | string");
    }

    #[test]
    fn resolves_object_literal_with_optional_member() {
        let allocator = Allocator::default();
        let program = parse_type_alias_type(&allocator, "type T = { name: string; age?: number };");
        let mut arena = TypeArena::new();
        let alias = find_type_alias(&program);
        let handle = resolve_ts_type(&alias.type_annotation, &mut arena);
        assert_eq!(arena.type_to_string(handle), "{age?: number; name: string}");
    }

    #[test]
    fn resolves_array_shorthand_and_generic_form_identically() {
        let allocator = Allocator::default();
        let program = parse_type_alias_type(&allocator, "type T = string[];");
        let mut arena = TypeArena::new();
        let alias = find_type_alias(&program);
        let handle = resolve_ts_type(&alias.type_annotation, &mut arena);
        assert_eq!(arena.type_to_string(handle), "string[]");

        let program2 = parse_type_alias_type(&allocator, "type T = Array<string>;");
        let mut arena2 = TypeArena::new();
        let alias2 = find_type_alias(&program2);
        let handle2 = resolve_ts_type(&alias2.type_annotation, &mut arena2);
        assert_eq!(arena2.type_to_string(handle2), "string[]");
    }

    #[test]
    fn unresolvable_reference_becomes_a_named_reference() {
        let allocator = Allocator::default();
        let program = parse_type_alias_type(&allocator, "type T = SomeInterface;");
        let mut arena = TypeArena::new();
        let alias = find_type_alias(&program);
        let handle = resolve_ts_type(&alias.type_annotation, &mut arena);
        assert_eq!(arena.type_to_string(handle), "SomeInterface");
    }

    fn find_type_alias<'a>(
        program: &'a oxc_ast::ast::Program<'a>,
    ) -> &'a oxc_ast::ast::TSTypeAliasDeclaration<'a> {
        use oxc_ast::ast::{Declaration, Statement};
        for stmt in &program.body {
            if let Statement::TSTypeAliasDeclaration(t) = stmt {
                return t;
            }
            if let Statement::Declaration(Declaration::TSTypeAliasDeclaration(t)) = stmt {
                return t;
            }
        }
        panic!("no type alias found");
    }
}
