//! Top-level declaration collection (spec §4.1).
//!
//! A `.d.ts` file's public surface lives entirely at module top level —
//! there are no function bodies to traverse, no call expressions, nothing
//! the teacher's full `Visit` implementation exists for. This collector
//! walks `Program::body` directly in two passes: the first indexes every
//! top-level declaration by name regardless of whether it is exported (a
//! `.d.ts` file commonly declares a symbol and exports it by name later:
//! `declare function f(): void; export { f };`); the second walks the
//! `export` statements themselves and builds one [`ExportedSymbol`] per
//! exported name, joining function overloads in declaration order.

use std::collections::BTreeMap;

use oxc_ast::ast::{
    ClassElement, Declaration, Expression, MethodDefinitionKind, Program, PropertyKey, Statement,
    TSAccessibility, TSEnumMemberName, TSModuleDeclarationBody, TSModuleDeclarationName,
};
use oxc_span::Span;

use crate::types::{
    ExportedSymbol, FunctionParam, FunctionShape, SourceLocation, SymbolKind, SymbolShape,
};

use super::doc_comments::DocCommentIndex;
use super::normalize::{
    apply_generic_renames, class_signature, enum_signature, generic_rename_map, join_overloads, namespace_signature,
    ClassHeader,
};
use super::type_builder::resolve_ts_type;
use super::type_model::TypeArena;

/// One declaration found at top level, keyed by name, before export
/// resolution decides which names are actually part of the public
/// surface.
enum LocalDecl<'a> {
    Function(Vec<&'a oxc_ast::ast::Function<'a>>),
    Interface(&'a oxc_ast::ast::TSInterfaceDeclaration<'a>),
    TypeAlias(&'a oxc_ast::ast::TSTypeAliasDeclaration<'a>),
    Enum(&'a oxc_ast::ast::TSEnumDeclaration<'a>),
    Class(&'a oxc_ast::ast::Class<'a>),
    Namespace(&'a oxc_ast::ast::TSModuleDeclaration<'a>),
    Variable {
        ty: Option<&'a oxc_ast::ast::TSTypeAnnotation<'a>>,
        span: Span,
    },
}

pub struct Collected {
    pub symbols: BTreeMap<String, ExportedSymbol>,
    pub warnings: Vec<String>,
}

pub fn collect(program: &Program<'_>, source: &str, doc_index: &DocCommentIndex<'_>, arena: &mut TypeArena) -> Collected {
    let mut locals: BTreeMap<String, LocalDecl<'_>> = BTreeMap::new();
    index_statements(&program.body, &mut locals);

    let mut symbols = BTreeMap::new();
    let mut warnings = Vec::new();

    for stmt in &program.body {
        match stmt {
            Statement::ExportNamedDeclaration(decl) => {
                if let Some(declaration) = &decl.declaration {
                    if let Some((name, symbol)) = build_from_declaration(declaration, source, doc_index, arena) {
                        symbols.insert(name, symbol);
                    }
                } else if decl.source.is_some() {
                    warnings.push(format!(
                        "unresolved re-export from external module at byte {}",
                        decl.span.start
                    ));
                } else {
                    for spec in &decl.specifiers {
                        let local_name = module_export_name(&spec.local);
                        let exported_name = module_export_name(&spec.exported);
                        match locals.get(&local_name) {
                            Some(local) => {
                                if let Some(symbol) =
                                    build_from_local(local, &exported_name, source, doc_index, arena)
                                {
                                    symbols.insert(exported_name, symbol);
                                }
                            }
                            None => warnings.push(format!(
                                "export specifier '{local_name}' has no matching local declaration"
                            )),
                        }
                    }
                }
            }
            Statement::ExportDefaultDeclaration(decl) => {
                if let Some(symbol) = build_default(decl, source, doc_index, arena) {
                    symbols.insert("default".to_string(), symbol);
                }
            }
            Statement::ExportAllDeclaration(decl) => {
                warnings.push(format!(
                    "unresolved wildcard re-export at byte {}",
                    decl.span.start
                ));
            }
            _ => {}
        }
    }

    Collected { symbols, warnings }
}

fn module_export_name(name: &oxc_ast::ast::ModuleExportName<'_>) -> String {
    use oxc_ast::ast::ModuleExportName;
    match name {
        ModuleExportName::IdentifierName(id) => id.name.to_string(),
        ModuleExportName::IdentifierReference(id) => id.name.to_string(),
        ModuleExportName::StringLiteral(s) => s.value.to_string(),
    }
}

fn index_statements<'a>(body: &'a [Statement<'a>], locals: &mut BTreeMap<String, LocalDecl<'a>>) {
    for stmt in body {
        let decl = match stmt {
            Statement::ExportNamedDeclaration(d) => d.declaration.as_ref(),
            Statement::Declaration(d) => Some(d),
            _ => None,
        };
        let Some(decl) = decl else { continue };
        index_declaration(decl, locals);
    }
}

fn index_declaration<'a>(decl: &'a Declaration<'a>, locals: &mut BTreeMap<String, LocalDecl<'a>>) {
    match decl {
        Declaration::FunctionDeclaration(f) => {
            let Some(id) = &f.id else { return };
            let name = id.name.to_string();
            match locals.get_mut(&name) {
                Some(LocalDecl::Function(overloads)) => overloads.push(f),
                _ => {
                    locals.insert(name, LocalDecl::Function(vec![f]));
                }
            }
        }
        Declaration::TSInterfaceDeclaration(i) => {
            locals.insert(i.id.name.to_string(), LocalDecl::Interface(i));
        }
        Declaration::TSTypeAliasDeclaration(t) => {
            locals.insert(t.id.name.to_string(), LocalDecl::TypeAlias(t));
        }
        Declaration::TSEnumDeclaration(e) => {
            locals.insert(e.id.name.to_string(), LocalDecl::Enum(e));
        }
        Declaration::ClassDeclaration(c) => {
            if let Some(id) = &c.id {
                locals.insert(id.name.to_string(), LocalDecl::Class(c));
            }
        }
        Declaration::TSModuleDeclaration(m) => {
            let name = module_decl_name(&m.id);
            locals.insert(name, LocalDecl::Namespace(m));
        }
        Declaration::VariableDeclaration(var) => {
            for d in &var.declarations {
                if let oxc_ast::ast::BindingPattern::BindingIdentifier(id) = &d.id {
                    locals.insert(
                        id.name.to_string(),
                        LocalDecl::Variable {
                            ty: d.id.type_annotation.as_deref(),
                            span: d.span,
                        },
                    );
                }
            }
        }
        _ => {}
    }
}

fn module_decl_name(name: &TSModuleDeclarationName<'_>) -> String {
    match name {
        TSModuleDeclarationName::Identifier(id) => id.name.to_string(),
        TSModuleDeclarationName::StringLiteral(s) => s.value.to_string(),
    }
}

fn build_from_declaration<'a>(
    decl: &'a Declaration<'a>,
    source: &str,
    doc_index: &DocCommentIndex<'_>,
    arena: &mut TypeArena,
) -> Option<(String, ExportedSymbol)> {
    match decl {
        Declaration::FunctionDeclaration(f) => {
            let name = f.id.as_ref()?.name.to_string();
            Some((name.clone(), function_symbol(&name, &[f], source, doc_index, arena)))
        }
        Declaration::TSInterfaceDeclaration(i) => {
            Some((i.id.name.to_string(), interface_symbol(i, source, doc_index, arena)))
        }
        Declaration::TSTypeAliasDeclaration(t) => {
            Some((t.id.name.to_string(), type_alias_symbol(t, source, doc_index, arena)))
        }
        Declaration::TSEnumDeclaration(e) => {
            Some((e.id.name.to_string(), enum_symbol(e, source, doc_index, arena)))
        }
        Declaration::ClassDeclaration(c) => {
            let name = c.id.as_ref()?.name.to_string();
            Some((name.clone(), class_symbol(&name, c, source, doc_index, arena)))
        }
        Declaration::TSModuleDeclaration(m) => {
            let name = module_decl_name(&m.id);
            Some((name.clone(), namespace_symbol(&name, m, source, doc_index, arena)))
        }
        Declaration::VariableDeclaration(var) => {
            var.declarations.iter().find_map(|d| {
                if let oxc_ast::ast::BindingPattern::BindingIdentifier(id) = &d.id {
                    let name = id.name.to_string();
                    Some((
                        name.clone(),
                        variable_symbol(&name, d.id.type_annotation.as_deref(), d.span, source, doc_index, arena),
                    ))
                } else {
                    None
                }
            })
        }
        _ => None,
    }
}

fn build_from_local(
    local: &LocalDecl<'_>,
    exported_name: &str,
    source: &str,
    doc_index: &DocCommentIndex<'_>,
    arena: &mut TypeArena,
) -> Option<ExportedSymbol> {
    let symbol = match local {
        LocalDecl::Function(overloads) => function_symbol(exported_name, overloads, source, doc_index, arena),
        LocalDecl::Interface(i) => interface_symbol(i, source, doc_index, arena),
        LocalDecl::TypeAlias(t) => type_alias_symbol(t, source, doc_index, arena),
        LocalDecl::Enum(e) => enum_symbol(e, source, doc_index, arena),
        LocalDecl::Class(c) => class_symbol(exported_name, c, source, doc_index, arena),
        LocalDecl::Namespace(m) => namespace_symbol(exported_name, m, source, doc_index, arena),
        LocalDecl::Variable { ty, span } => variable_symbol(exported_name, *ty, *span, source, doc_index, arena),
    };
    Some(symbol.renamed(exported_name))
}

fn build_default(
    decl: &oxc_ast::ast::ExportDefaultDeclaration<'_>,
    source: &str,
    doc_index: &DocCommentIndex<'_>,
    arena: &mut TypeArena,
) -> Option<ExportedSymbol> {
    use oxc_ast::ast::ExportDefaultDeclarationKind;
    match &decl.declaration {
        ExportDefaultDeclarationKind::FunctionDeclaration(f) => {
            Some(function_symbol("default", &[f], source, doc_index, arena))
        }
        ExportDefaultDeclarationKind::ClassDeclaration(c) => {
            Some(class_symbol("default", c, source, doc_index, arena))
        }
        ExportDefaultDeclarationKind::TSInterfaceDeclaration(i) => {
            Some(interface_symbol(i, source, doc_index, arena).renamed("default"))
        }
        _ => None,
    }
}

fn source_location(span: Span, source: &str) -> SourceLocation {
    let line = line_of(source, span.start);
    let end_line = line_of(source, span.end);
    SourceLocation {
        line,
        column: 0,
        end_line: Some(end_line),
        end_column: None,
    }
}

fn line_of(source: &str, pos: u32) -> u32 {
    let capped = std::cmp::min(pos as usize, source.len());
    source[..capped].bytes().filter(|b| *b == b'\n').count() as u32 + 1
}

/// The identifier a parameter pattern was written with, or `None` for
/// destructured/other patterns that have no single name (§4.3's reorder
/// detection falls back to the erased `arg{i}` form in that case).
fn binding_source_name(pattern: &oxc_ast::ast::BindingPattern<'_>) -> Option<String> {
    match pattern {
        oxc_ast::ast::BindingPattern::BindingIdentifier(id) => Some(id.name.to_string()),
        _ => None,
    }
}

fn function_symbol(
    name: &str,
    overloads: &[&oxc_ast::ast::Function<'_>],
    source: &str,
    doc_index: &DocCommentIndex<'_>,
    arena: &mut TypeArena,
) -> ExportedSymbol {
    let mut rendered_overloads = Vec::new();
    let mut shapes = Vec::new();
    for f in overloads {
        let generics: Vec<String> = f
            .type_parameters
            .as_ref()
            .map(|d| d.params.iter().map(|p| p.name.name.to_string()).collect())
            .unwrap_or_default();
        let rename_refs: Vec<&str> = generics.iter().map(|s| s.as_str()).collect();
        let renames = generic_rename_map(&rename_refs);

        let mut params = Vec::new();
        let mut rendered_params = Vec::new();
        for (i, p) in f.params.items.iter().enumerate() {
            let ty = match &p.pattern.type_annotation {
                Some(ann) => resolve_ts_type(&ann.type_annotation, arena),
                None => super::type_model::TOP,
            };
            let optional = p.pattern.optional;
            let rendered_ty = apply_generic_renames(&arena.type_to_string(ty), &renames);
            let erased = format!("arg{i}");
            rendered_params.push(format!("{erased}{}: {}", if optional { "?" } else { "" }, rendered_ty));
            params.push(FunctionParam {
                source_name: binding_source_name(&p.pattern).unwrap_or_else(|| erased.clone()),
                name: erased,
                ty,
                optional,
            });
        }
        if let Some(rest) = &f.params.rest {
            let ty = match &rest.argument.type_annotation {
                Some(ann) => resolve_ts_type(&ann.type_annotation, arena),
                None => super::type_model::TOP,
            };
            let rendered_ty = apply_generic_renames(&arena.type_to_string(ty), &renames);
            let erased = format!("arg{}", params.len());
            rendered_params.push(format!("...{erased}: {}", rendered_ty));
            params.push(FunctionParam {
                source_name: binding_source_name(&rest.argument).unwrap_or_else(|| erased.clone()),
                name: erased,
                ty,
                optional: true,
            });
        }

        let return_type = match &f.return_type {
            Some(ann) => resolve_ts_type(&ann.type_annotation, arena),
            None => super::type_model::TOP,
        };
        let rendered_return = apply_generic_renames(&arena.type_to_string(return_type), &renames);

        rendered_overloads.push(format!("({}) => {}", rendered_params.join(", "), rendered_return));
        shapes.push(FunctionShape { params, return_type });
    }

    let mut symbol = ExportedSymbol::new(name, SymbolKind::Function, join_overloads(rendered_overloads));
    symbol.shape = Some(SymbolShape::Function(shapes));
    symbol.source_location = Some(source_location(overloads[0].span, source));
    symbol.metadata = doc_index.metadata_for(overloads[0].span);
    symbol
}

fn interface_symbol(
    i: &oxc_ast::ast::TSInterfaceDeclaration<'_>,
    source: &str,
    doc_index: &DocCommentIndex<'_>,
    arena: &mut TypeArena,
) -> ExportedSymbol {
    let generics: Vec<String> = i
        .type_parameters
        .as_ref()
        .map(|d| d.params.iter().map(|p| p.name.name.to_string()).collect())
        .unwrap_or_default();
    let rename_refs: Vec<&str> = generics.iter().map(|s| s.as_str()).collect();
    let renames = generic_rename_map(&rename_refs);

    let props = super::type_builder::resolve_signatures(&i.body.body, arena);
    let handle = arena.insert(super::type_model::ResolvedType::Object(props));
    let rendered = apply_generic_renames(&arena.type_to_string(handle), &renames);

    let mut symbol = ExportedSymbol::new(i.id.name.to_string(), SymbolKind::Interface, rendered);
    symbol.shape = Some(SymbolShape::Value(handle));
    symbol.source_location = Some(source_location(i.span, source));
    symbol.metadata = doc_index.metadata_for(i.span);
    symbol
}

fn type_alias_symbol(
    t: &oxc_ast::ast::TSTypeAliasDeclaration<'_>,
    source: &str,
    doc_index: &DocCommentIndex<'_>,
    arena: &mut TypeArena,
) -> ExportedSymbol {
    let generics: Vec<String> = t
        .type_parameters
        .as_ref()
        .map(|d| d.params.iter().map(|p| p.name.name.to_string()).collect())
        .unwrap_or_default();
    let rename_refs: Vec<&str> = generics.iter().map(|s| s.as_str()).collect();
    let renames = generic_rename_map(&rename_refs);

    let handle = resolve_ts_type(&t.type_annotation, arena);
    let rendered = apply_generic_renames(&arena.type_to_string(handle), &renames);

    let mut symbol = ExportedSymbol::new(t.id.name.to_string(), SymbolKind::TypeAlias, rendered);
    symbol.shape = Some(SymbolShape::Value(handle));
    symbol.source_location = Some(source_location(t.span, source));
    symbol.metadata = doc_index.metadata_for(t.span);
    symbol
}

fn enum_symbol(
    e: &oxc_ast::ast::TSEnumDeclaration<'_>,
    source: &str,
    doc_index: &DocCommentIndex<'_>,
    arena: &mut TypeArena,
) -> ExportedSymbol {
    let mut members = Vec::new();
    for (idx, member) in e.members.iter().enumerate() {
        let name = match &member.id {
            TSEnumMemberName::Identifier(id) => id.name.to_string(),
            TSEnumMemberName::String(s) => s.value.to_string(),
        };
        let value = match &member.initializer {
            Some(Expression::StringLiteral(s)) => format!("\"{}\"", s.value),
            Some(Expression::NumericLiteral(n)) => n.raw.to_string(),
            Some(_) => idx.to_string(),
            None => idx.to_string(),
        };
        members.push((name, value));
    }
    let rendered = enum_signature(members, e.r#const);

    let mut symbol = ExportedSymbol::new(e.id.name.to_string(), SymbolKind::Enum, rendered);
    symbol.shape = Some(SymbolShape::Value(arena.insert(super::type_model::ResolvedType::Reference(format!("enum:{}", e.id.name)))));
    symbol.source_location = Some(source_location(e.span, source));
    symbol.metadata = doc_index.metadata_for(e.span);
    symbol
}

fn class_symbol(
    name: &str,
    c: &oxc_ast::ast::Class<'_>,
    source: &str,
    doc_index: &DocCommentIndex<'_>,
    arena: &mut TypeArena,
) -> ExportedSymbol {
    let generics: Vec<String> = c
        .type_parameters
        .as_ref()
        .map(|d| d.params.iter().map(|p| p.name.name.to_string()).collect())
        .unwrap_or_default();
    let rename_refs: Vec<&str> = generics.iter().map(|s| s.as_str()).collect();
    let renames = generic_rename_map(&rename_refs);
    let rendered_generics: Vec<String> = (0..generics.len()).map(|i| format!("T{i}")).collect();

    let mut members = Vec::new();
    for element in &c.body.body {
        match element {
            ClassElement::MethodDefinition(m) => {
                if is_private(m.accessibility) || m.key.is_private_identifier() {
                    continue;
                }
                let is_constructor = m.kind == MethodDefinitionKind::Constructor;
                let key = if is_constructor { "new".to_string() } else { class_member_key(&m.key) };
                let params: Vec<String> = m
                    .value
                    .params
                    .items
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let ty = match &p.pattern.type_annotation {
                            Some(ann) => resolve_ts_type(&ann.type_annotation, arena),
                            None => super::type_model::TOP,
                        };
                        let rendered_ty = apply_generic_renames(&arena.type_to_string(ty), &renames);
                        format!("arg{i}: {rendered_ty}")
                    })
                    .collect();
                let sig = if is_constructor {
                    format!("new ({}) => {}", params.join(", "), name)
                } else {
                    let ret = m
                        .value
                        .return_type
                        .as_ref()
                        .map(|r| resolve_ts_type(&r.type_annotation, arena))
                        .unwrap_or(super::type_model::TOP);
                    let rendered_ret = apply_generic_renames(&arena.type_to_string(ret), &renames);
                    let prefix = if m.r#static { "static " } else { "" };
                    format!("{prefix}({}) => {rendered_ret}", params.join(", "))
                };
                members.push((key, sig));
            }
            ClassElement::PropertyDefinition(p) => {
                if is_private(p.accessibility) || p.key.is_private_identifier() {
                    continue;
                }
                let key = class_member_key(&p.key);
                let ty = match &p.type_annotation {
                    Some(ann) => resolve_ts_type(&ann.type_annotation, arena),
                    None => super::type_model::TOP,
                };
                let rendered_ty = apply_generic_renames(&arena.type_to_string(ty), &renames);
                let prefix = if p.r#static { "static " } else { "" };
                let opt = if p.optional { "?" } else { "" };
                members.push((key, format!("{prefix}{opt}{rendered_ty}")));
            }
            _ => {}
        }
    }

    let extends = c.super_class.as_ref().map(|expr| {
        let base = expression_type_name(expr);
        apply_generic_renames(&base, &renames)
    });
    let implements: Vec<String> = c
        .implements
        .iter()
        .flat_map(|list| list.iter())
        .map(|i| apply_generic_renames(&ts_type_name_to_string(&i.expression), &renames))
        .collect();

    let header = ClassHeader {
        is_abstract: c.r#abstract,
        generics: rendered_generics,
        extends,
        implements,
    };
    let rendered = class_signature(members, header);

    let mut symbol = ExportedSymbol::new(name, SymbolKind::Class, rendered);
    symbol.shape = Some(SymbolShape::Value(arena.insert(super::type_model::ResolvedType::Reference(format!("class:{name}")))));
    symbol.source_location = Some(source_location(c.span, source));
    symbol.metadata = doc_index.metadata_for(c.span);
    symbol
}

/// Best-effort name of a class's `extends` expression — almost always a
/// plain or qualified identifier; anything more dynamic renders as `<expr>`
/// so a base-class change is still visible as *some* signature change
/// rather than silently ignored.
fn expression_type_name(expr: &Expression<'_>) -> String {
    match expr {
        Expression::Identifier(id) => id.name.to_string(),
        Expression::StaticMemberExpression(m) => {
            format!("{}.{}", expression_type_name(&m.object), m.property.name)
        }
        _ => "<expr>".to_string(),
    }
}

fn ts_type_name_to_string(name: &oxc_ast::ast::TSTypeName<'_>) -> String {
    match name {
        oxc_ast::ast::TSTypeName::IdentifierReference(id) => id.name.to_string(),
        oxc_ast::ast::TSTypeName::QualifiedName(q) => {
            format!("{}.{}", ts_type_name_to_string(&q.left), q.right.name)
        }
    }
}

fn is_private(accessibility: Option<TSAccessibility>) -> bool {
    matches!(accessibility, Some(TSAccessibility::Private))
}

fn class_member_key(key: &PropertyKey<'_>) -> String {
    match key {
        PropertyKey::StaticIdentifier(id) => id.name.to_string(),
        PropertyKey::StringLiteral(s) => s.value.to_string(),
        PropertyKey::PrivateIdentifier(id) => format!("#{}", id.name),
        _ => "<computed>".to_string(),
    }
}

fn namespace_symbol(
    name: &str,
    m: &oxc_ast::ast::TSModuleDeclaration<'_>,
    source: &str,
    doc_index: &DocCommentIndex<'_>,
    arena: &mut TypeArena,
) -> ExportedSymbol {
    let mut members = Vec::new();
    if let Some(TSModuleDeclarationBody::TSModuleBlock(block)) = &m.body {
        let mut locals = BTreeMap::new();
        index_statements(&block.body, &mut locals);
        for (member_name, local) in &locals {
            if let Some(symbol) = build_from_local(local, member_name, source, doc_index, arena) {
                members.push((member_name.clone(), symbol.signature));
            }
        }
    }
    let rendered = namespace_signature(members);

    let mut symbol = ExportedSymbol::new(name, SymbolKind::Namespace, rendered);
    symbol.shape = Some(SymbolShape::Value(arena.insert(super::type_model::ResolvedType::Reference(format!("namespace:{name}")))));
    symbol.source_location = Some(source_location(m.span, source));
    symbol.metadata = doc_index.metadata_for(m.span);
    symbol
}

fn variable_symbol(
    name: &str,
    ty: Option<&oxc_ast::ast::TSTypeAnnotation<'_>>,
    span: Span,
    source: &str,
    doc_index: &DocCommentIndex<'_>,
    arena: &mut TypeArena,
) -> ExportedSymbol {
    let handle = match ty {
        Some(ann) => resolve_ts_type(&ann.type_annotation, arena),
        None => super::type_model::TOP,
    };
    let rendered = arena.type_to_string(handle);

    // A variable whose declared type has a call signature is a callable
    // value (e.g. `export const f: (x: number) => void;`) and is reported
    // as `function`, not `variable` — it needs to compare and rename-pair
    // against `declare function` symbols of the same shape.
    let kind = if matches!(arena.get(handle), super::type_model::ResolvedType::Function { .. }) {
        SymbolKind::Function
    } else {
        SymbolKind::Variable
    };

    let mut symbol = ExportedSymbol::new(name, kind, rendered);
    symbol.shape = Some(SymbolShape::Value(handle));
    symbol.source_location = Some(source_location(span, source));
    symbol.metadata = doc_index.metadata_for(span);
    symbol
}

impl ExportedSymbol {
    fn renamed(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}
