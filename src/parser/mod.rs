//! Parsing a `.d.ts` source string into a [`ModuleSnapshot`] (spec §4.1).
//!
//! `oxc` parses TypeScript syntax into an AST and, via `oxc_semantic`,
//! resolves bindings within one file — it performs no cross-file
//! resolution and no type inference. [`parse`] drives that pipeline the
//! same way the teacher's `analyze_js_file_ast` does (`Allocator` scoped to
//! one call, `Parser::new(..).parse()`, verbose-mode error logging gated
//! on an environment variable), then hands the resulting `Program` to
//! [`visitor::collect`] to build the exported-symbol table.

pub mod doc_comments;
pub mod normalize;
pub mod resolver;
pub mod type_builder;
pub mod type_model;
mod visitor;

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::types::{ModuleSnapshot, SymbolShape};
use doc_comments::DocCommentIndex;
use resolver::LibraryFileResolver;

/// Parse one `.d.ts` source string into a [`ModuleSnapshot`].
///
/// Parse failures never abort the call (spec §4.1, §7): a source string
/// that fails to parse at all yields an empty snapshot with the parser's
/// diagnostics recorded in [`ModuleSnapshot::parse_errors`], so a
/// comparison against it still produces a report (every symbol on the
/// other side shows up as added or removed) rather than an `Err`.
pub fn parse(source: &str, filename: &str) -> ModuleSnapshot {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_typescript(true).with_module(true);

    let ret = Parser::new(&allocator, source, source_type).parse();

    let mut parse_errors: Vec<String> = Vec::new();
    if !ret.errors.is_empty() {
        if std::env::var("DTSCOMPAT_VERBOSE").is_ok() {
            eprintln!("[dtscompat][debug] parser errors in {filename}: {} errors", ret.errors.len());
            for (i, err) in ret.errors.iter().take(5).enumerate() {
                eprintln!("  [{}] {}", i + 1, err);
            }
        }
        for err in &ret.errors {
            parse_errors.push(format!("{filename}: {err}"));
        }
    }

    let mut arena = type_model::TypeArena::new();
    let doc_index = DocCommentIndex::new(source, &ret.program.comments);
    let collected = visitor::collect(&ret.program, source, &doc_index, &mut arena);

    parse_errors.extend(collected.warnings);

    ModuleSnapshot {
        symbols: collected.symbols,
        parse_errors,
        types: arena,
    }
}

/// Parse a `.d.ts` source string, then resolve every still-unresolved
/// [`crate::parser::type_model::ResolvedType::Reference`] one level
/// through `resolver` (spec §4.1 step 1): a reference that names neither a
/// local declaration nor anything the resolver has heard of is left as an
/// opaque reference, which the subtype oracle treats conservatively.
pub fn parse_with_resolver(
    source: &str,
    filename: &str,
    resolver: Option<&dyn LibraryFileResolver>,
) -> ModuleSnapshot {
    let mut snapshot = parse(source, filename);
    if let Some(resolver) = resolver {
        resolve_library_references(&mut snapshot, resolver);
    }
    snapshot
}

fn resolve_library_references(snapshot: &mut ModuleSnapshot, resolver: &dyn LibraryFileResolver) {
    for (handle, name) in snapshot.types.unresolved_references() {
        let base_name = name.split('<').next().unwrap_or(&name);
        if snapshot.symbols.contains_key(base_name) {
            continue;
        }
        let lib_source = match resolver.resolve(base_name) {
            Ok(Some(text)) => text,
            _ => continue,
        };
        let lib_snapshot = parse(&lib_source, &format!("{base_name}.d.ts"));
        let Some(lib_symbol) = lib_snapshot.symbols.get(base_name) else {
            continue;
        };
        if let Some(SymbolShape::Value(lib_handle)) = lib_symbol.shape {
            let imported = snapshot.types.import(&lib_snapshot.types, lib_handle);
            let resolved = snapshot.types.get(imported).clone();
            snapshot.types.patch(handle, resolved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SymbolKind;

    #[test]
    fn parses_exported_function() {
        let snapshot = parse("export declare function f(a: string): number;", "test.d.ts");
        let f = snapshot.symbols.get("f").expect("f exported");
        assert_eq!(f.kind, SymbolKind::Function);
        assert_eq!(f.signature, "(arg0: string) => number");
    }

    #[test]
    fn parses_interface_with_optional_member() {
        let snapshot = parse(
            "export interface User { name: string; email?: string; }",
            "test.d.ts",
        );
        let user = snapshot.symbols.get("User").unwrap();
        assert_eq!(user.kind, SymbolKind::Interface);
        assert_eq!(user.signature, "{email?: string; name: string}");
    }

    #[test]
    fn joins_function_overloads_in_declaration_order() {
        let source = "export declare function f(a: string): void;\nexport declare function f(a: number): void;";
        let snapshot = parse(source, "test.d.ts");
        let f = snapshot.symbols.get("f").unwrap();
        assert_eq!(f.signature, "(arg0: string) => void; (arg0: number) => void");
    }

    #[test]
    fn export_specifier_aliases_a_local_declaration() {
        let source = "declare function helper(): void;\nexport { helper as run };";
        let snapshot = parse(source, "test.d.ts");
        assert!(snapshot.symbols.contains_key("run"));
        assert!(!snapshot.symbols.contains_key("helper"));
    }

    #[test]
    fn enum_signature_includes_member_values() {
        let snapshot = parse("export enum Color { Red, Green, Blue }", "test.d.ts");
        let color = snapshot.symbols.get("Color").unwrap();
        assert_eq!(color.signature, "enum {Blue = 2, Green = 1, Red = 0}");
    }

    #[test]
    fn const_enum_signature_differs_from_plain_enum() {
        let plain = parse("export enum Color { Red }", "test.d.ts");
        let constant = parse("export const enum Color { Red }", "test.d.ts");
        let plain_sig = &plain.symbols.get("Color").unwrap().signature;
        let const_sig = &constant.symbols.get("Color").unwrap().signature;
        assert_ne!(plain_sig, const_sig);
        assert!(const_sig.starts_with("const enum"));
    }

    #[test]
    fn class_signature_includes_constructor_abstract_and_heritage() {
        let snapshot = parse(
            "export abstract class Widget extends Base implements Disposable { constructor(id: string) {} dispose(): void {} }",
            "test.d.ts",
        );
        let widget = snapshot.symbols.get("Widget").unwrap();
        assert!(widget.signature.starts_with("abstract class"));
        assert!(widget.signature.contains("extends Base"));
        assert!(widget.signature.contains("implements Disposable"));
        assert!(widget.signature.contains("new (arg0: string) => Widget"));
    }

    #[test]
    fn a_changed_constructor_signature_is_visible_in_the_class_signature() {
        let one_arg = parse("export class Widget { constructor(id: string) {} }", "test.d.ts");
        let two_args = parse("export class Widget { constructor(id: string, name: string) {} }", "test.d.ts");
        assert_ne!(
            one_arg.symbols.get("Widget").unwrap().signature,
            two_args.symbols.get("Widget").unwrap().signature
        );
    }

    #[test]
    fn a_callable_variable_is_kinded_as_a_function() {
        let snapshot = parse("export const f: (x: number) => void;", "test.d.ts");
        let f = snapshot.symbols.get("f").unwrap();
        assert_eq!(f.kind, SymbolKind::Function);
    }

    #[test]
    fn a_non_callable_variable_stays_kinded_as_a_variable() {
        let snapshot = parse("export const f: number;", "test.d.ts");
        let f = snapshot.symbols.get("f").unwrap();
        assert_eq!(f.kind, SymbolKind::Variable);
    }

    #[test]
    fn wildcard_reexport_is_a_soft_warning_not_a_panic() {
        let snapshot = parse("export * from './other';", "test.d.ts");
        assert!(!snapshot.parse_errors.is_empty());
    }

    #[test]
    fn unparsable_source_yields_empty_snapshot_with_errors() {
        let snapshot = parse("export interface {{{ not valid", "test.d.ts");
        assert!(snapshot.symbols.is_empty());
        assert!(!snapshot.parse_errors.is_empty());
    }

    #[test]
    fn library_file_resolver_expands_an_unresolved_reference() {
        use crate::parser::resolver::BundledResolver;
        use crate::parser::type_model::ResolvedType;

        static LIB: &[(&str, &str)] =
            &[("Widget", "export interface Widget { id: string; }")];
        let resolver = BundledResolver::new(LIB);

        let snapshot = parse_with_resolver(
            "export declare function make(): Widget;",
            "test.d.ts",
            Some(&resolver),
        );
        let make = snapshot.symbols.get("make").unwrap();
        let shape = match &make.shape {
            Some(SymbolShape::Function(overloads)) => &overloads[0],
            _ => panic!("expected a function shape"),
        };
        assert!(matches!(snapshot.types.get(shape.return_type), ResolvedType::Object(_)));
    }

    #[test]
    fn unresolved_reference_without_a_resolver_stays_opaque() {
        use crate::parser::type_model::ResolvedType;

        let snapshot = parse_with_resolver(
            "export declare function make(): Widget;",
            "test.d.ts",
            None,
        );
        let make = snapshot.symbols.get("make").unwrap();
        let shape = match &make.shape {
            Some(SymbolShape::Function(overloads)) => &overloads[0],
            _ => panic!("expected a function shape"),
        };
        assert!(matches!(snapshot.types.get(shape.return_type), ResolvedType::Reference(_)));
    }
}
