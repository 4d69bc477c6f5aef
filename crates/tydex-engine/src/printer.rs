//! Declaration printing for parsed modules.
//!
//! Turns a parsed [`Module`] into `.d.ts` text. Statements that are
//! already declaration syntax (interfaces, type aliases, ambient modules,
//! import/export clauses) are sliced verbatim from the source text; value
//! declarations are rebuilt in ambient form with bodies and initializers
//! dropped. Positions with no type annotation degrade to widened literal
//! types or `any` instead of failing, so output is produced for every
//! parseable input.

use tydex_parser::ast::{
    ClassDecl, ClassMember, Declarator, DeclaratorName, EnumDecl, ExportDefaultExpr, FunctionDecl,
    InitKind, InterfaceDecl, MemberKind, ModuleDecl, Param, PropName, Statement, TypeAliasDecl,
    VarKind, VariableDecl, Visibility,
};
use tydex_parser::{Module, Span};

use crate::emit::{Diagnostic, DiagnosticCategory};

/// Declaration text produced from one source file.
#[derive(Debug, Clone)]
pub struct PrintedFile {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Print the declaration form of a parsed module.
///
/// `path` is used only for diagnostic locations. The output is always
/// module-shaped: a file with nothing to declare becomes `export {};`.
pub fn print_declarations(path: &str, source: &str, module: &Module) -> PrintedFile {
    let mut printer = Printer {
        path,
        source,
        out: String::new(),
        diagnostics: Vec::new(),
    };
    printer.statements(&module.statements, false, 0);
    if printer.out.is_empty() {
        printer.out.push_str("export {};\n");
    }
    PrintedFile {
        text: printer.out,
        diagnostics: printer.diagnostics,
    }
}

struct Printer<'a> {
    path: &'a str,
    source: &'a str,
    out: String,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Printer<'a> {
    /// Print a statement list. `ambient` is true inside a `declare`d
    /// container, where members must not repeat the keyword.
    fn statements(&mut self, statements: &[Statement], ambient: bool, depth: usize) {
        // Name of the immediately preceding bodiless overload signature.
        // The implementation that closes a signature group restates no
        // type information and is dropped from output.
        let mut open_overload: Option<&str> = None;
        for statement in statements {
            if let Statement::Function(func) = statement {
                let name = func.name.as_deref();
                if func.has_body && name.is_some() && name == open_overload {
                    continue;
                }
                open_overload = if func.has_body { None } else { name };
            } else {
                open_overload = None;
            }
            self.statement(statement, ambient, depth);
        }
    }

    fn statement(&mut self, statement: &Statement, ambient: bool, depth: usize) {
        match statement {
            Statement::Import(decl) => self.verbatim(decl.span, depth),
            Statement::ExportNamed(decl) => self.verbatim(decl.span, depth),
            Statement::ExportAll(decl) => self.verbatim(decl.span, depth),
            Statement::ExportAssignment(decl) => self.verbatim(decl.span, depth),
            Statement::ExportDefaultExpr(decl) => self.export_default_expr(decl, depth),
            Statement::Function(decl) => self.function(decl, ambient, depth),
            Statement::Class(decl) => self.class(decl, ambient, depth),
            Statement::Interface(decl) => self.interface(decl, depth),
            Statement::TypeAlias(decl) => self.type_alias(decl, depth),
            Statement::Enum(decl) => self.enum_decl(decl, ambient, depth),
            Statement::Variable(decl) => self.variable(decl, ambient, depth),
            Statement::ModuleBlock(decl) => self.module_block(decl, ambient, depth),
        }
    }

    fn export_default_expr(&mut self, decl: &ExportDefaultExpr, depth: usize) {
        // `export default <expr>` needs a named intermediate in ambient
        // form; `_default` matches the name tsc synthesizes.
        let ty = if decl.init.is_literal() {
            decl.expr_span.slice(self.source).trim().to_string()
        } else {
            decl.init.widened().unwrap_or("any").to_string()
        };
        self.line(depth, &format!("declare const _default: {};", ty));
        self.line(depth, "export default _default;");
    }

    fn function(&mut self, decl: &FunctionDecl, ambient: bool, depth: usize) {
        let mut text = String::new();
        if decl.is_default {
            text.push_str("export default ");
        } else {
            if decl.is_exported {
                text.push_str("export ");
            }
            if !ambient {
                text.push_str("declare ");
            }
        }
        text.push_str("function ");
        if let Some(name) = &decl.name {
            text.push_str(name);
        }
        if let Some(type_params) = &decl.type_params {
            text.push_str(type_params.slice(self.source).trim());
        }
        text.push('(');
        text.push_str(&self.param_list(&decl.params, false));
        text.push_str("): ");
        text.push_str(&self.return_type(decl.return_ty.as_ref(), decl.is_async));
        text.push(';');
        self.line(depth, &text);
    }

    fn class(&mut self, decl: &ClassDecl, ambient: bool, depth: usize) {
        let mut text = String::new();
        if decl.is_default {
            text.push_str("export default ");
        } else {
            if decl.is_exported {
                text.push_str("export ");
            }
            if !ambient {
                text.push_str("declare ");
            }
        }
        if decl.is_abstract {
            text.push_str("abstract ");
        }
        text.push_str("class");
        if let Some(name) = &decl.name {
            text.push(' ');
            text.push_str(name);
        }
        if let Some(type_params) = &decl.type_params {
            text.push_str(type_params.slice(self.source).trim());
        }
        if let Some(extends) = &decl.extends {
            text.push_str(" extends ");
            text.push_str(extends.slice(self.source).trim());
        }
        if let Some(implements) = &decl.implements {
            text.push_str(" implements ");
            text.push_str(implements.slice(self.source).trim());
        }
        text.push_str(" {");
        self.line(depth, &text);
        let mut emitted_private: Vec<(bool, String)> = Vec::new();
        for member in &decl.members {
            self.member(member, &mut emitted_private, depth + 1);
        }
        self.line(depth, "}");
    }

    fn member(&mut self, member: &ClassMember, emitted: &mut Vec<(bool, String)>, depth: usize) {
        let name = match &member.name {
            PropName::Ident(name) => name.clone(),
            PropName::Str(span) | PropName::Num(span) | PropName::Computed(span) => {
                span.slice(self.source).trim().to_string()
            }
            // ECMAScript private members never appear in declarations.
            PropName::Private => return,
        };

        if member.kind == MemberKind::Constructor {
            let params = member.params.as_deref().unwrap_or(&[]);
            self.constructor_properties(params, depth);
            if member.visibility == Visibility::Private {
                self.line(depth, "private constructor();");
            } else {
                let mut text = String::new();
                if member.visibility == Visibility::Protected {
                    text.push_str("protected ");
                }
                text.push_str("constructor(");
                text.push_str(&self.param_list(params, true));
                text.push_str(");");
                self.line(depth, &text);
            }
            return;
        }

        if member.visibility == Visibility::Private {
            // tsc collapses private members to a bare name: the class
            // shape stays nominal without leaking implementation types.
            // Accessor pairs share one entry.
            let key = (member.is_static, name);
            if !emitted.contains(&key) {
                let mut text = String::from("private ");
                if member.is_static {
                    text.push_str("static ");
                }
                text.push_str(&key.1);
                text.push(';');
                self.line(depth, &text);
                emitted.push(key);
            }
            return;
        }

        let mut text = String::new();
        if member.visibility == Visibility::Protected {
            text.push_str("protected ");
        }
        if member.is_static {
            text.push_str("static ");
        }
        if member.is_abstract {
            text.push_str("abstract ");
        }
        match member.kind {
            MemberKind::Field => {
                if member.is_readonly {
                    text.push_str("readonly ");
                }
                text.push_str(&name);
                if member.optional {
                    text.push('?');
                }
                text.push_str(": ");
                text.push_str(&self.field_type(member));
                text.push(';');
            }
            MemberKind::Method => {
                text.push_str(&name);
                if member.optional {
                    text.push('?');
                }
                if let Some(type_params) = &member.type_params {
                    text.push_str(type_params.slice(self.source).trim());
                }
                text.push('(');
                if let Some(params) = &member.params {
                    text.push_str(&self.param_list(params, false));
                }
                text.push_str("): ");
                text.push_str(&self.return_type(member.ty.as_ref(), member.is_async));
                text.push(';');
            }
            MemberKind::Getter => {
                text.push_str("get ");
                text.push_str(&name);
                text.push_str("(): ");
                text.push_str(&self.return_type(member.ty.as_ref(), false));
                text.push(';');
            }
            MemberKind::Setter => {
                text.push_str("set ");
                text.push_str(&name);
                text.push('(');
                if let Some(params) = &member.params {
                    text.push_str(&self.param_list(params, false));
                }
                text.push_str(");");
            }
            MemberKind::Constructor => return,
        }
        self.line(depth, &text);
    }

    /// Hoist constructor parameter properties into field declarations
    /// ahead of the constructor signature, in parameter order.
    fn constructor_properties(&mut self, params: &[Param], depth: usize) {
        for param in params {
            let raw = param.name.slice(self.source).trim();
            let name = strip_param_modifiers(raw);
            if name.len() == raw.len() {
                continue;
            }
            let modifiers = &raw[..raw.len() - name.len()];
            if modifiers.split_whitespace().any(|word| word == "private") {
                self.line(depth, &format!("private {};", name));
                continue;
            }
            let mut text = String::new();
            // `public` is the default on fields and tsc drops it.
            for word in modifiers.split_whitespace() {
                if word != "public" {
                    text.push_str(word);
                    text.push(' ');
                }
            }
            text.push_str(name);
            if param.optional {
                text.push('?');
            }
            text.push_str(": ");
            text.push_str(&self.param_type(param));
            text.push(';');
            self.line(depth, &text);
        }
    }

    fn variable(&mut self, decl: &VariableDecl, ambient: bool, depth: usize) {
        let mut parts: Vec<String> = Vec::new();
        for declarator in &decl.declarators {
            match &declarator.name {
                DeclaratorName::Ident(name) => {
                    parts.push(self.declarator_text(name, declarator, decl.kind));
                }
                DeclaratorName::Pattern(span) => {
                    // No single declared name to carry into ambient form.
                    self.warn(*span, "destructuring declarations are omitted from declaration output".to_string());
                }
            }
        }
        if parts.is_empty() {
            return;
        }
        let mut text = String::new();
        if decl.is_exported {
            text.push_str("export ");
        }
        if !ambient {
            text.push_str("declare ");
        }
        text.push_str(decl.kind.as_str());
        text.push(' ');
        text.push_str(&parts.join(", "));
        text.push(';');
        self.line(depth, &text);
    }

    fn declarator_text(&self, name: &str, declarator: &Declarator, kind: VarKind) -> String {
        if let Some(ty) = &declarator.ty {
            return format!("{}: {}", name, ty.slice(self.source).trim());
        }
        if let Some(init) = declarator.init {
            if kind == VarKind::Const && init.is_literal() {
                if let Some(init_span) = &declarator.init_span {
                    // `declare const VERSION = "1.2.3";` keeps the literal
                    // as written, matching tsc output for const.
                    return format!("{} = {}", name, init_span.slice(self.source).trim());
                }
            }
            if let Some(widened) = init.widened() {
                return format!("{}: {}", name, widened);
            }
        }
        format!("{}: any", name)
    }

    fn interface(&mut self, decl: &InterfaceDecl, depth: usize) {
        // Interfaces are already declaration syntax and need no `declare`.
        let mut text = String::new();
        if decl.is_default {
            text.push_str("export default ");
        } else if decl.is_exported {
            text.push_str("export ");
        }
        text.push_str(decl.span.slice(self.source));
        self.terminated(depth, &text);
    }

    fn type_alias(&mut self, decl: &TypeAliasDecl, depth: usize) {
        let mut text = String::new();
        if decl.is_exported {
            text.push_str("export ");
        }
        text.push_str(decl.span.slice(self.source));
        self.terminated(depth, &text);
    }

    fn enum_decl(&mut self, decl: &EnumDecl, ambient: bool, depth: usize) {
        // The span starts at `const`/`enum`, so modifiers rebuild cleanly.
        let mut text = String::new();
        if decl.is_exported {
            text.push_str("export ");
        }
        if !ambient {
            text.push_str("declare ");
        }
        text.push_str(decl.span.slice(self.source));
        self.terminated(depth, &text);
    }

    fn module_block(&mut self, decl: &ModuleDecl, ambient: bool, depth: usize) {
        if decl.is_ambient {
            // Ambient blocks are declaration text already; the span
            // includes `declare` and `export` as written.
            self.verbatim(decl.span, depth);
            return;
        }
        let mut text = String::new();
        if decl.is_exported {
            text.push_str("export ");
        }
        if !ambient {
            text.push_str("declare ");
        }
        text.push_str("namespace ");
        text.push_str(&decl.name);
        text.push_str(" {");
        self.line(depth, &text);
        if let Some(body) = &decl.body {
            self.statements(body, true, depth + 1);
        }
        self.line(depth, "}");
    }

    fn param_list(&self, params: &[Param], strip_modifiers: bool) -> String {
        let parts: Vec<String> = params
            .iter()
            .map(|param| self.param_text(param, strip_modifiers))
            .collect();
        parts.join(", ")
    }

    /// One parameter in declaration form. `strip_modifiers` drops
    /// parameter-property keywords from the binding slice.
    fn param_text(&self, param: &Param, strip_modifiers: bool) -> String {
        let raw = param.name.slice(self.source).trim();
        let name = if strip_modifiers {
            strip_param_modifiers(raw)
        } else {
            raw
        };
        let rest = name.starts_with("...");
        let optional = (param.optional || param.has_default) && !rest;
        format!(
            "{}{}: {}",
            name,
            if optional { "?" } else { "" },
            self.param_type(param)
        )
    }

    fn param_type(&self, param: &Param) -> String {
        match &param.ty {
            Some(ty) => ty.slice(self.source).trim().to_string(),
            None => param
                .default_init
                .and_then(|kind| kind.widened())
                .unwrap_or("any")
                .to_string(),
        }
    }

    fn return_type(&self, annotation: Option<&Span>, is_async: bool) -> String {
        match annotation {
            Some(ty) => ty.slice(self.source).trim().to_string(),
            // `async` itself is dropped in declarations, but the promise
            // wrapper survives in the return type.
            None if is_async => "Promise<any>".to_string(),
            None => "any".to_string(),
        }
    }

    /// Field type: explicit annotation, then literal type for readonly
    /// initialized fields, then a widened primitive, then `any`.
    fn field_type(&self, member: &ClassMember) -> String {
        if let Some(ty) = &member.ty {
            return ty.slice(self.source).trim().to_string();
        }
        if let Some(init) = member.init {
            if member.is_readonly && init.is_literal() {
                if let Some(init_span) = &member.init_span {
                    return init_span.slice(self.source).trim().to_string();
                }
            }
            if let Some(widened) = init.widened() {
                return widened.to_string();
            }
        }
        "any".to_string()
    }

    fn verbatim(&mut self, span: Span, depth: usize) {
        let text = span.slice(self.source);
        self.terminated(depth, text);
    }

    /// Write a statement line, appending the terminating semicolon when
    /// the source slice stops short of one (ASI).
    fn terminated(&mut self, depth: usize, text: &str) {
        let mut owned = text.trim_end().to_string();
        if !owned.ends_with(';') && !owned.ends_with('}') {
            owned.push(';');
        }
        self.line(depth, &owned);
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn warn(&mut self, span: Span, message: String) {
        self.diagnostics.push(Diagnostic {
            file: Some(self.path.to_string()),
            line: span.line,
            column: span.column,
            category: DiagnosticCategory::Warning,
            message,
        });
    }
}

/// Drop leading `public`/`private`/`protected`/`readonly` keywords from a
/// parameter binding slice.
fn strip_param_modifiers(raw: &str) -> &str {
    let mut rest = raw;
    loop {
        let trimmed = rest.trim_start();
        let word_end = trimmed
            .char_indices()
            .find(|(_, c)| !c.is_ascii_alphabetic())
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        match &trimmed[..word_end] {
            "public" | "private" | "protected" | "readonly" => {
                rest = &trimmed[word_end..];
            }
            _ => return trimmed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn print(source: &str) -> PrintedFile {
        let (module, errors) = tydex_parser::parse_module(source);
        assert!(errors.is_empty(), "parse errors: {:?}", errors);
        print_declarations("src/test.ts", source, &module)
    }

    #[test]
    fn test_function_signature() {
        let printed = print("export function greet(name: string): string { return name; }");
        assert_eq!(
            printed.text,
            "export declare function greet(name: string): string;\n"
        );
    }

    #[test]
    fn test_async_function_wraps_unannotated_return() {
        let printed = print("export async function load(url: string) { return fetch(url); }");
        assert_eq!(
            printed.text,
            "export declare function load(url: string): Promise<any>;\n"
        );
    }

    #[test]
    fn test_unannotated_param_widens_from_default() {
        let printed = print("export function pad(width = 2) {}");
        assert_eq!(
            printed.text,
            "export declare function pad(width?: number): any;\n"
        );
    }

    #[test]
    fn test_overload_implementation_dropped() {
        let source = r#"
export function parse(input: string): Config;
export function parse(input: Uint8Array): Config;
export function parse(input: any): Config { return input; }
"#;
        let printed = print(source);
        assert_eq!(
            printed.text,
            "export declare function parse(input: string): Config;\n\
             export declare function parse(input: Uint8Array): Config;\n"
        );
    }

    #[test]
    fn test_const_keeps_literal_initializer() {
        let printed = print(r#"export const VERSION = "1.2.3";"#);
        assert_eq!(printed.text, "export declare const VERSION = \"1.2.3\";\n");
    }

    #[test]
    fn test_let_widens_initializer() {
        let printed = print("let counter = 0;");
        assert_eq!(printed.text, "declare let counter: number;\n");
    }

    #[test]
    fn test_destructured_export_warns_and_is_omitted() {
        let printed = print("export const { host, port } = loadConfig();");
        assert_eq!(printed.text, "export {};\n");
        assert_eq!(printed.diagnostics.len(), 1);
        assert_eq!(
            printed.diagnostics[0].category,
            DiagnosticCategory::Warning
        );
    }

    #[test]
    fn test_class_declaration() {
        let source = r#"
export class Point {
    private cache: Map<string, number> = new Map();
    readonly tag = "point";
    constructor(public x: number, private y: number) {}
    distance(other: Point): number { return 0; }
    get length(): number { return 0; }
}
"#;
        let printed = print(source);
        assert_eq!(
            printed.text,
            "export declare class Point {\n\
             \x20   private cache;\n\
             \x20   readonly tag: \"point\";\n\
             \x20   x: number;\n\
             \x20   private y;\n\
             \x20   constructor(x: number, y: number);\n\
             \x20   distance(other: Point): number;\n\
             \x20   get length(): number;\n\
             }\n"
        );
    }

    #[test]
    fn test_abstract_class_members() {
        let source = r#"
export abstract class Shape {
    abstract area(): number;
    describe(): string { return ""; }
}
"#;
        let printed = print(source);
        assert_eq!(
            printed.text,
            "export declare abstract class Shape {\n\
             \x20   abstract area(): number;\n\
             \x20   describe(): string;\n\
             }\n"
        );
    }

    #[test]
    fn test_interface_sliced_verbatim() {
        let source = "export interface Config { port: number; }";
        let printed = print(source);
        assert_eq!(
            printed.text,
            "export interface Config { port: number; }\n"
        );
    }

    #[test]
    fn test_type_alias_regains_semicolon() {
        let printed = print("export type Id = string | number");
        assert_eq!(printed.text, "export type Id = string | number;\n");
    }

    #[test]
    fn test_enum_gains_declare() {
        let printed = print("export enum Color { Red, Green }");
        assert_eq!(
            printed.text,
            "export declare enum Color { Red, Green }\n"
        );
    }

    #[test]
    fn test_namespace_rebuilt_in_ambient_form() {
        let source = "export namespace Shapes { export function area(s: Shape): number { return 0; } }";
        let printed = print(source);
        assert_eq!(
            printed.text,
            "export declare namespace Shapes {\n\
             \x20   export function area(s: Shape): number;\n\
             }\n"
        );
    }

    #[test]
    fn test_ambient_module_sliced_verbatim() {
        let source = "declare module \"untyped-lib\" {\n    const value: number;\n}";
        let printed = print(source);
        assert_eq!(printed.text, format!("{}\n", source));
    }

    #[test]
    fn test_export_default_expression() {
        let printed = print("export default 42;");
        assert_eq!(
            printed.text,
            "declare const _default: 42;\nexport default _default;\n"
        );
    }

    #[test]
    fn test_export_assignment_verbatim() {
        let printed = print("const api = {};\nexport = api;");
        assert_eq!(printed.text, "declare const api: any;\nexport = api;\n");
    }

    #[test]
    fn test_imports_and_reexports_verbatim() {
        let source = "import { A } from \"./a\";\nexport * from \"./b\";\nexport { A };";
        let printed = print(source);
        assert_eq!(printed.text, format!("{}\n", source));
    }

    #[test]
    fn test_empty_module_exports_nothing_marker() {
        let printed = print("console.log(\"side effects only\");");
        assert_eq!(printed.text, "export {};\n");
    }
}
