//! Statement-level parsing: dispatch, imports, and exports.
//!
//! Only declaration-bearing statements produce AST nodes. Everything else
//! (expression statements, control flow, directives) is skipped with
//! balance counting and yields `Ok(None)`.

use super::decl;
use super::scan::{self, AsiMode, ScanStops};
use super::{DeclContext, ParseError, Parser};
use crate::ast::*;
use crate::token::Token;

/// Parse one statement, or skip one non-declaration statement.
pub fn parse_statement(p: &mut Parser) -> Result<Option<Statement>, ParseError> {
    match p.current() {
        Token::Semicolon => {
            p.advance();
            Ok(None)
        }

        Token::At => {
            p.skip_decorators();
            parse_statement(p)
        }

        // `import(...)` and `import.meta` are expressions
        Token::Import
            if !matches!(p.peek(), Some(Token::LeftParen) | Some(Token::Dot)) =>
        {
            parse_import(p).map(Some)
        }

        Token::Export => parse_export(p),

        Token::Declare if declare_starts_declaration(p) => {
            let ctx = DeclContext {
                start: p.current_span(),
                is_exported: false,
                is_default: false,
                is_declare: true,
            };
            p.advance();
            decl::parse_declared(p, ctx).map(Some)
        }

        Token::Const if matches!(p.peek(), Some(Token::Enum)) => {
            let ctx = DeclContext::at(p.current_span());
            decl::parse_enum(p, ctx).map(Some)
        }

        Token::Const | Token::Let | Token::Var => {
            let ctx = DeclContext::at(p.current_span());
            decl::parse_variable(p, ctx).map(Some)
        }

        Token::Function => {
            let ctx = DeclContext::at(p.current_span());
            decl::parse_function(p, ctx).map(Some)
        }

        Token::Async if matches!(p.peek(), Some(Token::Function)) => {
            let ctx = DeclContext::at(p.current_span());
            decl::parse_function(p, ctx).map(Some)
        }

        Token::Class => {
            let ctx = DeclContext::at(p.current_span());
            decl::parse_class(p, ctx).map(Some)
        }

        Token::Abstract if matches!(p.peek(), Some(Token::Class)) => {
            let ctx = DeclContext::at(p.current_span());
            decl::parse_class(p, ctx).map(Some)
        }

        Token::Interface if peek_is_name(p) => {
            let ctx = DeclContext::at(p.current_span());
            decl::parse_interface(p, ctx).map(Some)
        }

        Token::Type if peek_is_name(p) => {
            let ctx = DeclContext::at(p.current_span());
            decl::parse_type_alias(p, ctx).map(Some)
        }

        Token::Enum => {
            let ctx = DeclContext::at(p.current_span());
            decl::parse_enum(p, ctx).map(Some)
        }

        Token::Namespace | Token::Module if peek_is_module_name(p) => {
            let ctx = DeclContext::at(p.current_span());
            decl::parse_module_block(p, ctx).map(Some)
        }

        _ => {
            skip_statement(p);
            Ok(None)
        }
    }
}

/// Whether a `declare` token opens an ambient declaration rather than a
/// plain identifier expression (`declare` is not reserved).
fn declare_starts_declaration(p: &Parser) -> bool {
    match p.peek() {
        Some(Token::Const)
        | Some(Token::Let)
        | Some(Token::Var)
        | Some(Token::Function)
        | Some(Token::Async)
        | Some(Token::Class)
        | Some(Token::Abstract)
        | Some(Token::Interface)
        | Some(Token::Type)
        | Some(Token::Enum)
        | Some(Token::Namespace)
        | Some(Token::Module) => true,
        Some(Token::Identifier(name)) => name == "global",
        _ => false,
    }
}

fn peek_is_name(p: &Parser) -> bool {
    match p.peek() {
        Some(Token::Identifier(_)) => true,
        Some(tok) => tok.keyword_text().is_some(),
        None => false,
    }
}

fn peek_is_module_name(p: &Parser) -> bool {
    matches!(p.peek(), Some(Token::Identifier(_)) | Some(Token::Str(_)))
}

/// Skip a statement that produces no declarations.
///
/// Consumes through the terminating semicolon, or stops at an unbalanced
/// closer or an ASI boundary.
pub fn skip_statement(p: &mut Parser) {
    loop {
        match p.current() {
            Token::Eof => return,
            Token::Semicolon => {
                p.advance();
                return;
            }
            Token::RightParen | Token::RightBrace | Token::RightBracket => return,
            Token::LeftParen | Token::LeftBrace | Token::LeftBracket => p.skip_balanced(),
            tok => {
                let boundary = p.on_new_line()
                    && tok.starts_statement()
                    && p.prev().map(|(t, _)| t.ends_expression()).unwrap_or(false);
                if boundary {
                    return;
                }
                p.advance();
            }
        }
    }
}

/// Parse an import statement in any of its forms.
pub fn parse_import(p: &mut Parser) -> Result<Statement, ParseError> {
    let start = p.current_span();
    p.expect(Token::Import)?;

    // Side-effect import: `import "./polyfill";`
    if let Token::Str(source) = p.current() {
        let source = source.clone();
        p.advance();
        p.eat(&Token::Semicolon);
        return Ok(Statement::Import(ImportDecl {
            source: Some(source),
            type_only: false,
            span: p.span_from(&start),
        }));
    }

    // `import type { X } from ...` -- but `import type from "m"` and
    // `import type, { X } from "m"` bind a value named `type`.
    let type_only = p.check(&Token::Type)
        && !matches!(
            p.peek(),
            Some(Token::From) | Some(Token::Comma) | Some(Token::Equal)
        );
    if type_only {
        p.advance();
    }

    // `import x = require("mod")` and `import A = Some.Entity`
    if p.identifier_like().is_some() && matches!(p.peek(), Some(Token::Equal)) {
        p.advance();
        p.advance();
        return parse_import_equals_tail(p, start);
    }

    // Default / namespace / named clause, up to `from`
    loop {
        match p.current() {
            Token::LeftBrace => scan_brace_list(p)?,
            Token::From => {
                p.advance();
                break;
            }
            Token::Eof | Token::Semicolon => {
                return Err(p.unexpected_token(&[Token::From]));
            }
            tok => {
                if tok.starts_statement() && p.on_new_line() {
                    return Err(p.unexpected_token(&[Token::From]));
                }
                p.advance();
            }
        }
    }

    let source = expect_module_specifier(p)?;
    skip_import_attributes(p);
    p.eat(&Token::Semicolon);

    Ok(Statement::Import(ImportDecl {
        source: Some(source),
        type_only,
        span: p.span_from(&start),
    }))
}

/// Continue after `import name =`: either `require("mod")` or a dotted
/// entity reference.
fn parse_import_equals_tail(
    p: &mut Parser,
    start: crate::token::Span,
) -> Result<Statement, ParseError> {
    if p.is_ident("require") {
        p.advance();
        p.expect(Token::LeftParen)?;
        let source = expect_module_specifier(p)?;
        p.expect(Token::RightParen)?;
        p.eat(&Token::Semicolon);
        return Ok(Statement::Import(ImportDecl {
            source: Some(source),
            type_only: false,
            span: p.span_from(&start),
        }));
    }

    // Entity alias: references no module
    scan::scan(p, ScanStops::initializer(false, AsiMode::Statement));
    p.eat(&Token::Semicolon);
    Ok(Statement::Import(ImportDecl {
        source: None,
        type_only: false,
        span: p.span_from(&start),
    }))
}

fn expect_module_specifier(p: &mut Parser) -> Result<String, ParseError> {
    match p.current() {
        Token::Str(source) => {
            let source = source.clone();
            p.advance();
            Ok(source)
        }
        _ => Err(p.unexpected_token(&[Token::Str(String::new())])),
    }
}

/// Skip an `assert { ... }` / `with { ... }` import attribute clause.
fn skip_import_attributes(p: &mut Parser) {
    if (p.is_ident("assert") || p.is_ident("with"))
        && matches!(p.peek(), Some(Token::LeftBrace))
    {
        p.advance();
        p.skip_balanced();
    }
}

/// Parse any `export ...` statement.
pub fn parse_export(p: &mut Parser) -> Result<Option<Statement>, ParseError> {
    let start = p.current_span();
    p.expect(Token::Export)?;
    p.skip_decorators();

    let ctx = DeclContext {
        start,
        is_exported: true,
        is_default: false,
        is_declare: false,
    };

    match p.current() {
        // export * [as ns] from "mod"
        Token::Star => parse_export_all(p, ctx).map(Some),

        // export { a, b as c } [from "mod"]
        Token::LeftBrace => parse_export_named(p, ctx, false).map(Some),

        Token::Type => match p.peek() {
            Some(Token::LeftBrace) => {
                p.advance();
                parse_export_named(p, ctx, true).map(Some)
            }
            Some(Token::Star) => {
                p.advance();
                parse_export_all(p, ctx).map(Some)
            }
            _ => decl::parse_type_alias(p, ctx).map(Some),
        },

        Token::Default => {
            p.advance();
            let ctx = DeclContext {
                is_default: true,
                ..ctx
            };
            parse_export_default(p, ctx).map(Some)
        }

        // export = expr;
        Token::Equal => {
            p.advance();
            scan::scan(p, ScanStops::initializer(false, AsiMode::Statement));
            p.eat(&Token::Semicolon);
            Ok(Some(Statement::ExportAssignment(ExportAssignment {
                span: p.span_from(&start),
            })))
        }

        Token::Declare => {
            let ctx = DeclContext {
                is_declare: true,
                ..ctx
            };
            p.advance();
            decl::parse_declared(p, ctx).map(Some)
        }

        // export import A = B; (namespace alias re-export)
        Token::Import => {
            let stmt = parse_import(p)?;
            if let Statement::Import(mut import) = stmt {
                import.span = p.combine_spans(&start, &import.span);
                Ok(Some(Statement::Import(import)))
            } else {
                unreachable!("parse_import returns Statement::Import")
            }
        }

        Token::Const | Token::Let | Token::Var => {
            if matches!(p.current(), Token::Const) && matches!(p.peek(), Some(Token::Enum)) {
                decl::parse_enum(p, ctx).map(Some)
            } else {
                decl::parse_variable(p, ctx).map(Some)
            }
        }
        Token::Function => decl::parse_function(p, ctx).map(Some),
        Token::Async if matches!(p.peek(), Some(Token::Function)) => {
            decl::parse_function(p, ctx).map(Some)
        }
        Token::Class => decl::parse_class(p, ctx).map(Some),
        Token::Abstract if matches!(p.peek(), Some(Token::Class)) => {
            decl::parse_class(p, ctx).map(Some)
        }
        Token::Interface => decl::parse_interface(p, ctx).map(Some),
        Token::Enum => decl::parse_enum(p, ctx).map(Some),
        Token::Namespace | Token::Module => decl::parse_module_block(p, ctx).map(Some),

        _ => Err(p.unexpected_token(&[
            Token::LeftBrace,
            Token::Star,
            Token::Default,
            Token::Function,
            Token::Class,
        ])),
    }
}

fn parse_export_all(p: &mut Parser, ctx: DeclContext) -> Result<Statement, ParseError> {
    p.expect(Token::Star)?;

    // Skip an optional `as ns` alias
    while !p.check(&Token::From) {
        match p.current() {
            Token::Eof | Token::Semicolon => return Err(p.unexpected_token(&[Token::From])),
            tok => {
                if tok.starts_statement() && p.on_new_line() {
                    return Err(p.unexpected_token(&[Token::From]));
                }
                p.advance();
            }
        }
    }
    p.expect(Token::From)?;
    let source = expect_module_specifier(p)?;
    skip_import_attributes(p);
    p.eat(&Token::Semicolon);

    Ok(Statement::ExportAll(ExportAllDecl {
        source,
        span: p.span_from(&ctx.start),
    }))
}

/// Consume a flat `{ a, b as c }` specifier list, starting at the `{`.
///
/// Specifier lists cannot nest, so this scan is bounded: an unterminated
/// list fails at the next semicolon or statement boundary instead of
/// swallowing the rest of the file.
fn scan_brace_list(p: &mut Parser) -> Result<(), ParseError> {
    p.advance();
    loop {
        match p.current() {
            Token::RightBrace => {
                p.advance();
                return Ok(());
            }
            Token::Eof | Token::Semicolon => {
                return Err(p.unexpected_token(&[Token::RightBrace]));
            }
            tok => {
                if tok.starts_statement() && p.on_new_line() {
                    return Err(p.unexpected_token(&[Token::RightBrace]));
                }
                p.advance();
            }
        }
    }
}

fn parse_export_named(
    p: &mut Parser,
    ctx: DeclContext,
    type_only: bool,
) -> Result<Statement, ParseError> {
    scan_brace_list(p)?;

    let source = if p.eat(&Token::From) {
        Some(expect_module_specifier(p)?)
    } else {
        None
    };
    skip_import_attributes(p);
    p.eat(&Token::Semicolon);

    Ok(Statement::ExportNamed(ExportNamedDecl {
        source,
        type_only,
        span: p.span_from(&ctx.start),
    }))
}

fn parse_export_default(p: &mut Parser, ctx: DeclContext) -> Result<Statement, ParseError> {
    match p.current() {
        Token::Function => decl::parse_function(p, ctx),
        Token::Async if matches!(p.peek(), Some(Token::Function)) => decl::parse_function(p, ctx),
        Token::Class => decl::parse_class(p, ctx),
        Token::Abstract if matches!(p.peek(), Some(Token::Class)) => decl::parse_class(p, ctx),
        Token::Interface => decl::parse_interface(p, ctx),
        _ => {
            // export default <expression>;
            let scanned = scan::scan(p, ScanStops::initializer(false, AsiMode::Statement));
            p.eat(&Token::Semicolon);
            match scanned {
                Some(scanned) => Ok(Statement::ExportDefaultExpr(ExportDefaultExpr {
                    init: scanned.init,
                    expr_span: scanned.span,
                    span: p.span_from(&ctx.start),
                })),
                None => Err(p.unexpected_token(&[Token::Function, Token::Class])),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> (Module, Vec<ParseError>) {
        Parser::new(source).parse()
    }

    fn parse_ok(source: &str) -> Module {
        let (module, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        module
    }

    #[test]
    fn test_parse_default_import() {
        let module = parse_ok("import React from \"react\";");
        match &module.statements[0] {
            Statement::Import(import) => {
                assert_eq!(import.source.as_deref(), Some("react"));
                assert!(!import.type_only);
            }
            other => panic!("expected import, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_named_and_namespace_imports() {
        let module = parse_ok(
            "import { a, b as c } from \"./x\";\nimport * as ns from \"./y\";\nimport d, { e } from \"./z\";",
        );
        let sources: Vec<_> = module
            .statements
            .iter()
            .map(|s| match s {
                Statement::Import(i) => i.source.clone().unwrap(),
                _ => panic!("expected import"),
            })
            .collect();
        assert_eq!(sources, vec!["./x", "./y", "./z"]);
    }

    #[test]
    fn test_parse_import_type_only() {
        let module = parse_ok("import type { Props } from \"./props\";");
        match &module.statements[0] {
            Statement::Import(import) => assert!(import.type_only),
            _ => panic!(),
        }
    }

    #[test]
    fn test_parse_import_binding_named_type() {
        // `type` here is a default-import binding, not a type-only marker
        let module = parse_ok("import type from \"./t\";");
        match &module.statements[0] {
            Statement::Import(import) => {
                assert!(!import.type_only);
                assert_eq!(import.source.as_deref(), Some("./t"));
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_parse_import_equals_require() {
        let module = parse_ok("import fs = require(\"fs\");");
        match &module.statements[0] {
            Statement::Import(import) => assert_eq!(import.source.as_deref(), Some("fs")),
            _ => panic!(),
        }
    }

    #[test]
    fn test_parse_import_entity_alias_has_no_source() {
        let module = parse_ok("import Shortcut = Long.Nested.Name;");
        match &module.statements[0] {
            Statement::Import(import) => assert!(import.source.is_none()),
            _ => panic!(),
        }
    }

    #[test]
    fn test_import_call_is_not_an_import_statement() {
        let module = parse_ok("import(\"./lazy\").then(m => m.default);");
        assert!(module.statements.is_empty());
    }

    #[test]
    fn test_parse_export_star_and_named_reexport() {
        let module = parse_ok("export * from \"./a\";\nexport { x, y } from \"./b\";\nexport * as ns from \"./c\";");
        assert!(matches!(
            &module.statements[0],
            Statement::ExportAll(e) if e.source == "./a"
        ));
        assert!(matches!(
            &module.statements[1],
            Statement::ExportNamed(e) if e.source.as_deref() == Some("./b")
        ));
        assert!(matches!(
            &module.statements[2],
            Statement::ExportAll(e) if e.source == "./c"
        ));
    }

    #[test]
    fn test_parse_export_named_local() {
        let module = parse_ok("const a = 1;\nexport { a };");
        match &module.statements[1] {
            Statement::ExportNamed(e) => assert!(e.source.is_none()),
            other => panic!("expected named export, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_export_assignment() {
        let module = parse_ok("export = createServer;");
        assert!(matches!(
            &module.statements[0],
            Statement::ExportAssignment(_)
        ));
    }

    #[test]
    fn test_parse_export_default_expression() {
        let module = parse_ok("export default 42;");
        match &module.statements[0] {
            Statement::ExportDefaultExpr(e) => assert_eq!(e.init, InitKind::Number),
            other => panic!("expected default export, got {:?}", other),
        }
    }

    #[test]
    fn test_skip_expression_statements() {
        let module = parse_ok("console.log(\"hi\");\nif (x) { doThing(); }\nexport const n = 1;");
        assert_eq!(module.statements.len(), 1);
        assert!(matches!(&module.statements[0], Statement::Variable(_)));
    }

    #[test]
    fn test_module_exports_assignment_is_skipped() {
        // CommonJS output occasionally rides along in submissions;
        // `module` must not be mistaken for a namespace keyword here.
        let module = parse_ok("module.exports = { a: 1 };");
        assert!(module.statements.is_empty());
    }

    #[test]
    fn test_malformed_import_recovers() {
        let (module, errors) = parse("import { broken ;\nexport const ok = 1;");
        assert!(!errors.is_empty());
        assert!(module
            .statements
            .iter()
            .any(|s| matches!(s, Statement::Variable(v) if v.is_exported)));
    }
}
