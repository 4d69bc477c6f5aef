//! Declaration parsing: functions, classes, variables, interfaces, type
//! aliases, enums, and namespace blocks.
//!
//! Declaration-shaped statements that are already valid declaration text
//! (interfaces, type aliases, enums, ambient blocks) are captured as spans
//! and later re-sliced verbatim. Functions, classes, and variables need
//! their bodies and initializers stripped, so their signatures are parsed
//! structurally.

use super::scan::{self, AsiMode, ScanStops};
use super::{DeclContext, ParseError, Parser};
use crate::ast::*;
use crate::token::Token;

/// Parse the declaration following a consumed `declare` keyword.
pub fn parse_declared(p: &mut Parser, ctx: DeclContext) -> Result<Statement, ParseError> {
    match p.current() {
        Token::Const if matches!(p.peek(), Some(Token::Enum)) => parse_enum(p, ctx),
        Token::Const | Token::Let | Token::Var => parse_variable(p, ctx),
        Token::Function => parse_function(p, ctx),
        Token::Async if matches!(p.peek(), Some(Token::Function)) => parse_function(p, ctx),
        Token::Class => parse_class(p, ctx),
        Token::Abstract if matches!(p.peek(), Some(Token::Class)) => parse_class(p, ctx),
        Token::Interface => parse_interface(p, ctx),
        Token::Type => parse_type_alias(p, ctx),
        Token::Enum => parse_enum(p, ctx),
        Token::Namespace | Token::Module => parse_module_block(p, ctx),
        Token::Identifier(name) if name == "global" => parse_module_block(p, ctx),
        _ => Err(p.unexpected_token(&[
            Token::Function,
            Token::Class,
            Token::Const,
            Token::Interface,
            Token::Type,
            Token::Enum,
            Token::Namespace,
        ])),
    }
}

pub fn parse_function(p: &mut Parser, ctx: DeclContext) -> Result<Statement, ParseError> {
    let is_async = p.eat(&Token::Async);
    p.expect(Token::Function)?;
    p.eat(&Token::Star); // generator

    let name = p.identifier_like();
    if name.is_some() {
        p.advance();
    }

    let type_params = if p.check(&Token::Less) {
        Some(scan::scan_type_params(p))
    } else {
        None
    };

    let params = parse_params(p)?;

    let return_ty = if p.eat(&Token::Colon) {
        scan::scan_type(p, ScanStops::return_type(AsiMode::Statement))
    } else {
        None
    };

    let has_body = if p.check(&Token::LeftBrace) {
        p.skip_balanced();
        true
    } else {
        p.eat(&Token::Semicolon);
        false
    };

    Ok(Statement::Function(FunctionDecl {
        name,
        type_params,
        params,
        return_ty,
        is_async,
        is_exported: ctx.is_exported,
        is_default: ctx.is_default,
        is_declare: ctx.is_declare,
        has_body,
        span: p.span_from(&ctx.start),
    }))
}

/// Parse a parenthesized parameter list, starting at the `(`.
pub fn parse_params(p: &mut Parser) -> Result<Vec<Param>, ParseError> {
    p.expect(Token::LeftParen)?;
    let mut params = Vec::new();

    while !p.check(&Token::RightParen) && !p.at_eof() {
        p.skip_decorators();
        let start = p.current_span();

        p.eat(&Token::DotDotDot);

        // Constructor-parameter modifiers stay part of the name slice, so
        // `constructor(private x: number)` prints back unchanged.
        while in_param_modifier_position(p) {
            p.advance();
            p.eat(&Token::DotDotDot);
        }

        match p.current() {
            Token::This => {
                p.advance();
            }
            Token::LeftBrace | Token::LeftBracket => p.skip_balanced(),
            _ => {
                if p.identifier_like().is_some() {
                    p.advance();
                } else {
                    return Err(p.unexpected_token(&[Token::Identifier(String::new())]));
                }
            }
        }
        let name = p.span_from(&start);

        let optional = p.eat(&Token::Question);
        let ty = if p.eat(&Token::Colon) {
            scan::scan_type(p, ScanStops::annotation())
        } else {
            None
        };
        let (has_default, default_init) = if p.eat(&Token::Equal) {
            let scanned = scan::scan(p, ScanStops::initializer(true, AsiMode::Statement));
            (true, scanned.map(|s| s.init))
        } else {
            (false, None)
        };

        params.push(Param {
            name,
            optional,
            has_default,
            ty,
            default_init,
        });

        if !p.eat(&Token::Comma) {
            break;
        }
    }

    p.expect(Token::RightParen)?;
    Ok(params)
}

fn in_param_modifier_position(p: &Parser) -> bool {
    let is_modifier = p.is_ident("public")
        || p.is_ident("private")
        || p.is_ident("protected")
        || p.is_ident("override")
        || p.check(&Token::Readonly);
    is_modifier
        && matches!(
            p.peek(),
            Some(Token::Identifier(_))
                | Some(Token::This)
                | Some(Token::LeftBrace)
                | Some(Token::LeftBracket)
                | Some(Token::Readonly)
                | Some(Token::DotDotDot)
        )
}

pub fn parse_class(p: &mut Parser, ctx: DeclContext) -> Result<Statement, ParseError> {
    let is_abstract = p.eat(&Token::Abstract);
    p.expect(Token::Class)?;

    let name = p.identifier_like();
    if name.is_some() {
        p.advance();
    }

    let type_params = if p.check(&Token::Less) {
        Some(scan::scan_type_params(p))
    } else {
        None
    };

    let extends = if p.eat(&Token::Extends) {
        scan::scan_type(p, ScanStops::heritage())
    } else {
        None
    };
    let implements = if p.eat(&Token::Implements) {
        scan::scan_type(p, ScanStops::heritage())
    } else {
        None
    };

    p.expect(Token::LeftBrace)?;
    let members = parse_class_members(p);
    p.expect(Token::RightBrace)?;

    Ok(Statement::Class(ClassDecl {
        name,
        type_params,
        extends,
        implements,
        members,
        is_abstract,
        is_exported: ctx.is_exported,
        is_default: ctx.is_default,
        is_declare: ctx.is_declare,
        span: p.span_from(&ctx.start),
    }))
}

fn parse_class_members(p: &mut Parser) -> Vec<ClassMember> {
    let mut members = Vec::new();

    while !p.check(&Token::RightBrace) && !p.at_eof() {
        if p.eat(&Token::Semicolon) || p.eat(&Token::Comma) {
            continue;
        }
        p.skip_decorators();

        // Static initialization blocks contribute nothing to declarations
        if p.check(&Token::Static) && matches!(p.peek(), Some(Token::LeftBrace)) {
            p.advance();
            p.skip_balanced();
            continue;
        }

        let before = p.pos;
        match parse_member(p) {
            Ok(member) => members.push(member),
            Err(err) => {
                p.errors.push(err);
                recover_member(p);
            }
        }
        if p.pos == before {
            p.advance();
        }
    }

    members
}

/// Skip to the end of a malformed member.
fn recover_member(p: &mut Parser) {
    loop {
        match p.current() {
            Token::Eof | Token::RightBrace => return,
            Token::Semicolon => {
                p.advance();
                return;
            }
            Token::LeftParen | Token::LeftBrace | Token::LeftBracket => p.skip_balanced(),
            _ => {
                p.advance();
            }
        }
    }
}

fn parse_member(p: &mut Parser) -> Result<ClassMember, ParseError> {
    let mut visibility = Visibility::Public;
    let mut is_static = false;
    let mut is_abstract = false;
    let mut is_readonly = false;
    let mut is_async = false;

    loop {
        if p.is_ident("public") && in_member_modifier_position(p) {
            visibility = Visibility::Public;
            p.advance();
        } else if p.is_ident("private") && in_member_modifier_position(p) {
            visibility = Visibility::Private;
            p.advance();
        } else if p.is_ident("protected") && in_member_modifier_position(p) {
            visibility = Visibility::Protected;
            p.advance();
        } else if (p.is_ident("override") || p.is_ident("accessor"))
            && in_member_modifier_position(p)
        {
            p.advance();
        } else if p.check(&Token::Static) && in_member_modifier_position(p) {
            is_static = true;
            p.advance();
        } else if p.check(&Token::Abstract) && in_member_modifier_position(p) {
            is_abstract = true;
            p.advance();
        } else if p.check(&Token::Readonly) && in_member_modifier_position(p) {
            is_readonly = true;
            p.advance();
        } else if p.check(&Token::Async) && in_member_modifier_position(p) {
            is_async = true;
            p.advance();
        } else if p.check(&Token::Declare) && in_member_modifier_position(p) {
            p.advance();
        } else {
            break;
        }
    }

    p.eat(&Token::Star); // generator method

    let accessor = if p.is_ident("get") && in_member_modifier_position(p) {
        p.advance();
        Some(MemberKind::Getter)
    } else if p.is_ident("set") && in_member_modifier_position(p) {
        p.advance();
        Some(MemberKind::Setter)
    } else {
        None
    };

    let name = parse_prop_name(p)?;
    let optional = p.eat(&Token::Question);
    p.eat(&Token::Bang); // definite assignment

    if p.check(&Token::Less) || p.check(&Token::LeftParen) {
        // Method, accessor, or constructor
        let type_params = if p.check(&Token::Less) {
            Some(scan::scan_type_params(p))
        } else {
            None
        };
        let params = parse_params(p)?;
        let ty = if p.eat(&Token::Colon) {
            scan::scan_type(p, ScanStops::return_type(AsiMode::Member))
        } else {
            None
        };
        if p.check(&Token::LeftBrace) {
            p.skip_balanced();
        } else {
            p.eat(&Token::Semicolon);
        }

        let kind = match accessor {
            Some(kind) => kind,
            None if matches!(&name, PropName::Ident(n) if n == "constructor") => {
                MemberKind::Constructor
            }
            None => MemberKind::Method,
        };

        Ok(ClassMember {
            name,
            kind,
            visibility,
            is_static,
            is_abstract,
            is_readonly,
            is_async,
            optional,
            type_params,
            params: Some(params),
            ty,
            init: None,
            init_span: None,
        })
    } else {
        // Field
        let ty = if p.eat(&Token::Colon) {
            scan::scan_type(p, ScanStops::field_type())
        } else {
            None
        };
        let (init, init_span) = if p.eat(&Token::Equal) {
            match scan::scan(p, ScanStops::initializer(false, AsiMode::Member)) {
                Some(s) => (Some(s.init), Some(s.span)),
                None => (Some(InitKind::Other), None),
            }
        } else {
            (None, None)
        };
        p.eat(&Token::Semicolon);

        Ok(ClassMember {
            name,
            kind: MemberKind::Field,
            visibility,
            is_static,
            is_abstract,
            is_readonly,
            is_async,
            optional,
            type_params: None,
            params: None,
            ty,
            init,
            init_span,
        })
    }
}

/// Whether the token after the current one can be a member name, meaning
/// the current token acts as a modifier rather than as the name itself.
fn in_member_modifier_position(p: &Parser) -> bool {
    match p.peek() {
        Some(Token::Identifier(_))
        | Some(Token::Str(_))
        | Some(Token::Number)
        | Some(Token::LeftBracket)
        | Some(Token::PrivateName)
        | Some(Token::Star) => true,
        Some(tok) => tok.keyword_text().is_some(),
        None => false,
    }
}

fn parse_prop_name(p: &mut Parser) -> Result<PropName, ParseError> {
    match p.current().clone() {
        Token::Identifier(name) => {
            p.advance();
            Ok(PropName::Ident(name))
        }
        Token::Str(_) => {
            let span = p.current_span();
            p.advance();
            Ok(PropName::Str(span))
        }
        Token::Number => {
            let span = p.current_span();
            p.advance();
            Ok(PropName::Num(span))
        }
        Token::LeftBracket => {
            // Computed name or index signature; both keep their bracket text
            let start = p.current_span();
            p.skip_balanced();
            Ok(PropName::Computed(p.span_from(&start)))
        }
        Token::PrivateName => {
            p.advance();
            Ok(PropName::Private)
        }
        tok => match tok.keyword_text() {
            Some(text) => {
                p.advance();
                Ok(PropName::Ident(text.to_string()))
            }
            None => Err(p.unexpected_token(&[Token::Identifier(String::new())])),
        },
    }
}

pub fn parse_variable(p: &mut Parser, ctx: DeclContext) -> Result<Statement, ParseError> {
    let kind = match p.current() {
        Token::Const => VarKind::Const,
        Token::Let => VarKind::Let,
        Token::Var => VarKind::Var,
        _ => return Err(p.unexpected_token(&[Token::Const, Token::Let, Token::Var])),
    };
    p.advance();

    let mut declarators = Vec::new();
    loop {
        let name = match p.current() {
            Token::LeftBrace | Token::LeftBracket => {
                let start = p.current_span();
                p.skip_balanced();
                DeclaratorName::Pattern(p.span_from(&start))
            }
            _ => match p.identifier_like() {
                Some(name) => {
                    p.advance();
                    DeclaratorName::Ident(name)
                }
                None => return Err(p.unexpected_token(&[Token::Identifier(String::new())])),
            },
        };

        p.eat(&Token::Bang); // definite assignment

        let ty = if p.eat(&Token::Colon) {
            scan::scan_type(p, ScanStops::annotation())
        } else {
            None
        };
        let (init, init_span) = if p.eat(&Token::Equal) {
            match scan::scan(p, ScanStops::initializer(true, AsiMode::Statement)) {
                Some(s) => (Some(s.init), Some(s.span)),
                None => (Some(InitKind::Other), None),
            }
        } else {
            (None, None)
        };

        declarators.push(Declarator {
            name,
            ty,
            init,
            init_span,
        });

        if !p.eat(&Token::Comma) {
            break;
        }
    }
    p.eat(&Token::Semicolon);

    Ok(Statement::Variable(VariableDecl {
        kind,
        declarators,
        is_exported: ctx.is_exported,
        is_declare: ctx.is_declare,
        span: p.span_from(&ctx.start),
    }))
}

pub fn parse_interface(p: &mut Parser, ctx: DeclContext) -> Result<Statement, ParseError> {
    let kw_span = p.current_span();
    p.expect(Token::Interface)?;

    let name = match p.identifier_like() {
        Some(name) => {
            p.advance();
            name
        }
        None => return Err(p.unexpected_token(&[Token::Identifier(String::new())])),
    };

    if p.check(&Token::Less) {
        scan::scan_type_params(p);
    }
    if p.eat(&Token::Extends) {
        scan::scan_type(p, ScanStops::heritage());
    }

    if !p.check(&Token::LeftBrace) {
        return Err(p.unexpected_token(&[Token::LeftBrace]));
    }
    p.skip_balanced();

    Ok(Statement::Interface(InterfaceDecl {
        name,
        is_exported: ctx.is_exported,
        is_default: ctx.is_default,
        span: p.span_from(&kw_span),
    }))
}

pub fn parse_type_alias(p: &mut Parser, ctx: DeclContext) -> Result<Statement, ParseError> {
    let kw_span = p.current_span();
    p.expect(Token::Type)?;

    let name = match p.identifier_like() {
        Some(name) => {
            p.advance();
            name
        }
        None => return Err(p.unexpected_token(&[Token::Identifier(String::new())])),
    };

    if p.check(&Token::Less) {
        scan::scan_type_params(p);
    }
    p.expect(Token::Equal)?;
    scan::scan_type(p, ScanStops::aliased_type());
    p.eat(&Token::Semicolon);

    Ok(Statement::TypeAlias(TypeAliasDecl {
        name,
        is_exported: ctx.is_exported,
        span: p.span_from(&kw_span),
    }))
}

pub fn parse_enum(p: &mut Parser, ctx: DeclContext) -> Result<Statement, ParseError> {
    let kw_span = p.current_span();
    let is_const = p.eat(&Token::Const);
    p.expect(Token::Enum)?;

    let name = match p.identifier_like() {
        Some(name) => {
            p.advance();
            name
        }
        None => return Err(p.unexpected_token(&[Token::Identifier(String::new())])),
    };

    if !p.check(&Token::LeftBrace) {
        return Err(p.unexpected_token(&[Token::LeftBrace]));
    }
    p.skip_balanced();

    Ok(Statement::Enum(EnumDecl {
        name,
        is_const,
        is_exported: ctx.is_exported,
        is_declare: ctx.is_declare,
        span: p.span_from(&kw_span),
    }))
}

pub fn parse_module_block(p: &mut Parser, ctx: DeclContext) -> Result<Statement, ParseError> {
    let mut is_global = false;
    match p.current() {
        Token::Namespace | Token::Module => {
            p.advance();
        }
        Token::Identifier(name) if name == "global" => is_global = true,
        _ => return Err(p.unexpected_token(&[Token::Namespace, Token::Module])),
    }

    let mut str_named = false;
    let name = if is_global {
        p.advance();
        "global".to_string()
    } else {
        match p.current().clone() {
            Token::Str(value) => {
                str_named = true;
                p.advance();
                value
            }
            _ => {
                // Dotted namespace path: `namespace A.B.C`
                let mut parts = Vec::new();
                loop {
                    match p.identifier_like() {
                        Some(part) => {
                            p.advance();
                            parts.push(part);
                        }
                        None => {
                            return Err(p.unexpected_token(&[Token::Identifier(String::new())]))
                        }
                    }
                    if !p.eat(&Token::Dot) {
                        break;
                    }
                }
                parts.join(".")
            }
        }
    };

    // String-named modules are ambient even without `declare` (module
    // augmentation); so are `declare global` and anything under `declare`.
    let is_ambient = ctx.is_declare || is_global || str_named;

    if is_ambient {
        // Shorthand ambient module: `declare module "untyped-pkg";`
        if !p.check(&Token::LeftBrace) {
            p.eat(&Token::Semicolon);
            return Ok(Statement::ModuleBlock(ModuleDecl {
                name,
                is_ambient: true,
                is_exported: ctx.is_exported,
                body: None,
                span: p.span_from(&ctx.start),
            }));
        }
        p.skip_balanced();
        Ok(Statement::ModuleBlock(ModuleDecl {
            name,
            is_ambient: true,
            is_exported: ctx.is_exported,
            body: None,
            span: p.span_from(&ctx.start),
        }))
    } else {
        p.expect(Token::LeftBrace)?;
        let body = p.parse_statements_until(&Token::RightBrace);
        p.expect(Token::RightBrace)?;
        Ok(Statement::ModuleBlock(ModuleDecl {
            name,
            is_ambient: false,
            is_exported: ctx.is_exported,
            body: Some(body),
            span: p.span_from(&ctx.start),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Module {
        let (module, errors) = Parser::new(source).parse();
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        module
    }

    fn first_function(module: &Module) -> &FunctionDecl {
        match &module.statements[0] {
            Statement::Function(f) => f,
            other => panic!("expected function, got {:?}", other),
        }
    }

    fn first_class(module: &Module) -> &ClassDecl {
        match &module.statements[0] {
            Statement::Class(c) => c,
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_function_signature() {
        let source = "export function add(a: number, b: number): number { return a + b; }";
        let module = parse_ok(source);
        let f = first_function(&module);

        assert_eq!(f.name.as_deref(), Some("add"));
        assert!(f.is_exported);
        assert!(f.has_body);
        assert_eq!(f.params.len(), 2);
        assert_eq!(f.params[0].ty.unwrap().slice(source), "number");
        assert_eq!(f.return_ty.unwrap().slice(source), "number");
    }

    #[test]
    fn test_parse_generic_function() {
        let source = "function pick<T, K extends keyof T>(obj: T, key: K): T[K] {}";
        let module = parse_ok(source);
        let f = first_function(&module);

        assert_eq!(
            f.type_params.unwrap().slice(source),
            "<T, K extends keyof T>"
        );
        assert_eq!(f.return_ty.unwrap().slice(source), "T[K]");
    }

    #[test]
    fn test_parse_function_overloads() {
        let source = "function f(a: string): void;\nfunction f(a: number): void;\nfunction f(a: unknown): void {}";
        let module = parse_ok(source);
        assert_eq!(module.statements.len(), 3);
        assert!(!first_function(&module).has_body);
    }

    #[test]
    fn test_parse_rest_and_optional_params() {
        let source = "function f(a?: string, ...rest: number[]) {}";
        let module = parse_ok(source);
        let f = first_function(&module);

        assert!(f.params[0].optional);
        assert_eq!(f.params[1].name.slice(source), "...rest");
    }

    #[test]
    fn test_parse_destructured_param_with_default() {
        let source = "export function init({ port, host }: Options = {}) {}";
        let module = parse_ok(source);
        let f = first_function(&module);

        assert_eq!(f.params[0].name.slice(source), "{ port, host }");
        assert!(f.params[0].has_default);
        assert_eq!(f.params[0].ty.unwrap().slice(source), "Options");
    }

    #[test]
    fn test_parse_class_with_members() {
        let source = r#"
export class Greeter {
    private prefix: string;
    static instances = 0;
    constructor(prefix: string) { this.prefix = prefix; }
    greet(name: string): string { return this.prefix + name; }
    get count(): number { return 0; }
}
"#;
        let module = parse_ok(source);
        let c = first_class(&module);

        assert_eq!(c.name.as_deref(), Some("Greeter"));
        assert_eq!(c.members.len(), 5);
        assert_eq!(c.members[0].visibility, Visibility::Private);
        assert!(c.members[1].is_static);
        assert_eq!(c.members[2].kind, MemberKind::Constructor);
        assert_eq!(c.members[3].kind, MemberKind::Method);
        assert_eq!(c.members[4].kind, MemberKind::Getter);
    }

    #[test]
    fn test_parse_class_heritage() {
        let source = "class App extends Component<Props, State> implements Disposable, Serializable {}";
        let module = parse_ok(source);
        let c = first_class(&module);

        assert_eq!(c.extends.unwrap().slice(source), "Component<Props, State>");
        assert_eq!(
            c.implements.unwrap().slice(source),
            "Disposable, Serializable"
        );
    }

    #[test]
    fn test_parse_class_skips_static_block_and_private_names() {
        let source = "class C { static { C.setup(); } #hidden = 1; visible = 2; }";
        let module = parse_ok(source);
        let c = first_class(&module);

        assert_eq!(c.members.len(), 2);
        assert!(matches!(c.members[0].name, PropName::Private));
    }

    #[test]
    fn test_parse_member_named_like_modifier() {
        // `static` with `:` after it is a field name, not a modifier
        let source = "class C { static: number; }";
        let module = parse_ok(source);
        let c = first_class(&module);

        assert!(!c.members[0].is_static);
        assert!(matches!(&c.members[0].name, PropName::Ident(n) if n == "static"));
    }

    #[test]
    fn test_parse_index_signature() {
        let source = "class Bag { [key: string]: unknown; }";
        let module = parse_ok(source);
        let c = first_class(&module);

        match &c.members[0].name {
            PropName::Computed(span) => assert_eq!(span.slice(source), "[key: string]"),
            other => panic!("expected computed name, got {:?}", other),
        }
        assert_eq!(c.members[0].ty.unwrap().slice(source), "unknown");
    }

    #[test]
    fn test_parse_variable_forms() {
        let source = "export const VERSION = \"1.2.3\", BUILD = 42;\nlet counter: number;\nvar legacy;";
        let module = parse_ok(source);

        match &module.statements[0] {
            Statement::Variable(v) => {
                assert_eq!(v.kind, VarKind::Const);
                assert_eq!(v.declarators.len(), 2);
                assert_eq!(v.declarators[0].init, Some(InitKind::Str));
                assert_eq!(v.declarators[1].init, Some(InitKind::Number));
            }
            other => panic!("expected variable, got {:?}", other),
        }

        match &module.statements[1] {
            Statement::Variable(v) => {
                assert_eq!(v.kind, VarKind::Let);
                assert_eq!(v.declarators[0].ty.unwrap().slice(source), "number");
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_parse_destructured_variable() {
        let source = "const { a, b } = load();";
        let module = parse_ok(source);
        match &module.statements[0] {
            Statement::Variable(v) => {
                assert!(matches!(v.declarators[0].name, DeclaratorName::Pattern(_)))
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_parse_interface_span_covers_body() {
        let source = "export interface Point<T = number> extends Base {\n  x: T;\n  y: T;\n}";
        let module = parse_ok(source);
        match &module.statements[0] {
            Statement::Interface(i) => {
                assert_eq!(i.name, "Point");
                assert!(i.is_exported);
                let text = i.span.slice(source);
                assert!(text.starts_with("interface Point"));
                assert!(text.ends_with('}'));
            }
            other => panic!("expected interface, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_type_alias_multiline() {
        let source = "type Result<T> =\n  | { ok: true; value: T }\n  | { ok: false };\nconst x = 1;";
        let module = parse_ok(source);
        assert_eq!(module.statements.len(), 2);
        match &module.statements[0] {
            Statement::TypeAlias(t) => {
                assert!(t.span.slice(source).ends_with("{ ok: false };"));
            }
            other => panic!("expected alias, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_const_enum() {
        let source = "export const enum Direction { Up, Down }";
        let module = parse_ok(source);
        match &module.statements[0] {
            Statement::Enum(e) => {
                assert!(e.is_const);
                assert!(e.span.slice(source).starts_with("const enum Direction"));
            }
            other => panic!("expected enum, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_namespace_body_is_reconstructed() {
        let source = "export namespace Utils {\n  export function noop(): void {}\n  export const N = 1;\n}";
        let module = parse_ok(source);
        match &module.statements[0] {
            Statement::ModuleBlock(m) => {
                assert_eq!(m.name, "Utils");
                assert!(!m.is_ambient);
                let body = m.body.as_ref().unwrap();
                assert_eq!(body.len(), 2);
            }
            other => panic!("expected namespace, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_ambient_module_sliced_verbatim() {
        let source = "declare module \"untyped-lib\" {\n  export function anything(): any;\n}";
        let module = parse_ok(source);
        match &module.statements[0] {
            Statement::ModuleBlock(m) => {
                assert!(m.is_ambient);
                assert!(m.body.is_none());
                assert!(m.span.slice(source).starts_with("declare module"));
                assert!(m.span.slice(source).ends_with('}'));
            }
            other => panic!("expected ambient module, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_declare_global() {
        let source = "declare global { interface Window { custom: string; } }";
        let module = parse_ok(source);
        match &module.statements[0] {
            Statement::ModuleBlock(m) => {
                assert_eq!(m.name, "global");
                assert!(m.is_ambient);
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_parse_declare_function() {
        let source = "declare function requireAll(dir: string): void;";
        let module = parse_ok(source);
        let f = first_function(&module);
        assert!(f.is_declare);
        assert!(!f.has_body);
    }

    #[test]
    fn test_parse_arrow_annotated_const() {
        let source = "export const handler: (req: Request) => Promise<Response> = async (req) => fetch(req);";
        let module = parse_ok(source);
        match &module.statements[0] {
            Statement::Variable(v) => {
                assert_eq!(
                    v.declarators[0].ty.unwrap().slice(source),
                    "(req: Request) => Promise<Response>"
                );
                assert_eq!(v.declarators[0].init, Some(InitKind::Other));
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_parse_broken_member_recovers() {
        let source = "class C { valid: number; !!!; alsoValid(): void {} }";
        let (module, errors) = Parser::new(source).parse();
        assert!(!errors.is_empty());
        match &module.statements[0] {
            Statement::Class(c) => {
                let names: Vec<_> = c
                    .members
                    .iter()
                    .filter_map(|m| match &m.name {
                        PropName::Ident(n) => Some(n.as_str()),
                        _ => None,
                    })
                    .collect();
                assert!(names.contains(&"valid"));
                assert!(names.contains(&"alsoValid"));
            }
            _ => panic!(),
        }
    }
}
