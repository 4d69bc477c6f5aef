//! AST definitions for declaration extraction.
//!
//! The tree is deliberately shallow: declaration shapes (names, parameter
//! lists, modifiers) are modeled structurally, while type annotations,
//! initializers, and whole declaration-shaped statements are kept as source
//! spans. Printing later re-slices those spans from the original text, so
//! nothing is lost to AST round-tripping.

use crate::token::Span;

/// A parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub statements: Vec<Statement>,
}

/// A top-level statement relevant to declaration output.
///
/// Expression statements, control flow, and other body-only constructs are
/// skipped during parsing and never appear here.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Import(ImportDecl),
    ExportNamed(ExportNamedDecl),
    ExportAll(ExportAllDecl),
    ExportAssignment(ExportAssignment),
    ExportDefaultExpr(ExportDefaultExpr),
    Function(FunctionDecl),
    Class(ClassDecl),
    Interface(InterfaceDecl),
    TypeAlias(TypeAliasDecl),
    Enum(EnumDecl),
    Variable(VariableDecl),
    ModuleBlock(ModuleDecl),
}

impl Statement {
    /// The source span of the whole statement.
    pub fn span(&self) -> Span {
        match self {
            Statement::Import(d) => d.span,
            Statement::ExportNamed(d) => d.span,
            Statement::ExportAll(d) => d.span,
            Statement::ExportAssignment(d) => d.span,
            Statement::ExportDefaultExpr(d) => d.span,
            Statement::Function(d) => d.span,
            Statement::Class(d) => d.span,
            Statement::Interface(d) => d.span,
            Statement::TypeAlias(d) => d.span,
            Statement::Enum(d) => d.span,
            Statement::Variable(d) => d.span,
            Statement::ModuleBlock(d) => d.span,
        }
    }
}

/// `import ... from "source"`, `import "source"`,
/// `import name = require("source")`, or `import A = Some.Entity`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    /// The module specifier exactly as written (after unescaping).
    /// `None` for entity-alias imports, which reference no module.
    pub source: Option<String>,
    /// `import type ...`
    pub type_only: bool,
    pub span: Span,
}

/// `export { ... }` with an optional `from "source"` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportNamedDecl {
    pub source: Option<String>,
    pub type_only: bool,
    pub span: Span,
}

/// `export * from "source"` or `export * as ns from "source"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportAllDecl {
    pub source: String,
    pub span: Span,
}

/// `export = expr;` (CommonJS-style export assignment).
#[derive(Debug, Clone, PartialEq)]
pub struct ExportAssignment {
    pub span: Span,
}

/// `export default <expression>;` where the expression is not a function
/// or class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDefaultExpr {
    pub init: InitKind,
    /// Span of just the exported expression.
    pub expr_span: Span,
    pub span: Span,
}

/// A function declaration, possibly an overload signature without a body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// `None` for `export default function () { ... }`.
    pub name: Option<String>,
    /// `<T, U extends V>` including the angle brackets.
    pub type_params: Option<Span>,
    pub params: Vec<Param>,
    pub return_ty: Option<Span>,
    pub is_async: bool,
    pub is_exported: bool,
    pub is_default: bool,
    pub is_declare: bool,
    pub has_body: bool,
    pub span: Span,
}

/// A single function or method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// The binding as written: identifier, `this`, destructuring pattern,
    /// rest dots, and any constructor-parameter modifiers are all part of
    /// this slice.
    pub name: Span,
    /// `?` after the name.
    pub optional: bool,
    /// `= expr` default present.
    pub has_default: bool,
    pub ty: Option<Span>,
    /// Shape of the default expression, for type widening when the
    /// parameter has no annotation.
    pub default_init: Option<InitKind>,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Option<String>,
    pub type_params: Option<Span>,
    /// Everything between `extends` and `implements`/`{`.
    pub extends: Option<Span>,
    /// Everything between `implements` and `{`.
    pub implements: Option<Span>,
    pub members: Vec<ClassMember>,
    pub is_abstract: bool,
    pub is_exported: bool,
    pub is_default: bool,
    pub is_declare: bool,
    pub span: Span,
}

/// A member of a class body.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMember {
    pub name: PropName,
    pub kind: MemberKind,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_readonly: bool,
    pub is_async: bool,
    pub optional: bool,
    pub type_params: Option<Span>,
    /// Present for methods, accessors, and constructors.
    pub params: Option<Vec<Param>>,
    /// Field type or method return type.
    pub ty: Option<Span>,
    /// Field initializer shape, for type widening.
    pub init: Option<InitKind>,
    /// Span of the field initializer expression, when present.
    pub init_span: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
    Getter,
    Setter,
    Constructor,
}

/// How a class member or object property is named.
#[derive(Debug, Clone, PartialEq)]
pub enum PropName {
    Ident(String),
    /// String literal name; the span keeps the quotes.
    Str(Span),
    /// Numeric literal name.
    Num(Span),
    /// `[computed]` or an index signature `[key: string]`; the span covers
    /// the brackets.
    Computed(Span),
    /// `#private` member.
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// `const` / `let` / `var`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Const,
    Let,
    Var,
}

impl VarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarKind::Const => "const",
            VarKind::Let => "let",
            VarKind::Var => "var",
        }
    }
}

/// A variable statement with one or more declarators.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub kind: VarKind,
    pub declarators: Vec<Declarator>,
    pub is_exported: bool,
    pub is_declare: bool,
    pub span: Span,
}

/// A single `name[: type][= init]` inside a variable statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: DeclaratorName,
    pub ty: Option<Span>,
    pub init: Option<InitKind>,
    pub init_span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclaratorName {
    Ident(String),
    /// Destructuring pattern; the span covers the whole pattern.
    Pattern(Span),
}

/// An `interface` declaration; the span covers keyword through closing
/// brace and is emitted verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub is_exported: bool,
    pub is_default: bool,
    pub span: Span,
}

/// A `type` alias; the span covers `type` through the end of the aliased
/// type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub name: String,
    pub is_exported: bool,
    pub span: Span,
}

/// An `enum` declaration; the span covers `[const] enum` through closing
/// brace.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub is_const: bool,
    pub is_exported: bool,
    pub is_declare: bool,
    pub span: Span,
}

/// A `namespace N { ... }`, `declare module "m" { ... }`, or
/// `declare global { ... }` block; the span covers the whole block
/// including any `declare` prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub name: String,
    /// Preceded by `declare`. Ambient blocks are already declaration
    /// text and get emitted verbatim from the span.
    pub is_ambient: bool,
    pub is_exported: bool,
    /// Parsed body for non-ambient namespaces, which must be rebuilt
    /// in declaration form. `None` when ambient.
    pub body: Option<Vec<Statement>>,
    pub span: Span,
}

/// Classified shape of an initializer or default expression.
///
/// Single-literal initializers support literal types and primitive
/// widening in the printer; everything else degrades to `any`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitKind {
    Number,
    Str,
    Bool,
    Template,
    Other,
}

impl InitKind {
    /// The widened primitive type name, if this initializer has one.
    pub fn widened(&self) -> Option<&'static str> {
        match self {
            InitKind::Number => Some("number"),
            InitKind::Str => Some("string"),
            InitKind::Bool => Some("boolean"),
            InitKind::Template => Some("string"),
            InitKind::Other => None,
        }
    }

    /// Whether the initializer text itself is usable as a literal type.
    pub fn is_literal(&self) -> bool {
        matches!(self, InitKind::Number | InitKind::Str | InitKind::Bool)
    }
}
