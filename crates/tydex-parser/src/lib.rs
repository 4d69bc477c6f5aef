//! Declaration-oriented TypeScript parser.
//!
//! This crate lexes and parses TypeScript source text just deeply enough to
//! recover its declaration surface: imports, exports, and the signatures of
//! functions, classes, variables, interfaces, type aliases, enums, and
//! namespaces. Statement bodies and initializer expressions are skipped with
//! balance counting, which keeps parsing tolerant of type errors and most
//! syntax damage inside implementations.
//!
//! Both lexer and parser accumulate errors instead of failing: callers
//! always receive a best-effort [`ast::Module`] plus whatever diagnostics
//! were collected along the way.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::Module;
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, ParseErrorKind, Parser};
pub use token::{Span, Token};

/// Parse a source file, returning the module and any accumulated errors.
pub fn parse_module(source: &str) -> (Module, Vec<ParseError>) {
    Parser::new(source).parse()
}
