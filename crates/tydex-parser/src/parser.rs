//! Declaration-oriented parser for TypeScript sources.
//!
//! This is a recursive descent parser that extracts the statements relevant
//! to declaration emission and skips everything else. Function bodies,
//! initializer expressions, and control flow are consumed with balance
//! counting only, so type errors or exotic expression syntax inside them
//! never derail declaration extraction.
//!
//! Parsing is tolerant by design: errors are accumulated alongside a
//! best-effort AST rather than aborting, mirroring how declaration emit
//! must keep going in the presence of broken input.

pub mod decl;
pub mod error;
pub mod recovery;
pub mod scan;
pub mod stmt;

use crate::ast::*;
use crate::lexer::Lexer;
use crate::token::{Span, Token};

pub use error::{ParseError, ParseErrorKind};

/// Parser state.
pub struct Parser {
    /// Pre-tokenized input
    tokens: Vec<(Token, Span)>,

    /// Current position in token stream
    pos: usize,

    /// Accumulated parse errors (parsing continues after errors)
    errors: Vec<ParseError>,
}

/// Modifier context accumulated before a declaration keyword
/// (`export`, `default`, `declare`), plus the span where the whole
/// statement started.
#[derive(Debug, Clone, Copy)]
pub struct DeclContext {
    pub start: Span,
    pub is_exported: bool,
    pub is_default: bool,
    pub is_declare: bool,
}

impl DeclContext {
    pub fn at(start: Span) -> Self {
        Self {
            start,
            is_exported: false,
            is_default: false,
            is_declare: false,
        }
    }
}

impl Parser {
    /// Create a new parser from source code.
    ///
    /// Lexing never fails outright; any lex errors are converted to parse
    /// errors so the caller sees a single diagnostic stream.
    pub fn new(source: &str) -> Self {
        let (tokens, lex_errors) = Lexer::new(source).tokenize();

        let errors = lex_errors
            .into_iter()
            .map(|err| {
                let span = match &err {
                    crate::lexer::LexError::UnexpectedCharacter { span, .. } => *span,
                    crate::lexer::LexError::UnterminatedTemplate { span } => *span,
                    crate::lexer::LexError::UnterminatedRegex { span } => *span,
                };
                ParseError::invalid_syntax(err.to_string(), span)
            })
            .collect();

        Self {
            tokens,
            pos: 0,
            errors,
        }
    }

    /// Parse the entire source file into a Module AST.
    ///
    /// Always returns a module; accumulated errors ride alongside it. A
    /// statement that fails to parse is dropped and the parser
    /// resynchronizes at the next statement boundary.
    pub fn parse(mut self) -> (Module, Vec<ParseError>) {
        let statements = self.parse_statements_until(&Token::Eof);
        (Module { statements }, self.errors)
    }

    /// Parse statements until the terminator token (not consumed).
    ///
    /// Shared between the top level (terminator `Eof`) and namespace
    /// bodies (terminator `}`).
    pub(crate) fn parse_statements_until(&mut self, terminator: &Token) -> Vec<Statement> {
        let mut statements = Vec::new();

        while !self.at_eof() && !self.check(terminator) {
            let before = self.pos;
            match stmt::parse_statement(self) {
                Ok(Some(stmt)) => statements.push(stmt),
                Ok(None) => {}
                Err(err) => {
                    self.errors.push(err);
                    recovery::sync_to_statement_boundary(self);
                }
            }
            if self.pos == before {
                // Guarantee forward progress on pathological input
                let span = self.current_span();
                self.errors
                    .push(ParseError::parser_stuck("statement made no progress", span));
                self.advance();
            }
        }

        statements
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    /// Peek at the next token (lookahead).
    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|(tok, _)| tok)
    }

    /// The most recently consumed token and its span.
    #[inline]
    pub fn prev(&self) -> Option<&(Token, Span)> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    /// The span of the most recently consumed token, or the current one
    /// when nothing has been consumed yet.
    pub fn prev_span(&self) -> Span {
        match self.prev() {
            Some((_, span)) => *span,
            None => self.current_span(),
        }
    }

    /// Advance to the next token, returning the previous current token.
    pub fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(expected)
    }

    /// Consume the current token if it matches, returning whether it did.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Check if we've reached EOF.
    #[inline]
    pub fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    /// Consume the current token if it matches the expected kind.
    ///
    /// Returns Ok(token) on match, or Err(ParseError) on mismatch.
    pub fn expect(&mut self, expected: Token) -> Result<Token, ParseError> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected_token(&[expected]))
        }
    }

    /// Create an "unexpected token" error at the current position.
    pub fn unexpected_token(&self, expected: &[Token]) -> ParseError {
        let span = self.current_span();
        if self.at_eof() {
            ParseError::unexpected_eof(expected.to_vec(), span)
        } else {
            ParseError::unexpected_token(expected.to_vec(), self.current().clone(), span)
        }
    }

    /// Whether the current token begins on a later line than the previous
    /// token ended on. Drives automatic semicolon insertion decisions.
    pub fn on_new_line(&self) -> bool {
        match self.prev() {
            Some((_, prev_span)) => self.current_span().line > prev_span.line,
            None => false,
        }
    }

    // ========================================================================
    // Identifier-like names
    // ========================================================================

    /// The current token's text when it can serve as a binding name.
    ///
    /// TypeScript keeps most of our keywords contextual (`type`, `from`,
    /// `namespace`, ...), so they remain legal variable, function, and
    /// class names.
    pub fn identifier_like(&self) -> Option<String> {
        match self.current() {
            Token::Identifier(name) => Some(name.clone()),
            Token::From => Some("from".to_string()),
            Token::Type => Some("type".to_string()),
            Token::Namespace => Some("namespace".to_string()),
            Token::Module => Some("module".to_string()),
            Token::Declare => Some("declare".to_string()),
            Token::Abstract => Some("abstract".to_string()),
            Token::Static => Some("static".to_string()),
            Token::Readonly => Some("readonly".to_string()),
            Token::Async => Some("async".to_string()),
            Token::Default => None,
            _ => None,
        }
    }

    /// Whether the current token is a specific contextual identifier.
    pub fn is_ident(&self, text: &str) -> bool {
        matches!(self.current(), Token::Identifier(name) if name == text)
    }

    // ========================================================================
    // Balanced skipping
    // ========================================================================

    /// Skip a balanced `(...)`, `[...]`, or `{...}` group, starting at the
    /// opener. Stops after the matching closer, or at EOF for unbalanced
    /// input.
    pub fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.current() {
                Token::LeftParen | Token::LeftBrace | Token::LeftBracket => depth += 1,
                Token::RightParen | Token::RightBrace | Token::RightBracket => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                Token::Eof => return,
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip one or more `@decorator` prefixes, including any argument
    /// lists.
    pub fn skip_decorators(&mut self) {
        while self.check(&Token::At) {
            self.advance();
            // Dotted identifier chain
            while self.identifier_like().is_some() {
                self.advance();
                if !self.eat(&Token::Dot) {
                    break;
                }
            }
            if self.check(&Token::LeftParen) {
                self.skip_balanced();
            }
        }
    }

    // ========================================================================
    // Utilities
    // ========================================================================

    /// Combine two spans into a single span.
    pub fn combine_spans(&self, start: &Span, end: &Span) -> Span {
        Span {
            start: start.start,
            end: end.end,
            line: start.line,
            column: start.column,
        }
    }

    /// Span from a start span through the most recently consumed token.
    pub fn span_from(&self, start: &Span) -> Span {
        let end = self.prev_span();
        self.combine_spans(start, &end)
    }
}
