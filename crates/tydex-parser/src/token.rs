//! Token definitions for TypeScript source text.
//!
//! This module defines the tokens the declaration extractor cares about.
//! The set is deliberately smaller than a full ECMAScript scanner: statement
//! bodies and initializer expressions are only ever skipped over with balance
//! counting, so most expression-level operators can decompose into their
//! single-character parts without loss.

use std::fmt;

/// A token in a TypeScript source file.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Declaration keywords
    Import,
    Export,
    From,
    Default,
    Const,
    Let,
    Var,
    Function,
    Class,
    Interface,
    Type,
    Enum,
    Namespace,
    Module,
    Declare,
    Abstract,
    Static,
    Readonly,
    Async,
    Extends,
    Implements,
    This,

    // Literal keywords
    True,
    False,
    Null,

    // Literals
    //
    // Numbers and templates carry no payload: the printer re-slices literal
    // text straight from the source via spans. Strings carry their unescaped
    // value because import specifiers need it.
    Number,
    Str(String),
    TemplateLiteral,
    RegexLiteral,

    // Identifiers
    Identifier(String),
    PrivateName,

    // Operators and punctuation.
    //
    // No multi-char token may contain `<` or `>` (other than `=>`): generic
    // depth tracking requires angle brackets to arrive one at a time, even in
    // text like `Array<T>=x`.
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Tilde,
    Bang,
    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    EqualEqual,
    EqualEqualEqual,
    BangEqual,
    BangEqualEqual,
    Less,
    Greater,
    Equal,
    Arrow,
    Question,
    QuestionDot,
    QuestionQuestion,
    Dot,
    DotDotDot,
    Colon,
    At,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,

    // Special
    Eof,
}

impl Token {
    /// Keyword spelling for tokens that can double as property names.
    ///
    /// TypeScript allows any keyword in member-name position
    /// (`{ type: string }`, `class C { static(): void }`), so the parser
    /// needs the original text back when one shows up there.
    pub fn keyword_text(&self) -> Option<&'static str> {
        match self {
            Token::Import => Some("import"),
            Token::Export => Some("export"),
            Token::From => Some("from"),
            Token::Default => Some("default"),
            Token::Const => Some("const"),
            Token::Let => Some("let"),
            Token::Var => Some("var"),
            Token::Function => Some("function"),
            Token::Class => Some("class"),
            Token::Interface => Some("interface"),
            Token::Type => Some("type"),
            Token::Enum => Some("enum"),
            Token::Namespace => Some("namespace"),
            Token::Module => Some("module"),
            Token::Declare => Some("declare"),
            Token::Abstract => Some("abstract"),
            Token::Static => Some("static"),
            Token::Readonly => Some("readonly"),
            Token::Async => Some("async"),
            Token::Extends => Some("extends"),
            Token::Implements => Some("implements"),
            Token::This => Some("this"),
            Token::True => Some("true"),
            Token::False => Some("false"),
            Token::Null => Some("null"),
            _ => None,
        }
    }

    /// Whether this token can begin a top-level statement.
    ///
    /// Used by automatic-semicolon-insertion heuristics and by error
    /// recovery to find the next statement boundary.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            Token::Import
                | Token::Export
                | Token::Const
                | Token::Let
                | Token::Var
                | Token::Function
                | Token::Class
                | Token::Interface
                | Token::Type
                | Token::Enum
                | Token::Namespace
                | Token::Module
                | Token::Declare
                | Token::Abstract
                | Token::Async
        )
    }

    /// Whether an expression or type can end with this token.
    ///
    /// A newline after one of these, followed by a statement-start token,
    /// terminates an unparenthesized expression under ASI.
    pub fn ends_expression(&self) -> bool {
        matches!(
            self,
            Token::Identifier(_)
                | Token::PrivateName
                | Token::Number
                | Token::Str(_)
                | Token::TemplateLiteral
                | Token::RegexLiteral
                | Token::True
                | Token::False
                | Token::Null
                | Token::This
                // `expr as const` can end an assertion expression.
                | Token::Const
                | Token::RightParen
                | Token::RightBrace
                | Token::RightBracket
                | Token::Greater
        )
    }
}

/// Source location information for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn dummy() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line.min(other.line),
            column: self.column.min(other.column),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Import => write!(f, "import"),
            Token::Export => write!(f, "export"),
            Token::From => write!(f, "from"),
            Token::Default => write!(f, "default"),
            Token::Const => write!(f, "const"),
            Token::Let => write!(f, "let"),
            Token::Var => write!(f, "var"),
            Token::Function => write!(f, "function"),
            Token::Class => write!(f, "class"),
            Token::Interface => write!(f, "interface"),
            Token::Type => write!(f, "type"),
            Token::Enum => write!(f, "enum"),
            Token::Namespace => write!(f, "namespace"),
            Token::Module => write!(f, "module"),
            Token::Declare => write!(f, "declare"),
            Token::Abstract => write!(f, "abstract"),
            Token::Static => write!(f, "static"),
            Token::Readonly => write!(f, "readonly"),
            Token::Async => write!(f, "async"),
            Token::Extends => write!(f, "extends"),
            Token::Implements => write!(f, "implements"),
            Token::This => write!(f, "this"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Null => write!(f, "null"),
            Token::Number => write!(f, "<number>"),
            Token::Str(_) => write!(f, "<string>"),
            Token::TemplateLiteral => write!(f, "`...`"),
            Token::RegexLiteral => write!(f, "<regex>"),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::PrivateName => write!(f, "<private name>"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Caret => write!(f, "^"),
            Token::Tilde => write!(f, "~"),
            Token::Bang => write!(f, "!"),
            Token::Amp => write!(f, "&"),
            Token::AmpAmp => write!(f, "&&"),
            Token::Pipe => write!(f, "|"),
            Token::PipePipe => write!(f, "||"),
            Token::EqualEqual => write!(f, "=="),
            Token::EqualEqualEqual => write!(f, "==="),
            Token::BangEqual => write!(f, "!="),
            Token::BangEqualEqual => write!(f, "!=="),
            Token::Less => write!(f, "<"),
            Token::Greater => write!(f, ">"),
            Token::Equal => write!(f, "="),
            Token::Arrow => write!(f, "=>"),
            Token::Question => write!(f, "?"),
            Token::QuestionDot => write!(f, "?."),
            Token::QuestionQuestion => write!(f, "??"),
            Token::Dot => write!(f, "."),
            Token::DotDotDot => write!(f, "..."),
            Token::Colon => write!(f, ":"),
            Token::At => write!(f, "@"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::Eof => write!(f, "<eof>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_slice() {
        let source = "const x = 1;";
        let span = Span::new(6, 7, 1, 7);
        assert_eq!(span.slice(source), "x");
    }

    #[test]
    fn test_span_merge() {
        let a = Span::new(0, 5, 1, 1);
        let b = Span::new(10, 12, 2, 3);
        let merged = a.merge(&b);
        assert_eq!(merged.start, 0);
        assert_eq!(merged.end, 12);
    }

    #[test]
    fn test_keyword_text_round_trip() {
        assert_eq!(Token::Type.keyword_text(), Some("type"));
        assert_eq!(Token::Declare.keyword_text(), Some("declare"));
        assert_eq!(Token::Comma.keyword_text(), None);
    }
}
