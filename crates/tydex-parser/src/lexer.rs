//! Lexer for TypeScript source text.
//!
//! Built on the logos library for the regular portion of the token grammar.
//! Template literals and regular expression literals are context sensitive
//! and cannot be expressed as logos patterns, so the wrapper scans them by
//! hand and advances the logos lexer past them with `bump`.

use crate::token::{Span, Token};
use logos::Logos;

/// Logos-based token enum for lexing.
///
/// Used internally for efficient tokenization and converted to the public
/// [`Token`] enum after each match.
#[derive(Logos, Debug, Clone, PartialEq)]
enum LogosToken {
    // Whitespace (skip)
    #[regex(r"[ \t\r\n\u{FEFF}]+", logos::skip)]
    Whitespace,

    // Comments (skip)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*", lex_block_comment)]
    BlockComment,

    // Shebang line (skip)
    #[regex(r"#![^\n]*", logos::skip)]
    Shebang,

    // Keywords (must come before identifiers)
    #[token("import")]
    Import,

    #[token("export")]
    Export,

    #[token("from")]
    From,

    #[token("default")]
    Default,

    #[token("const")]
    Const,

    #[token("let")]
    Let,

    #[token("var")]
    Var,

    #[token("function")]
    Function,

    #[token("class")]
    Class,

    #[token("interface")]
    Interface,

    #[token("type")]
    Type,

    #[token("enum")]
    Enum,

    #[token("namespace")]
    Namespace,

    #[token("module")]
    Module,

    #[token("declare")]
    Declare,

    #[token("abstract")]
    Abstract,

    #[token("static")]
    Static,

    #[token("readonly")]
    Readonly,

    #[token("async")]
    Async,

    #[token("extends")]
    Extends,

    #[token("implements")]
    Implements,

    #[token("this")]
    This,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("null")]
    Null,

    // Identifiers (must come after keywords)
    #[regex(r"[\p{XID_Start}_$][\p{XID_Continue}$]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Private class member names
    #[regex(r"#[\p{XID_Start}_$][\p{XID_Continue}$]*")]
    PrivateName,

    // Numbers with numeric separator and bigint suffix support
    #[regex(r"0[xX][0-9a-fA-F]+(_[0-9a-fA-F]+)*n?")]
    #[regex(r"0[bB][01]+(_[01]+)*n?")]
    #[regex(r"0[oO][0-7]+(_[0-7]+)*n?")]
    #[regex(r"[0-9]+(_[0-9]+)*n")]
    #[regex(r"[0-9]+(_[0-9]+)*(\.[0-9]+(_[0-9]+)*)?([eE][+-]?[0-9]+(_[0-9]+)*)?")]
    #[regex(r"\.[0-9]+(_[0-9]+)*([eE][+-]?[0-9]+(_[0-9]+)*)?")]
    Number,

    // Strings
    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    #[regex(r"'([^'\\\n]|\\.)*'", parse_string)]
    Str(String),

    // Template literal start; the wrapper scans the rest by hand
    #[token("`")]
    Backtick,

    // Operators (longer tokens must come before their prefixes)
    #[token("===")]
    EqualEqualEqual,

    #[token("!==")]
    BangEqualEqual,

    #[token("==")]
    EqualEqual,

    #[token("!=")]
    BangEqual,

    #[token("&&")]
    AmpAmp,

    #[token("||")]
    PipePipe,

    #[token("??")]
    QuestionQuestion,

    #[token("?.")]
    QuestionDot,

    #[token("=>")]
    Arrow,

    #[token("...")]
    DotDotDot,

    // Single-character tokens
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("^")]
    Caret,

    #[token("~")]
    Tilde,

    #[token("!")]
    Bang,

    #[token("&")]
    Amp,

    #[token("|")]
    Pipe,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("=")]
    Equal,

    #[token("?")]
    Question,

    #[token(".")]
    Dot,

    #[token(":")]
    Colon,

    #[token("@")]
    At,

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,
}

// Helper parsing functions
fn lex_block_comment(lex: &mut logos::Lexer<LogosToken>) -> logos::Skip {
    // We've already consumed "/*", now find "*/"
    let remainder = lex.remainder();

    if let Some(end) = remainder.find("*/") {
        // Consume everything up to and including "*/"
        lex.bump(end + 2);
    } else {
        // Unterminated comment - consume to end
        lex.bump(remainder.len());
    }

    logos::Skip
}

fn parse_string(lex: &mut logos::Lexer<LogosToken>) -> Option<String> {
    let s = lex.slice();
    let inner = &s[1..s.len() - 1]; // Remove quotes
    Some(unescape_string(inner))
}

fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{C}'),
            Some('v') => result.push('\u{B}'),
            Some('0') => result.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(c) => result.push(c),
                    None => {
                        result.push('x');
                        result.push_str(&hex);
                    }
                }
            }
            Some('u') => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    let hex: String = chars.by_ref().take_while(|c| *c != '}').collect();
                    match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                        Some(c) => result.push(c),
                        None => result.push_str(&hex),
                    }
                } else {
                    let hex: String = chars.by_ref().take(4).collect();
                    match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                        Some(c) => result.push(c),
                        None => {
                            result.push('u');
                            result.push_str(&hex);
                        }
                    }
                }
            }
            Some(c) => result.push(c),
            None => break,
        }
    }

    result
}

/// Lexer error types.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    UnexpectedCharacter { char: char, span: Span },
    UnterminatedTemplate { span: Span },
    UnterminatedRegex { span: Span },
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::UnexpectedCharacter { char, span } => {
                write!(
                    f,
                    "Unexpected character '{}' at {}:{}",
                    char, span.line, span.column
                )
            }
            LexError::UnterminatedTemplate { span } => {
                write!(
                    f,
                    "Unterminated template literal at {}:{}",
                    span.line, span.column
                )
            }
            LexError::UnterminatedRegex { span } => {
                write!(
                    f,
                    "Unterminated regular expression at {}:{}",
                    span.line, span.column
                )
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Main lexer structure.
pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<(Token, Span)>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the whole source.
    ///
    /// Lexing is tolerant: unexpected characters are recorded as errors and
    /// skipped so the parser always receives a usable token stream.
    pub fn tokenize(mut self) -> (Vec<(Token, Span)>, Vec<LexError>) {
        let mut logos_lexer = LogosToken::lexer(self.source);
        let mut line = 1u32;
        let mut column = 1u32;
        let mut last_end = 0usize;

        while let Some(token_result) = logos_lexer.next() {
            let range = logos_lexer.span();

            // Advance line and column over whatever was skipped
            advance_position(&mut line, &mut column, &self.source[last_end..range.start]);

            let mut end = range.end;
            let span = Span::new(range.start, range.end, line, column);

            match token_result {
                Ok(LogosToken::Backtick) => match scan_template(self.source, range.start) {
                    Some(template_end) => {
                        logos_lexer.bump(template_end - range.end);
                        end = template_end;
                        let span = Span::new(range.start, template_end, line, column);
                        self.tokens.push((Token::TemplateLiteral, span));
                    }
                    None => {
                        self.errors.push(LexError::UnterminatedTemplate { span });
                        logos_lexer.bump(self.source.len() - range.end);
                        end = self.source.len();
                    }
                },
                Ok(LogosToken::Slash) if self.regex_allowed() => {
                    match scan_regex(self.source, range.start) {
                        Some(regex_end) => {
                            logos_lexer.bump(regex_end - range.end);
                            end = regex_end;
                            let span = Span::new(range.start, regex_end, line, column);
                            self.tokens.push((Token::RegexLiteral, span));
                        }
                        // A slash that does not open a valid regex is division
                        None => self.tokens.push((Token::Slash, span)),
                    }
                }
                Ok(logos_token) => {
                    let token = convert_token(logos_token);
                    self.tokens.push((token, span));
                }
                Err(_) => {
                    let char = self.source[range.start..].chars().next().unwrap_or('\0');
                    self.errors.push(LexError::UnexpectedCharacter { char, span });
                }
            }

            // Advance position through the token text itself
            advance_position(&mut line, &mut column, &self.source[range.start..end]);
            last_end = end;
        }

        advance_position(&mut line, &mut column, &self.source[last_end..]);
        let eof_span = Span::new(self.source.len(), self.source.len(), line, column);
        self.tokens.push((Token::Eof, eof_span));

        (self.tokens, self.errors)
    }

    /// Whether a `/` in the current position opens a regex literal.
    ///
    /// A regex can only follow a token that cannot end an expression. This
    /// is the classic heuristic; it misreads a handful of pathological
    /// constructs but never the ones that matter for declarations.
    fn regex_allowed(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some((token, _)) => !token.ends_expression(),
        }
    }
}

fn advance_position(line: &mut u32, column: &mut u32, text: &str) {
    for c in text.chars() {
        if c == '\n' {
            *line += 1;
            *column = 1;
        } else {
            *column += 1;
        }
    }
}

/// Scan a template literal beginning at the backtick at `start`.
///
/// Returns the byte offset just past the closing backtick, or `None` if the
/// template never terminates. Substitutions (`${ ... }`) may contain nested
/// strings, templates, and comments; all are handled here so the outer
/// scan never stops on a `}` or backtick that belongs to an inner construct.
fn scan_template(source: &str, start: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut i = start + 1;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += escape_len(bytes, i),
            b'`' => return Some(i + 1),
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                i = scan_substitution(source, i + 2)?;
            }
            _ => i += char_len(bytes[i]),
        }
    }

    None
}

/// Scan the inside of a `${ ... }` substitution; `i` points past the `{`.
/// Returns the offset just past the matching `}`.
fn scan_substitution(source: &str, mut i: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut depth = 1usize;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            b'\'' | b'"' => i = scan_quoted(bytes, i)?,
            b'`' => i = scan_template(source, i)?,
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
            }
            b'\\' => i += escape_len(bytes, i),
            c => i += char_len(c),
        }
    }

    None
}

/// Scan a single- or double-quoted string starting at the quote at `i`.
fn scan_quoted(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += escape_len(bytes, i),
            c if c == quote => return Some(i + 1),
            b'\n' => return Some(i),
            c => i += char_len(c),
        }
    }
    None
}

/// Scan a regex literal beginning at the `/` at `start`.
///
/// Returns the byte offset just past the flags, or `None` if no valid regex
/// starts here (an unescaped newline before the closing `/` means the slash
/// was division after all).
fn scan_regex(source: &str, start: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut i = start + 1;
    let mut in_class = false;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += escape_len(bytes, i),
            b'\n' => return None,
            b'[' => {
                in_class = true;
                i += 1;
            }
            b']' => {
                in_class = false;
                i += 1;
            }
            b'/' if !in_class => {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                return Some(i);
            }
            c => i += char_len(c),
        }
    }

    None
}

#[inline]
fn char_len(first_byte: u8) -> usize {
    match first_byte {
        b if b < 0x80 => 1,
        b if b < 0xE0 => 2,
        b if b < 0xF0 => 3,
        _ => 4,
    }
}

/// Bytes consumed by a backslash escape: the backslash plus however many
/// bytes the escaped character spans. The escaped character may sit
/// directly before a terminator, so stepping a fixed two bytes would land
/// mid-character.
#[inline]
fn escape_len(bytes: &[u8], backslash: usize) -> usize {
    match bytes.get(backslash + 1) {
        Some(&next) => 1 + char_len(next),
        None => 1,
    }
}

fn convert_token(logos_token: LogosToken) -> Token {
    match logos_token {
        LogosToken::Import => Token::Import,
        LogosToken::Export => Token::Export,
        LogosToken::From => Token::From,
        LogosToken::Default => Token::Default,
        LogosToken::Const => Token::Const,
        LogosToken::Let => Token::Let,
        LogosToken::Var => Token::Var,
        LogosToken::Function => Token::Function,
        LogosToken::Class => Token::Class,
        LogosToken::Interface => Token::Interface,
        LogosToken::Type => Token::Type,
        LogosToken::Enum => Token::Enum,
        LogosToken::Namespace => Token::Namespace,
        LogosToken::Module => Token::Module,
        LogosToken::Declare => Token::Declare,
        LogosToken::Abstract => Token::Abstract,
        LogosToken::Static => Token::Static,
        LogosToken::Readonly => Token::Readonly,
        LogosToken::Async => Token::Async,
        LogosToken::Extends => Token::Extends,
        LogosToken::Implements => Token::Implements,
        LogosToken::This => Token::This,
        LogosToken::True => Token::True,
        LogosToken::False => Token::False,
        LogosToken::Null => Token::Null,
        LogosToken::Identifier(s) => Token::Identifier(s),
        LogosToken::PrivateName => Token::PrivateName,
        LogosToken::Number => Token::Number,
        LogosToken::Str(s) => Token::Str(s),
        LogosToken::EqualEqualEqual => Token::EqualEqualEqual,
        LogosToken::BangEqualEqual => Token::BangEqualEqual,
        LogosToken::EqualEqual => Token::EqualEqual,
        LogosToken::BangEqual => Token::BangEqual,
        LogosToken::AmpAmp => Token::AmpAmp,
        LogosToken::PipePipe => Token::PipePipe,
        LogosToken::QuestionQuestion => Token::QuestionQuestion,
        LogosToken::QuestionDot => Token::QuestionDot,
        LogosToken::Arrow => Token::Arrow,
        LogosToken::DotDotDot => Token::DotDotDot,
        LogosToken::Plus => Token::Plus,
        LogosToken::Minus => Token::Minus,
        LogosToken::Star => Token::Star,
        LogosToken::Slash => Token::Slash,
        LogosToken::Percent => Token::Percent,
        LogosToken::Caret => Token::Caret,
        LogosToken::Tilde => Token::Tilde,
        LogosToken::Bang => Token::Bang,
        LogosToken::Amp => Token::Amp,
        LogosToken::Pipe => Token::Pipe,
        LogosToken::Less => Token::Less,
        LogosToken::Greater => Token::Greater,
        LogosToken::Equal => Token::Equal,
        LogosToken::Question => Token::Question,
        LogosToken::Dot => Token::Dot,
        LogosToken::Colon => Token::Colon,
        LogosToken::At => Token::At,
        LogosToken::LeftParen => Token::LeftParen,
        LogosToken::RightParen => Token::RightParen,
        LogosToken::LeftBrace => Token::LeftBrace,
        LogosToken::RightBrace => Token::RightBrace,
        LogosToken::LeftBracket => Token::LeftBracket,
        LogosToken::RightBracket => Token::RightBracket,
        LogosToken::Semicolon => Token::Semicolon,
        LogosToken::Comma => Token::Comma,
        LogosToken::Whitespace
        | LogosToken::LineComment
        | LogosToken::BlockComment
        | LogosToken::Shebang => {
            unreachable!("Whitespace and comments should be skipped")
        }
        LogosToken::Backtick => unreachable!("Backtick handled separately"),
    }
}
