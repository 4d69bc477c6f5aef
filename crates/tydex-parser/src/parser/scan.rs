//! Balanced token scanning for type annotations and initializers.
//!
//! Types and expressions are not given a full grammar. Instead they are
//! consumed as balanced token runs and kept as source spans; the printer
//! re-slices the original text. The scanner's job is to find where the
//! run ends, which takes bracket depth tracking, a few context-dependent
//! stop tokens, and an automatic-semicolon-insertion heuristic for code
//! that omits semicolons.

use super::Parser;
use crate::ast::InitKind;
use crate::token::{Span, Token};

/// Automatic semicolon insertion mode.
///
/// After a newline, a scan stops when the previous token could end an
/// expression and the next token could start whatever comes next in the
/// surrounding context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsiMode {
    /// The next construct would be a top-level statement.
    Statement,
    /// The next construct would be a class member.
    Member,
}

/// What terminates a scan at bracket depth zero.
#[derive(Debug, Clone, Copy)]
pub struct ScanStops {
    /// Stop at `,`
    pub comma: bool,
    /// Stop at `=`
    pub equal: bool,
    /// Stop at a `{` that follows a complete type (it opens a body)
    pub brace_opens_body: bool,
    /// Stop at the `implements` keyword (heritage clauses)
    pub stop_implements: bool,
    /// Count `<`/`>` as bracketing. True in type position, where they are
    /// always generics; false in expressions, where they are comparisons.
    pub track_angles: bool,
    pub asi: AsiMode,
}

impl ScanStops {
    /// Variable and parameter type annotations: `name: T = ...` and
    /// `name: T, ...`.
    pub fn annotation() -> Self {
        Self {
            comma: true,
            equal: true,
            brace_opens_body: false,
            stop_implements: false,
            track_angles: true,
            asi: AsiMode::Statement,
        }
    }

    /// Function and method return types, which end at the body brace.
    pub fn return_type(asi: AsiMode) -> Self {
        Self {
            comma: false,
            equal: false,
            brace_opens_body: true,
            stop_implements: false,
            track_angles: true,
            asi,
        }
    }

    /// The right-hand side of a type alias.
    pub fn aliased_type() -> Self {
        Self {
            comma: false,
            equal: false,
            brace_opens_body: false,
            stop_implements: false,
            track_angles: true,
            asi: AsiMode::Statement,
        }
    }

    /// `extends` / `implements` clauses, ending at the class body.
    pub fn heritage() -> Self {
        Self {
            comma: false,
            equal: false,
            brace_opens_body: true,
            stop_implements: true,
            track_angles: true,
            asi: AsiMode::Statement,
        }
    }

    /// Class field type annotations.
    pub fn field_type() -> Self {
        Self {
            comma: false,
            equal: true,
            brace_opens_body: false,
            stop_implements: false,
            track_angles: true,
            asi: AsiMode::Member,
        }
    }

    /// Initializer and default-value expressions. `comma` distinguishes
    /// contexts where a comma separates the next declarator or parameter
    /// from contexts where it cannot appear at depth zero.
    pub fn initializer(comma: bool, asi: AsiMode) -> Self {
        Self {
            comma,
            equal: false,
            brace_opens_body: false,
            stop_implements: false,
            track_angles: false,
            asi,
        }
    }
}

/// Result of a scan: the covered span and the classified shape of what
/// was consumed (meaningful for initializers).
#[derive(Debug, Clone, Copy)]
pub struct Scanned {
    pub span: Span,
    pub init: InitKind,
}

/// Consume a balanced token run according to `stops`.
///
/// Returns `None` when the run is empty (the stop condition held
/// immediately). The terminating token is never consumed.
pub fn scan(p: &mut Parser, stops: ScanStops) -> Option<Scanned> {
    let start = p.current_span();
    let mut depth = 0usize;
    let mut angle = 0usize;
    let mut count = 0usize;
    let mut first: Option<Token> = None;
    let mut second: Option<Token> = None;

    loop {
        let tok = p.current().clone();

        if matches!(tok, Token::Eof) {
            break;
        }

        // Unbalanced closers always end the run: they belong to an
        // enclosing construct.
        if matches!(
            tok,
            Token::RightParen | Token::RightBrace | Token::RightBracket
        ) && depth == 0
        {
            break;
        }

        if depth == 0 && angle == 0 {
            match tok {
                Token::Semicolon => break,
                Token::Comma if stops.comma => break,
                Token::Equal if stops.equal => break,
                Token::Implements if stops.stop_implements => break,
                Token::LeftBrace
                    if stops.brace_opens_body && count > 0 && prev_ends_expression(p) =>
                {
                    break
                }
                _ => {}
            }

            if count > 0 && p.on_new_line() && prev_ends_expression(p) && asi_start(&tok, stops.asi)
            {
                break;
            }
        }

        match tok {
            Token::LeftParen | Token::LeftBrace | Token::LeftBracket => depth += 1,
            Token::RightParen | Token::RightBrace | Token::RightBracket => {
                depth = depth.saturating_sub(1);
            }
            Token::Less if stops.track_angles => angle += 1,
            Token::Greater if stops.track_angles => angle = angle.saturating_sub(1),
            _ => {}
        }

        if count == 0 {
            first = Some(tok);
        } else if count == 1 {
            second = Some(tok);
        }
        count += 1;
        p.advance();
    }

    if count == 0 {
        return None;
    }

    Some(Scanned {
        span: p.span_from(&start),
        init: classify(first.as_ref(), second.as_ref(), count),
    })
}

/// Scan a type position, yielding just the covered span.
pub fn scan_type(p: &mut Parser, stops: ScanStops) -> Option<Span> {
    scan(p, stops).map(|s| s.span)
}

/// Slice a `<...>` type parameter or argument list, starting at the `<`.
pub fn scan_type_params(p: &mut Parser) -> Span {
    let start = p.current_span();
    let mut angle = 0usize;
    let mut depth = 0usize;

    loop {
        match p.current() {
            Token::Less => angle += 1,
            Token::Greater => {
                angle = angle.saturating_sub(1);
                if angle == 0 && depth == 0 {
                    p.advance();
                    break;
                }
            }
            Token::LeftParen | Token::LeftBrace | Token::LeftBracket => depth += 1,
            Token::RightParen | Token::RightBrace | Token::RightBracket => {
                depth = depth.saturating_sub(1)
            }
            Token::Eof => break,
            _ => {}
        }
        p.advance();
    }

    p.span_from(&start)
}

fn prev_ends_expression(p: &Parser) -> bool {
    match p.prev() {
        Some((tok, _)) => tok.ends_expression(),
        None => false,
    }
}

/// Whether `tok` can begin the next construct in the given ASI mode.
fn asi_start(tok: &Token, mode: AsiMode) -> bool {
    match mode {
        AsiMode::Statement => tok.starts_statement(),
        AsiMode::Member => {
            tok.keyword_text().is_some()
                || matches!(
                    tok,
                    Token::Identifier(_)
                        | Token::Str(_)
                        | Token::Number
                        | Token::PrivateName
                        | Token::At
                )
        }
    }
}

/// Classify a scanned initializer by its first tokens. Only single
/// literals (optionally negated numbers) support literal types; anything
/// longer degrades to `Other`.
fn classify(first: Option<&Token>, second: Option<&Token>, count: usize) -> InitKind {
    match (count, first) {
        (1, Some(Token::Number)) => InitKind::Number,
        (1, Some(Token::Str(_))) => InitKind::Str,
        (1, Some(Token::True)) | (1, Some(Token::False)) => InitKind::Bool,
        (1, Some(Token::TemplateLiteral)) => InitKind::Template,
        (2, Some(Token::Minus)) if matches!(second, Some(Token::Number)) => InitKind::Number,
        _ => InitKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_source(source: &str, stops: ScanStops) -> Option<(String, InitKind)> {
        let mut parser = Parser::new(source);
        scan(&mut parser, stops).map(|s| (s.span.slice(source).to_string(), s.init))
    }

    #[test]
    fn test_scan_annotation_stops_at_equal() {
        let (text, _) = scan_source("Map<string, number> = new Map()", ScanStops::annotation())
            .expect("non-empty scan");
        assert_eq!(text, "Map<string, number>");
    }

    #[test]
    fn test_scan_annotation_generic_comma_is_not_a_stop() {
        let (text, _) =
            scan_source("Record<string, A | B>, next", ScanStops::annotation()).unwrap();
        assert_eq!(text, "Record<string, A | B>");
    }

    #[test]
    fn test_scan_return_type_stops_at_body() {
        let (text, _) = scan_source(
            "{ ok: boolean } | null { return null; }",
            ScanStops::return_type(AsiMode::Statement),
        )
        .unwrap();
        assert_eq!(text, "{ ok: boolean } | null");
    }

    #[test]
    fn test_scan_initializer_classifies_literals() {
        let (_, kind) =
            scan_source("42;", ScanStops::initializer(true, AsiMode::Statement)).unwrap();
        assert_eq!(kind, InitKind::Number);

        let (_, kind) =
            scan_source("-42;", ScanStops::initializer(true, AsiMode::Statement)).unwrap();
        assert_eq!(kind, InitKind::Number);

        let (_, kind) =
            scan_source("\"hi\";", ScanStops::initializer(true, AsiMode::Statement)).unwrap();
        assert_eq!(kind, InitKind::Str);

        let (_, kind) =
            scan_source("1 + 2;", ScanStops::initializer(true, AsiMode::Statement)).unwrap();
        assert_eq!(kind, InitKind::Other);
    }

    #[test]
    fn test_scan_asi_stops_before_next_statement() {
        let source = "foo(1)\nconst y = 2;";
        let (text, _) =
            scan_source(source, ScanStops::initializer(true, AsiMode::Statement)).unwrap();
        assert_eq!(text, "foo(1)");
    }

    #[test]
    fn test_scan_continues_over_operator_linebreak() {
        let source = "A |\nB;";
        let (text, _) = scan_source(source, ScanStops::aliased_type()).unwrap();
        assert_eq!(text, "A |\nB");
    }

    #[test]
    fn test_scan_type_params_nested() {
        let source = "<T extends Record<string, number[]>, U = () => T> rest";
        let mut parser = Parser::new(source);
        let span = scan_type_params(&mut parser);
        assert_eq!(
            span.slice(source),
            "<T extends Record<string, number[]>, U = () => T>"
        );
    }

    #[test]
    fn test_scan_empty_returns_none() {
        assert!(scan_source("= 1", ScanStops::annotation()).is_none());
    }

    #[test]
    fn test_scan_stops_at_unbalanced_closer() {
        let (text, _) = scan_source("number)", ScanStops::annotation()).unwrap();
        assert_eq!(text, "number");
    }
}
