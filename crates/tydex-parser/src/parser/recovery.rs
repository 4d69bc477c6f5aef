//! Error recovery strategies for the parser.
//!
//! When the parser encounters an error, it uses these strategies to
//! resynchronize and continue parsing so a single malformed declaration
//! never poisons the rest of the file.

use super::Parser;
use crate::token::Token;

/// Synchronize to the next statement boundary.
///
/// Skips tokens until something that can begin a statement, a semicolon,
/// or a closing brace. Balanced groups are skipped as units so that
/// statement keywords inside expression bodies don't cause an early stop.
pub fn sync_to_statement_boundary(parser: &mut Parser) {
    while !parser.at_eof() {
        match parser.current() {
            token if token.starts_statement() => return,

            // Semicolon marks end of previous statement
            Token::Semicolon => {
                parser.advance();
                return;
            }

            // Closing brace might end a block
            Token::RightBrace => return,

            Token::LeftParen | Token::LeftBrace | Token::LeftBracket => {
                parser.skip_balanced();
            }

            _ => {
                parser.advance();
            }
        }
    }
}
