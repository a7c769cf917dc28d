/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : interpreter/lexer.rs

Copyright (C) 2021 CJ McAllister
    This program is free software; you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation; either version 3 of the License, or
    (at your option) any later version.
    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.
    You should have received a copy of the GNU General Public License
    along with this program; if not, write to the Free Software Foundation,
    Inc., 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301  USA

Purpose:
    This module scans formula and configuration text into Tokens.

    Positions reported in errors are 1-based character offsets.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use std::{error::Error, fmt, iter::Peekable, str::Chars};

use log::trace;

use crate::interpreter::Token;


///////////////////////////////////////////////////////////////////////////////
//  Data Structures
///////////////////////////////////////////////////////////////////////////////

pub struct Lexer<'c> {
    expr_iter: Peekable<Chars<'c>>,
    position: u32,
}

#[derive(Debug, PartialEq)]
pub enum LexerError {
    IncompleteOperator(String, u32),
    UnexpectedCharacter(String, u32),
}


///////////////////////////////////////////////////////////////////////////////
//  Object Implementations
///////////////////////////////////////////////////////////////////////////////

impl<'c> Lexer<'c> {
    pub fn new(expr_str: &'c str) -> Self {
        Self {
            expr_iter: expr_str.chars().peekable(),
            position: 0,
        }
    }


    /*  *  *  *  *  *  *  *\
     *  Utility Methods   *
    \*  *  *  *  *  *  *  */

    pub fn scan(&mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();

        // Only push tokens, whitespace is skipped
        while let Some(character) = self.consume_character() {
            if let Some(token) = self.scan_single(character)? {
                tokens.push(token);
            }
        }

        trace!("Scanned tokens {:?}", tokens);

        Ok(tokens)
    }


    /*  *  *  *  *  *  *  *\
     *   Helper Methods   *
    \*  *  *  *  *  *  *  */

    fn scan_single(&mut self, character: char) -> Result<Option<Token>, LexerError> {
        let token = match character {
            // Single-Character Tokens
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            ',' => Some(Token::Comma),
            '.' => Some(Token::Dot),
            ':' => Some(Token::Colon),
            '!' => Some(Token::Bang),

            // Multi-Character Tokens
            '&' => Some(self.expect_next('&', "&&", Token::AndAnd)?),
            '|' => Some(self.expect_next('|', "||", Token::OrOr)?),
            '-' => Some(self.expect_next('>', "->", Token::Arrow)?),
            '<' => {
                let start = self.position;
                if self.match_next('-') && self.match_next('>') {
                    Some(Token::DoubleArrow)
                } else {
                    return Err(LexerError::IncompleteOperator(String::from("<->"), start));
                }
            }

            // Identifiers
            x if x.is_alphanumeric() || x == '_' => Some(self.capture_identifier(x)),

            // Whitespace
            x if x.is_whitespace() => None,

            // Unexpected Character
            _ => {
                return Err(LexerError::UnexpectedCharacter(
                    String::from(character),
                    self.position,
                ))
            }
        };

        Ok(token)
    }

    fn expect_next(
        &mut self,
        expected: char,
        lexeme: &str,
        token: Token,
    ) -> Result<Token, LexerError> {
        let start = self.position;
        if self.match_next(expected) {
            Ok(token)
        } else {
            Err(LexerError::IncompleteOperator(lexeme.to_string(), start))
        }
    }

    fn match_next(&mut self, expected: char) -> bool {
        // End of the expression is effectively a failed match
        if self.expr_iter.peek() != Some(&expected) {
            return false;
        }

        self.consume_character();

        true
    }

    fn capture_identifier(&mut self, first_char: char) -> Token {
        let mut identifier = String::from(first_char);

        while let Some(&next_char) = self.expr_iter.peek() {
            if !(next_char.is_alphanumeric() || next_char == '_') {
                break;
            }

            identifier.push(next_char);
            self.consume_character();
        }

        Token::Identifier(identifier)
    }

    // Advance iterator and update position
    fn consume_character(&mut self) -> Option<char> {
        let next = self.expr_iter.next();
        if next.is_some() {
            self.position += 1;
        }

        next
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Trait Implementations
///////////////////////////////////////////////////////////////////////////////

/*  *  *  *  *  *  *  *\
 *     LexerError     *
\*  *  *  *  *  *  *  */

impl Error for LexerError {}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::IncompleteOperator(lexeme, position) => {
                write!(
                    f,
                    "Incomplete operator, expected '{}' at position {} in expression",
                    lexeme, position
                )
            }
            Self::UnexpectedCharacter(lexeme, position) => {
                write!(
                    f,
                    "Unexpected character '{}' at position {} in expression",
                    lexeme, position
                )
            }
        }
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Unit Tests
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use std::error::Error;

    use crate::interpreter::{
        lexer::{Lexer, LexerError},
        Token,
    };

    use test_log::test;


    type TestResult = Result<(), Box<dyn Error>>;

    fn ident(name: &str) -> Token {
        Token::Identifier(name.to_string())
    }


    #[test]
    fn operators_and_atoms() -> TestResult {
        let mut lexer = Lexer::new("!(pump.on && valve:open) || a_1.s2 -> x.y <-> true");

        assert_eq!(
            lexer.scan()?,
            vec![
                Token::Bang,
                Token::LeftParen,
                ident("pump"),
                Token::Dot,
                ident("on"),
                Token::AndAnd,
                ident("valve"),
                Token::Colon,
                ident("open"),
                Token::RightParen,
                Token::OrOr,
                ident("a_1"),
                Token::Dot,
                ident("s2"),
                Token::Arrow,
                ident("x"),
                Token::Dot,
                ident("y"),
                Token::DoubleArrow,
                ident("true"),
            ]
        );

        Ok(())
    }

    #[test]
    fn whitespace_only() -> TestResult {
        assert_eq!(Lexer::new(" \t\n ").scan()?, Vec::new());

        Ok(())
    }

    #[test]
    fn unexpected_char() {
        assert_eq!(
            Lexer::new("`").scan(),
            Err(LexerError::UnexpectedCharacter(String::from('`'), 1)),
        );
        assert_eq!(
            Lexer::new("m.s == n.t").scan(),
            Err(LexerError::UnexpectedCharacter(String::from('='), 5)),
        );
    }

    #[test]
    fn incomplete_operator() {
        assert_eq!(
            Lexer::new("a.b & c.d").scan(),
            Err(LexerError::IncompleteOperator(String::from("&&"), 5)),
        );
        assert_eq!(
            Lexer::new("a.b |").scan(),
            Err(LexerError::IncompleteOperator(String::from("||"), 5)),
        );
        assert_eq!(
            Lexer::new("a.b - c.d").scan(),
            Err(LexerError::IncompleteOperator(String::from("->"), 5)),
        );
        assert_eq!(
            Lexer::new("a.b <- c.d").scan(),
            Err(LexerError::IncompleteOperator(String::from("<->"), 5)),
        );
    }
}
