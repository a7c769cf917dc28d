/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : interpreter/parser.rs

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
    This module parses a Token stream into an SmProposition.

    Precedence Hierarchy:
    expression     → equivalence ;
    equivalence    → implication ( "<->" implication )* ;
    implication    → disjunction ( "->" implication )? ;
    disjunction    → conjunction ( "||" conjunction )* ;
    conjunction    → unary ( "&&" unary )* ;
    unary          → "!" unary
                     | primary ;
    primary        → "true" | "false" | atom
                     | "(" expression ")" ;
    atom           → IDENTIFIER ( "." | ":" ) IDENTIFIER ;

    Negations, groups and the right operands of "->" nest at most
    MAX_NESTING_DEPTH levels deep. Deeper input is rejected rather than
    recursed into.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use std::{error::Error, fmt, iter::Peekable, slice::Iter};

use crate::{interpreter::Token, proposition::SmProposition};


///////////////////////////////////////////////////////////////////////////////
//  Data Structures
///////////////////////////////////////////////////////////////////////////////

pub const MAX_NESTING_DEPTH: usize = 128;

pub struct Parser<'i> {
    token_iter: Peekable<Iter<'i, Token>>,
    position: u32,
    depth: usize,
}

#[derive(Debug, PartialEq)]
pub enum ParserError {
    IncompleteAtom(String /* Machine ID */),
    InvalidPrimaryToken(Token),
    NestingTooDeep(u32 /* Token position */),
    TrailingTokens(Token),
    UnexpectedEndOfExpression,
    UnterminatedGroup,
}

pub type ParserResult = Result<SmProposition, ParserError>;


///////////////////////////////////////////////////////////////////////////////
//  Object Implementations
///////////////////////////////////////////////////////////////////////////////

impl<'i> Parser<'i> {
    pub fn new(tokens: &'i [Token]) -> Self {
        Self {
            token_iter: tokens.iter().peekable(),
            position: 0,
            depth: 0,
        }
    }


    /*  *  *  *  *  *  *  *\
     *  Accessor Methods  *
    \*  *  *  *  *  *  *  */

    /// Number of Tokens consumed so far.
    pub fn position(&self) -> u32 {
        self.position
    }


    /*  *  *  *  *  *  *  *\
     *  Utility Methods   *
    \*  *  *  *  *  *  *  */

    /// Parses the whole Token stream as a single expression.
    pub fn parse(&mut self) -> ParserResult {
        let expr = self.expression()?;

        if let Some(trailing) = self.token_iter.peek() {
            return Err(ParserError::TrailingTokens((*trailing).clone()));
        }

        Ok(expr)
    }


    /*  *  *  *  *  *  *  *\
     *   Helper Methods   *
    \*  *  *  *  *  *  *  */

    // expression → equivalence ;
    fn expression(&mut self) -> ParserResult {
        self.equivalence()
    }

    // equivalence → implication ( "<->" implication )* ;
    fn equivalence(&mut self) -> ParserResult {
        let mut expr = self.implication()?;

        while self.match_token(&Token::DoubleArrow) {
            let right = self.implication()?;
            expr = SmProposition::iff(expr, right);
        }

        Ok(expr)
    }

    // implication → disjunction ( "->" implication )? ;
    fn implication(&mut self) -> ParserResult {
        let expr = self.disjunction()?;

        if self.match_token(&Token::Arrow) {
            let right = self.nested(Self::implication)?;
            return Ok(SmProposition::implies(expr, right));
        }

        Ok(expr)
    }

    // disjunction → conjunction ( "||" conjunction )* ;
    fn disjunction(&mut self) -> ParserResult {
        let mut expr = self.conjunction()?;

        while self.match_token(&Token::OrOr) {
            let right = self.conjunction()?;
            expr = SmProposition::or(expr, right);
        }

        Ok(expr)
    }

    // conjunction → unary ( "&&" unary )* ;
    fn conjunction(&mut self) -> ParserResult {
        let mut expr = self.unary()?;

        while self.match_token(&Token::AndAnd) {
            let right = self.unary()?;
            expr = SmProposition::and(expr, right);
        }

        Ok(expr)
    }

    // unary → "!" unary
    //         | primary ;
    fn unary(&mut self) -> ParserResult {
        if self.match_token(&Token::Bang) {
            return Ok(SmProposition::not(self.nested(Self::unary)?));
        }

        self.primary()
    }

    // primary → "true" | "false" | atom
    //           | "(" expression ")" ;
    fn primary(&mut self) -> ParserResult {
        match self.consume_token() {
            Some(Token::Identifier(identifier)) => {
                let identifier = identifier.clone();

                // An identifier followed by a separator is always an atom
                if self.match_token(&Token::Dot) || self.match_token(&Token::Colon) {
                    return self.atom(identifier);
                }

                match identifier.as_str() {
                    "true" => Ok(SmProposition::Constant(true)),
                    "false" => Ok(SmProposition::Constant(false)),
                    _ => Err(ParserError::IncompleteAtom(identifier)),
                }
            }
            Some(Token::LeftParen) => {
                let expr = self.nested(Self::expression)?;

                // Check for trailing ')', return error if it's missing
                if self.match_token(&Token::RightParen) {
                    Ok(expr)
                } else {
                    Err(ParserError::UnterminatedGroup)
                }
            }
            Some(unexpected) => Err(ParserError::InvalidPrimaryToken(unexpected.clone())),
            None => Err(ParserError::UnexpectedEndOfExpression),
        }
    }

    // atom → IDENTIFIER ( "." | ":" ) IDENTIFIER ;
    fn atom(&mut self, machine_id: String) -> ParserResult {
        match self.consume_token() {
            Some(Token::Identifier(state_name)) => Ok(SmProposition::basic(&machine_id, state_name)),
            _ => Err(ParserError::IncompleteAtom(machine_id)),
        }
    }

    /// Runs one level of recursive descent, bounded by MAX_NESTING_DEPTH.
    fn nested<F>(&mut self, rule: F) -> ParserResult
    where
        F: FnOnce(&mut Self) -> ParserResult,
    {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParserError::NestingTooDeep(self.position));
        }

        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;

        result
    }

    fn match_token(&mut self, expected: &Token) -> bool {
        if self.token_iter.peek() != Some(&expected) {
            return false;
        }

        self.consume_token();

        true
    }

    fn consume_token(&mut self) -> Option<&'i Token> {
        let next = self.token_iter.next();
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
 *    ParserError     *
\*  *  *  *  *  *  *  */

impl Error for ParserError {}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::IncompleteAtom(machine_id) => {
                write!(
                    f,
                    "Expected 'machine.state' or 'machine:state' after identifier '{}'",
                    machine_id
                )
            }
            Self::InvalidPrimaryToken(token) => {
                write!(
                    f,
                    "Invalid token '{:?}' encountered at the Primary precedence level",
                    token
                )
            }
            Self::NestingTooDeep(position) => {
                write!(
                    f,
                    "Expression nests deeper than {} levels at token {}",
                    MAX_NESTING_DEPTH, position
                )
            }
            Self::TrailingTokens(token) => {
                write!(f, "Unexpected token '{:?}' after end of expression", token)
            }
            Self::UnexpectedEndOfExpression => {
                write!(f, "Expression ended where an operand was expected")
            }
            Self::UnterminatedGroup => {
                write!(f, "Unterminated expression group")
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

    use crate::{
        interpreter::{
            lexer::Lexer,
            parser::{Parser, ParserError, MAX_NESTING_DEPTH},
            Token,
        },
        proposition::SmProposition,
    };

    use test_log::test;


    type TestResult = Result<(), Box<dyn Error>>;


    fn parse(expr_str: &str) -> Result<SmProposition, Box<dyn Error>> {
        let tokens = Lexer::new(expr_str).scan()?;
        let mut parser = Parser::new(&tokens);

        Ok(parser.parse()?)
    }

    fn parse_err(expr_str: &str) -> Result<ParserError, Box<dyn Error>> {
        let tokens = Lexer::new(expr_str).scan()?;
        let mut parser = Parser::new(&tokens);

        parser
            .parse()
            .err()
            .ok_or_else(|| format!("'{}' parsed without error", expr_str).into())
    }


    #[test]
    fn atoms_and_constants() -> TestResult {
        assert_eq!(parse("pump.on")?, SmProposition::basic("pump", "on"));
        assert_eq!(parse("pump:on")?, SmProposition::basic("pump", "on"));
        assert_eq!(parse("true")?, SmProposition::Constant(true));
        assert_eq!(parse("(false)")?, SmProposition::Constant(false));

        Ok(())
    }

    #[test]
    fn precedence() -> TestResult {
        // && binds tighter than ||, which binds tighter than ->, then <->
        assert_eq!(
            parse("a.x || b.y && !c.z -> d.w <-> e.v")?.to_string(),
            "(((a.x || (b.y && !c.z)) -> d.w) <-> e.v)"
        );
        assert_eq!(
            parse("!(a.x || b.y)")?.to_string(),
            "!(a.x || b.y)"
        );

        Ok(())
    }

    #[test]
    fn associativity() -> TestResult {
        assert_eq!(parse("a.x -> b.y -> c.z")?.to_string(), "(a.x -> (b.y -> c.z))");
        assert_eq!(parse("a.x && b.y && c.z")?.to_string(), "((a.x && b.y) && c.z)");
        assert_eq!(parse("a.x <-> b.y <-> c.z")?.to_string(), "((a.x <-> b.y) <-> c.z)");

        Ok(())
    }

    #[test]
    fn unterm_group() -> TestResult {
        assert_eq!(parse_err("(a.x && b.y")?, ParserError::UnterminatedGroup);

        Ok(())
    }

    #[test]
    fn invalid_primary_token() -> TestResult {
        assert_eq!(
            parse_err("a.x && || b.y")?,
            ParserError::InvalidPrimaryToken(Token::OrOr)
        );
        assert_eq!(parse_err(")")?, ParserError::InvalidPrimaryToken(Token::RightParen));

        Ok(())
    }

    #[test]
    fn incomplete_atom() -> TestResult {
        assert_eq!(parse_err("pump")?, ParserError::IncompleteAtom("pump".to_string()));
        assert_eq!(parse_err("pump.")?, ParserError::IncompleteAtom("pump".to_string()));
        assert_eq!(parse_err("pump.(")?, ParserError::IncompleteAtom("pump".to_string()));

        Ok(())
    }

    #[test]
    fn end_of_expression() -> TestResult {
        assert_eq!(parse_err("")?, ParserError::UnexpectedEndOfExpression);
        assert_eq!(parse_err("a.x &&")?, ParserError::UnexpectedEndOfExpression);
        assert_eq!(parse_err("!")?, ParserError::UnexpectedEndOfExpression);

        Ok(())
    }

    #[test]
    fn trailing_tokens() -> TestResult {
        assert_eq!(
            parse_err("a.x b.y")?,
            ParserError::TrailingTokens(Token::Identifier("b".to_string()))
        );
        assert_eq!(parse_err("a.x)")?, ParserError::TrailingTokens(Token::RightParen));

        Ok(())
    }

    #[test]
    fn position_counts_consumed_tokens() -> TestResult {
        let tokens = Lexer::new("a.x && b.y").scan()?;
        let mut parser = Parser::new(&tokens);
        parser.parse()?;

        assert_eq!(parser.position(), 7);

        Ok(())
    }

    #[test]
    fn nesting_limit() -> TestResult {
        let at_limit = format!("{}pump.on", "!".repeat(MAX_NESTING_DEPTH));
        assert!(parse(&at_limit).is_ok());

        // Rejected at the first '!' past the limit
        let negations = format!("{}pump.on", "!".repeat(200_000));
        assert_eq!(
            parse_err(&negations)?,
            ParserError::NestingTooDeep(MAX_NESTING_DEPTH as u32 + 1)
        );

        let groups = format!("{}pump.on{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(parse_err(&groups)?, ParserError::NestingTooDeep(_)));

        let implications = vec!["pump.on"; 10_000].join(" -> ");
        assert!(matches!(parse_err(&implications)?, ParserError::NestingTooDeep(_)));

        Ok(())
    }
}
