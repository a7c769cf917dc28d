/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : interpreter/mod.rs

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
    This module provides the text front-ends of the crate: formulas such as
    `pump.on && !valve:closed` are turned into SmPropositions, and
    line-based configuration lists are turned into Semantics and back.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use std::{error::Error, fmt};

use log::debug;

use crate::proposition::SmProposition;


///////////////////////////////////////////////////////////////////////////////
//  Module Declarations
///////////////////////////////////////////////////////////////////////////////

pub mod constraints;
pub mod lexer;
pub mod parser;

use self::{
    lexer::{Lexer, LexerError},
    parser::{Parser, ParserError},
};


///////////////////////////////////////////////////////////////////////////////
//  Data Structures
///////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    // Single-Character Tokens
    LeftParen,
    RightParen,
    Comma,
    Dot,
    Colon,
    Bang,

    // Multi-Character Tokens
    AndAnd,
    OrOr,
    Arrow,
    DoubleArrow,

    // Literals
    Identifier(String),
}

/// Turns formula text into an SmProposition.
pub struct Interpreter<'s> {
    expr_str: &'s str,
}

#[derive(Debug, PartialEq)]
pub enum InterpreterError {
    // Wrappers
    LexerError(LexerError),
    ParserError(ParserError),
}


///////////////////////////////////////////////////////////////////////////////
//  Object Implementations
///////////////////////////////////////////////////////////////////////////////

impl<'s> Interpreter<'s> {
    pub fn new(expr_str: &'s str) -> Self {
        Self { expr_str }
    }


    /*  *  *  *  *  *  *  *\
     *  Utility Methods   *
    \*  *  *  *  *  *  *  */

    pub fn interpret(&self) -> Result<SmProposition, InterpreterError> {
        let tokens = Lexer::new(self.expr_str).scan()?;
        let proposition = Parser::new(&tokens).parse()?;

        debug!("Interpreted '{}' as {}", self.expr_str, proposition);

        Ok(proposition)
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Trait Implementations
///////////////////////////////////////////////////////////////////////////////

/*  *  *  *  *  *  *  *  *\
 *   InterpreterError    *
\*  *  *  *  *  *  *  *  */

impl Error for InterpreterError {}

impl fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::LexerError(lex_err) => {
                write!(f, "LexerError '{:?}' encountered while scanning expression", lex_err)
            }
            Self::ParserError(parse_err) => {
                write!(f, "ParserError '{:?}' encountered while parsing expression", parse_err)
            }
        }
    }
}

impl From<LexerError> for InterpreterError {
    fn from(src: LexerError) -> Self {
        Self::LexerError(src)
    }
}

impl From<ParserError> for InterpreterError {
    fn from(src: ParserError) -> Self {
        Self::ParserError(src)
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Unit Tests
///////////////////////////////////////////////////////////////////////////////
