/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : interpreter/constraints.rs

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
    This module converts between Semantics and their hand-editable text form.

    The text form holds one configuration per line, as a comma-separated list
    of `machine.state` or `machine:state` pairs, optionally wrapped in
    parentheses:

        (pump.on, valve.open)
        pump:off, valve:closed

    Each line denotes the configurations of the universe in which every pair
    holds, and the lines are OR-ed together. Blank lines are skipped.

    OPERATIONAL NOTES
    1) An Assembly without machines has exactly one configuration, the empty
       one. It is written "()", since a blank line would be skipped. In any
       other universe "()" matches nothing.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use std::{error::Error, fmt};

use log::debug;

use crate::{
    proposition::{BasicStateProposition, PropositionError},
    semantics::{Semantics, SemanticsError},
};


///////////////////////////////////////////////////////////////////////////////
//  Data Structures
///////////////////////////////////////////////////////////////////////////////

#[derive(Debug, PartialEq)]
pub enum ConstraintsError {
    InvalidPair(String),

    // Wrappers
    PropositionError(PropositionError),
    SemanticsError(SemanticsError),
}


///////////////////////////////////////////////////////////////////////////////
//  Public Functions
///////////////////////////////////////////////////////////////////////////////

/// Parses configuration text into a sub-semantics of `top`.
///
/// Pairs are checked against the machines and states occurring in `top`; an
/// empty universe has nothing to check against and always yields bottom.
pub fn parse_configurations(text: &str, top: &Semantics) -> Result<Semantics, ConstraintsError> {
    let mut result = Semantics::bottom(top.assembly_id());

    for line in text.lines().map(str::trim).filter(|v| !v.is_empty()) {
        let line_semantics = parse_configuration_line(line, top)?;
        result = result.or(&line_semantics)?;
    }

    debug!(
        "Parsed {} configurations of assembly '{}' from text",
        result.len(),
        top.assembly_id()
    );

    Ok(result)
}

/// Renders one configuration per line, without parentheses, pairs separated by ", ".
/// The empty configuration is rendered as "()".
pub fn to_text(semantics: &Semantics) -> String {
    semantics
        .configurations()
        .map(|configuration| {
            if configuration.is_empty() {
                return "()".to_string();
            }

            configuration
                .pairs()
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<String>>()
                .join(", ")
        })
        .collect::<Vec<String>>()
        .join("\n")
}


///////////////////////////////////////////////////////////////////////////////
//  Helper Functions
///////////////////////////////////////////////////////////////////////////////

fn parse_configuration_line(line: &str, top: &Semantics) -> Result<Semantics, ConstraintsError> {
    let line = line.strip_prefix('(').unwrap_or(line);
    let line = line.strip_suffix(')').unwrap_or(line);

    if line.trim().is_empty() {
        return Ok(top.filter(|configuration| configuration.is_empty()));
    }

    let mut line_semantics = top.clone();
    for pair in line.split(',').map(str::trim) {
        let atom = parse_pair(pair)?;
        validate_pair(&atom, top)?;

        line_semantics = line_semantics.and(&atom.restrict(top))?;
    }

    Ok(line_semantics)
}

fn parse_pair(pair: &str) -> Result<BasicStateProposition, ConstraintsError> {
    // A colon takes priority, so state names may contain dots in colon form
    let (machine_id, state_name) = pair
        .split_once(':')
        .or_else(|| pair.split_once('.'))
        .ok_or_else(|| ConstraintsError::InvalidPair(pair.to_string()))?;

    let (machine_id, state_name) = (machine_id.trim(), state_name.trim());
    if machine_id.is_empty() || state_name.is_empty() {
        return Err(ConstraintsError::InvalidPair(pair.to_string()));
    }

    Ok(BasicStateProposition::new(machine_id, state_name))
}

fn validate_pair(atom: &BasicStateProposition, top: &Semantics) -> Result<(), ConstraintsError> {
    if top.is_empty() {
        return Ok(());
    }

    if !top.configurations().any(|v| v.state_of(atom.machine_id()).is_some()) {
        return Err(PropositionError::UnknownMachine(atom.machine_id().to_string()).into());
    }

    if !top.configurations().any(|v| v.contains(atom)) {
        return Err(PropositionError::UnknownState(
            atom.machine_id().to_string(),
            atom.state_name().to_string(),
        )
        .into());
    }

    Ok(())
}


///////////////////////////////////////////////////////////////////////////////
//  Trait Implementations
///////////////////////////////////////////////////////////////////////////////

impl Error for ConstraintsError {}

impl fmt::Display for ConstraintsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidPair(pair) => {
                write!(
                    f,
                    "Invalid pair '{}', expected 'machine.state' or 'machine:state'",
                    pair
                )
            }

            // Wrappers
            Self::PropositionError(prop_err) => {
                write!(
                    f,
                    "PropositionError '{:?}' encountered while parsing configurations",
                    prop_err
                )
            }
            Self::SemanticsError(sem_err) => {
                write!(
                    f,
                    "SemanticsError '{:?}' encountered while parsing configurations",
                    sem_err
                )
            }
        }
    }
}

impl From<PropositionError> for ConstraintsError {
    fn from(src: PropositionError) -> Self {
        Self::PropositionError(src)
    }
}

impl From<SemanticsError> for ConstraintsError {
    fn from(src: SemanticsError) -> Self {
        Self::SemanticsError(src)
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Unit Tests
///////////////////////////////////////////////////////////////////////////////
