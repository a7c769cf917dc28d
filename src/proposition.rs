/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : proposition.rs

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
    This module defines the propositional algebra over state machines.

    The atom of the algebra is a BasicStateProposition, "machine M is
    currently in state S". Atoms are combined with the usual connectives into
    an SmProposition, which can be evaluated against a concrete Assembly.

    Both operands of every binary connective are always evaluated, so a
    formula referencing an unknown machine fails the same way regardless of
    the assignment it is evaluated under.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use std::{collections::BTreeSet, error::Error, fmt};

use crate::{
    assembly::{Assembly, MachineId},
    semantics::Semantics,
    state::StateId,
};


///////////////////////////////////////////////////////////////////////////////
//  Data Structures
///////////////////////////////////////////////////////////////////////////////

/// Atomic proposition: the machine identified by `machine_id` is in the state
/// named `state_name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BasicStateProposition {
    machine_id: MachineId,
    state_name: StateId,
}

/// Boolean formula over BasicStatePropositions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SmProposition {
    Constant(bool),
    Basic(BasicStateProposition),
    Not(Box<SmProposition>),
    And(Box<SmProposition>, Box<SmProposition>),
    Or(Box<SmProposition>, Box<SmProposition>),
    Implies(Box<SmProposition>, Box<SmProposition>),
    Iff(Box<SmProposition>, Box<SmProposition>),
}

#[derive(Debug, PartialEq)]
pub enum PropositionError {
    UnassignedMachine(MachineId),
    UnknownMachine(MachineId),
    UnknownState(MachineId, StateId),
}


///////////////////////////////////////////////////////////////////////////////
//  Object Implementations
///////////////////////////////////////////////////////////////////////////////

impl BasicStateProposition {
    pub fn new(machine_id: &str, state_name: &str) -> Self {
        Self {
            machine_id: machine_id.to_string(),
            state_name: state_name.to_string(),
        }
    }


    /*  *  *  *  *  *  *  *\
     *  Accessor Methods  *
    \*  *  *  *  *  *  *  */

    pub fn machine_id(&self) -> &str {
        self.machine_id.as_str()
    }

    pub fn state_name(&self) -> &str {
        self.state_name.as_str()
    }


    /*  *  *  *  *  *  *  *\
     *  Utility Methods   *
    \*  *  *  *  *  *  *  */

    /// Evaluates the atom against the current state of its machine.
    pub fn evaluate(&self, assembly: &Assembly) -> Result<bool, PropositionError> {
        let machine = assembly
            .machine(&self.machine_id)
            .ok_or_else(|| PropositionError::UnknownMachine(self.machine_id.clone()))?;

        let current_state = machine
            .current_state()
            .ok_or_else(|| PropositionError::UnassignedMachine(self.machine_id.clone()))?;

        Ok(current_state.name() == self.state_name)
    }

    /// Ensures the atom names a machine of the given assembly, and a state of that machine.
    pub fn validate_against(&self, assembly: &Assembly) -> Result<(), PropositionError> {
        let machine = assembly
            .machine(&self.machine_id)
            .ok_or_else(|| PropositionError::UnknownMachine(self.machine_id.clone()))?;

        if machine.state(&self.state_name).is_none() {
            return Err(PropositionError::UnknownState(
                self.machine_id.clone(),
                self.state_name.clone(),
            ));
        }

        Ok(())
    }

    /// Restricts the given universe to the configurations in which this atom holds.
    pub fn restrict(&self, universe: &Semantics) -> Semantics {
        universe.filter(|configuration| configuration.contains(self))
    }

    /// Computes the extensional semantics of this atom over every feasible
    /// configuration of the given template.
    pub fn to_semantics(&self, template: &Assembly) -> Result<Semantics, PropositionError> {
        self.validate_against(template)?;

        Ok(self.restrict(&Semantics::top(template)))
    }
}


impl SmProposition {

    /*  *  *  *  *  *  *  *\
     *  Builder Functions *
    \*  *  *  *  *  *  *  */

    pub fn basic(machine_id: &str, state_name: &str) -> Self {
        Self::Basic(BasicStateProposition::new(machine_id, state_name))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: SmProposition) -> Self {
        Self::Not(Box::new(inner))
    }

    pub fn and(left: SmProposition, right: SmProposition) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: SmProposition, right: SmProposition) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    pub fn implies(left: SmProposition, right: SmProposition) -> Self {
        Self::Implies(Box::new(left), Box::new(right))
    }

    pub fn iff(left: SmProposition, right: SmProposition) -> Self {
        Self::Iff(Box::new(left), Box::new(right))
    }


    /*  *  *  *  *  *  *  *\
     *  Utility Methods   *
    \*  *  *  *  *  *  *  */

    /// Evaluates the formula against the current-state assignment of a concrete Assembly.
    pub fn evaluate(&self, assembly: &Assembly) -> Result<bool, PropositionError> {
        match self {
            Self::Constant(value) => Ok(*value),
            Self::Basic(atom) => atom.evaluate(assembly),
            Self::Not(inner) => Ok(!inner.evaluate(assembly)?),
            Self::And(left, right) => {
                let (left, right) = (left.evaluate(assembly)?, right.evaluate(assembly)?);
                Ok(left && right)
            }
            Self::Or(left, right) => {
                let (left, right) = (left.evaluate(assembly)?, right.evaluate(assembly)?);
                Ok(left || right)
            }
            Self::Implies(left, right) => {
                let (left, right) = (left.evaluate(assembly)?, right.evaluate(assembly)?);
                Ok(!left || right)
            }
            Self::Iff(left, right) => {
                let (left, right) = (left.evaluate(assembly)?, right.evaluate(assembly)?);
                Ok(left == right)
            }
        }
    }

    /// Ensures every atom of the formula names a known machine and state of the given assembly.
    pub fn validate_against(&self, assembly: &Assembly) -> Result<(), PropositionError> {
        for atom in self.atoms() {
            atom.validate_against(assembly)?;
        }

        Ok(())
    }

    /// Collects the distinct atoms of the formula.
    pub fn atoms(&self) -> BTreeSet<&BasicStateProposition> {
        let mut atoms = BTreeSet::new();
        self.collect_atoms(&mut atoms);

        atoms
    }

    /// Collects the distinct machine IDs referenced by the formula.
    pub fn machines(&self) -> BTreeSet<&str> {
        self.atoms().into_iter().map(|v| v.machine_id()).collect()
    }


    /*  *  *  *  *  *  *  *\
     *   Helper Methods   *
    \*  *  *  *  *  *  *  */

    fn collect_atoms<'p>(&'p self, atoms: &mut BTreeSet<&'p BasicStateProposition>) {
        match self {
            Self::Constant(_) => {}
            Self::Basic(atom) => {
                atoms.insert(atom);
            }
            Self::Not(inner) => inner.collect_atoms(atoms),
            Self::And(left, right)
            | Self::Or(left, right)
            | Self::Implies(left, right)
            | Self::Iff(left, right) => {
                left.collect_atoms(atoms);
                right.collect_atoms(atoms);
            }
        }
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Trait Implementations
///////////////////////////////////////////////////////////////////////////////

/*  *  *  *  *  *  *  *  *  *  *\
 *   BasicStateProposition    *
\*  *  *  *  *  *  *  *  *  *  */

impl fmt::Display for BasicStateProposition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.machine_id, self.state_name)
    }
}

impl From<BasicStateProposition> for SmProposition {
    fn from(src: BasicStateProposition) -> Self {
        Self::Basic(src)
    }
}


/*  *  *  *  *  *  *  *\
 *   SmProposition    *
\*  *  *  *  *  *  *  */

impl Default for SmProposition {
    fn default() -> Self {
        Self::Constant(true)
    }
}

impl fmt::Display for SmProposition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Constant(value) => write!(f, "{}", value),
            Self::Basic(atom) => write!(f, "{}", atom),
            Self::Not(inner) => write!(f, "!{}", inner),
            Self::And(left, right) => write!(f, "({} && {})", left, right),
            Self::Or(left, right) => write!(f, "({} || {})", left, right),
            Self::Implies(left, right) => write!(f, "({} -> {})", left, right),
            Self::Iff(left, right) => write!(f, "({} <-> {})", left, right),
        }
    }
}


/*  *  *  *  *  *  *  *\
 *  PropositionError  *
\*  *  *  *  *  *  *  */

impl Error for PropositionError {}

impl fmt::Display for PropositionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnassignedMachine(machine_id) => {
                write!(f, "Machine '{}' has no current state", machine_id)
            }
            Self::UnknownMachine(machine_id) => {
                write!(f, "Machine '{}' is not part of the assembly", machine_id)
            }
            Self::UnknownState(machine_id, state_name) => {
                write!(
                    f,
                    "State '{}' is not a state of machine '{}'",
                    state_name, machine_id
                )
            }
        }
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Unit Tests
///////////////////////////////////////////////////////////////////////////////
