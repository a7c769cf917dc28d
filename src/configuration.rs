/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : configuration.rs

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
    This module defines a Configuration: one point of the joint State space
    of an Assembly, i.e. one (machine, State) pair per machine.

    The pairs are kept in the Assembly's canonical machine order, which makes
    the printable form `(m1.s1,m2.s2,...)` stable.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use std::{error::Error, fmt};

use crate::{
    assembly::{Assembly, AssemblyId, MachineId},
    proposition::BasicStateProposition,
};


///////////////////////////////////////////////////////////////////////////////
//  Data Structures
///////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Configuration {
    assembly_id: AssemblyId,
    pairs: Vec<BasicStateProposition>,
}

#[derive(Debug, PartialEq)]
pub enum ConfigurationError {
    UnassignedState(MachineId),
}


///////////////////////////////////////////////////////////////////////////////
//  Object Implementations
///////////////////////////////////////////////////////////////////////////////

impl Configuration {
    /// Builds a Configuration from pairs that are already in canonical machine order.
    pub fn from_basic_state_propositions(
        assembly_id: &str,
        propositions: Vec<BasicStateProposition>,
    ) -> Self {
        Self {
            assembly_id: assembly_id.to_string(),
            pairs: propositions,
        }
    }


    /*  *  *  *  *  *  *  *\
     *  Accessor Methods  *
    \*  *  *  *  *  *  *  */

    pub fn assembly_id(&self) -> &str {
        self.assembly_id.as_str()
    }

    pub fn pairs(&self) -> &[BasicStateProposition] {
        self.pairs.as_slice()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, proposition: &BasicStateProposition) -> bool {
        self.pairs.contains(proposition)
    }

    pub fn state_of(&self, machine_id: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|v| v.machine_id() == machine_id)
            .map(|v| v.state_name())
    }

    /// True when this Configuration has exactly one pair per machine of the given
    /// Assembly, in its canonical order.
    pub fn is_total_for(&self, assembly: &Assembly) -> bool {
        self.assembly_id == assembly.id()
            && self.pairs.len() == assembly.len()
            && self
                .pairs
                .iter()
                .zip(assembly.machine_ids())
                .all(|(pair, machine_id)| pair.machine_id() == machine_id)
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Trait Implementations
///////////////////////////////////////////////////////////////////////////////

/*  *  *  *  *  *  *  *\
 *   Configuration    *
\*  *  *  *  *  *  *  */

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let pairs: Vec<String> = self.pairs.iter().map(|v| v.to_string()).collect();

        write!(f, "({})", pairs.join(","))
    }
}


/*  *  *  *  *  *  *  *  *\
 *  ConfigurationError   *
\*  *  *  *  *  *  *  *  */

impl Error for ConfigurationError {}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnassignedState(machine_id) => {
                write!(
                    f,
                    "Machine '{}' has no current state, configuration would be partial",
                    machine_id
                )
            }
        }
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Unit Tests
///////////////////////////////////////////////////////////////////////////////
