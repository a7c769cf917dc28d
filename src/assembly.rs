/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : assembly.rs

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
    This module defines an Assembly: a named composition of independent
    StateMachines, keyed by unique machine ID.

    An Assembly is either a template (current States unset and meaningless)
    or a concrete instance (every machine has a current State).

    OPERATIONAL NOTES
    1) The canonical machine order is the order in which machines were added
       to the AssemblyBuilder. It is stored explicitly and drives both the
       enumeration order and the printable form of Configurations.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use std::{error::Error, fmt, sync::Arc};

use log::trace;

use uuid::Uuid;

use crate::{
    state::State,
    state_machine::{StateMachine, StateMachineError},
};


///////////////////////////////////////////////////////////////////////////////
//  Data Structures
///////////////////////////////////////////////////////////////////////////////

pub type AssemblyId = String;
pub type MachineId = String;

/// Machines are held in two parallel vectors: `machine_ids[i]` keys `machines[i]`.
#[derive(Clone, PartialEq)]
pub struct Assembly {
    id: AssemblyId,
    machine_ids: Vec<MachineId>,
    machines: Vec<StateMachine>,
}

#[derive(Debug, PartialEq)]
pub enum AssemblyError {
    AssignmentLengthMismatch(usize /* Expected */, usize /* Actual */),
    UnknownMachine(MachineId),

    // Wrappers
    StateMachineError(StateMachineError),
}

#[derive(Debug, PartialEq)]
pub struct AssemblyBuilder {
    id: AssemblyId,
    machine_ids: Vec<MachineId>,
    machines: Vec<StateMachine>,
}

#[derive(Debug, PartialEq)]
pub enum AssemblyBuilderError {
    DuplicateMachineId(MachineId),
}


///////////////////////////////////////////////////////////////////////////////
//  Object Implementations
///////////////////////////////////////////////////////////////////////////////

impl Assembly {

    /*  *  *  *  *  *  *  *\
     *  Accessor Methods  *
    \*  *  *  *  *  *  *  */

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Machine IDs in canonical order.
    pub fn machine_ids(&self) -> &[MachineId] {
        self.machine_ids.as_slice()
    }

    pub fn machine(&self, machine_id: &str) -> Option<&StateMachine> {
        self.position_of(machine_id).map(|idx| &self.machines[idx])
    }

    /// Machines in canonical order.
    pub fn machines(&self) -> impl Iterator<Item = (&MachineId, &StateMachine)> {
        self.machine_ids.iter().zip(self.machines.iter())
    }

    pub fn position_of(&self, machine_id: &str) -> Option<usize> {
        self.machine_ids.iter().position(|v| v == machine_id)
    }

    pub fn len(&self) -> usize {
        self.machine_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machine_ids.is_empty()
    }

    /// True when every machine has a current State. Vacuously true without machines.
    pub fn is_concrete(&self) -> bool {
        self.machines().all(|(_, machine)| machine.current_state().is_some())
    }

    /// Size of the joint State space, the product of every machine's State count.
    pub fn state_space_size(&self) -> usize {
        self.machines()
            .fold(1_usize, |acc, (_, machine)| acc.saturating_mul(machine.state_count()))
    }

    pub fn current_state_of(&self, machine_id: &str) -> Result<Option<&Arc<State>>, AssemblyError> {
        self.machine(machine_id)
            .map(|v| v.current_state())
            .ok_or_else(|| AssemblyError::UnknownMachine(machine_id.to_string()))
    }


    /*  *  *  *  *  *  *  *\
     *  Mutator Methods   *
    \*  *  *  *  *  *  *  */

    pub fn set_current_state(&mut self, machine_id: &str, state_name: &str) -> Result<(), AssemblyError> {
        let idx = self
            .position_of(machine_id)
            .ok_or_else(|| AssemblyError::UnknownMachine(machine_id.to_string()))?;

        self.machines[idx].set_current_state(state_name)?;

        Ok(())
    }


    /*  *  *  *  *  *  *  *\
     *  Utility Methods   *
    \*  *  *  *  *  *  *  */

    /// Clones every machine, installing the State at `assignment[i]` as the current
    /// State of the i-th machine in canonical order.
    pub fn with_assignment(&self, assignment: &[usize]) -> Result<Assembly, AssemblyError> {
        if assignment.len() != self.machines.len() {
            return Err(AssemblyError::AssignmentLengthMismatch(
                self.machines.len(),
                assignment.len(),
            ));
        }

        for (machine, state_idx) in self.machines.iter().zip(assignment) {
            if *state_idx >= machine.state_count() {
                return Err(StateMachineError::StateIndexOutOfRange(*state_idx).into());
            }
        }

        Ok(self.instantiate(assignment))
    }

    /// Unchecked form of `with_assignment`, for assignments built from the machines' own States.
    pub(crate) fn instantiate(&self, assignment: &[usize]) -> Assembly {
        debug_assert_eq!(assignment.len(), self.machines.len());

        let machines = self
            .machines
            .iter()
            .zip(assignment)
            .map(|(machine, state_idx)| machine.instantiate(*state_idx))
            .collect();

        trace!("Materialized assembly '{}' with assignment {:?}", self.id, assignment);

        Assembly {
            id: self.id.clone(),
            machine_ids: self.machine_ids.clone(),
            machines,
        }
    }
}


impl AssemblyBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            machine_ids: Vec::new(),
            machines: Vec::new(),
        }
    }

    /// Creates a builder for an Assembly whose ID is a freshly generated UUID.
    pub fn anonymous() -> Self {
        Self::new(Uuid::new_v4().to_string().as_str())
    }


    /*  *  *  *  *  *  *  *\
     *  Builder Methods   *
    \*  *  *  *  *  *  *  */

    pub fn build(self) -> Assembly {
        Assembly {
            id: self.id,
            machine_ids: self.machine_ids,
            machines: self.machines,
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();

        self
    }

    pub fn machine(
        mut self,
        machine_id: &str,
        machine: StateMachine,
    ) -> Result<Self, AssemblyBuilderError> {
        // Ensure machine ID is unique within this assembly
        if self.machine_ids.iter().any(|v| v == machine_id) {
            return Err(AssemblyBuilderError::DuplicateMachineId(
                machine_id.to_string(),
            ));
        }

        self.machine_ids.push(machine_id.to_string());
        self.machines.push(machine);

        Ok(self)
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Trait Implementations
///////////////////////////////////////////////////////////////////////////////

/*  *  *  *  *  *  *  *\
 *      Assembly      *
\*  *  *  *  *  *  *  */

impl fmt::Debug for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Assembly")
            .field("id", &self.id)
            .field("machines", &self.machines().collect::<Vec<_>>())
            .finish()
    }
}


/*  *  *  *  *  *  *  *\
 *   AssemblyError    *
\*  *  *  *  *  *  *  */

impl Error for AssemblyError {}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::AssignmentLengthMismatch(expected, actual) => {
                write!(
                    f,
                    "Assignment covers {} machines, but the assembly has {}",
                    actual, expected
                )
            }
            Self::UnknownMachine(machine_id) => {
                write!(f, "Machine '{}' is not part of the assembly", machine_id)
            }

            // Wrappers
            Self::StateMachineError(sm_err) => {
                write!(
                    f,
                    "StateMachineError '{:?}' encountered while processing assembly",
                    sm_err
                )
            }
        }
    }
}

impl From<StateMachineError> for AssemblyError {
    fn from(src: StateMachineError) -> Self {
        Self::StateMachineError(src)
    }
}


/*  *  *  *  *  *  *  *  *  *\
 *   AssemblyBuilderError   *
\*  *  *  *  *  *  *  *  *  */

impl Error for AssemblyBuilderError {}

impl fmt::Display for AssemblyBuilderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::DuplicateMachineId(machine_id) => {
                write!(f, "Machine ID '{}' is already in the assembly", machine_id)
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
        assembly::{AssemblyBuilder, AssemblyBuilderError, AssemblyError},
        state_machine::{StateMachineBuilder, StateMachineError},
    };

    use test_log::test;


    type TestResult = Result<(), Box<dyn Error>>;


    #[test]
    fn canonical_order_is_insertion_order() -> TestResult {
        let mut builder = AssemblyBuilder::new("fleet");
        for machine_id in &["zulu", "alpha", "mike"] {
            let machine = StateMachineBuilder::new(machine_id).state("up")?.build()?;
            builder = builder.machine(machine_id, machine)?;
        }
        let assembly = builder.build();

        assert_eq!(assembly.machine_ids(), &["zulu", "alpha", "mike"]);
        assert_eq!(
            assembly.machines().map(|(id, _)| id.as_str()).collect::<Vec<_>>(),
            vec!["zulu", "alpha", "mike"]
        );

        Ok(())
    }

    #[test]
    fn duplicate_machine_id() -> TestResult {
        let door = StateMachineBuilder::new("door").state("open")?.build()?;
        let builder = AssemblyBuilder::new("house").machine("door", door.clone())?;

        assert_eq!(
            builder.machine("door", door).unwrap_err(),
            AssemblyBuilderError::DuplicateMachineId("door".to_string()),
            "Failed to detect duplicate machine ID"
        );

        Ok(())
    }

    #[test]
    fn anonymous_ids_are_unique() {
        let first = AssemblyBuilder::anonymous().build();
        let second = AssemblyBuilder::anonymous().build();

        assert_eq!(first.id().len(), 36);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn template_and_instance() -> TestResult {
        let door = StateMachineBuilder::new("door")
            .state("open")?
            .state("closed")?
            .build()?;
        let light = StateMachineBuilder::new("light")
            .state("on")?
            .state("off")?
            .state("broken")?
            .build()?;
        let template = AssemblyBuilder::new("house")
            .machine("door", door)?
            .machine("light", light)?
            .build();

        assert!(!template.is_concrete());
        assert_eq!(template.state_space_size(), 6);
        assert_eq!(template.current_state_of("door")?, None);

        let instance = template.with_assignment(&[1, 2])?;
        assert!(instance.is_concrete());
        assert_eq!(instance.id(), "house");
        assert_eq!(
            instance.current_state_of("light")?.map(|v| v.name()),
            Some("broken")
        );
        assert!(instance
            .machine("door")
            .ok_or("door not found")?
            .shares_structure_with(template.machine("door").ok_or("door not found")?));

        assert_eq!(
            template.with_assignment(&[0]).unwrap_err(),
            AssemblyError::AssignmentLengthMismatch(2, 1)
        );
        assert_eq!(
            template.with_assignment(&[0, 3]).unwrap_err(),
            AssemblyError::StateMachineError(StateMachineError::StateIndexOutOfRange(3))
        );
        assert_eq!(
            template.current_state_of("window").unwrap_err(),
            AssemblyError::UnknownMachine("window".to_string())
        );

        Ok(())
    }

    #[test]
    fn empty_assembly() {
        let empty = AssemblyBuilder::new("nothing").build();

        assert!(empty.is_empty());
        assert!(empty.is_concrete());
        assert_eq!(empty.state_space_size(), 1);
    }
}
