/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : state_machine.rs

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
    This module defines a StateMachine object.

    A StateMachine owns a fixed set of States and Transitions, plus a current
    State pointer. The State and Transition sets are frozen once the machine
    is built and are shared (not copied) by every clone of the machine; only
    the current State slot belongs to the clone.

    "Document Order" of States is the order in which they were registered,
    and is the order in which the AssemblyGenerator tries them.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use std::{error::Error, fmt, sync::Arc};

use crate::{
    state::{State, StateId},
    transition::{Transition, TransitionBuilder, TransitionBuilderError},
};


///////////////////////////////////////////////////////////////////////////////
//  Data Structures
///////////////////////////////////////////////////////////////////////////////

#[derive(Clone, PartialEq)]
pub struct StateMachine {
    name: String,
    states: Arc<Vec<Arc<State>>>,
    transitions: Arc<Vec<Transition>>,
    current: Option<usize>,
}

#[derive(Debug, PartialEq)]
pub enum StateMachineError {
    UnknownState(StateId),
    StateIndexOutOfRange(usize),
}

#[derive(Debug, PartialEq)]
pub struct StateMachineBuilder {
    name: String,
    states: Vec<Arc<State>>,
    transitions: Vec<Transition>,
}

#[derive(Debug, PartialEq)]
pub enum StateMachineBuilderError {
    DuplicateState(StateId),

    // Wrappers
    TransitionBuilderError(TransitionBuilderError),
}


///////////////////////////////////////////////////////////////////////////////
//  Object Implementations
///////////////////////////////////////////////////////////////////////////////

impl StateMachine {

    /*  *  *  *  *  *  *  *\
     *  Accessor Methods  *
    \*  *  *  *  *  *  *  */

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// States in Document Order.
    pub fn states(&self) -> &[Arc<State>] {
        self.states.as_slice()
    }

    pub fn state(&self, name: &str) -> Option<&Arc<State>> {
        self.states.iter().find(|v| v.name() == name)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transitions(&self) -> &[Transition] {
        self.transitions.as_slice()
    }

    /// Transitions leaving the given State, in Document Order.
    pub fn outgoing<'m>(&'m self, state: &'m State) -> impl Iterator<Item = &'m Transition> + 'm {
        self.transitions
            .iter()
            .filter(move |v| v.source().as_ref() == state)
    }

    pub fn current_state(&self) -> Option<&Arc<State>> {
        self.current.and_then(|idx| self.states.get(idx))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Whether `other` shares this machine's State and Transition sets.
    pub fn shares_structure_with(&self, other: &StateMachine) -> bool {
        Arc::ptr_eq(&self.states, &other.states) && Arc::ptr_eq(&self.transitions, &other.transitions)
    }


    /*  *  *  *  *  *  *  *\
     *  Mutator Methods   *
    \*  *  *  *  *  *  *  */

    pub fn set_current_state(&mut self, name: &str) -> Result<(), StateMachineError> {
        let idx = self
            .states
            .iter()
            .position(|v| v.name() == name)
            .ok_or_else(|| StateMachineError::UnknownState(name.to_string()))?;

        self.current = Some(idx);

        Ok(())
    }

    pub fn set_current_index(&mut self, idx: usize) -> Result<(), StateMachineError> {
        if idx >= self.states.len() {
            return Err(StateMachineError::StateIndexOutOfRange(idx));
        }

        self.current = Some(idx);

        Ok(())
    }

    pub fn clear_current_state(&mut self) {
        self.current = None;
    }


    /*  *  *  *  *  *  *  *\
     *  Utility Methods   *
    \*  *  *  *  *  *  *  */

    /// Shallow clone: States and Transitions are shared, only the current State is installed.
    pub fn with_current(&self, idx: usize) -> Result<StateMachine, StateMachineError> {
        if idx >= self.states.len() {
            return Err(StateMachineError::StateIndexOutOfRange(idx));
        }

        Ok(self.instantiate(idx))
    }

    /// Unchecked form of `with_current`, for indices taken from `states()`.
    pub(crate) fn instantiate(&self, idx: usize) -> StateMachine {
        debug_assert!(idx < self.states.len());

        StateMachine {
            name: self.name.clone(),
            states: Arc::clone(&self.states),
            transitions: Arc::clone(&self.transitions),
            current: Some(idx),
        }
    }
}


impl StateMachineBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }


    /*  *  *  *  *  *  *  *\
     *  Builder Methods   *
    \*  *  *  *  *  *  *  */

    pub fn build(self) -> Result<StateMachine, StateMachineBuilderError> {
        // NOTE: A machine without States is valid, it simply has no feasible assignment
        Ok(StateMachine {
            name: self.name,
            states: Arc::new(self.states),
            transitions: Arc::new(self.transitions),
            current: None,
        })
    }

    pub fn state(mut self, name: &str) -> Result<Self, StateMachineBuilderError> {
        // Ensure State name is unique within this machine
        if self.states.iter().any(|v| v.name() == name) {
            return Err(StateMachineBuilderError::DuplicateState(name.to_string()));
        }

        self.states.push(Arc::new(State::new(name)));

        Ok(self)
    }

    pub fn transition(
        mut self,
        transition_builder: TransitionBuilder,
    ) -> Result<Self, StateMachineBuilderError> {
        // Endpoints must already be registered with this machine
        let transition = transition_builder.build(&self.states)?;
        self.transitions.push(transition);

        Ok(self)
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Trait Implementations
///////////////////////////////////////////////////////////////////////////////

/*  *  *  *  *  *  *  *\
 *    StateMachine    *
\*  *  *  *  *  *  *  */

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("name", &self.name)
            .field(
                "states",
                &self.states.iter().map(|v| v.name()).collect::<Vec<&str>>(),
            )
            .field("transitions", &self.transitions.len())
            .field("current", &self.current_state().map(|v| v.name()))
            .finish()
    }
}


/*  *  *  *  *  *  *  *\
 * StateMachineError  *
\*  *  *  *  *  *  *  */

impl Error for StateMachineError {}

impl fmt::Display for StateMachineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnknownState(name) => {
                write!(f, "State '{}' is not a State of this machine", name)
            }
            Self::StateIndexOutOfRange(idx) => {
                write!(f, "State index {} is out of range", idx)
            }
        }
    }
}


/*  *  *  *  *  *  *  *  *  *  *\
 *  StateMachineBuilderError  *
\*  *  *  *  *  *  *  *  *  *  */

impl Error for StateMachineBuilderError {}

impl fmt::Display for StateMachineBuilderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::DuplicateState(name) => {
                write!(f, "State '{}' is already registered with this machine", name)
            }

            // Wrappers
            Self::TransitionBuilderError(tb_err) => {
                write!(
                    f,
                    "TransitionBuilderError '{:?}' encountered while building state machine",
                    tb_err
                )
            }
        }
    }
}

impl From<TransitionBuilderError> for StateMachineBuilderError {
    fn from(src: TransitionBuilderError) -> Self {
        Self::TransitionBuilderError(src)
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Unit Tests
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use std::{error::Error, sync::Arc};

    use crate::{
        proposition::SmProposition,
        state_machine::{StateMachineBuilder, StateMachineBuilderError, StateMachineError},
        transition::{TransitionBuilder, TransitionBuilderError},
    };

    use test_log::test;


    type TestResult = Result<(), Box<dyn Error>>;


    #[test]
    fn microwave() -> TestResult {
        let microwave = StateMachineBuilder::new("microwave")
            .state("off")?
            .state("idle")?
            .state("cooking")?
            .transition(TransitionBuilder::new("off").target("idle").event("turn.on")?)?
            .transition(
                TransitionBuilder::new("idle")
                    .target("cooking")
                    .guard(SmProposition::basic("door", "closed"))?,
            )?
            .transition(TransitionBuilder::new("cooking").target("off").event("turn.off")?)?
            .build()?;

        assert_eq!(microwave.state_count(), 3);
        assert_eq!(microwave.transitions().len(), 3);
        assert_eq!(microwave.current_state(), None);

        let idle = Arc::clone(microwave.state("idle").ok_or("idle not found")?);
        let outgoing: Vec<_> = microwave.outgoing(&idle).collect();
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].target().name(), "cooking");
        assert!(!outgoing[0].is_triggerable());

        Ok(())
    }

    #[test]
    fn duplicate_state() -> TestResult {
        let builder = StateMachineBuilder::new("door").state("open")?;

        assert_eq!(
            builder.state("open"),
            Err(StateMachineBuilderError::DuplicateState("open".to_string())),
            "Failed to detect duplicate State name"
        );

        Ok(())
    }

    #[test]
    fn transition_to_unregistered_state() -> TestResult {
        let builder = StateMachineBuilder::new("door").state("open")?;

        assert_eq!(
            builder.transition(TransitionBuilder::new("open").target("ajar")),
            Err(StateMachineBuilderError::TransitionBuilderError(
                TransitionBuilderError::UnknownTarget("ajar".to_string())
            )),
            "Failed to detect unregistered target"
        );

        Ok(())
    }

    #[test]
    fn current_state() -> TestResult {
        let mut door = StateMachineBuilder::new("door")
            .state("open")?
            .state("closed")?
            .build()?;

        door.set_current_state("closed")?;
        assert_eq!(door.current_state().map(|v| v.name()), Some("closed"));
        assert_eq!(door.current_index(), Some(1));

        assert_eq!(
            door.set_current_state("ajar"),
            Err(StateMachineError::UnknownState("ajar".to_string()))
        );
        assert_eq!(
            door.set_current_index(2),
            Err(StateMachineError::StateIndexOutOfRange(2))
        );

        door.clear_current_state();
        assert_eq!(door.current_state(), None);

        Ok(())
    }

    #[test]
    fn clone_shares_structure() -> TestResult {
        let door = StateMachineBuilder::new("door")
            .state("open")?
            .state("closed")?
            .transition(TransitionBuilder::new("open").target("closed"))?
            .build()?;

        let clone = door.with_current(0)?;

        assert!(clone.shares_structure_with(&door));
        assert!(Arc::ptr_eq(&clone.states()[1], &door.states()[1]));
        assert_eq!(clone.current_state().map(|v| v.name()), Some("open"));

        // The template's current state slot is untouched
        assert_eq!(door.current_state(), None);

        Ok(())
    }

    #[test]
    fn stateless_machine_is_valid() -> TestResult {
        let empty = StateMachineBuilder::new("empty").build()?;

        assert_eq!(empty.state_count(), 0);
        assert_eq!(
            empty.with_current(0).unwrap_err(),
            StateMachineError::StateIndexOutOfRange(0)
        );

        Ok(())
    }
}
