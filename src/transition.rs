/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : transition.rs

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
    This module defines a Transition object.

    A Transition connects a source State to a target State of the same
    machine and carries a guard proposition. Triggerable Transitions fire on
    an external event; all others are autonomous and fire as soon as their
    guard holds.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use std::{error::Error, fmt, sync::Arc};

use crate::{
    proposition::SmProposition,
    state::{State, StateId},
};


///////////////////////////////////////////////////////////////////////////////
//  Data Structures
///////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    source: Arc<State>,
    target: Arc<State>,
    guard: SmProposition,
    triggerable: bool,
    event: Option<String>,
}

/// Describes a Transition by State name. The names are resolved against the
/// owning machine's States when the Transition is built.
#[derive(Debug, PartialEq)]
pub struct TransitionBuilder {
    source: StateId,
    target: Option<StateId>,
    guard: Option<SmProposition>,
    triggerable: bool,
    event: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum TransitionBuilderError {
    EventAlreadySet(String),
    GuardAlreadySet,
    TargetNotSet(StateId /* Source State name */),
    UnknownSource(StateId),
    UnknownTarget(StateId),
}


///////////////////////////////////////////////////////////////////////////////
//  Object Implementations
///////////////////////////////////////////////////////////////////////////////

impl Transition {

    /*  *  *  *  *  *  *  *\
     *  Accessor Methods  *
    \*  *  *  *  *  *  *  */

    pub fn source(&self) -> &Arc<State> {
        &self.source
    }

    pub fn target(&self) -> &Arc<State> {
        &self.target
    }

    pub fn guard(&self) -> &SmProposition {
        &self.guard
    }

    pub fn is_triggerable(&self) -> bool {
        self.triggerable
    }

    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }
}


impl TransitionBuilder {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            target: None,
            guard: None,
            triggerable: false,
            event: None,
        }
    }


    /*  *  *  *  *  *  *  *\
     *  Builder Methods   *
    \*  *  *  *  *  *  *  */

    /// Resolves source and target against the given States, sharing the matching instances.
    pub fn build(self, states: &[Arc<State>]) -> Result<Transition, TransitionBuilderError> {
        let Self {
            source,
            target,
            guard,
            triggerable,
            event,
        } = self;
        let resolve = |name: &str| states.iter().find(|v| v.name() == name).map(Arc::clone);

        let target_name = match target {
            Some(target_name) => target_name,
            None => return Err(TransitionBuilderError::TargetNotSet(source)),
        };
        let source = resolve(&source).ok_or(TransitionBuilderError::UnknownSource(source))?;
        let target =
            resolve(&target_name).ok_or(TransitionBuilderError::UnknownTarget(target_name))?;

        Ok(Transition {
            source,
            target,
            guard: guard.unwrap_or_default(),
            triggerable,
            event,
        })
    }

    pub fn source_name(&self) -> &str {
        self.source.as_str()
    }

    pub fn target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());

        self
    }

    pub fn guard(mut self, guard: SmProposition) -> Result<Self, TransitionBuilderError> {
        // Ensure guard has not already been set
        if self.guard.is_some() {
            return Err(TransitionBuilderError::GuardAlreadySet);
        }

        self.guard = Some(guard);

        Ok(self)
    }

    /// Names the external event that fires this Transition, marking it triggerable.
    pub fn event(mut self, event: &str) -> Result<Self, TransitionBuilderError> {
        if let Some(existing) = self.event {
            return Err(TransitionBuilderError::EventAlreadySet(existing));
        }

        self.event = Some(event.to_string());
        self.triggerable = true;

        Ok(self)
    }

    pub fn triggerable(mut self, triggerable: bool) -> Self {
        self.triggerable = triggerable;

        self
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Trait Implementations
///////////////////////////////////////////////////////////////////////////////

/*  *  *  *  *  *  *  *\
 *     Transition     *
\*  *  *  *  *  *  *  */

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {} [{}]", self.source, self.target, self.guard)?;
        if let Some(event) = &self.event {
            write!(f, " on '{}'", event)?;
        }

        Ok(())
    }
}


/*  *  *  *  *  *  *  *  *  *\
 *  TransitionBuilderError  *
\*  *  *  *  *  *  *  *  *  */

impl Error for TransitionBuilderError {}

impl fmt::Display for TransitionBuilderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::EventAlreadySet(event) => {
                write!(f, "Transition event has already been set to '{}'", event)
            }
            Self::GuardAlreadySet => {
                write!(f, "Transition guard has already been set")
            }
            Self::TargetNotSet(source) => {
                write!(f, "Transition from State '{}' has no target", source)
            }
            Self::UnknownSource(source) => {
                write!(f, "Source State '{}' is not a State of the machine", source)
            }
            Self::UnknownTarget(target) => {
                write!(f, "Target State '{}' is not a State of the machine", target)
            }
        }
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Unit Tests
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod builder_tests {

    use std::{error::Error, sync::Arc};

    use crate::{
        proposition::SmProposition,
        state::State,
        transition::{TransitionBuilder, TransitionBuilderError},
    };

    use test_log::test;


    type TestResult = Result<(), Box<dyn Error>>;

    fn idle_busy() -> Vec<Arc<State>> {
        vec![Arc::new(State::new("idle")), Arc::new(State::new("busy"))]
    }


    #[test]
    fn defaults() -> TestResult {
        let states = idle_busy();

        let transition = TransitionBuilder::new("idle").target("busy").build(&states)?;

        assert_eq!(transition.guard(), &SmProposition::Constant(true));
        assert!(!transition.is_triggerable());
        assert_eq!(transition.event(), None);

        // Endpoints are the shared State instances, not copies
        assert!(Arc::ptr_eq(transition.source(), &states[0]));
        assert!(Arc::ptr_eq(transition.target(), &states[1]));

        Ok(())
    }

    #[test]
    fn event_marks_triggerable() -> TestResult {
        let transition = TransitionBuilder::new("idle")
            .target("busy")
            .event("start")?
            .build(&idle_busy())?;

        assert!(transition.is_triggerable());
        assert_eq!(transition.event(), Some("start"));
        assert_eq!(transition.to_string(), "idle -> busy [true] on 'start'");

        Ok(())
    }

    #[test]
    fn target_not_set() {
        assert_eq!(
            TransitionBuilder::new("idle").build(&idle_busy()),
            Err(TransitionBuilderError::TargetNotSet("idle".to_string())),
            "Failed to catch missing target"
        );
    }

    #[test]
    fn unknown_endpoints() {
        assert_eq!(
            TransitionBuilder::new("sleeping")
                .target("busy")
                .build(&idle_busy()),
            Err(TransitionBuilderError::UnknownSource("sleeping".to_string())),
            "Failed to catch unknown source"
        );
        assert_eq!(
            TransitionBuilder::new("idle")
                .target("done")
                .build(&idle_busy()),
            Err(TransitionBuilderError::UnknownTarget("done".to_string())),
            "Failed to catch unknown target"
        );
    }

    #[test]
    fn guard_already_set() -> TestResult {
        let builder = TransitionBuilder::new("idle").guard(SmProposition::Constant(true))?;

        assert_eq!(
            builder.guard(SmProposition::Constant(false)),
            Err(TransitionBuilderError::GuardAlreadySet),
            "Failed to catch already-set guard"
        );

        Ok(())
    }

    #[test]
    fn event_already_set() -> TestResult {
        let builder = TransitionBuilder::new("idle").event("start")?;

        assert_eq!(
            builder.event("stop"),
            Err(TransitionBuilderError::EventAlreadySet("start".to_string())),
            "Failed to catch already-set event"
        );

        Ok(())
    }
}
