/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : annotated_state.rs

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
    This module defines an AnnotatedState: a State of a machine together with
    the three semantics an editor tracks for it.

        state semantics         configurations the State is observed in
        constraints semantics   configurations the State is allowed in
        reactive semantics      exit zones, i.e. atoms that must force the
                                machine out of the State

    A configuration of the state semantics is satisfied when it also lies in
    the constraints semantics. An exit zone is covered when an autonomous
    Transition leaves the State guarded by exactly the zone's atom.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use std::{
    collections::{BTreeSet, HashSet},
    error::Error,
    fmt,
    sync::Arc,
};

use log::debug;

use crate::{
    assembly::AssemblyId,
    interpreter::constraints::{self, ConstraintsError},
    proposition::{BasicStateProposition, SmProposition},
    semantics::{Semantics, SemanticsError},
    state::State,
    state_machine::StateMachine,
};


///////////////////////////////////////////////////////////////////////////////
//  Data Structures
///////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExitZone {
    target: BasicStateProposition,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedState {
    state: Arc<State>,
    state_semantics: Semantics,
    constraints_semantics: Semantics,
    reactive_semantics: HashSet<ExitZone>,
}

/// State semantics split by membership in the constraints semantics.
#[derive(Debug, PartialEq)]
pub struct ConstraintReport {
    pub satisfied: Semantics,
    pub violated: Semantics,
}

/// Exit zones split by whether an autonomous Transition handles them, each in sorted order.
#[derive(Debug, PartialEq)]
pub struct ExitZoneReport {
    pub covered: Vec<ExitZone>,
    pub uncovered: Vec<ExitZone>,
}

#[derive(Debug, PartialEq)]
pub enum AnnotatedStateError {
    // Wrappers
    ConstraintsError(ConstraintsError),
    SemanticsError(SemanticsError),
}


///////////////////////////////////////////////////////////////////////////////
//  Object Implementations
///////////////////////////////////////////////////////////////////////////////

impl ExitZone {
    pub fn new(target: BasicStateProposition) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &BasicStateProposition {
        &self.target
    }
}


impl AnnotatedState {
    /// Starts with empty state semantics and bottom constraints for the given assembly.
    pub fn new(state: Arc<State>, assembly_id: &str) -> Self {
        Self {
            state,
            state_semantics: Semantics::new(assembly_id),
            constraints_semantics: Semantics::bottom(assembly_id),
            reactive_semantics: HashSet::new(),
        }
    }


    /*  *  *  *  *  *  *  *\
     *  Accessor Methods  *
    \*  *  *  *  *  *  *  */

    pub fn state(&self) -> &Arc<State> {
        &self.state
    }

    pub fn assembly_id(&self) -> &str {
        self.state_semantics.assembly_id()
    }

    pub fn state_semantics(&self) -> &Semantics {
        &self.state_semantics
    }

    pub fn constraints_semantics(&self) -> &Semantics {
        &self.constraints_semantics
    }

    pub fn reactive_semantics(&self) -> &HashSet<ExitZone> {
        &self.reactive_semantics
    }

    /// Constraints as editable text, one configuration per line.
    pub fn constraints_text(&self) -> String {
        constraints::to_text(&self.constraints_semantics)
    }


    /*  *  *  *  *  *  *  *\
     *  Mutator Methods   *
    \*  *  *  *  *  *  *  */

    pub fn set_state_semantics(&mut self, semantics: Semantics) -> Result<(), AnnotatedStateError> {
        self.ensure_same_assembly(&semantics)?;
        self.state_semantics = semantics;

        Ok(())
    }

    pub fn set_constraints_semantics(&mut self, semantics: Semantics) -> Result<(), AnnotatedStateError> {
        self.ensure_same_assembly(&semantics)?;
        self.constraints_semantics = semantics;

        Ok(())
    }

    /// Replaces the constraints with those parsed from text, relative to the given universe.
    pub fn set_constraints_from_text(
        &mut self,
        text: &str,
        top: &Semantics,
    ) -> Result<(), AnnotatedStateError> {
        let semantics = constraints::parse_configurations(text, top)?;
        debug!(
            "State '{}' now constrained to {} configurations",
            self.state,
            semantics.len()
        );

        self.set_constraints_semantics(semantics)
    }

    /// Returns whether the exit zone was not already present.
    pub fn add_exit_zone(&mut self, zone: ExitZone) -> bool {
        self.reactive_semantics.insert(zone)
    }


    /*  *  *  *  *  *  *  *\
     *  Utility Methods   *
    \*  *  *  *  *  *  *  */

    pub fn constraint_report(&self) -> ConstraintReport {
        let constraints = &self.constraints_semantics;

        ConstraintReport {
            satisfied: self.state_semantics.filter(|v| constraints.contains(v)),
            violated: self.state_semantics.filter(|v| !constraints.contains(v)),
        }
    }

    /// Checks the exit zones against the autonomous Transitions leaving this State in `machine`.
    pub fn exit_zone_report(&self, machine: &StateMachine) -> ExitZoneReport {
        let handled: HashSet<&BasicStateProposition> = machine
            .outgoing(&self.state)
            .filter(|v| !v.is_triggerable())
            .filter_map(|v| match v.guard() {
                SmProposition::Basic(atom) => Some(atom),
                _ => None,
            })
            .collect();

        let (covered, uncovered): (BTreeSet<&ExitZone>, BTreeSet<&ExitZone>) = self
            .reactive_semantics
            .iter()
            .partition(|v| handled.contains(&v.target));

        ExitZoneReport {
            covered: covered.into_iter().cloned().collect(),
            uncovered: uncovered.into_iter().cloned().collect(),
        }
    }


    /*  *  *  *  *  *  *  *\
     *   Helper Methods   *
    \*  *  *  *  *  *  *  */

    fn ensure_same_assembly(&self, semantics: &Semantics) -> Result<(), SemanticsError> {
        if semantics.assembly_id() != self.assembly_id() {
            return Err(SemanticsError::StructuralMismatch {
                left: AssemblyId::from(self.assembly_id()),
                right: AssemblyId::from(semantics.assembly_id()),
            });
        }

        Ok(())
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Trait Implementations
///////////////////////////////////////////////////////////////////////////////

/*  *  *  *  *  *  *  *\
 *      ExitZone      *
\*  *  *  *  *  *  *  */

impl fmt::Display for ExitZone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "->{}", self.target)
    }
}


/*  *  *  *  *  *  *  *\
 *   AnnotatedState   *
\*  *  *  *  *  *  *  */

impl fmt::Display for AnnotatedState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let zones: BTreeSet<String> = self.reactive_semantics.iter().map(|v| v.to_string()).collect();

        writeln!(f, "{}", self.state)?;
        writeln!(f, "  constraints: {}", self.constraints_semantics)?;
        writeln!(f, "  state:       {}", self.state_semantics)?;
        write!(
            f,
            "  exit zones:  {{{}}}",
            zones.into_iter().collect::<Vec<String>>().join(", ")
        )
    }
}


/*  *  *  *  *  *  *  *  *  *\
 *   AnnotatedStateError    *
\*  *  *  *  *  *  *  *  *  */

impl Error for AnnotatedStateError {}

impl fmt::Display for AnnotatedStateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConstraintsError(con_err) => {
                write!(
                    f,
                    "ConstraintsError '{:?}' encountered while updating state annotation",
                    con_err
                )
            }
            Self::SemanticsError(sem_err) => {
                write!(
                    f,
                    "SemanticsError '{:?}' encountered while updating state annotation",
                    sem_err
                )
            }
        }
    }
}

impl From<ConstraintsError> for AnnotatedStateError {
    fn from(src: ConstraintsError) -> Self {
        Self::ConstraintsError(src)
    }
}

impl From<SemanticsError> for AnnotatedStateError {
    fn from(src: SemanticsError) -> Self {
        Self::SemanticsError(src)
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Unit Tests
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use std::error::Error;

    use crate::{
        annotated_state::{AnnotatedState, AnnotatedStateError, ExitZone},
        assembly::{Assembly, AssemblyBuilder},
        generator::AssemblyGenerator,
        interpreter::constraints::ConstraintsError,
        proposition::{BasicStateProposition, SmProposition},
        semantics::{Semantics, SemanticsError},
        state_machine::{StateMachine, StateMachineBuilder},
        transition::TransitionBuilder,
    };

    use test_log::test;


    type TestResult = Result<(), Box<dyn Error>>;


    fn pump() -> Result<StateMachine, Box<dyn Error>> {
        Ok(StateMachineBuilder::new("pump")
            .state("off")?
            .state("on")?
            .transition(
                TransitionBuilder::new("on")
                    .target("off")
                    .guard(SmProposition::basic("valve", "closed"))?,
            )?
            .transition(
                TransitionBuilder::new("on")
                    .target("off")
                    .guard(SmProposition::basic("tank", "empty"))?
                    .event("stop")?,
            )?
            .transition(TransitionBuilder::new("off").target("on").event("start")?)?
            .build()?)
    }

    fn station(pump: StateMachine) -> Result<Assembly, Box<dyn Error>> {
        let valve = StateMachineBuilder::new("valve")
            .state("open")?
            .state("closed")?
            .build()?;

        Ok(AssemblyBuilder::new("station")
            .machine("pump", pump)?
            .machine("valve", valve)?
            .build())
    }

    fn annotated_on(pump: &StateMachine) -> Result<AnnotatedState, Box<dyn Error>> {
        let on = pump.state("on").ok_or("pump has no 'on' state")?;

        Ok(AnnotatedState::new(on.clone(), "station"))
    }


    #[test]
    fn defaults() -> TestResult {
        let pump = pump()?;
        let annotated = annotated_on(&pump)?;

        assert_eq!(annotated.assembly_id(), "station");
        assert!(annotated.state_semantics().is_empty());
        assert_eq!(annotated.constraints_semantics(), &Semantics::bottom("station"));
        assert!(annotated.reactive_semantics().is_empty());
        assert_eq!(annotated.constraints_text(), "");

        Ok(())
    }

    #[test]
    fn constraint_report() -> TestResult {
        let pump = pump()?;
        let template = station(pump.clone())?;
        let top = Semantics::top(&template);
        let mut annotated = annotated_on(&pump)?;

        annotated.set_state_semantics(AssemblyGenerator::evaluate(
            &template,
            &SmProposition::basic("pump", "on"),
        )?)?;
        annotated.set_constraints_from_text("pump.on, valve.open", &top)?;

        let report = annotated.constraint_report();
        assert_eq!(report.satisfied.to_string(), "{(pump.on,valve.open)}");
        assert_eq!(report.violated.to_string(), "{(pump.on,valve.closed)}");
        assert_eq!(annotated.constraints_text(), "pump.on, valve.open");

        Ok(())
    }

    #[test]
    fn exit_zone_report() -> TestResult {
        let pump = pump()?;
        let mut annotated = annotated_on(&pump)?;

        assert!(annotated.add_exit_zone(ExitZone::new(BasicStateProposition::new("valve", "closed"))));
        assert!(annotated.add_exit_zone(ExitZone::new(BasicStateProposition::new("tank", "empty"))));
        assert!(!annotated.add_exit_zone(ExitZone::new(BasicStateProposition::new("valve", "closed"))));

        let report = annotated.exit_zone_report(&pump);

        // The triggerable Transition guarded by tank.empty does not count
        assert_eq!(
            report.covered,
            vec![ExitZone::new(BasicStateProposition::new("valve", "closed"))]
        );
        assert_eq!(
            report.uncovered,
            vec![ExitZone::new(BasicStateProposition::new("tank", "empty"))]
        );
        assert_eq!(report.covered[0].to_string(), "->valve.closed");

        Ok(())
    }

    #[test]
    fn mismatched_assembly() -> TestResult {
        let pump = pump()?;
        let mut annotated = annotated_on(&pump)?;

        assert_eq!(
            annotated.set_constraints_semantics(Semantics::bottom("depot")),
            Err(AnnotatedStateError::SemanticsError(
                SemanticsError::StructuralMismatch {
                    left: "station".to_string(),
                    right: "depot".to_string(),
                }
            ))
        );
        assert!(annotated.set_state_semantics(Semantics::new("depot")).is_err());

        Ok(())
    }

    #[test]
    fn invalid_constraints_text_keeps_previous() -> TestResult {
        let pump = pump()?;
        let top = Semantics::top(&station(pump.clone())?);
        let mut annotated = annotated_on(&pump)?;
        annotated.set_constraints_from_text("pump.off", &top)?;

        assert_eq!(
            annotated.set_constraints_from_text("pump off", &top),
            Err(AnnotatedStateError::ConstraintsError(ConstraintsError::InvalidPair(
                "pump off".to_string()
            )))
        );
        assert_eq!(annotated.constraints_semantics().len(), 2);

        Ok(())
    }

    #[test]
    fn display() -> TestResult {
        let pump = pump()?;
        let mut annotated = annotated_on(&pump)?;
        annotated.add_exit_zone(ExitZone::new(BasicStateProposition::new("valve", "closed")));

        assert_eq!(
            annotated.to_string(),
            "on\n  constraints: {}\n  state:       {}\n  exit zones:  {->valve.closed}"
        );

        Ok(())
    }
}
