/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : generator.rs

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
    This module enumerates every concrete Assembly of a template and drives
    formula evaluation over that enumeration.

    OPERATIONAL NOTES
    1) Enumeration is depth-first over the template's canonical machine
       order. Depth i tries every State of machine i, in State order, so the
       output is lexicographic over (machine order, State order).
    2) The partial assignment is a linked list of Choices living on the call
       stack. Each recursive call extends it by one link, and the link is
       dropped on return; nothing is shared or undone.
    3) Evaluation is exhaustive. Every concrete Assembly is evaluated, there
       is no formula-directed pruning.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use std::{error::Error, fmt};

use log::{debug, warn};

use crate::{
    assembly::Assembly,
    configuration::{Configuration, ConfigurationError},
    proposition::{BasicStateProposition, PropositionError, SmProposition},
    semantics::{Semantics, SemanticsError},
};


///////////////////////////////////////////////////////////////////////////////
//  Data Structures
///////////////////////////////////////////////////////////////////////////////

pub struct AssemblyGenerator;

/// One link of a partial assignment: the State index chosen for the machine at
/// this depth, and the choices made above it.
struct Choice<'c> {
    index: usize,
    parent: Option<&'c Choice<'c>>,
}

#[derive(Debug, PartialEq)]
pub enum GeneratorError {
    // Wrappers
    PropositionError(PropositionError),
    SemanticsError(SemanticsError),
}


///////////////////////////////////////////////////////////////////////////////
//  Object Implementations
///////////////////////////////////////////////////////////////////////////////

impl AssemblyGenerator {

    /*  *  *  *  *  *  *  *\
     *  Utility Methods   *
    \*  *  *  *  *  *  *  */

    /// Produces one concrete Assembly per joint State assignment of the template.
    ///
    /// A template with no machines yields a single, trivially concrete Assembly.
    /// A machine without States yields no Assemblies at all.
    pub fn generate_all_assemblies(template: &Assembly) -> Vec<Assembly> {
        if let Some((machine_id, _)) = template
            .machines()
            .find(|(_, machine)| machine.state_count() == 0)
        {
            warn!(
                "Machine '{}' of assembly '{}' has no states, the assembly has no instances",
                machine_id,
                template.id()
            );
            return Vec::new();
        }

        let state_counts: Vec<usize> = template
            .machines()
            .map(|(_, machine)| machine.state_count())
            .collect();

        let mut assemblies = Vec::new();
        Self::generate_from(template, &state_counts, None, &mut assemblies);

        debug!(
            "Generated {} assemblies from template '{}'",
            assemblies.len(),
            template.id()
        );

        assemblies
    }

    /// Computes the Semantics of the formula: the Configurations of every
    /// concrete Assembly of the template in which the formula holds.
    ///
    /// An atom naming an unknown State of a known machine holds nowhere, as it
    /// does on each concrete Assembly.
    pub fn evaluate(template: &Assembly, formula: &SmProposition) -> Result<Semantics, GeneratorError> {
        // Reject unknown machines even when there is nothing to evaluate them on
        if let Some(machine_id) = formula
            .machines()
            .into_iter()
            .find(|v| template.machine(v).is_none())
        {
            return Err(PropositionError::UnknownMachine(machine_id.to_string()).into());
        }

        let mut semantics = Semantics::new(template.id());
        for assembly in Self::generate_all_assemblies(template) {
            if formula.evaluate(&assembly)? {
                semantics.add_configuration(Self::extract_configuration(&assembly))?;
            }
        }

        debug!(
            "Formula '{}' holds in {} configurations of assembly '{}'",
            formula,
            semantics.len(),
            template.id()
        );

        Ok(semantics)
    }

    /// Reads the current State of every machine, in canonical order. Machines
    /// without a current State contribute no pair.
    pub fn extract_configuration(assembly: &Assembly) -> Configuration {
        let pairs = assembly
            .machines()
            .filter_map(|(machine_id, machine)| {
                machine
                    .current_state()
                    .map(|state| BasicStateProposition::new(machine_id, state.name()))
            })
            .collect();

        Configuration::from_basic_state_propositions(assembly.id(), pairs)
    }

    /// As `extract_configuration`, but fails on the first machine without a current State.
    pub fn extract_total_configuration(assembly: &Assembly) -> Result<Configuration, ConfigurationError> {
        if let Some((machine_id, _)) = assembly
            .machines()
            .find(|(_, machine)| machine.current_state().is_none())
        {
            return Err(ConfigurationError::UnassignedState(machine_id.clone()));
        }

        Ok(Self::extract_configuration(assembly))
    }


    /*  *  *  *  *  *  *  *\
     *   Helper Methods   *
    \*  *  *  *  *  *  *  */

    fn generate_from(
        template: &Assembly,
        state_counts: &[usize],
        parent: Option<&Choice>,
        assemblies: &mut Vec<Assembly>,
    ) {
        let depth = parent.map_or(0, |v| v.depth());

        if depth == state_counts.len() {
            let assignment = parent.map_or_else(Vec::new, |v| v.to_assignment());
            assemblies.push(template.instantiate(&assignment));
            return;
        }

        for index in 0..state_counts[depth] {
            let choice = Choice { index, parent };
            Self::generate_from(template, state_counts, Some(&choice), assemblies);
        }
    }
}


impl<'c> Choice<'c> {
    fn depth(&self) -> usize {
        1 + self.parent.map_or(0, |v| v.depth())
    }

    /// Walks back to the root, yielding indices in machine order.
    fn to_assignment(&self) -> Vec<usize> {
        let mut assignment = Vec::new();
        let mut link = Some(self);
        while let Some(choice) = link {
            assignment.push(choice.index);
            link = choice.parent;
        }
        assignment.reverse();

        assignment
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Trait Implementations
///////////////////////////////////////////////////////////////////////////////

impl Error for GeneratorError {}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::PropositionError(prop_err) => {
                write!(
                    f,
                    "PropositionError '{:?}' encountered while evaluating formula",
                    prop_err
                )
            }
            Self::SemanticsError(sem_err) => {
                write!(
                    f,
                    "SemanticsError '{:?}' encountered while accumulating semantics",
                    sem_err
                )
            }
        }
    }
}

impl From<PropositionError> for GeneratorError {
    fn from(src: PropositionError) -> Self {
        Self::PropositionError(src)
    }
}

impl From<SemanticsError> for GeneratorError {
    fn from(src: SemanticsError) -> Self {
        Self::SemanticsError(src)
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Unit Tests
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use std::{collections::HashSet, error::Error, sync::Arc};

    use crate::{
        assembly::{Assembly, AssemblyBuilder},
        configuration::ConfigurationError,
        generator::{AssemblyGenerator, GeneratorError},
        proposition::{PropositionError, SmProposition},
        semantics::Semantics,
        state_machine::StateMachineBuilder,
    };

    use test_log::test;


    type TestResult = Result<(), Box<dyn Error>>;


    /// Builds a template whose machine `m<i>` has `counts[i]` States named `s0..`.
    fn template_with(counts: &[usize]) -> Result<Assembly, Box<dyn Error>> {
        let mut builder = AssemblyBuilder::new("grid");
        for (i, count) in counts.iter().enumerate() {
            let machine_id = format!("m{}", i);
            let mut machine = StateMachineBuilder::new(&machine_id);
            for s in 0..*count {
                machine = machine.state(&format!("s{}", s))?;
            }
            builder = builder.machine(&machine_id, machine.build()?)?;
        }

        Ok(builder.build())
    }

    fn two_by_two() -> Result<Assembly, Box<dyn Error>> {
        let m1 = StateMachineBuilder::new("M1").state("A")?.state("B")?.build()?;
        let m2 = StateMachineBuilder::new("M2").state("X")?.state("Y")?.build()?;

        Ok(AssemblyBuilder::new("plant")
            .machine("M1", m1)?
            .machine("M2", m2)?
            .build())
    }


    #[test]
    fn product_size() -> TestResult {
        for counts in &[vec![], vec![1], vec![3], vec![2, 3], vec![2, 1, 4], vec![3, 3, 3]] {
            let template = template_with(counts)?;
            let expected: usize = counts.iter().product();

            assert_eq!(
                AssemblyGenerator::generate_all_assemblies(&template).len(),
                expected,
                "Wrong number of assemblies for state counts {:?}",
                counts
            );
        }

        Ok(())
    }

    #[test]
    fn assignments_are_distinct_and_total() -> TestResult {
        let template = template_with(&[2, 3, 2])?;
        let assemblies = AssemblyGenerator::generate_all_assemblies(&template);

        let mut seen = HashSet::new();
        for assembly in &assemblies {
            assert!(assembly.is_concrete());
            let configuration = AssemblyGenerator::extract_total_configuration(assembly)?;
            assert!(configuration.is_total_for(&template));
            assert!(
                seen.insert(configuration.to_string()),
                "Duplicate configuration {}",
                configuration
            );
        }
        assert_eq!(seen.len(), 12);

        Ok(())
    }

    #[test]
    fn enumeration_order() -> TestResult {
        let template = two_by_two()?;

        let configurations: Vec<String> = AssemblyGenerator::generate_all_assemblies(&template)
            .iter()
            .map(|v| AssemblyGenerator::extract_configuration(v).to_string())
            .collect();

        assert_eq!(
            configurations,
            vec!["(M1.A,M2.X)", "(M1.A,M2.Y)", "(M1.B,M2.X)", "(M1.B,M2.Y)"]
        );

        Ok(())
    }

    #[test]
    fn instances_share_structure() -> TestResult {
        let template = two_by_two()?;
        let template_m1 = template.machine("M1").ok_or("M1 not found")?;

        for assembly in AssemblyGenerator::generate_all_assemblies(&template) {
            let m1 = assembly.machine("M1").ok_or("M1 not found")?;
            assert!(m1.shares_structure_with(template_m1));

            let current = m1.current_state().ok_or("M1 has no current state")?;
            assert!(template_m1.states().iter().any(|v| Arc::ptr_eq(v, current)));
        }

        // The template itself is untouched
        assert!(!template.is_concrete());

        Ok(())
    }

    #[test]
    fn stateless_machine_collapses_enumeration() -> TestResult {
        let template = template_with(&[3, 0, 2])?;

        assert!(AssemblyGenerator::generate_all_assemblies(&template).is_empty());
        assert_eq!(
            AssemblyGenerator::evaluate(&template, &SmProposition::Constant(true))?,
            Semantics::bottom("grid")
        );

        Ok(())
    }

    #[test]
    fn no_machines() -> TestResult {
        let template = template_with(&[])?;

        let assemblies = AssemblyGenerator::generate_all_assemblies(&template);
        assert_eq!(assemblies.len(), 1);
        assert!(AssemblyGenerator::extract_configuration(&assemblies[0]).is_empty());

        let top = AssemblyGenerator::evaluate(&template, &SmProposition::Constant(true))?;
        assert_eq!(top.to_string(), "{()}");

        Ok(())
    }

    #[test]
    fn evaluate_atom() -> TestResult {
        let template = two_by_two()?;

        let semantics = AssemblyGenerator::evaluate(&template, &SmProposition::basic("M1", "A"))?;

        assert_eq!(semantics.to_string(), "{(M1.A,M2.X), (M1.A,M2.Y)}");
        assert_eq!(semantics.assembly_id(), "plant");

        Ok(())
    }

    #[test]
    fn evaluate_matches_filtered_extraction() -> TestResult {
        let template = template_with(&[2, 3, 2])?;
        let formula = SmProposition::or(
            SmProposition::and(
                SmProposition::basic("m0", "s1"),
                SmProposition::not(SmProposition::basic("m1", "s2")),
            ),
            SmProposition::iff(
                SmProposition::basic("m2", "s0"),
                SmProposition::basic("m1", "s0"),
            ),
        );

        let mut expected = Semantics::new("grid");
        for assembly in AssemblyGenerator::generate_all_assemblies(&template) {
            if formula.evaluate(&assembly)? {
                expected.add_configuration(AssemblyGenerator::extract_configuration(&assembly))?;
            }
        }

        assert_eq!(AssemblyGenerator::evaluate(&template, &formula)?, expected);

        Ok(())
    }

    #[test]
    fn evaluate_unknown_machine() -> TestResult {
        let template = two_by_two()?;
        let empty = template_with(&[0])?;
        let formula = SmProposition::basic("M3", "A");

        assert_eq!(
            AssemblyGenerator::evaluate(&template, &formula),
            Err(GeneratorError::PropositionError(PropositionError::UnknownMachine(
                "M3".to_string()
            )))
        );
        // Caught even when there is no instance to evaluate on
        assert!(AssemblyGenerator::evaluate(&empty, &formula).is_err());

        Ok(())
    }

    #[test]
    fn partial_extraction() -> TestResult {
        let mut template = two_by_two()?;
        template.set_current_state("M2", "Y")?;

        assert_eq!(
            AssemblyGenerator::extract_configuration(&template).to_string(),
            "(M2.Y)"
        );
        assert_eq!(
            AssemblyGenerator::extract_total_configuration(&template),
            Err(ConfigurationError::UnassignedState("M1".to_string()))
        );

        Ok(())
    }

    #[test]
    fn unknown_state_holds_nowhere() -> TestResult {
        let template = two_by_two()?;
        let formula = SmProposition::basic("M1", "Z");

        for assembly in AssemblyGenerator::generate_all_assemblies(&template) {
            assert_eq!(formula.evaluate(&assembly), Ok(false));
        }
        assert_eq!(
            AssemblyGenerator::evaluate(&template, &formula)?,
            Semantics::bottom("plant")
        );
        assert_eq!(
            AssemblyGenerator::evaluate(&template, &SmProposition::not(formula))?,
            Semantics::top(&template)
        );

        Ok(())
    }
}
