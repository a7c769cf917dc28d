/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : parser.rs

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
    This module leverages the roxmltree crate to parse a well-formed assembly
    document into a template Assembly.

    Document structure:
        <assembly xmlns="http://www.w3.org/2005/07/scxml" version="1.0" name="...">
            <machine id="...">
                <state id="...">
                    <transition target="..." cond="..." event="..."/>
                </state>
            </machine>
        </assembly>

    A transition with an `event` is triggerable. Its `cond`, when present, is
    a formula over the machines of the same assembly.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use std::{error::Error, fmt, fs};

use log::debug;

use roxmltree::Node;

use crate::{
    assembly::{Assembly, AssemblyBuilder, AssemblyBuilderError, MachineId},
    interpreter::{Interpreter, InterpreterError},
    proposition::PropositionError,
    state::StateId,
    state_machine::{StateMachine, StateMachineBuilder, StateMachineBuilderError},
    transition::{TransitionBuilder, TransitionBuilderError},
};


///////////////////////////////////////////////////////////////////////////////
//  Named Constants
///////////////////////////////////////////////////////////////////////////////

const VALID_ROOT_ELEMENT: &str = "assembly";
const VALID_NAMESPACE: &str = "http://www.w3.org/2005/07/scxml";
const VALID_VERSION: &str = "1.0";


///////////////////////////////////////////////////////////////////////////////
//  Data Structures
///////////////////////////////////////////////////////////////////////////////

#[derive(Debug, PartialEq)]
pub struct Parser {
    path: String,
    content: String,
}

#[derive(Debug, PartialEq)]
pub enum ParserError {
    InvalidAssemblyChild(String /* Name of child element */),
    InvalidMachineChild(MachineId, String /* Name of child element */),
    InvalidNamespace(String /* Invalid namespace */),
    InvalidRootElement(String /* Name of root element */),
    InvalidStateChild(StateId, String /* Name of child element */),
    InvalidVersion(String /* Invalid version */),
    MachineHasNoId(usize /* Position among <machine> elements */),
    StateHasNoId(MachineId),
    TransitionHasNoTarget(MachineId, StateId /* Source State */),

    // Wrappers
    AssemblyBuilderError(AssemblyBuilderError),
    InterpreterError(InterpreterError),
    IoError(std::io::ErrorKind),
    PropositionError(PropositionError),
    RoxmlTreeError(roxmltree::Error),
    StateMachineBuilderError(StateMachineBuilderError),
    TransitionBuilderError(TransitionBuilderError),
}


///////////////////////////////////////////////////////////////////////////////
//  Object Implementation
///////////////////////////////////////////////////////////////////////////////

impl Parser {
    /// Creates a new Parser object for the assembly document at the given path.
    pub fn new(path: &str) -> Result<Self, ParserError> {
        let content = fs::read_to_string(path)?;

        Ok(Self {
            path: path.to_string(),
            content,
        })
    }

    /// Creates a new Parser object for an in-memory assembly document.
    pub fn from_content(content: &str) -> Self {
        Self {
            path: String::new(),
            content: content.to_string(),
        }
    }

    pub fn parse(self) -> Result<Assembly, ParserError> {
        // Parse contents of the document into an roxmltree::Document
        let parsed_content = roxmltree::Document::parse(self.content.as_str())?;

        // Ensure the document is properly structured
        Self::validate_structure(&parsed_content)?;

        // Get Assembly ID from <assembly>, if specified
        let root = parsed_content.root_element();
        let mut assembly_builder = match root.attribute("name") {
            Some(name) => AssemblyBuilder::new(name),
            None => AssemblyBuilder::anonymous(),
        };

        // Iterate through the parsed content, skipping comment and text nodes
        for (position, child) in root.children().filter(|v| v.is_element()).enumerate() {
            match child.tag_name().name() {
                "machine" => {
                    let machine_id = child
                        .attribute("id")
                        .ok_or(ParserError::MachineHasNoId(position))?;
                    assembly_builder =
                        assembly_builder.machine(machine_id, Self::parse_machine(child, machine_id)?)?;
                }
                unexpected => {
                    return Err(ParserError::InvalidAssemblyChild(unexpected.to_string()));
                }
            }
        }

        let assembly = assembly_builder.build();

        // Guards may only reference machines of this assembly
        for (_, machine) in assembly.machines() {
            for transition in machine.transitions() {
                transition.guard().validate_against(&assembly)?;
            }
        }

        debug!(
            "Parsed assembly '{}' with {} machines from '{}'",
            assembly.id(),
            assembly.len(),
            self.path
        );

        Ok(assembly)
    }


    /*  *  *  *  *  *  *  *\
     *   Helper Methods   *
    \*  *  *  *  *  *  *  */

    fn validate_structure(document: &roxmltree::Document) -> Result<(), ParserError> {
        /* <assembly> Root Element Checks */
        let root_node = document.root_element();

        // Verify element name
        if root_node.tag_name().name() != VALID_ROOT_ELEMENT {
            return Err(ParserError::InvalidRootElement(
                root_node.tag_name().name().to_string(),
            ));
        }

        // Verify namespace
        if let Some(namespace) = root_node.tag_name().namespace() {
            if namespace != VALID_NAMESPACE {
                return Err(ParserError::InvalidNamespace(namespace.to_string()));
            }
        } else {
            // Namespace was not specified
            return Err(ParserError::InvalidNamespace(String::new()));
        }

        // Verify version
        if let Some(version) = root_node.attribute("version") {
            if version != VALID_VERSION {
                return Err(ParserError::InvalidVersion(version.to_string()));
            }
        } else {
            // Version not specified
            return Err(ParserError::InvalidVersion(String::new()));
        }

        Ok(())
    }

    fn parse_machine(element: Node, machine_id: &str) -> Result<StateMachine, ParserError> {
        let mut machine_builder = StateMachineBuilder::new(machine_id);

        // All States are registered first, so Transitions may target later siblings
        let mut state_elements = Vec::new();
        for child in element.children().filter(|v| v.is_element()) {
            if child.tag_name().name() != "state" {
                return Err(ParserError::InvalidMachineChild(
                    machine_id.to_string(),
                    child.tag_name().name().to_string(),
                ));
            }

            let state_id = child
                .attribute("id")
                .ok_or_else(|| ParserError::StateHasNoId(machine_id.to_string()))?;
            machine_builder = machine_builder.state(state_id)?;
            state_elements.push((state_id, child));
        }

        for (state_id, state_element) in state_elements {
            for child in state_element.children().filter(|v| v.is_element()) {
                if child.tag_name().name() != "transition" {
                    return Err(ParserError::InvalidStateChild(
                        state_id.to_string(),
                        child.tag_name().name().to_string(),
                    ));
                }

                machine_builder =
                    machine_builder.transition(Self::parse_transition(child, machine_id, state_id)?)?;
            }
        }

        Ok(machine_builder.build()?)
    }

    fn parse_transition(
        element: Node,
        machine_id: &str,
        source_id: &str,
    ) -> Result<TransitionBuilder, ParserError> {
        let target_id = element.attribute("target").ok_or_else(|| {
            ParserError::TransitionHasNoTarget(machine_id.to_string(), source_id.to_string())
        })?;
        let mut transition_builder = TransitionBuilder::new(source_id).target(target_id);

        // Parse guard condition
        if let Some(cond_str) = element.attribute("cond") {
            let guard = Interpreter::new(cond_str).interpret()?;
            transition_builder = transition_builder.guard(guard)?;
        }

        // An event marks the Transition triggerable
        if let Some(event) = element.attribute("event") {
            transition_builder = transition_builder.event(event)?;
        }

        Ok(transition_builder)
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
            Self::InvalidAssemblyChild(child) => {
                write!(f, "Invalid child element '{}' in <assembly>", child)
            }
            Self::InvalidMachineChild(machine_id, child) => {
                write!(
                    f,
                    "Invalid child element '{}' in <machine> '{}'",
                    child, machine_id
                )
            }
            Self::InvalidNamespace(namespace) => {
                write!(f, "Invalid assembly namespace '{}'", namespace)
            }
            Self::InvalidRootElement(root) => {
                write!(f, "Invalid root element '{}', expected <assembly>", root)
            }
            Self::InvalidStateChild(state_id, child) => {
                write!(f, "Invalid child element '{}' in <state> '{}'", child, state_id)
            }
            Self::InvalidVersion(version) => {
                write!(f, "Invalid assembly version '{}'", version)
            }
            Self::MachineHasNoId(position) => {
                write!(f, "<machine> element #{} has no 'id'", position)
            }
            Self::StateHasNoId(machine_id) => {
                write!(f, "<state> element in machine '{}' has no 'id'", machine_id)
            }
            Self::TransitionHasNoTarget(machine_id, source_id) => {
                write!(
                    f,
                    "<transition> from state '{}' of machine '{}' has no 'target'",
                    source_id, machine_id
                )
            }

            // Wrappers
            Self::AssemblyBuilderError(asm_err) => {
                write!(
                    f,
                    "AssemblyBuilderError '{:?}' encountered while parsing",
                    asm_err
                )
            }
            Self::InterpreterError(interp_err) => {
                write!(
                    f,
                    "InterpreterError '{:?}' encountered while parsing",
                    interp_err
                )
            }
            Self::IoError(io_err) => {
                write!(f, "I/O Error '{:?}' encountered while parsing", io_err)
            }
            Self::PropositionError(prop_err) => {
                write!(
                    f,
                    "PropositionError '{:?}' encountered while parsing",
                    prop_err
                )
            }
            Self::RoxmlTreeError(roxml_err) => {
                write!(
                    f,
                    "roxmltree Error '{:?}' encountered while parsing",
                    roxml_err
                )
            }
            Self::StateMachineBuilderError(sm_err) => {
                write!(
                    f,
                    "StateMachineBuilderError '{:?}' encountered while parsing",
                    sm_err
                )
            }
            Self::TransitionBuilderError(trans_err) => {
                write!(
                    f,
                    "TransitionBuilderError '{:?}' encountered while parsing",
                    trans_err
                )
            }
        }
    }
}

impl From<AssemblyBuilderError> for ParserError {
    fn from(src: AssemblyBuilderError) -> Self {
        Self::AssemblyBuilderError(src)
    }
}
impl From<InterpreterError> for ParserError {
    fn from(src: InterpreterError) -> Self {
        Self::InterpreterError(src)
    }
}
impl From<std::io::Error> for ParserError {
    fn from(src: std::io::Error) -> Self {
        Self::IoError(src.kind())
    }
}
impl From<PropositionError> for ParserError {
    fn from(src: PropositionError) -> Self {
        Self::PropositionError(src)
    }
}
impl From<roxmltree::Error> for ParserError {
    fn from(src: roxmltree::Error) -> Self {
        Self::RoxmlTreeError(src)
    }
}
impl From<StateMachineBuilderError> for ParserError {
    fn from(src: StateMachineBuilderError) -> Self {
        Self::StateMachineBuilderError(src)
    }
}
impl From<TransitionBuilderError> for ParserError {
    fn from(src: TransitionBuilderError) -> Self {
        Self::TransitionBuilderError(src)
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Unit Tests
///////////////////////////////////////////////////////////////////////////////
