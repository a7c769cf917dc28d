/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : lib.rs

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
    Top-level module defining the extensional semantics of assemblies of
    state machines.

    An Assembly composes independent, flat StateMachines. Its joint State
    space is the cartesian product of every machine's States, and each point
    of that space is a Configuration. A propositional formula over atoms of
    the form "machine M is in State S" denotes the Semantics of the formula:
    the set of Configurations in which it holds. Semantics of one Assembly
    form a boolean lattice under AND, OR and complement, bounded by bottom
    (no Configuration) and top (every feasible Configuration).

    The joint State space is enumerated exhaustively. No symbolic
    representation is attempted; the intended scale is a handful of small
    machines.

    OPERATIONAL NOTES
    1) "Canonical order" is the order in which machines were added to an
       Assembly. It drives enumeration order and the printable form of
       Configurations.
    2) States and Transitions are immutable after construction and shared
       between a template and all of its concrete instances. Only each
       instance's current-State slot is its own.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */


///////////////////////////////////////////////////////////////////////////////
//  Module Declarations
///////////////////////////////////////////////////////////////////////////////

pub mod annotated_state;
pub mod assembly;
pub mod configuration;
pub mod generator;
pub mod interpreter;
pub mod parser;
pub mod proposition;
pub mod registry;
pub mod semantics;
pub mod state;
pub mod state_machine;
pub mod transition;

pub use crate::{
    assembly::{Assembly, AssemblyBuilder},
    configuration::Configuration,
    generator::AssemblyGenerator,
    proposition::{BasicStateProposition, SmProposition},
    semantics::Semantics,
    state_machine::{StateMachine, StateMachineBuilder},
};


///////////////////////////////////////////////////////////////////////////////
//  Unit Tests
///////////////////////////////////////////////////////////////////////////////
