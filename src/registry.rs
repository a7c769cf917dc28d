/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : registry.rs

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
    This module defines a Registry object that tracks Assembly templates.

    It is meant to be the sole source of information on the templates known
    to a host, and of the universe (top Semantics) of each. A universe is
    enumerated the first time it is asked for and cached afterwards, since
    templates are immutable once registered.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use std::{
    collections::{hash_map::Entry, HashMap},
    error::Error,
    fmt,
};

use log::debug;

use crate::{
    assembly::{Assembly, AssemblyId},
    generator::{AssemblyGenerator, GeneratorError},
    proposition::SmProposition,
    semantics::Semantics,
};


///////////////////////////////////////////////////////////////////////////////
//  Data Structures
///////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default, PartialEq)]
pub struct Registry {
    templates: HashMap<AssemblyId, Assembly>,
    universes: HashMap<AssemblyId, Semantics>,
}

#[derive(Debug, PartialEq)]
pub enum RegistryError {
    AssemblyAlreadyRegistered(AssemblyId),
    AssemblyNotRegistered(AssemblyId),

    // Wrappers
    GeneratorError(GeneratorError),
}


///////////////////////////////////////////////////////////////////////////////
//  Object Implementations
///////////////////////////////////////////////////////////////////////////////

impl Registry {

    /*  *  *  *  *  *  *  *\
     *  Accessor Methods  *
    \*  *  *  *  *  *  *  */

    pub fn template(&self, id: &str) -> Option<&Assembly> {
        self.templates.get(id)
    }

    pub fn template_ids(&self) -> impl Iterator<Item = &AssemblyId> {
        self.templates.keys()
    }

    pub fn is_cached(&self, id: &str) -> bool {
        self.universes.contains_key(id)
    }

    pub fn bottom(&self, id: &str) -> Result<Semantics, RegistryError> {
        let template = self.get_template(id)?;

        Ok(Semantics::bottom(template.id()))
    }


    /*  *  *  *  *  *  *  *\
     *  Mutator Methods   *
    \*  *  *  *  *  *  *  */

    pub fn register_template(&mut self, template: Assembly) -> Result<(), RegistryError> {
        // Ensure template is not already registered
        if self.templates.contains_key(template.id()) {
            return Err(RegistryError::AssemblyAlreadyRegistered(
                template.id().to_string(),
            ));
        }

        debug!("Registering assembly template '{}'", template.id());
        self.templates.insert(template.id().to_string(), template);

        Ok(())
    }

    /// Every feasible Configuration of the template, enumerated on first request.
    pub fn top(&mut self, id: &str) -> Result<&Semantics, RegistryError> {
        let template = self
            .templates
            .get(id)
            .ok_or_else(|| RegistryError::AssemblyNotRegistered(id.to_string()))?;

        let top = match self.universes.entry(id.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!("Caching universe of assembly '{}'", id);
                entry.insert(Semantics::top(template))
            }
        };

        Ok(top)
    }

    /// Evaluates the formula over the template registered under `id`.
    pub fn evaluate(&self, id: &str, formula: &SmProposition) -> Result<Semantics, RegistryError> {
        let template = self.get_template(id)?;

        Ok(AssemblyGenerator::evaluate(template, formula)?)
    }


    /*  *  *  *  *  *  *  *\
     *   Helper Methods   *
    \*  *  *  *  *  *  *  */

    fn get_template(&self, id: &str) -> Result<&Assembly, RegistryError> {
        self.templates
            .get(id)
            .ok_or_else(|| RegistryError::AssemblyNotRegistered(id.to_string()))
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Trait Implementations
///////////////////////////////////////////////////////////////////////////////

/*  *  *  *  *  *  *  *\
 *    RegistryError   *
\*  *  *  *  *  *  *  */

impl Error for RegistryError {}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::AssemblyAlreadyRegistered(id) => {
                write!(f, "Assembly with ID '{}' already registered", id)
            }
            Self::AssemblyNotRegistered(id) => {
                write!(f, "No assembly with ID '{}' is registered", id)
            }

            // Wrappers
            Self::GeneratorError(gen_err) => {
                write!(
                    f,
                    "GeneratorError '{:?}' encountered while evaluating registered assembly",
                    gen_err
                )
            }
        }
    }
}

impl From<GeneratorError> for RegistryError {
    fn from(src: GeneratorError) -> Self {
        Self::GeneratorError(src)
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Unit Tests
///////////////////////////////////////////////////////////////////////////////
