/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : semantics.rs

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
    This module defines Semantics: the extensional meaning of a condition as
    the set of Configurations of one Assembly in which it holds.

    Semantics form a boolean lattice over the finite universe of an
    Assembly's feasible Configurations:
        bottom          the empty set
        top             every feasible Configuration
        and             set intersection
        or              set union
        complement      top minus the operand

    Combining Semantics of different Assemblies is a usage error and is
    rejected before any set operation is performed.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use std::{collections::BTreeSet, error::Error, fmt};

use log::{debug, warn};

use crate::{
    assembly::{Assembly, AssemblyId},
    configuration::Configuration,
    generator::AssemblyGenerator,
};


///////////////////////////////////////////////////////////////////////////////
//  Data Structures
///////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Semantics {
    assembly_id: AssemblyId,
    configurations: BTreeSet<Configuration>,
}

#[derive(Debug, PartialEq)]
pub enum SemanticsError {
    StructuralMismatch {
        left: AssemblyId,
        right: AssemblyId,
    },
}


///////////////////////////////////////////////////////////////////////////////
//  Object Implementations
///////////////////////////////////////////////////////////////////////////////

impl Semantics {
    pub fn new(assembly_id: &str) -> Self {
        Self {
            assembly_id: assembly_id.to_string(),
            configurations: BTreeSet::new(),
        }
    }

    pub fn bottom(assembly_id: &str) -> Self {
        Self::new(assembly_id)
    }

    /// Every feasible Configuration of the given template.
    ///
    /// The template is re-enumerated on every call; see `Registry::top` for the
    /// cached form.
    pub fn top(template: &Assembly) -> Self {
        let mut top = Self::new(template.id());
        for assembly in AssemblyGenerator::generate_all_assemblies(template) {
            top.configurations
                .insert(AssemblyGenerator::extract_configuration(&assembly));
        }

        if top.is_empty() {
            warn!(
                "Assembly '{}' has no feasible configuration, top is empty",
                template.id()
            );
        }
        debug!(
            "Computed top of assembly '{}': {} configurations",
            template.id(),
            top.len()
        );

        top
    }


    /*  *  *  *  *  *  *  *\
     *  Accessor Methods  *
    \*  *  *  *  *  *  *  */

    pub fn assembly_id(&self) -> &str {
        self.assembly_id.as_str()
    }

    /// Configurations in their stable order.
    pub fn configurations(&self) -> impl Iterator<Item = &Configuration> {
        self.configurations.iter()
    }

    pub fn contains(&self, configuration: &Configuration) -> bool {
        self.configurations.contains(configuration)
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }


    /*  *  *  *  *  *  *  *\
     *  Mutator Methods   *
    \*  *  *  *  *  *  *  */

    /// Set-inserts the Configuration. Returns whether it was not already present.
    pub fn add_configuration(
        &mut self,
        configuration: Configuration,
    ) -> Result<bool, SemanticsError> {
        if configuration.assembly_id() != self.assembly_id {
            return Err(SemanticsError::StructuralMismatch {
                left: self.assembly_id.clone(),
                right: configuration.assembly_id().to_string(),
            });
        }

        Ok(self.configurations.insert(configuration))
    }


    /*  *  *  *  *  *  *  *\
     *  Lattice Methods   *
    \*  *  *  *  *  *  *  */

    /// Set intersection.
    pub fn and(&self, other: &Semantics) -> Result<Semantics, SemanticsError> {
        self.ensure_same_assembly(other)?;

        Ok(Self {
            assembly_id: self.assembly_id.clone(),
            configurations: self
                .configurations
                .intersection(&other.configurations)
                .cloned()
                .collect(),
        })
    }

    /// Set union.
    pub fn or(&self, other: &Semantics) -> Result<Semantics, SemanticsError> {
        self.ensure_same_assembly(other)?;

        Ok(Self {
            assembly_id: self.assembly_id.clone(),
            configurations: self
                .configurations
                .union(&other.configurations)
                .cloned()
                .collect(),
        })
    }

    /// Complement relative to the given universe.
    pub fn complement(&self, top: &Semantics) -> Result<Semantics, SemanticsError> {
        self.ensure_same_assembly(top)?;

        Ok(Self {
            assembly_id: self.assembly_id.clone(),
            configurations: top
                .configurations
                .difference(&self.configurations)
                .cloned()
                .collect(),
        })
    }

    /// Sub-semantics of the Configurations satisfying the predicate.
    pub fn filter<P>(&self, mut predicate: P) -> Semantics
    where
        P: FnMut(&Configuration) -> bool,
    {
        Self {
            assembly_id: self.assembly_id.clone(),
            configurations: self
                .configurations
                .iter()
                .filter(|v| predicate(*v))
                .cloned()
                .collect(),
        }
    }


    /*  *  *  *  *  *  *  *\
     *   Helper Methods   *
    \*  *  *  *  *  *  *  */

    fn ensure_same_assembly(&self, other: &Semantics) -> Result<(), SemanticsError> {
        if self.assembly_id != other.assembly_id {
            return Err(SemanticsError::StructuralMismatch {
                left: self.assembly_id.clone(),
                right: other.assembly_id.clone(),
            });
        }

        Ok(())
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Trait Implementations
///////////////////////////////////////////////////////////////////////////////

/*  *  *  *  *  *  *  *\
 *     Semantics      *
\*  *  *  *  *  *  *  */

impl fmt::Display for Semantics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let configurations: Vec<String> =
            self.configurations.iter().map(|v| v.to_string()).collect();

        write!(f, "{{{}}}", configurations.join(", "))
    }
}


/*  *  *  *  *  *  *  *\
 *   SemanticsError   *
\*  *  *  *  *  *  *  */

impl Error for SemanticsError {}

impl fmt::Display for SemanticsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::StructuralMismatch { left, right } => {
                write!(
                    f,
                    "Cannot combine semantics of assembly '{}' with semantics of assembly '{}'",
                    left, right
                )
            }
        }
    }
}


///////////////////////////////////////////////////////////////////////////////
//  Unit Tests
///////////////////////////////////////////////////////////////////////////////
