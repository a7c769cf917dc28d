/* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * *\
Filename : pump_valve.rs

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
    Loads the pump/valve assembly, prints its universe and the semantics of
    a few formulas, then checks the annotations of the pump's 'on' State.

\* * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * */

use assembly_semantics::{
    annotated_state::{AnnotatedState, ExitZone},
    interpreter::{constraints, Interpreter},
    parser::Parser,
    registry::Registry,
    BasicStateProposition,
};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "res/assemblies/pump_valve.xml".to_string());

    let template = Parser::new(&path)?.parse()?;
    let assembly_id = template.id().to_string();
    let pump = template
        .machine("pump")
        .ok_or_else(|| color_eyre::eyre::eyre!("assembly has no 'pump' machine"))?
        .clone();

    let mut registry = Registry::default();
    registry.register_template(template)?;

    let top = registry.top(&assembly_id)?.clone();
    println!("top ({} configurations) = {}", top.len(), top);

    for text in &["pump.on", "pump.on -> valve.open", "!pump.fault && valve:closed"] {
        let formula = Interpreter::new(text).interpret()?;
        let semantics = registry.evaluate(&assembly_id, &formula)?;
        println!("[[{}]] = {}", formula, semantics);
    }

    // Annotate pump.on: it is only allowed while the valve is open
    let on = pump
        .state("on")
        .ok_or_else(|| color_eyre::eyre::eyre!("pump has no 'on' state"))?
        .clone();
    let observed = registry.evaluate(&assembly_id, &Interpreter::new("pump.on").interpret()?)?;

    let mut annotated = AnnotatedState::new(on, &assembly_id);
    annotated.set_state_semantics(observed)?;
    annotated.set_constraints_from_text("pump.on, valve.open", &top)?;
    annotated.add_exit_zone(ExitZone::new(BasicStateProposition::new("valve", "closed")));
    annotated.add_exit_zone(ExitZone::new(BasicStateProposition::new("pump", "fault")));
    println!("{}", annotated);

    let report = annotated.constraint_report();
    println!("satisfied:\n{}", constraints::to_text(&report.satisfied));
    println!("violated:\n{}", constraints::to_text(&report.violated));

    let exits = annotated.exit_zone_report(&pump);
    for zone in &exits.covered {
        println!("covered exit zone   {}", zone);
    }
    for zone in &exits.uncovered {
        println!("uncovered exit zone {}", zone);
    }

    Ok(())
}
