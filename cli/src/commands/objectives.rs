use anyhow::Result;
use std::process;

use tisane_core::index::filter;
use tisane_core::service::TisaneService;

use super::helpers::{format_recommendation, json_error, print_objective_table};

pub(crate) fn cmd_objectives(service: &mut TisaneService, json: bool) -> Result<()> {
    let objectives = service.objectives()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&objectives)?);
        return Ok(());
    }

    let records = service.records()?;
    let counts: Vec<usize> = objectives
        .iter()
        .map(|o| filter(&records, o).len())
        .collect();
    print_objective_table(&objectives, &counts);
    Ok(())
}

pub(crate) fn cmd_show(service: &mut TisaneService, objective: &str, json: bool) -> Result<()> {
    let index = service.index()?;
    let recs = service.recommendations(objective)?;
    let label = index.resolve(objective).unwrap_or(objective);

    if recs.is_empty() {
        let message = format!("No recommendations available for '{label}' yet");
        if json {
            println!("{}", json_error(&message));
        } else {
            eprintln!("{message}");
            eprintln!("See the available objectives with: tisane objectives");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recs)?);
        return Ok(());
    }

    println!("=== {label} ===\n");
    for rec in &recs {
        println!("{}", format_recommendation(rec));
    }
    Ok(())
}
