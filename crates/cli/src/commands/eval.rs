use std::path::Path;

use termico_eval::calculate_combined_incentives;
use termico_eval::types::CombinedResult;

use crate::error::CliError;
use crate::format::{currency, rate};
use crate::project::Project;
use crate::{print_json, OutputFormat, Settings};

pub(crate) fn cmd_eval(project_path: &Path, settings: &Settings) -> Result<(), CliError> {
    let project = Project::load(project_path)?;

    let result = calculate_combined_incentives(
        &project.selected,
        &project.inputs,
        project.operator,
        &project.global_premiums,
        &project.context,
    );

    if settings.quiet {
        return Ok(());
    }
    match settings.output {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => print_text(&project, &result, &settings.currency_symbol),
    }
    Ok(())
}

fn print_text(project: &Project, result: &CombinedResult, symbol: &str) {
    println!("Soggetto: {}", project.operator);
    for outcome in &result.per_intervention {
        let r = &outcome.result;
        match outcome.id {
            Some(id) => println!("{} ({})", id.label(), outcome.key),
            None => println!("{} (sconosciuto)", outcome.key),
        }
        println!("  Itot: {}", currency(r.itot, symbol));
        println!("  p: {} ({})", rate(r.p), r.p_desc);
        println!("  Imas: {}", currency(r.imas, symbol));
        println!("  MassimaleSoggetto: {}", currency(r.massimale_soggetto, symbol));
        println!("  Incentivo: {}", currency(r.finale, symbol));
    }
    if !result.applied_premiums.is_empty() {
        println!("Premi applicati:");
        for applied in &result.applied_premiums {
            let entries: Vec<String> = applied
                .interventions
                .iter()
                .zip(&applied.increments)
                .map(|(id, inc)| format!("{} +{}", id, rate(*inc)))
                .collect();
            println!("  {}: {}", applied.premium, entries.join(", "));
        }
    }
    println!("Totale costi ammissibili: {}", currency(result.totals.itot, symbol));
    println!("Totale incentivo: {}", currency(result.totals.finale, symbol));
}
