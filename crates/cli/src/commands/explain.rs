use std::path::Path;

use termico_eval::InterventionRegistry;

use crate::error::CliError;
use crate::format::currency;
use crate::project::Project;
use crate::{print_json, OutputFormat, Settings};

pub(crate) fn cmd_explain(
    project_path: &Path,
    intervention: &str,
    settings: &Settings,
) -> Result<(), CliError> {
    let project = Project::load(project_path)?;
    let registry = InterventionRegistry::new();
    let ctx = project.selection_context();

    let params = registry
        .lookup(intervention)
        .map(|id| project.params_for(id));
    let explained = registry.explain(intervention, params.as_ref(), project.operator, &ctx)?;

    if settings.quiet {
        return Ok(());
    }
    match settings.output {
        OutputFormat::Json => print_json(&explained)?,
        OutputFormat::Text => {
            for (i, step) in explained.steps.iter().enumerate() {
                println!("{:>3}. {}", i + 1, step);
            }
            println!("Variabili:");
            for (name, value) in &explained.variables {
                println!("  {} = {}", name, value);
            }
            println!(
                "Incentivo: {}",
                currency(explained.result, &settings.currency_symbol)
            );
        }
    }
    Ok(())
}
