use std::path::Path;

use termico_eval::{determine_percentage, EngineError, InterventionRegistry};

use crate::error::CliError;
use crate::format::rate;
use crate::project::Project;
use crate::{print_json, OutputFormat, Settings};

pub(crate) fn cmd_rate(
    project_path: &Path,
    intervention: &str,
    settings: &Settings,
) -> Result<(), CliError> {
    let project = Project::load(project_path)?;
    let id = InterventionRegistry::new()
        .lookup(intervention)
        .ok_or_else(|| EngineError::UnknownIntervention {
            key: intervention.to_string(),
        })?;
    let ctx = project.selection_context();
    let params = project.params_for(id);

    let result = determine_percentage(&ctx.selected_premiums, &params, project.operator, &ctx, id);

    if settings.quiet {
        return Ok(());
    }
    match settings.output {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => {
            println!("{}: p = {}", id.key(), rate(result.p));
            println!("  {}", result.p_desc);
            for applied in &result.premiums {
                println!("  {} +{}", applied.premium, rate(applied.increment));
            }
        }
    }
    Ok(())
}
