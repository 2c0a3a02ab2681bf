use termico_eval::detect_pump_flags;

use crate::error::CliError;
use crate::{print_json, OutputFormat, Settings};

pub(crate) fn cmd_pump_flags(description: &str, settings: &Settings) -> Result<(), CliError> {
    let flags = detect_pump_flags(description);
    if settings.quiet {
        return Ok(());
    }
    match settings.output {
        OutputFormat::Json => print_json(&flags)?,
        OutputFormat::Text => {
            println!("needs_cop: {}", flags.needs_cop);
            println!("needs_gwp: {}", flags.needs_gwp);
        }
    }
    Ok(())
}
