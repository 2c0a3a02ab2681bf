mod commands;
mod config;
mod error;
mod format;
mod project;
mod telemetry;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::CliConfig;
use crate::error::CliError;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Conto Termico incentive calculator.
#[derive(Parser)]
#[command(name = "termico", version, about = "Conto Termico incentive calculator")]
struct Cli {
    /// Output format (text or json); overrides TERMICO_OUTPUT
    #[arg(long, global = true, value_enum)]
    output: Option<OutputFormat>,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the combined incentive of a project file
    Eval {
        /// Path to the project JSON file
        project: PathBuf,
    },

    /// Show the step-by-step derivation of one intervention's incentive
    Explain {
        /// Path to the project JSON file
        project: PathBuf,
        /// Intervention key (e.g. opache, pompa_calore)
        #[arg(long)]
        intervention: String,
    },

    /// Resolve the incentive rate of one intervention
    Rate {
        /// Path to the project JSON file
        project: PathBuf,
        /// Intervention key (e.g. opache, pompa_calore)
        #[arg(long)]
        intervention: String,
    },

    /// Classify a heat-pump description (which of COP/GWP must be declared)
    PumpFlags {
        /// Free-text heat-pump description
        description: String,
    },
}

/// Settings shared by every command once flags and config are merged.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub output: OutputFormat,
    pub quiet: bool,
    pub currency_symbol: String,
}

fn main() {
    let cli = Cli::parse();

    let settings = match setup(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            let output = cli.output.unwrap_or(OutputFormat::Text);
            report_error(&format!("error: {}", e), output, cli.quiet);
            process::exit(1);
        }
    };

    if let Err(e) = run(cli.command, &settings) {
        report_error(&format!("error: {}", e), settings.output, settings.quiet);
        process::exit(1);
    }
}

/// Load config, install logging and merge flags over config.
fn setup(cli: &Cli) -> Result<Settings, CliError> {
    let config = CliConfig::load()?;
    telemetry::init(&config.log_level)?;
    Ok(Settings {
        output: cli.output.unwrap_or(config.output),
        quiet: cli.quiet,
        currency_symbol: config.currency_symbol,
    })
}

fn run(command: Commands, settings: &Settings) -> Result<(), CliError> {
    match command {
        Commands::Eval { project } => commands::eval::cmd_eval(&project, settings),
        Commands::Explain {
            project,
            intervention,
        } => commands::explain::cmd_explain(&project, &intervention, settings),
        Commands::Rate {
            project,
            intervention,
        } => commands::rate::cmd_rate(&project, &intervention, settings),
        Commands::PumpFlags { description } => {
            commands::pump::cmd_pump_flags(&description, settings)
        }
    }
}

/// Print a serializable value as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
