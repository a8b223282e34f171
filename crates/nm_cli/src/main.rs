//! nm_cli: route recognized handwritten math into solve requests.

mod commands;
mod completer;
mod config;
mod format;
mod history;
mod logging;
mod repl;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use nm_engine::Pipeline;

use commands::classify::ClassifyArgs;
use commands::normalize::NormalizeArgs;
use commands::route::RouteArgs;
use commands::validate::ValidateArgs;
use config::{NmConfig, OutputFormat};
use history::JsonlHistory;

#[derive(Parser, Debug)]
#[command(
    name = "nm_cli",
    version,
    about = "Validate, classify and route handwritten math input",
    after_help = "Exit status: 0 routed, 2 structural error, 3 no route matched.\n\
                  Logging: NM_LOG=classify=debug,route=debug (or --log)."
)]
struct Cli {
    /// Config file (default: ./nm_config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directives, e.g. "route=debug"
    #[arg(long, global = true)]
    log: Option<String>,

    /// Append a JSON line per routed input to this file
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline and print the solve request
    Route(RouteArgs),
    /// Classify the input and extract entities, without routing
    Classify(ClassifyArgs),
    /// Check the input for structural errors only
    Validate(ValidateArgs),
    /// Print the canonical form of the input
    Normalize(NormalizeArgs),
    /// Interactive session
    Repl(ReplArgs),
}

#[derive(Args, Debug)]
struct ReplArgs {
    /// Initial note type
    #[arg(long)]
    hint: Option<String>,

    /// Output format (overrides the config file)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

fn build_pipeline(config: &NmConfig, history: Option<&PathBuf>) -> Result<Pipeline> {
    let pipeline = Pipeline::new().with_options(config.pipeline_options());
    match history.or(config.history_path.as_ref()) {
        Some(path) => Ok(pipeline.with_history(Box::new(JsonlHistory::open(path)?))),
        None => Ok(pipeline),
    }
}

fn run(cli: Cli, config: NmConfig) -> Result<ExitCode> {
    match &cli.command {
        Command::Route(args) => {
            let pipeline = build_pipeline(&config, cli.history.as_ref())?;
            commands::route::run(args, &config, &pipeline)
        }
        Command::Classify(args) => commands::classify::run(args, &config),
        Command::Validate(args) => commands::validate::run(args, &config),
        Command::Normalize(args) => commands::normalize::run(args, &config),
        Command::Repl(args) => {
            let pipeline = build_pipeline(&config, cli.history.as_ref())?;
            let note = args
                .hint
                .as_deref()
                .map_or_else(|| config.note_type(), nm_engine::NoteType::parse);
            let format = args.format.unwrap_or(config.output);
            repl::Repl::new(pipeline, note, format).run()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = NmConfig::load(cli.config.as_deref());
    logging::init(cli.log.as_deref(), config.log_filter.as_deref());
    nm_engine::warm_up();

    match run(cli, config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
